//! Error types
//!
//! Every failure is fatal to the run. `Violation` covers the places where
//! the document does not have the shape the consolidation rules assume;
//! those need a person to look at the document, so each variant carries
//! the offending markup where there is some.

use std::path::PathBuf;

/// A document structure the consolidation rules do not recognize
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    #[error("expected <h1> as the first element of the clause, got {found}")]
    ExpectedHeader { found: String },

    #[error("could not find an operation name in header {header:?}")]
    UnrecognizedHeader { header: String },

    #[error("unexpected node in {operation} clause: {found}\n{clause}")]
    UnexpectedNode {
        operation: String,
        found: String,
        clause: String,
    },

    #[error("{operation} clause is the sole element of its parent")]
    SoleChild { operation: String },

    #[error("node has no location in the source text")]
    Unlocated,

    #[error("clause did not start with emu-clause: {line:?}")]
    ClauseStart { line: String },

    #[error("clause did not end with emu-clause: {line:?}")]
    ClauseEnd { line: String },

    #[error("clause has no body")]
    EmptyClause,

    #[error("line did not start with {indent} spaces: {line:?}")]
    Indentation { indent: usize, line: String },

    #[error("clause did not start with header: {line:?}")]
    MissingHeaderLine { line: String },

    #[error("could not find open tag for trailing clause:\n{lines}")]
    TrailingClause { lines: String },

    #[error("expected exactly one {marker:?} anchor, found {count}")]
    Anchor { marker: String, count: usize },
}

/// Errors that halt a consolidation run
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Structural(#[from] Violation),

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to checkpoint {operation}: {message}")]
    Checkpoint { operation: String, message: String },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// The structural violation behind this error, if that is what it is
    pub fn violation(&self) -> Option<&Violation> {
        match self {
            Error::Structural(v) => Some(v),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_violation_converts() {
        let err: Error = Violation::EmptyClause.into();
        assert_eq!(err.violation(), Some(&Violation::EmptyClause));
        assert_eq!(err.to_string(), "clause has no body");
    }

    #[test]
    fn test_indentation_message_includes_line() {
        let v = Violation::Indentation {
            indent: 4,
            line: "  <emu-alg>".to_string(),
        };
        assert_eq!(v.to_string(), "line did not start with 4 spaces: \"  <emu-alg>\"");
    }

    #[test]
    fn test_io_error_names_path() {
        let err = Error::io(
            "spec.html",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert!(err.to_string().starts_with("failed to access spec.html"));
        assert!(err.violation().is_none());
    }
}
