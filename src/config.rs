//! Run configuration

use std::path::PathBuf;

/// Default document location, relative to the working directory
pub const DEFAULT_DOCUMENT: &str = "spec.html";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// The document rewritten in place
    pub document: PathBuf,
    /// Record a git commit after every consolidated operation
    pub commit: bool,
    /// Stop after this many operations
    pub max_steps: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            document: PathBuf::from(DEFAULT_DOCUMENT),
            commit: true,
            max_steps: None,
        }
    }
}
