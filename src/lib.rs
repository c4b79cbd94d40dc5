//! sdo-consolidate - merge scattered syntax-directed operation clauses
//!
//! Layers:
//! - core: markup scanning and tokenizing with byte spans
//! - dom: arena document tree, and the `Locator` that maps nodes to spans
//! - sdo: find, validate, group, merge and splice operation clauses
//! - store: where the document lives, and how steps are checkpointed

pub mod config;
pub mod core;
pub mod dom;
pub mod error;
pub mod sdo;
pub mod store;

pub use config::Config;
pub use dom::{Document, Locator, TextSpan};
pub use error::{Error, Result, Violation};
pub use sdo::{plan, ClauseGroup, Driver, Step};
pub use store::{Checkpoint, DocumentStore, FileStore, GitCheckpoint, NoCheckpoint};

/// Consolidate the configured document until no operation is defined twice.
/// Returns the consolidated operation names in order.
pub fn run(config: &Config) -> Result<Vec<String>> {
    let store = FileStore::new(&config.document);
    if config.commit {
        let checkpoint = GitCheckpoint::for_document(&config.document);
        Driver::new(store, checkpoint).run(config.max_steps)
    } else {
        Driver::new(store, NoCheckpoint).run(config.max_steps)
    }
}

/// The operations a run would consolidate, in order, without changing anything
pub fn report(config: &Config) -> Result<Vec<ClauseGroup>> {
    let source = FileStore::new(&config.document).load()?;
    let doc = Document::parse(&source);
    Ok(plan(&doc)?)
}
