//! Step loop
//!
//! Each step re-reads and re-parses the whole document and consolidates
//! exactly one operation. Re-parsing every time keeps every byte offset
//! fresh, and one operation per step gives one checkpoint per operation.

use super::{merge, plan, rewrite};
use crate::dom::Document;
use crate::error::Result;
use crate::store::{Checkpoint, DocumentStore};

/// Outcome of one step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// One operation was consolidated and checkpointed
    Merged { operation: String, clauses: usize },
    /// No operation is defined more than once
    Done,
}

pub struct Driver<S, C> {
    store: S,
    checkpoint: C,
}

impl<S: DocumentStore, C: Checkpoint> Driver<S, C> {
    pub fn new(store: S, checkpoint: C) -> Self {
        Driver { store, checkpoint }
    }

    /// Consolidate the first duplicated operation, if there is one
    ///
    /// Nothing is written unless the whole step succeeds.
    pub fn step(&mut self) -> Result<Step> {
        let source = self.store.load()?;

        let merged = {
            let doc = Document::parse(&source);
            let groups = plan(&doc)?;
            let Some(group) = groups.first() else {
                tracing::info!("No duplicated operations left");
                return Ok(Step::Done);
            };
            tracing::debug!(
                "{} duplicated operations, consolidating {}",
                groups.len(),
                group.operation
            );
            merge::merge(&source, &doc, group)?
        };

        let rewritten = rewrite::rewrite(&source, &merged.removals, &merged.text)?;
        self.store.store(&rewritten)?;
        self.checkpoint.record(&merged.operation)?;

        tracing::info!(
            "Rewrote {} ({} clauses into {})",
            merged.operation,
            merged.removals.len(),
            merged.id
        );
        Ok(Step::Merged {
            operation: merged.operation,
            clauses: merged.removals.len(),
        })
    }

    /// Step until done, or until `max_steps` operations were consolidated.
    /// Returns the consolidated operation names in order.
    pub fn run(&mut self, max_steps: Option<usize>) -> Result<Vec<String>> {
        let mut consolidated = Vec::new();
        while max_steps.map_or(true, |max| consolidated.len() < max) {
            match self.step()? {
                Step::Merged { operation, .. } => consolidated.push(operation),
                Step::Done => break,
            }
        }
        Ok(consolidated)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn checkpoint(&self) -> &C {
        &self.checkpoint
    }

    pub fn into_parts(self) -> (S, C) {
        (self.store, self.checkpoint)
    }
}
