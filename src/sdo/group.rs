//! Grouping clauses by operation name

use std::collections::HashMap;

use super::classify::Clause;

/// All clauses defining one operation, in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClauseGroup {
    pub operation: String,
    pub clauses: Vec<Clause>,
}

impl ClauseGroup {
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

/// Group clauses by operation, keeping only operations defined more than
/// once. Groups come out in the order their name was first seen.
pub fn group(clauses: Vec<Clause>) -> Vec<ClauseGroup> {
    let mut groups: Vec<ClauseGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for clause in clauses {
        match index.get(&clause.operation) {
            Some(&i) => groups[i].clauses.push(clause),
            None => {
                index.insert(clause.operation.clone(), groups.len());
                groups.push(ClauseGroup {
                    operation: clause.operation.clone(),
                    clauses: vec![clause],
                });
            }
        }
    }

    groups.retain(|g| g.len() > 1);
    groups
}
