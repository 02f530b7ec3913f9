//! # Method Index
//!
//! Reverse index from the integration identifier an operation declares in
//! `x-amazon-apigateway-integration.uri` back to the `(path, method)` that
//! declared it.
//!
//! Identifiers are chosen by the document's author and nothing forces them
//! to be unique. What happens on a collision is an explicit
//! [`DuplicatePolicy`]: either the later operation in traversal order wins
//! (the default) or the build fails.

use crate::error::{ComposeError, Result};
use crate::spec::{MethodTarget, SpecDocument};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::warn;

/// What to do when two operations declare the same integration identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// The operation seen later in traversal order replaces the earlier one
    #[default]
    LastWriteWins,
    /// Fail with [`ComposeError::DuplicateIntegrationId`]
    Reject,
}

/// Integration identifier → `(path, method)` lookup, built once and read-only afterwards
#[derive(Debug, Clone, Default)]
pub struct MethodIndex {
    entries: HashMap<String, MethodTarget>,
    /// Identifiers in first-seen order, for deterministic iteration
    order: Vec<String>,
}

impl MethodIndex {
    /// Build the index from a document
    ///
    /// # Errors
    ///
    /// * [`ComposeError::MalformedDocument`] if the document shape is wrong
    /// * [`ComposeError::DuplicateIntegrationId`] under [`DuplicatePolicy::Reject`]
    pub fn build(doc: &SpecDocument, policy: DuplicatePolicy) -> Result<Self> {
        let mut index = MethodIndex::default();
        for op in doc.operations()? {
            match index.entries.get(&op.integration_id) {
                Some(previous) => match policy {
                    DuplicatePolicy::Reject => {
                        return Err(ComposeError::DuplicateIntegrationId {
                            id: op.integration_id,
                            first: previous.location(),
                            second: op.target.location(),
                        });
                    }
                    DuplicatePolicy::LastWriteWins => {
                        warn!(
                            id = %op.integration_id,
                            replaced = %previous,
                            by = %op.target,
                            "duplicate integration identifier, keeping the later operation"
                        );
                        index.entries.insert(op.integration_id, op.target);
                    }
                },
                None => {
                    index.order.push(op.integration_id.clone());
                    index.entries.insert(op.integration_id, op.target);
                }
            }
        }
        Ok(index)
    }

    pub fn lookup(&self, id: &str) -> Option<&MethodTarget> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in the order their identifier was first seen
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MethodTarget)> {
        self.order
            .iter()
            .filter_map(|id| self.entries.get(id).map(|t| (id.as_str(), t)))
    }
}
