//! Explicit ordering between resources.
//!
//! Orderings are declared up front as a directed graph (edge `a -> b` means
//! `a` must exist before `b`), checked for cycles, and only then rendered
//! into `DependsOn` lists. Nothing here knows about any particular
//! provisioning engine.

use crate::error::{ComposeError, Result};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// Node names in insertion order
    nodes: Vec<String>,
    /// node -> nodes that must exist before it, in declaration order
    prerequisites: BTreeMap<String, Vec<String>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.nodes.contains(&name) {
            self.nodes.push(name);
        }
        self
    }

    /// Declare that `before` must exist before `after`. Both nodes are added
    /// if missing.
    pub fn edge(self, before: impl Into<String>, after: impl Into<String>) -> Self {
        let before = before.into();
        let after = after.into();
        let mut graph = self.node(before.clone()).node(after.clone());
        let entry = graph.prerequisites.entry(after).or_default();
        if !entry.contains(&before) {
            entry.push(before);
        }
        graph
    }

    /// Direct prerequisites of `name`
    pub fn prerequisites(&self, name: &str) -> &[String] {
        self.prerequisites
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Nodes ordered so that every node comes after its prerequisites;
    /// ties keep insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`ComposeError::DependencyCycle`] if the graph has a cycle.
    pub fn topological_order(&self) -> Result<Vec<String>> {
        #[derive(Copy, Clone, PartialEq, Eq)]
        enum Mark {
            Temp,
            Perm,
        }

        fn visit(
            v: &str,
            graph: &DependencyGraph,
            marks: &mut BTreeMap<String, Mark>,
            stack: &mut Vec<String>,
            out: &mut Vec<String>,
        ) -> Result<()> {
            match marks.get(v) {
                Some(Mark::Perm) => return Ok(()),
                Some(Mark::Temp) => {
                    // v is on the current path => cycle
                    let start = stack.iter().position(|s| s == v).unwrap_or(0);
                    let mut cycle: Vec<String> = stack[start..].to_vec();
                    cycle.push(v.to_string());
                    return Err(ComposeError::DependencyCycle { cycle });
                }
                None => {}
            }
            marks.insert(v.to_string(), Mark::Temp);
            stack.push(v.to_string());
            for p in graph.prerequisites(v) {
                visit(p, graph, marks, stack, out)?;
            }
            stack.pop();
            marks.insert(v.to_string(), Mark::Perm);
            out.push(v.to_string());
            Ok(())
        }

        let mut marks = BTreeMap::new();
        let mut stack = Vec::new();
        let mut out = Vec::with_capacity(self.nodes.len());
        for n in &self.nodes {
            visit(n, self, &mut marks, &mut stack, &mut out)?;
        }
        Ok(out)
    }

    pub fn validate(&self) -> Result<()> {
        self.topological_order().map(|_| ())
    }
}
