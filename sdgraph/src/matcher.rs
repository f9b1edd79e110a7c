//! Trigger-pattern matching.
//!
//! A trigger pattern answers one question: given a tree node, which
//! other nodes stand in the pattern's relation to it? Patterns arrive
//! precompiled — here as boxed functions over the annotated tree — so
//! the graph builder never interprets a pattern language of its own.

use std::fmt::{self, Debug, Formatter};

use constree::tree::Tree;

/// A compiled trigger pattern.
pub struct TriggerPattern {
    matcher: Box<dyn Fn(&Tree, usize) -> Vec<usize> + Send + Sync>,
}

impl TriggerPattern {
    /// Wrap a matcher function.
    ///
    /// The function receives an indexed, head-percolated tree and the
    /// node under consideration, and returns the related nodes in
    /// surface order.
    pub fn new<F>(matcher: F) -> Self
    where
        F: Fn(&Tree, usize) -> Vec<usize> + Send + Sync + 'static,
    {
        TriggerPattern {
            matcher: Box::new(matcher),
        }
    }

    /// Get the nodes related to `node` under this pattern.
    pub fn matches(&self, tree: &Tree, node: usize) -> Vec<usize> {
        (self.matcher)(tree, node)
    }
}

impl Debug for TriggerPattern {
    fn fmt(&self, fmt: &mut Formatter) -> Result<(), fmt::Error> {
        fmt.write_str("TriggerPattern")
    }
}
