//! Dependency multigraphs.
//!
//! During analysis two graphs grow side by side: the *basic* graph,
//! kept tree-shaped by the caller's construction discipline, and the
//! *complete* graph, which accepts every triggered edge. Nodes are
//! head-chain tops, identified by tree-node id; each governor/dependent
//! pair carries the set of relations that triggered it.

use std::collections::BTreeMap;

use petgraph::algo::has_path_connecting;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

use crate::relation::Relation;

/// A directed multigraph over head-chain nodes.
///
/// This is a thin wrapper around a `petgraph` `DiGraph` used for the
/// connectivity queries, with the per-pair relation sets held in an
/// ordered side map so that iteration is deterministic.
pub struct DepMultigraph {
    graph: DiGraph<usize, ()>,
    nodes: BTreeMap<usize, NodeIndex>,
    relations: BTreeMap<(usize, usize), Vec<Relation>>,
}

impl DepMultigraph {
    pub fn new() -> Self {
        DepMultigraph {
            graph: DiGraph::new(),
            nodes: BTreeMap::new(),
            relations: BTreeMap::new(),
        }
    }

    fn ensure_node(&mut self, node: usize) -> NodeIndex {
        let graph = &mut self.graph;
        *self
            .nodes
            .entry(node)
            .or_insert_with(|| graph.add_node(node))
    }

    /// Record a relation between `gov` and `dep`.
    ///
    /// The same relation is recorded at most once per pair; further
    /// relations on the same pair accumulate into its set.
    pub fn add(&mut self, gov: usize, dep: usize, relation: Relation) {
        let gov_idx = self.ensure_node(gov);
        let dep_idx = self.ensure_node(dep);

        let relations = self.relations.entry((gov, dep)).or_default();
        if !relations.contains(&relation) {
            relations.push(relation);
        }

        if self.graph.find_edge(gov_idx, dep_idx).is_none() {
            self.graph.add_edge(gov_idx, dep_idx, ());
        }
    }

    /// Returns `true` if the pair has been recorded.
    pub fn contains_pair(&self, gov: usize, dep: usize) -> bool {
        self.relations.contains_key(&(gov, dep))
    }

    /// Returns `true` if `dep` has an incoming edge.
    pub fn has_incoming(&self, dep: usize) -> bool {
        match self.nodes.get(&dep) {
            Some(&idx) => self
                .graph
                .neighbors_directed(idx, Direction::Incoming)
                .next()
                .is_some(),
            None => false,
        }
    }

    /// Returns `true` if `dep` has a governor other than `gov`.
    pub fn has_parent_other_than(&self, dep: usize, gov: usize) -> bool {
        match self.nodes.get(&dep) {
            Some(&idx) => self
                .graph
                .neighbors_directed(idx, Direction::Incoming)
                .any(|n| self.graph[n] != gov),
            None => false,
        }
    }

    /// Returns `true` if `to` is reachable from `from`.
    ///
    /// Unknown nodes are reachable from nothing.
    pub fn has_path(&self, from: usize, to: usize) -> bool {
        match (self.nodes.get(&from), self.nodes.get(&to)) {
            (Some(&from), Some(&to)) => has_path_connecting(&self.graph, from, to, None),
            _ => false,
        }
    }

    /// Iterate over the recorded pairs and their relation sets, in
    /// (governor, dependent) order.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize, &[Relation])> {
        self.relations
            .iter()
            .map(|(&(gov, dep), relations)| (gov, dep, relations.as_slice()))
    }
}

impl Default for DepMultigraph {
    fn default() -> Self {
        DepMultigraph::new()
    }
}

#[cfg(test)]
mod tests {
    use crate::relation::Relation;

    use super::DepMultigraph;

    fn relation(name: &str) -> Relation {
        Relation::new(name.into(), name.into(), None, Vec::new(), Vec::new())
    }

    #[test]
    fn relations_accumulate_per_pair() {
        let mut graph = DepMultigraph::new();
        graph.add(1, 2, relation("aux"));
        graph.add(1, 2, relation("auxpass"));
        graph.add(1, 2, relation("aux"));

        let pairs: Vec<_> = graph.pairs().collect();
        assert_eq!(pairs.len(), 1);
        let (gov, dep, relations) = pairs[0];
        assert_eq!((gov, dep), (1, 2));
        assert_eq!(relations, &[relation("aux"), relation("auxpass")]);
    }

    #[test]
    fn incoming_queries() {
        let mut graph = DepMultigraph::new();
        graph.add(1, 2, relation("dobj"));

        assert!(graph.has_incoming(2));
        assert!(!graph.has_incoming(1));
        assert!(!graph.has_incoming(99));

        assert!(!graph.has_parent_other_than(2, 1));
        assert!(graph.has_parent_other_than(2, 3));

        graph.add(3, 2, relation("conj"));
        assert!(graph.has_parent_other_than(2, 1));
    }

    #[test]
    fn reachability() {
        let mut graph = DepMultigraph::new();
        graph.add(1, 2, relation("dobj"));
        graph.add(2, 3, relation("det"));

        assert!(graph.has_path(1, 3));
        assert!(!graph.has_path(3, 1));
        assert!(!graph.has_path(1, 99));
    }

    #[test]
    fn pairs_iterate_in_order() {
        let mut graph = DepMultigraph::new();
        graph.add(5, 1, relation("det"));
        graph.add(2, 5, relation("dobj"));
        graph.add(2, 1, relation("nsubj"));

        let order: Vec<_> = graph.pairs().map(|(g, d, _)| (g, d)).collect();
        assert_eq!(order, vec![(2, 1), (2, 5), (5, 1)]);
    }
}
