//! Building dependency structures from constituency trees.
//!
//! The builder runs a fixed pipeline per tree: index the words,
//! percolate heads, fire every applicable relation trigger at every
//! phrasal node into the basic and complete graphs, attach whatever is
//! left stranded, then linearize the basic graph into typed
//! dependencies under a synthetic root and pull the surviving
//! complete-graph edges in as extras.

use std::fmt::{self, Display, Formatter};

use constree::head::HeadFinder;
use constree::label::basic_category;
use constree::tree::Tree;
use itertools::Itertools;

use crate::dependency::{TypedDependency, WordNode};
use crate::error::BuildError;
use crate::graph::DepMultigraph;
use crate::registry::Registry;
use crate::relation::{most_specific, Relation};

const PUNCT_TAGS: &[&str] = &["''", "``", "-LRB-", "-RRB-", ".", ",", ":", "#"];

/// Returns `true` if the node can be the endpoint of a dependency: it
/// carries a head word and index, and the head is not punctuation.
fn admissible(tree: &Tree, node: usize) -> bool {
    let label = tree[node].label();
    match (label.word(), label.index(), label.tag()) {
        (Some(_), Some(_), Some(tag)) => !PUNCT_TAGS.contains(&basic_category(tag)),
        _ => false,
    }
}

fn word_node(tree: &Tree, node: usize) -> WordNode {
    let label = tree[node].label();
    let word = WordNode::new(
        label.word().unwrap_or_default(),
        label.index().unwrap_or_default(),
    );
    match label.tag() {
        Some(tag) => word.with_tag(tag),
        None => word,
    }
}

/// Converts constituency trees into dependency structures.
pub struct StructureBuilder<'a> {
    registry: &'a Registry,
    head_finder: &'a HeadFinder,
    extra_filter: Option<fn(&TypedDependency) -> bool>,
}

impl<'a> StructureBuilder<'a> {
    /// Construct a builder over a registry and head finder.
    ///
    /// All extra edges are accepted; use
    /// [`with_extra_filter`](StructureBuilder::with_extra_filter) to
    /// restrict them.
    pub fn new(registry: &'a Registry, head_finder: &'a HeadFinder) -> Self {
        StructureBuilder {
            registry,
            head_finder,
            extra_filter: None,
        }
    }

    /// Set the predicate that licenses extra (non-tree) edges.
    pub fn with_extra_filter(mut self, filter: fn(&TypedDependency) -> bool) -> Self {
        self.extra_filter = Some(filter);
        self
    }

    /// Convert a tree into a dependency structure.
    pub fn build(&self, mut tree: Tree) -> Result<Structure, BuildError> {
        tree.index_words();
        self.head_finder.percolate_heads(&mut tree)?;

        let mut basic = DepMultigraph::new();
        let mut complete = DepMultigraph::new();
        self.analyze(&tree, &mut basic, &mut complete);
        self.attach_stranded(&tree, &mut basic)?;

        let mut dependencies = self.linearize(&tree, &basic)?;
        self.add_extras(&tree, &basic, &complete, &mut dependencies);
        dependencies.sort();

        Ok(Structure { tree, dependencies })
    }

    /// Fire every applicable relation trigger at every phrasal node.
    ///
    /// Every admissible edge lands in the complete graph. The basic
    /// graph additionally demands that the dependent does not acquire a
    /// second governor and that the edge closes no cycle; that
    /// discipline is what keeps it tree-shaped.
    fn analyze(&self, tree: &Tree, basic: &mut DepMultigraph, complete: &mut DepMultigraph) {
        let relations = self.registry.relations();

        for node in tree.preorder() {
            if !tree.is_phrasal(node) {
                continue;
            }

            for relation in &relations {
                if !relation.applicable(tree, node) {
                    continue;
                }

                for trigger in relation.triggers() {
                    for target in trigger.matches(tree, node) {
                        let gov = tree.head_chain_top(node);
                        let dep = tree.head_chain_top(target);

                        if gov == dep {
                            continue;
                        }
                        if !admissible(tree, gov) || !admissible(tree, dep) {
                            continue;
                        }

                        complete.add(gov, dep, relation.clone());

                        if !basic.has_parent_other_than(dep, gov) && !basic.has_path(dep, gov) {
                            basic.add(gov, dep, relation.clone());
                        }
                    }
                }
            }
        }
    }

    /// Attach admissible head chains that no trigger reached.
    ///
    /// Each one hangs off the nearest dominating admissible chain with
    /// the generic `dep` relation, so that the basic graph spans every
    /// admissible word.
    fn attach_stranded(&self, tree: &Tree, basic: &mut DepMultigraph) -> Result<(), BuildError> {
        let dep_relation = self.lookup("dep")?;
        let root_chain = tree.head_chain_top(tree.root());

        let leaves: Vec<usize> = tree.leaves().collect();
        for leaf in leaves {
            let chain = tree.head_chain_top(leaf);
            if chain == root_chain {
                continue;
            }
            if !admissible(tree, chain) {
                continue;
            }
            if basic.has_incoming(chain) {
                continue;
            }

            let mut cursor = tree.parent(chain);
            let governor = loop {
                let parent = match cursor {
                    Some(parent) => parent,
                    None => break None,
                };
                let parent_chain = tree.head_chain_top(parent);
                if parent_chain != chain && admissible(tree, parent_chain) {
                    break Some(parent_chain);
                }
                cursor = tree.parent(parent_chain);
            };

            if let Some(governor) = governor {
                if !basic.has_path(chain, governor) {
                    basic.add(governor, chain, dep_relation.clone());
                }
            }
        }

        Ok(())
    }

    /// Turn the basic graph into typed dependencies.
    ///
    /// Each pair's relation set reduces to its most specific member; a
    /// synthetic root edge points at the tree's head, unless that head
    /// is punctuation, in which case the root is reassigned.
    fn linearize(
        &self,
        tree: &Tree,
        basic: &DepMultigraph,
    ) -> Result<Vec<TypedDependency>, BuildError> {
        let mut dependencies = Vec::new();

        for (gov, dep, relations) in basic.pairs() {
            let relation = match most_specific(relations) {
                Some(relation) => relation,
                None => continue,
            };
            let candidate =
                TypedDependency::new(relation, word_node(tree, gov), word_node(tree, dep));
            if !dependencies.contains(&candidate) {
                dependencies.push(candidate);
            }
        }

        let root_relation = self.lookup("root")?;
        let root_chain = tree.head_chain_top(tree.root());
        if admissible(tree, root_chain) {
            dependencies.push(TypedDependency::new(
                root_relation,
                WordNode::root(),
                word_node(tree, root_chain),
            ));
        } else if let Some(index) = tree[root_chain].label().index() {
            reroot(&mut dependencies, root_relation, index);
        }

        Ok(dependencies)
    }

    /// Pull in complete-graph edges the basic discipline rejected.
    fn add_extras(
        &self,
        tree: &Tree,
        basic: &DepMultigraph,
        complete: &DepMultigraph,
        dependencies: &mut Vec<TypedDependency>,
    ) {
        for (gov, dep, relations) in complete.pairs() {
            if basic.contains_pair(gov, dep) {
                continue;
            }
            let relation = match most_specific(relations) {
                Some(relation) => relation,
                None => continue,
            };

            let mut candidate =
                TypedDependency::new(relation, word_node(tree, gov), word_node(tree, dep));
            if dependencies.contains(&candidate) {
                continue;
            }
            candidate.set_extra(true);

            if let Some(filter) = self.extra_filter {
                if !filter(&candidate) {
                    continue;
                }
            }

            dependencies.push(candidate);
        }
    }

    fn lookup(&self, name: &str) -> Result<Relation, BuildError> {
        self.registry
            .lookup(name)
            .ok_or_else(|| BuildError::MissingRelation {
                name: name.to_owned(),
            })
    }
}

/// Reassign the root away from a punctuation head.
///
/// The punctuation's lowest-index former dependent is promoted (the
/// tie-break is a policy choice; any deterministic pick works) and its
/// remaining dependents are reparented onto the promoted word.
fn reroot(
    dependencies: &mut Vec<TypedDependency>,
    root_relation: Relation,
    punct_index: usize,
) {
    let promoted = dependencies
        .iter()
        .enumerate()
        .filter(|(_, d)| d.is_live() && d.gov().index() == punct_index)
        .min_by_key(|(_, d)| d.dep().index())
        .map(|(pos, _)| pos);

    let promoted = match promoted {
        Some(promoted) => promoted,
        None => return,
    };

    let new_root = dependencies[promoted].dep().clone();
    dependencies[promoted].kill();

    for dependency in dependencies.iter_mut() {
        if dependency.is_live() && dependency.gov().index() == punct_index {
            dependency.set_gov(new_root.clone());
        }
    }

    dependencies.push(TypedDependency::new(
        root_relation,
        WordNode::root(),
        new_root,
    ));
    dependencies.retain(TypedDependency::is_live);
}

/// A converted sentence: the annotated tree plus its dependencies.
pub struct Structure {
    tree: Tree,
    dependencies: Vec<TypedDependency>,
}

impl Structure {
    /// Get the indexed, head-annotated tree.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Get the basic dependencies: tree-shaped, no extras.
    pub fn basic_dependencies(&self) -> Vec<TypedDependency> {
        self.dependencies
            .iter()
            .filter(|d| !d.extra())
            .cloned()
            .collect()
    }

    /// Get the dependencies including extra (non-tree) edges.
    pub fn dependencies_with_extras(&self) -> Vec<TypedDependency> {
        self.dependencies.clone()
    }
}

impl Display for Structure {
    fn fmt(&self, fmt: &mut Formatter) -> Result<(), fmt::Error> {
        write!(fmt, "{}", self.dependencies.iter().join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use constree::head::HeadFinder;
    use constree::penn::parse_tree;
    use lazy_static::lazy_static;

    use crate::dependency::{TypedDependency, WordNode};
    use crate::registry::Registry;
    use crate::relation::Relation;

    use super::{reroot, Structure, StructureBuilder};

    lazy_static! {
        static ref REGISTRY: Registry = Registry::english();
        static ref FINDER: HeadFinder = HeadFinder::english();
    }

    fn convert(bracketing: &str) -> Structure {
        let builder = StructureBuilder::new(&REGISTRY, &FINDER);
        builder.build(parse_tree(bracketing).unwrap()).unwrap()
    }

    fn rendered(structure: &Structure) -> Vec<String> {
        structure
            .basic_dependencies()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn ditransitive_scenario() {
        let structure =
            convert("(S (NP (PRP She)) (VP (VBD gave) (NP (PRP me)) (NP (DT a) (NN raise))))");
        assert_eq!(
            rendered(&structure),
            vec![
                "root(ROOT-0, gave-2)",
                "nsubj(gave-2, She-1)",
                "iobj(gave-2, me-3)",
                "dobj(gave-2, raise-5)",
                "det(raise-5, a-4)",
            ]
        );
    }

    #[test]
    fn copular_sentence() {
        let structure =
            convert("(S (NP (NNP Bill)) (VP (VBZ is) (ADJP (JJ big) (CC and) (JJ honest))))");
        let deps = rendered(&structure);
        assert!(deps.contains(&"root(ROOT-0, big-3)".to_owned()));
        assert!(deps.contains(&"nsubj(big-3, Bill-1)".to_owned()));
        assert!(deps.contains(&"cop(big-3, is-2)".to_owned()));
        assert!(deps.contains(&"cc(big-3, and-4)".to_owned()));
        assert!(deps.contains(&"conj(big-3, honest-5)".to_owned()));
    }

    #[test]
    fn multiword_preposition_shape() {
        let structure = convert(
            "(S (NP (PRP She)) (VP (VBD left) (PP (IN because) (PP (IN of) (NP (DT the) (NN rain))))))",
        );
        let deps = rendered(&structure);
        assert!(deps.contains(&"prep(left-2, because-3)".to_owned()));
        assert!(deps.contains(&"pcomp(because-3, of-4)".to_owned()));
        assert!(deps.contains(&"pobj(of-4, rain-6)".to_owned()));
        assert!(deps.contains(&"det(rain-6, the-5)".to_owned()));
    }

    #[test]
    fn punctuation_is_excluded() {
        let structure =
            convert("(S (NP (NNP Bill)) (VP (VBD slept)) (. .))");
        for dep in rendered(&structure) {
            assert!(!dep.contains('.'), "unexpected edge {:?}", dep);
        }
    }

    #[test]
    fn basic_graph_is_a_tree() {
        let structure = convert(
            "(S (NP (DT the) (JJ old) (NN man)) (VP (VBD gave) (NP (PRP me)) (NP (DT a) (JJ big) (NN raise)) (NP (NN yesterday))) (. .))",
        );
        let deps = structure.basic_dependencies();

        // One incoming edge per dependent.
        let mut incoming = HashMap::new();
        for dep in &deps {
            *incoming.entry(dep.dep().index()).or_insert(0) += 1;
        }
        for (index, count) in incoming {
            assert_eq!(count, 1, "dependent {} has {} governors", index, count);
        }

        // No cycles: every walk up the governor chain reaches ROOT.
        let heads: HashMap<usize, usize> = deps
            .iter()
            .map(|d| (d.dep().index(), d.gov().index()))
            .collect();
        for &start in heads.keys() {
            let mut cursor = start;
            let mut steps = 0;
            while cursor != 0 {
                cursor = heads[&cursor];
                steps += 1;
                assert!(steps <= heads.len(), "cycle through {}", start);
            }
        }
    }

    #[test]
    fn every_word_is_covered() {
        let structure = convert(
            "(S (NP (DT the) (NN dog)) (VP (VBZ is) (VP (VBG chasing) (NP (DT a) (NN cat)))) (. .))",
        );
        let deps = structure.basic_dependencies();

        // Words 1..=7 minus the final period.
        for index in 1..=6 {
            assert_eq!(
                deps.iter().filter(|d| d.dep().index() == index).count(),
                1,
                "word {} is not covered exactly once",
                index
            );
        }
    }

    #[test]
    fn determinism() {
        let bracketing = "(S (NP (DT the) (NN dog)) (VP (VBZ is) (VP (VBG chasing) (NP (DT a) (NN cat)))))";
        assert_eq!(
            rendered(&convert(bracketing)),
            rendered(&convert(bracketing))
        );
    }

    #[test]
    fn degenerate_punctuation_tree() {
        let structure = convert("(X (. .) (, ,))");
        assert!(structure.basic_dependencies().is_empty());
    }

    #[test]
    fn reroot_promotes_lowest_index_dependent() {
        fn rel(name: &str) -> Relation {
            Relation::new(name.into(), name.into(), None, Vec::new(), Vec::new())
        }

        // A punctuation word at index 4 governs words 2 and 3.
        let mut deps = vec![
            TypedDependency::new(rel("dep"), WordNode::new(";", 4), WordNode::new("b", 3)),
            TypedDependency::new(rel("dep"), WordNode::new(";", 4), WordNode::new("a", 2)),
            TypedDependency::new(rel("det"), WordNode::new("a", 2), WordNode::new("the", 1)),
        ];
        reroot(&mut deps, rel("root"), 4);
        deps.sort();

        let rendered: Vec<_> = deps.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec![
                "root(ROOT-0, a-2)",
                "dep(a-2, b-3)",
                "det(a-2, the-1)",
            ]
        );
    }
}
