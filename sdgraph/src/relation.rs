//! Grammatical relations.
//!
//! Relations form a single-rooted is-a hierarchy: every relation except
//! the root carries exactly one parent. The hierarchy decides, when a
//! governor/dependent pair triggers several relations, which one names
//! the edge: the most specific of them.

use std::cmp::Ordering;
use std::fmt::{self, Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use constree::tree::Tree;

use crate::matcher::TriggerPattern;

struct RelationData {
    short_name: String,
    long_name: String,
    parent: Option<Relation>,
    restriction: Vec<String>,
    triggers: Vec<TriggerPattern>,
    specific: Option<String>,
}

/// A grammatical relation.
///
/// `Relation` is a shared handle; clones are cheap and refer to the
/// same entry in the hierarchy. Identity is the short name, which is
/// unique within a registry.
#[derive(Clone)]
pub struct Relation(Arc<RelationData>);

impl Relation {
    pub(crate) fn new(
        short_name: String,
        long_name: String,
        parent: Option<Relation>,
        restriction: Vec<String>,
        triggers: Vec<TriggerPattern>,
    ) -> Self {
        Relation(Arc::new(RelationData {
            short_name,
            long_name,
            parent,
            restriction,
            triggers,
            specific: None,
        }))
    }

    /// Create a parameterized variant of `parent`, named after `word`.
    pub(crate) fn parameterized(parent: Relation, word: &str) -> Self {
        Relation(Arc::new(RelationData {
            short_name: format!("{}:{}", parent.short_name(), word),
            long_name: format!("{}, {}", parent.long_name(), word),
            restriction: Vec::new(),
            triggers: Vec::new(),
            specific: Some(word.to_owned()),
            parent: Some(parent),
        }))
    }

    /// Get the short name, e.g. `nsubj` or `nmod:because_of`.
    pub fn short_name(&self) -> &str {
        &self.0.short_name
    }

    /// Get the descriptive name, e.g. `nominal subject`.
    pub fn long_name(&self) -> &str {
        &self.0.long_name
    }

    /// Get the parent relation. Only the hierarchy root has none.
    pub fn parent(&self) -> Option<&Relation> {
        self.0.parent.as_ref()
    }

    /// Get the parameter word of a parameterized relation.
    pub fn specific(&self) -> Option<&str> {
        self.0.specific.as_deref()
    }

    /// Get the trigger patterns.
    pub fn triggers(&self) -> &[TriggerPattern] {
        &self.0.triggers
    }

    /// Returns `true` if this relation's triggers apply to the node.
    ///
    /// The category restriction is checked against the node's basic
    /// category; a relation without a restriction applies nowhere (it
    /// is only ever created by later rewriting).
    pub fn applicable(&self, tree: &Tree, node: usize) -> bool {
        let category = tree[node].label().basic_category();
        self.0.restriction.iter().any(|c| c == category)
    }

    /// Returns `true` if this relation is a strict ancestor of `other`.
    pub fn ancestor_of(&self, other: &Relation) -> bool {
        let mut cur = other.parent();
        while let Some(rel) = cur {
            if rel == self {
                return true;
            }
            cur = rel.parent();
        }

        false
    }
}

impl Debug for Relation {
    fn fmt(&self, fmt: &mut Formatter) -> Result<(), fmt::Error> {
        write!(fmt, "Relation({})", self.0.short_name)
    }
}

impl Display for Relation {
    fn fmt(&self, fmt: &mut Formatter) -> Result<(), fmt::Error> {
        fmt.write_str(&self.0.short_name)
    }
}

impl Eq for Relation {}

impl PartialEq for Relation {
    fn eq(&self, other: &Self) -> bool {
        self.0.short_name == other.0.short_name
    }
}

impl Hash for Relation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.short_name.hash(state);
    }
}

impl Ord for Relation {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.short_name.cmp(&other.0.short_name)
    }
}

impl PartialOrd for Relation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Reduce a set of triggered relations to the single most specific one.
///
/// The relations are first put in name order, so that ties between
/// relations on different branches of the hierarchy resolve the same
/// way on every run; the fold then replaces the candidate whenever it
/// is an ancestor of the next relation.
pub fn most_specific(relations: &[Relation]) -> Option<Relation> {
    let mut sorted: Vec<&Relation> = relations.iter().collect();
    sorted.sort();

    let mut best: Option<&Relation> = None;
    for rel in sorted {
        match best {
            None => best = Some(rel),
            Some(cur) if cur.ancestor_of(rel) => best = Some(rel),
            Some(_) => {}
        }
    }

    best.cloned()
}

#[cfg(test)]
mod tests {
    use super::{most_specific, Relation};

    fn chain() -> (Relation, Relation, Relation) {
        let dep = Relation::new(
            "dep".into(),
            "dependent".into(),
            None,
            Vec::new(),
            Vec::new(),
        );
        let aux = Relation::new(
            "aux".into(),
            "auxiliary".into(),
            Some(dep.clone()),
            Vec::new(),
            Vec::new(),
        );
        let auxpass = Relation::new(
            "auxpass".into(),
            "passive auxiliary".into(),
            Some(aux.clone()),
            Vec::new(),
            Vec::new(),
        );
        (dep, aux, auxpass)
    }

    #[test]
    fn ancestry_is_strict() {
        let (dep, aux, auxpass) = chain();
        assert!(dep.ancestor_of(&aux));
        assert!(dep.ancestor_of(&auxpass));
        assert!(aux.ancestor_of(&auxpass));
        assert!(!aux.ancestor_of(&aux));
        assert!(!auxpass.ancestor_of(&aux));
    }

    #[test]
    fn most_specific_prefers_descendants() {
        let (dep, aux, auxpass) = chain();
        assert_eq!(
            most_specific(&[dep.clone(), aux.clone(), auxpass.clone()]),
            Some(auxpass.clone())
        );
        assert_eq!(
            most_specific(&[auxpass.clone(), dep.clone()]),
            Some(auxpass)
        );
        assert_eq!(most_specific(&[]), None);
    }

    #[test]
    fn most_specific_breaks_ties_by_name() {
        let (dep, _, _) = chain();
        let cc = Relation::new(
            "cc".into(),
            "coordination".into(),
            Some(dep.clone()),
            Vec::new(),
            Vec::new(),
        );
        let conj = Relation::new(
            "conj".into(),
            "conjunct".into(),
            Some(dep),
            Vec::new(),
            Vec::new(),
        );

        // Unrelated siblings: the name order decides, in either input
        // order.
        assert_eq!(
            most_specific(&[conj.clone(), cc.clone()]),
            most_specific(&[cc.clone(), conj])
        );
        assert_eq!(most_specific(&[cc.clone()]), Some(cc));
    }

    #[test]
    fn parameterized_relations_descend_from_their_family() {
        let (dep, _, _) = chain();
        let nmod = Relation::new(
            "nmod".into(),
            "nominal modifier".into(),
            Some(dep),
            Vec::new(),
            Vec::new(),
        );
        let because_of = Relation::parameterized(nmod.clone(), "because_of");

        assert_eq!(because_of.short_name(), "nmod:because_of");
        assert_eq!(because_of.specific(), Some("because_of"));
        assert!(nmod.ancestor_of(&because_of));
        assert_eq!(most_specific(&[nmod, because_of.clone()]), Some(because_of));
    }
}
