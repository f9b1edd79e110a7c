//! Typed dependencies.

use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::mem;

use crate::relation::Relation;

/// The word form of the synthetic root.
pub const ROOT_WORD: &str = "ROOT";

/// A word occurrence in a sentence.
///
/// Identity is the pair of form and index; the tag is an annotation
/// carried along for the rewriting passes and does not participate in
/// equality.
#[derive(Clone, Debug)]
pub struct WordNode {
    word: String,
    tag: Option<String>,
    index: usize,
}

impl WordNode {
    /// Create a word occurrence.
    pub fn new(word: impl Into<String>, index: usize) -> Self {
        WordNode {
            word: word.into(),
            tag: None,
            index,
        }
    }

    /// Set the part-of-speech tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// The synthetic root, at index 0.
    pub fn root() -> Self {
        WordNode::new(ROOT_WORD, 0)
    }

    /// Get the word form.
    pub fn word(&self) -> &str {
        &self.word
    }

    /// Get the part-of-speech tag.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Get the word index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns `true` for the synthetic root.
    pub fn is_root(&self) -> bool {
        self.index == 0
    }
}

impl Eq for WordNode {}

impl PartialEq for WordNode {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.word == other.word
    }
}

impl Hash for WordNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.word.hash(state);
    }
}

impl Display for WordNode {
    fn fmt(&self, fmt: &mut Formatter) -> Result<(), fmt::Error> {
        write!(fmt, "{}-{}", self.word, self.index)
    }
}

/// The relation slot of an edge.
///
/// Rewriting passes retire edges by tombstoning them; a tombstoned edge
/// stays in the list, inert, until the next cleanup physically removes
/// it.
#[derive(Clone, Debug, Eq, PartialEq)]
enum EdgeState {
    Active(Relation),
    Tombstoned,
}

/// A typed dependency edge.
///
/// Equality covers the relation, governor and dependent; the extra flag
/// marks non-tree edges without making an edge distinct.
#[derive(Clone, Debug)]
pub struct TypedDependency {
    state: EdgeState,
    gov: WordNode,
    dep: WordNode,
    extra: bool,
}

impl TypedDependency {
    /// Create a live, non-extra edge.
    pub fn new(relation: Relation, gov: WordNode, dep: WordNode) -> Self {
        TypedDependency {
            state: EdgeState::Active(relation),
            gov,
            dep,
            extra: false,
        }
    }

    /// Get the relation of a live edge.
    pub fn relation(&self) -> Option<&Relation> {
        match &self.state {
            EdgeState::Active(relation) => Some(relation),
            EdgeState::Tombstoned => None,
        }
    }

    /// Returns `true` if the edge carries the named relation.
    pub fn is(&self, short_name: &str) -> bool {
        matches!(self.relation(), Some(rel) if rel.short_name() == short_name)
    }

    /// Replace the relation, reviving a tombstoned edge.
    pub fn set_relation(&mut self, relation: Relation) {
        self.state = EdgeState::Active(relation);
    }

    /// Tombstone the edge.
    pub fn kill(&mut self) {
        self.state = EdgeState::Tombstoned;
    }

    /// Returns `true` unless the edge is tombstoned.
    pub fn is_live(&self) -> bool {
        matches!(self.state, EdgeState::Active(_))
    }

    /// Get the governor.
    pub fn gov(&self) -> &WordNode {
        &self.gov
    }

    /// Get the dependent.
    pub fn dep(&self) -> &WordNode {
        &self.dep
    }

    /// Replace the governor.
    ///
    /// Returns the governor that is replaced.
    pub fn set_gov(&mut self, gov: WordNode) -> WordNode {
        mem::replace(&mut self.gov, gov)
    }

    /// Replace the dependent.
    ///
    /// Returns the dependent that is replaced.
    pub fn set_dep(&mut self, dep: WordNode) -> WordNode {
        mem::replace(&mut self.dep, dep)
    }

    /// Returns `true` for a non-tree edge.
    pub fn extra(&self) -> bool {
        self.extra
    }

    /// Mark the edge as a non-tree edge.
    pub fn set_extra(&mut self, extra: bool) {
        self.extra = extra;
    }
}

impl Eq for TypedDependency {}

impl PartialEq for TypedDependency {
    fn eq(&self, other: &Self) -> bool {
        self.state == other.state && self.gov == other.gov && self.dep == other.dep
    }
}

impl Ord for TypedDependency {
    fn cmp(&self, other: &Self) -> Ordering {
        self.gov
            .index()
            .cmp(&other.gov.index())
            .then_with(|| self.dep.index().cmp(&other.dep.index()))
            .then_with(|| self.relation_name().cmp(other.relation_name()))
    }
}

impl PartialOrd for TypedDependency {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl TypedDependency {
    fn relation_name(&self) -> &str {
        match &self.state {
            EdgeState::Active(relation) => relation.short_name(),
            EdgeState::Tombstoned => "",
        }
    }
}

impl Display for TypedDependency {
    fn fmt(&self, fmt: &mut Formatter) -> Result<(), fmt::Error> {
        match &self.state {
            EdgeState::Active(relation) => {
                write!(fmt, "{}({}, {})", relation.short_name(), self.gov, self.dep)
            }
            EdgeState::Tombstoned => write!(fmt, "-({}, {})", self.gov, self.dep),
        }
    }
}

/// Remove tombstoned edges and restore the total order.
pub fn prune(dependencies: &mut Vec<TypedDependency>) {
    dependencies.retain(TypedDependency::is_live);
    dependencies.sort();
}

#[cfg(test)]
mod tests {
    use crate::relation::Relation;

    use super::{prune, TypedDependency, WordNode};

    fn relation(name: &str) -> Relation {
        Relation::new(name.into(), name.into(), None, Vec::new(), Vec::new())
    }

    #[test]
    fn display_is_the_interchange_form() {
        let dep = TypedDependency::new(
            relation("nsubj"),
            WordNode::new("gave", 2),
            WordNode::new("She", 1),
        );
        assert_eq!(dep.to_string(), "nsubj(gave-2, She-1)");
    }

    #[test]
    fn tag_is_not_identity() {
        let plain = WordNode::new("gave", 2);
        let tagged = WordNode::new("gave", 2).with_tag("VBD");
        assert_eq!(plain, tagged);
        assert_ne!(plain, WordNode::new("gave", 3));
    }

    #[test]
    fn tombstoning_and_revival() {
        let mut dep = TypedDependency::new(
            relation("dobj"),
            WordNode::new("gave", 2),
            WordNode::new("raise", 5),
        );
        assert!(dep.is_live());

        dep.kill();
        assert!(!dep.is_live());
        assert_eq!(dep.relation(), None);

        dep.set_relation(relation("iobj"));
        assert!(dep.is("iobj"));
    }

    #[test]
    fn prune_removes_tombstones_and_sorts() {
        let mut deps = vec![
            TypedDependency::new(
                relation("dobj"),
                WordNode::new("gave", 2),
                WordNode::new("raise", 5),
            ),
            TypedDependency::new(
                relation("root"),
                WordNode::root(),
                WordNode::new("gave", 2),
            ),
            TypedDependency::new(
                relation("det"),
                WordNode::new("raise", 5),
                WordNode::new("a", 4),
            ),
        ];
        deps[0].kill();

        prune(&mut deps);
        let rendered: Vec<_> = deps.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["root(ROOT-0, gave-2)", "det(raise-5, a-4)"]);
    }

    #[test]
    fn order_is_governor_then_dependent() {
        let a = TypedDependency::new(
            relation("nsubj"),
            WordNode::new("gave", 2),
            WordNode::new("She", 1),
        );
        let b = TypedDependency::new(
            relation("dobj"),
            WordNode::new("gave", 2),
            WordNode::new("raise", 5),
        );
        let c = TypedDependency::new(
            relation("det"),
            WordNode::new("raise", 5),
            WordNode::new("a", 4),
        );
        let mut deps = vec![c.clone(), b.clone(), a.clone()];
        deps.sort();
        assert_eq!(deps, vec![a, b, c]);
    }
}
