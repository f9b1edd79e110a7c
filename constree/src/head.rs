//! Head selection and percolation.

use crate::error::HeadError;
use crate::head_rules::{Direction, HeadRule, HeadRuleTable};
use crate::label::basic_category;
use crate::penn::PennTree;
use crate::tree::Tree;

/// Hook for treebanks that mark heads explicitly.
///
/// Returns the head child of the given node, or `None` to defer to the
/// rule table.
pub type MarkedHeadFn = fn(&Tree, usize) -> Option<usize>;

/// Hook that may remap the selected head child.
///
/// Called with the node and the chosen child; returns the corrected
/// child.
pub type PostFixFn = fn(&Tree, usize, usize) -> usize;

/// Rule-driven head selection.
///
/// `HeadFinder` wraps a [`HeadRuleTable`] together with two optional
/// strategy hooks: a marked-head lookup consulted before the rules, and
/// a post-selection fix applied to whatever the rules chose.
pub struct HeadFinder {
    table: HeadRuleTable,
    find_marked_head: Option<MarkedHeadFn>,
    post_operation_fix: Option<PostFixFn>,
}

impl HeadFinder {
    /// Construct a head finder with no strategy hooks.
    pub fn new(table: HeadRuleTable) -> Self {
        HeadFinder {
            table,
            find_marked_head: None,
            post_operation_fix: None,
        }
    }

    /// Set the marked-head lookup hook.
    pub fn with_marked_head(mut self, hook: MarkedHeadFn) -> Self {
        self.find_marked_head = Some(hook);
        self
    }

    /// Set the post-selection fix hook.
    pub fn with_post_fix(mut self, hook: PostFixFn) -> Self {
        self.post_operation_fix = Some(hook);
        self
    }

    /// The head finder for English trees.
    ///
    /// Uses the English rule table, recognizes copular constructions
    /// (the predicative complement, not the copula, heads the verb
    /// phrase), and steers the selection away from conjunctions and
    /// punctuation.
    pub fn english() -> Self {
        HeadFinder::new(HeadRuleTable::english())
            .with_marked_head(english_marked_head)
            .with_post_fix(english_post_fix)
    }

    /// Select the head child of a non-leaf node.
    ///
    /// The marked-head hook is consulted first; a node with a single
    /// child collapses to that child; otherwise the category's rule
    /// list is scanned, with the table's default rule and finally the
    /// edge child as fallbacks. The post-fix hook may remap the result.
    pub fn determine_head(&self, tree: &Tree, node: usize) -> Result<usize, HeadError> {
        if node >= tree.len() {
            return Err(HeadError::NodeOutOfBounds {
                node,
                node_count: tree.len(),
            });
        }

        if tree.is_leaf(node) {
            return Err(HeadError::HeadOfLeaf { node });
        }

        if let Some(hook) = self.find_marked_head {
            if let Some(head) = hook(tree, node) {
                return Ok(head);
            }
        }

        let children = tree.children(node);
        if children.len() == 1 {
            return Ok(children[0]);
        }

        let category = tree[node].label().basic_category();
        let chosen = match self.table.rules(category) {
            Some(rules) => match rules.iter().find_map(|rule| rule.select(tree, children)) {
                Some(chosen) => chosen,
                None => {
                    let direction = rules
                        .last()
                        .map(HeadRule::direction)
                        .unwrap_or(Direction::Left);
                    self.fallback(tree, node, direction)?
                }
            },
            None => self.fallback(tree, node, Direction::Left)?,
        };

        Ok(match self.post_operation_fix {
            Some(hook) => hook(tree, node, chosen),
            None => chosen,
        })
    }

    /// Apply the default rule, falling back to the edge child.
    fn fallback(
        &self,
        tree: &Tree,
        node: usize,
        direction: Direction,
    ) -> Result<usize, HeadError> {
        if !self.table.has_default() {
            return Err(HeadError::NoHeadRule {
                category: tree[node].label().basic_category().to_owned(),
                subtree: PennTree::subtree(tree, node).to_string(),
            });
        }

        let children = tree.children(node);
        match self.table.default_rule(direction).select(tree, children) {
            Some(chosen) => Ok(chosen),
            None if direction.is_leftward() => Ok(children[0]),
            None => Ok(children[children.len() - 1]),
        }
    }

    /// Annotate every node with its lexical head.
    ///
    /// Processes the tree bottom-up. A preterminal takes its word and
    /// index from its leaf and its tag from its own symbol; a phrasal
    /// node copies the head child's word, tag and index. A head child
    /// without a word (an unannotated subtree) leaves its ancestors
    /// unannotated too, and such subtrees later contribute no
    /// dependencies.
    pub fn percolate_heads(&self, tree: &mut Tree) -> Result<(), HeadError> {
        let order: Vec<usize> = tree.preorder().collect();

        // Reversed pre-order visits children before their parents.
        for &node in order.iter().rev() {
            if tree.is_leaf(node) {
                continue;
            }

            if tree.is_preterminal(node) {
                let child = tree.children(node)[0];
                let word = tree[child].label().value().to_owned();
                let index = tree[child].label().index();
                let tag = tree[node].label().value().to_owned();
                let label = tree[node].label_mut();
                label.set_word(Some(word));
                label.set_tag(Some(tag));
                label.set_index(index);
                continue;
            }

            let head = self.determine_head(tree, node)?;
            let (word, tag, index) = {
                let label = tree[head].label();
                (
                    label.word().map(str::to_owned),
                    label.tag().map(str::to_owned),
                    label.index(),
                )
            };

            if word.is_none() {
                continue;
            }

            let label = tree[node].label_mut();
            label.set_word(word);
            label.set_tag(tag);
            label.set_index(index);
        }

        Ok(())
    }
}

const COPULA_FORMS: &[&str] = &[
    "am", "is", "are", "was", "were", "be", "been", "being", "'s", "'re", "'m", "ai",
];

const AUXILIARY_FORMS: &[&str] = &[
    "have", "has", "had", "having", "do", "does", "did", "get", "gets", "got", "gotten",
    "getting",
];

const VERB_TAGS: &[&str] = &["VB", "VBD", "VBG", "VBN", "VBP", "VBZ"];

/// Returns `true` for a preterminal that spells an auxiliary: a modal,
/// infinitival `to`, or a form of be/have/do/get.
fn is_auxiliary(tree: &Tree, node: usize) -> bool {
    if !tree.is_preterminal(node) {
        return false;
    }

    match basic_category(tree[node].label().value()) {
        "MD" | "TO" => true,
        tag if VERB_TAGS.contains(&tag) => {
            let word = tree[tree.children(node)[0]].label().value().to_lowercase();
            COPULA_FORMS.contains(&word.as_str()) || AUXILIARY_FORMS.contains(&word.as_str())
        }
        _ => false,
    }
}

/// The lexical head of a verb phrase skips auxiliaries and copulas: an
/// auxiliary defers to its verb-phrase complement, a copula to its
/// predicative complement.
fn english_marked_head(tree: &Tree, node: usize) -> Option<usize> {
    if tree[node].label().basic_category() != "VP" {
        return None;
    }

    let children = tree.children(node);
    let first_aux = children.iter().position(|&child| is_auxiliary(tree, child))?;
    let rest = &children[first_aux + 1..];

    if let Some(complement) = rest
        .iter()
        .find(|&&child| basic_category(tree[child].label().value()) == "VP")
    {
        return Some(*complement);
    }

    let copula = {
        let child = children[first_aux];
        let word = tree[tree.children(child)[0]].label().value().to_lowercase();
        COPULA_FORMS.contains(&word.as_str())
    };
    if !copula {
        return None;
    }

    rest.iter()
        .find(|&&child| matches!(basic_category(tree[child].label().value()), "ADJP" | "NP"))
        .copied()
}

/// Never leave the head on a conjunction or punctuation when a content
/// sibling stands to its left.
fn english_post_fix(tree: &Tree, node: usize, chosen: usize) -> usize {
    const SKIP: &[&str] = &["CC", "CONJP", ",", ":"];

    if !SKIP.contains(&basic_category(tree[chosen].label().value())) {
        return chosen;
    }

    let children = tree.children(node);
    let pos = match children.iter().position(|&c| c == chosen) {
        Some(pos) => pos,
        None => return chosen,
    };

    children[..pos]
        .iter()
        .rev()
        .find(|&&c| !SKIP.contains(&basic_category(tree[c].label().value())))
        .copied()
        .unwrap_or(chosen)
}

#[cfg(test)]
mod tests {
    use lazy_static::lazy_static;

    use crate::error::HeadError;
    use crate::head_rules::HeadRuleTable;
    use crate::penn::parse_tree;
    use crate::tree::Tree;

    use super::HeadFinder;

    lazy_static! {
        static ref ENGLISH: HeadFinder = HeadFinder::english();
    }

    fn head_word(finder: &HeadFinder, tree: &Tree, node: usize) -> String {
        let head = finder.determine_head(tree, node).unwrap();
        let mut cur = head;
        while !tree.is_leaf(cur) {
            cur = tree.children(cur)[0];
        }
        tree[cur].label().value().to_owned()
    }

    #[test]
    fn verb_heads_verb_phrase() {
        let tree =
            parse_tree("(VP (VBD gave) (NP (PRP me)) (NP (DT a) (NN raise)))").unwrap();
        let finder = &*ENGLISH;
        assert_eq!(head_word(&finder, &tree, tree.root()), "gave");
    }

    #[test]
    fn noun_heads_noun_phrase() {
        let tree = parse_tree("(NP (DT a) (JJ big) (NN raise))").unwrap();
        let finder = &*ENGLISH;
        assert_eq!(head_word(&finder, &tree, tree.root()), "raise");
    }

    #[test]
    fn copula_defers_to_predicate() {
        let tree = parse_tree("(VP (VBZ is) (ADJP (JJ big) (CC and) (JJ honest)))").unwrap();
        let finder = &*ENGLISH;
        assert_eq!(head_word(&finder, &tree, tree.root()), "big");
    }

    #[test]
    fn passive_auxiliary_is_not_a_copula_head() {
        let tree = parse_tree("(VP (VBZ is) (VP (VBN examined)))").unwrap();
        let finder = &*ENGLISH;
        assert_eq!(head_word(&finder, &tree, tree.root()), "examined");
    }

    #[test]
    fn unary_nodes_collapse() {
        let tree = parse_tree("(S (VP (VBD slept)))").unwrap();
        let finder = &*ENGLISH;
        let head = finder.determine_head(&tree, tree.root()).unwrap();
        assert_eq!(tree[head].label().value(), "VP");
    }

    #[test]
    fn unknown_category_uses_default_rule() {
        // The default rule alone decides: leftmost child not in the
        // avoid set.
        let tree = parse_tree("(FOO (, ,) (NN dog) (NN cat))").unwrap();
        let finder = &*ENGLISH;
        assert_eq!(head_word(&finder, &tree, tree.root()), "dog");
    }

    #[test]
    fn no_rule_and_no_default_is_fatal() {
        let tree = parse_tree("(FOO (NN dog) (NN cat))").unwrap();
        let finder = HeadFinder::new(HeadRuleTable::new());
        match finder.determine_head(&tree, tree.root()) {
            Err(HeadError::NoHeadRule { category, subtree }) => {
                assert_eq!(category, "FOO");
                assert_eq!(subtree, "(FOO (NN dog) (NN cat))");
            }
            other => panic!("expected NoHeadRule, got {:?}", other),
        }
    }

    #[test]
    fn leaf_head_is_rejected() {
        let tree = parse_tree("(NP (NN dog))").unwrap();
        let finder = &*ENGLISH;
        let leaf = tree.leaves().next().unwrap();
        assert_eq!(
            finder.determine_head(&tree, leaf),
            Err(HeadError::HeadOfLeaf { node: leaf })
        );
    }

    #[test]
    fn out_of_bounds_is_rejected() {
        let tree = parse_tree("(NP (NN dog))").unwrap();
        let finder = &*ENGLISH;
        assert_eq!(
            finder.determine_head(&tree, 17),
            Err(HeadError::NodeOutOfBounds {
                node: 17,
                node_count: 3
            })
        );
    }

    #[test]
    fn post_fix_moves_off_conjunctions() {
        // FRAG has an empty rule list; the default rule scans from the
        // right and lands on the conjunction, which the fix rejects.
        let tree = parse_tree("(FRAG (NN dog) (CC and))").unwrap();
        let finder = &*ENGLISH;
        assert_eq!(head_word(&finder, &tree, tree.root()), "dog");
    }

    #[test]
    fn percolation_annotates_heads() {
        let mut tree =
            parse_tree("(S (NP (PRP She)) (VP (VBD gave) (NP (PRP me)) (NP (DT a) (NN raise))))")
                .unwrap();
        tree.index_words();
        let finder = &*ENGLISH;
        finder.percolate_heads(&mut tree).unwrap();

        let root_label = tree[tree.root()].label();
        assert_eq!(root_label.word(), Some("gave"));
        assert_eq!(root_label.tag(), Some("VBD"));
        assert_eq!(root_label.index(), Some(2));

        // The object noun phrase is headed by its noun.
        let np = tree
            .preorder()
            .filter(|&n| tree[n].label().value() == "NP")
            .last()
            .unwrap();
        assert_eq!(tree[np].label().word(), Some("raise"));
        assert_eq!(tree[np].label().index(), Some(5));
    }

    #[test]
    fn determinism() {
        let bracketing =
            "(S (NP (PRP She)) (VP (VBD gave) (NP (PRP me)) (NP (DT a) (NN raise))))";
        let finder = &*ENGLISH;

        let mut first = parse_tree(bracketing).unwrap();
        first.index_words();
        finder.percolate_heads(&mut first).unwrap();

        let mut second = parse_tree(bracketing).unwrap();
        second.index_words();
        finder.percolate_heads(&mut second).unwrap();

        assert_eq!(first, second);
    }
}
