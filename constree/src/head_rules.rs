//! Head-rule tables.

use std::collections::HashMap;

use crate::label::basic_category;
use crate::tree::Tree;

/// Scan order of a head rule.
///
/// `Left`/`Right` scan category-major: the first rule category that
/// matches any child wins, with position deciding among several matches
/// of that category. `LeftDis`/`RightDis` scan position-major: the first
/// child whose category appears anywhere in the list wins.
/// `LeftExcept`/`RightExcept` pick the first child whose category is
/// *not* in the list.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Direction {
    Left,
    Right,
    LeftDis,
    RightDis,
    LeftExcept,
    RightExcept,
}

impl Direction {
    /// Returns `true` for the scans that start at the leftmost child.
    pub fn is_leftward(self) -> bool {
        matches!(
            self,
            Direction::Left | Direction::LeftDis | Direction::LeftExcept
        )
    }
}

/// A single head rule: a scan direction over a category list.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HeadRule {
    direction: Direction,
    categories: Vec<String>,
}

impl HeadRule {
    pub fn new(direction: Direction, categories: &[&str]) -> Self {
        HeadRule {
            direction,
            categories: categories.iter().map(|&c| c.to_owned()).collect(),
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    fn listed(&self, tree: &Tree, child: usize) -> bool {
        let category = basic_category(tree[child].label().value());
        self.categories.iter().any(|c| c == category)
    }

    /// Apply the rule to the children of a node.
    ///
    /// Returns the selected child, or `None` when the scan matches
    /// nothing. The `*Except` scans also return `None` when every child
    /// is listed; forcing an edge child in that situation is the
    /// caller's fallback, not the rule's.
    pub fn select(&self, tree: &Tree, children: &[usize]) -> Option<usize> {
        match self.direction {
            Direction::Left => self
                .categories
                .iter()
                .find_map(|cat| {
                    children
                        .iter()
                        .find(|&&c| basic_category(tree[c].label().value()) == cat)
                })
                .copied(),
            Direction::Right => self
                .categories
                .iter()
                .find_map(|cat| {
                    children
                        .iter()
                        .rev()
                        .find(|&&c| basic_category(tree[c].label().value()) == cat)
                })
                .copied(),
            Direction::LeftDis => children.iter().find(|&&c| self.listed(tree, c)).copied(),
            Direction::RightDis => children
                .iter()
                .rev()
                .find(|&&c| self.listed(tree, c))
                .copied(),
            Direction::LeftExcept => children.iter().find(|&&c| !self.listed(tree, c)).copied(),
            Direction::RightExcept => children
                .iter()
                .rev()
                .find(|&&c| !self.listed(tree, c))
                .copied(),
        }
    }
}

/// Per-category head rules.
///
/// Every category maps to a prioritized list of rules; the rules are
/// tried in order and the last one acts as the category's last resort.
/// The `avoid` set configures the default rule used for categories with
/// no entry, and as the final fallback when not even the last resort
/// matched: an `*Except` scan over the avoided categories.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct HeadRuleTable {
    rules: HashMap<String, Vec<HeadRule>>,
    avoid: Vec<String>,
}

impl HeadRuleTable {
    /// Construct an empty table with no default rule.
    pub fn new() -> Self {
        HeadRuleTable::default()
    }

    /// Set the rules for a category.
    pub fn insert(&mut self, category: impl Into<String>, rules: Vec<HeadRule>) {
        self.rules.insert(category.into(), rules);
    }

    /// Get the rules for a category.
    pub fn rules(&self, category: &str) -> Option<&[HeadRule]> {
        self.rules.get(category).map(Vec::as_slice)
    }

    /// Set the categories the default rule avoids.
    ///
    /// A table with an empty avoid set has no default rule.
    pub fn set_avoid(&mut self, avoid: &[&str]) {
        self.avoid = avoid.iter().map(|&c| c.to_owned()).collect();
    }

    /// Returns `true` if a default rule is configured.
    pub fn has_default(&self) -> bool {
        !self.avoid.is_empty()
    }

    /// Build the default rule for the given scan direction.
    pub fn default_rule(&self, direction: Direction) -> HeadRule {
        let direction = if direction.is_leftward() {
            Direction::LeftExcept
        } else {
            Direction::RightExcept
        };

        HeadRule {
            direction,
            categories: self.avoid.clone(),
        }
    }

    /// The head rules for English phrase-structure trees.
    ///
    /// Broadly the Collins rules, with clausal and verbal projections
    /// left-headed and the noun-phrase scans arranged so that the
    /// rightmost nominal wins before any adjectival fallback.
    pub fn english() -> Self {
        use self::Direction::*;

        let mut table = HeadRuleTable::new();
        table.set_avoid(&["''", "``", "-LRB-", "-RRB-", ".", ",", ":"]);

        table.insert(
            "ROOT",
            vec![HeadRule::new(Left, &["S", "SINV", "SBARQ", "SBAR", "SQ", "FRAG", "NP", "X"])],
        );
        table.insert(
            "TOP",
            vec![HeadRule::new(Left, &["S", "SINV", "SBARQ", "SBAR", "SQ", "FRAG", "NP", "X"])],
        );
        table.insert(
            "ADJP",
            vec![
                HeadRule::new(LeftDis, &["JJ", "JJR", "JJS", "VBN", "VBG"]),
                HeadRule::new(
                    Left,
                    &["NNS", "NN", "QP", "$", "ADVP", "ADJP", "NP", "DT", "FW", "RBR", "RBS", "SBAR", "RB"],
                ),
            ],
        );
        table.insert(
            "ADVP",
            vec![HeadRule::new(
                Right,
                &["RB", "RBR", "RBS", "FW", "ADVP", "TO", "CD", "JJR", "JJ", "IN", "NP", "JJS", "NN"],
            )],
        );
        table.insert("CONJP", vec![HeadRule::new(Right, &["CC", "RB", "IN"])]);
        table.insert("FRAG", vec![HeadRule::new(Right, &[])]);
        table.insert("INTJ", vec![HeadRule::new(Left, &[])]);
        table.insert("LST", vec![HeadRule::new(Right, &["LS", ":"])]);
        table.insert(
            "NAC",
            vec![HeadRule::new(
                Left,
                &["NN", "NNS", "NNP", "NNPS", "NP", "NAC", "EX", "$", "CD", "QP", "PRP", "VBG", "JJ", "JJS", "JJR", "ADJP", "FW"],
            )],
        );
        table.insert(
            "NP",
            vec![
                HeadRule::new(RightDis, &["NN", "NNP", "NNPS", "NNS", "NX", "JJR"]),
                HeadRule::new(Left, &["NP", "PRP"]),
                HeadRule::new(RightDis, &["$", "ADJP", "PRN"]),
                HeadRule::new(Right, &["CD"]),
                HeadRule::new(RightDis, &["JJ", "JJS", "RB", "QP"]),
                HeadRule::new(RightExcept, &[",", ":", "``", "''", "-LRB-", "-RRB-", "CC"]),
            ],
        );
        table.insert(
            "NX",
            vec![
                HeadRule::new(RightDis, &["NN", "NNP", "NNPS", "NNS", "NX", "POS", "JJR"]),
                HeadRule::new(Right, &[]),
            ],
        );
        table.insert(
            "PP",
            vec![
                HeadRule::new(Right, &["IN", "TO", "VBG", "VBN", "RP", "FW"]),
                HeadRule::new(Left, &["PP"]),
            ],
        );
        table.insert("PRN", vec![HeadRule::new(Left, &[])]);
        table.insert("PRT", vec![HeadRule::new(Right, &["RP"])]);
        table.insert(
            "QP",
            vec![HeadRule::new(
                Left,
                &["$", "IN", "NNS", "NN", "JJ", "RB", "DT", "CD", "QP", "JJR", "JJS"],
            )],
        );
        table.insert(
            "RRC",
            vec![HeadRule::new(Right, &["VP", "NP", "ADVP", "ADJP", "PP"])],
        );
        table.insert(
            "S",
            vec![HeadRule::new(
                Left,
                &["TO", "IN", "VP", "S", "SBAR", "ADJP", "UCP", "NP"],
            )],
        );
        table.insert(
            "SBAR",
            vec![HeadRule::new(
                Left,
                &["S", "SQ", "SINV", "SBAR", "FRAG", "IN", "DT", "WHNP", "WHPP", "WHADVP", "WHADJP"],
            )],
        );
        table.insert(
            "SBARQ",
            vec![HeadRule::new(Left, &["SQ", "S", "SINV", "SBARQ", "FRAG"])],
        );
        table.insert(
            "SINV",
            vec![HeadRule::new(
                Left,
                &["VBZ", "VBD", "VBP", "VB", "MD", "VP", "S", "SINV", "ADJP", "NP"],
            )],
        );
        table.insert(
            "SQ",
            vec![HeadRule::new(
                Left,
                &["VBZ", "VBD", "VBP", "VB", "MD", "VP", "SQ"],
            )],
        );
        table.insert("UCP", vec![HeadRule::new(Right, &[])]);
        table.insert(
            "VP",
            vec![HeadRule::new(
                Left,
                &["VBD", "VBN", "MD", "VBZ", "VB", "VBG", "VBP", "VP", "ADJP", "NN", "NNS", "NP", "TO"],
            )],
        );
        table.insert(
            "WHADJP",
            vec![HeadRule::new(Left, &["CC", "WRB", "JJ", "ADJP"])],
        );
        table.insert("WHADVP", vec![HeadRule::new(Right, &["CC", "WRB"])]);
        table.insert(
            "WHNP",
            vec![HeadRule::new(
                Left,
                &["WDT", "WP", "WP$", "WHADJP", "WHPP", "WHNP"],
            )],
        );
        table.insert("WHPP", vec![HeadRule::new(Right, &["IN", "TO", "FW"])]);
        table.insert("X", vec![HeadRule::new(Right, &[])]);

        table
    }
}

#[cfg(test)]
mod tests {
    use crate::penn::parse_tree;

    use super::{Direction, HeadRule, HeadRuleTable};

    #[test]
    fn left_scans_category_major() {
        let tree = parse_tree("(VP (NP (NN dog)) (VBD barked) (NP (NN cat)))").unwrap();
        let children = tree.children(tree.root()).to_vec();

        // VBD is listed before NP, so it wins even though an NP comes first.
        let rule = HeadRule::new(Direction::Left, &["VBD", "NP"]);
        assert_eq!(rule.select(&tree, &children), Some(children[1]));
    }

    #[test]
    fn leftdis_scans_position_major() {
        let tree = parse_tree("(VP (NP (NN dog)) (VBD barked) (NP (NN cat)))").unwrap();
        let children = tree.children(tree.root()).to_vec();

        let rule = HeadRule::new(Direction::LeftDis, &["VBD", "NP"]);
        assert_eq!(rule.select(&tree, &children), Some(children[0]));
    }

    #[test]
    fn right_scans_from_the_end() {
        let tree = parse_tree("(PP (IN because) (IN of) (NP (NN rain)))").unwrap();
        let children = tree.children(tree.root()).to_vec();

        let rule = HeadRule::new(Direction::Right, &["IN", "TO"]);
        assert_eq!(rule.select(&tree, &children), Some(children[1]));
    }

    #[test]
    fn except_skips_listed_categories() {
        let tree = parse_tree("(NP (DT the) (NN dog) (, ,))").unwrap();
        let children = tree.children(tree.root()).to_vec();

        let rule = HeadRule::new(Direction::RightExcept, &[",", ":"]);
        assert_eq!(rule.select(&tree, &children), Some(children[1]));
    }

    #[test]
    fn except_returns_none_when_all_listed() {
        let tree = parse_tree("(X (, ,) (: ;))").unwrap();
        let children = tree.children(tree.root()).to_vec();

        let rule = HeadRule::new(Direction::LeftExcept, &[",", ":"]);
        assert_eq!(rule.select(&tree, &children), None);
    }

    #[test]
    fn scan_uses_basic_categories() {
        let tree = parse_tree("(S (NP-SBJ (NN dog)) (VP (VBD barked)))").unwrap();
        let children = tree.children(tree.root()).to_vec();

        let rule = HeadRule::new(Direction::Left, &["NP"]);
        assert_eq!(rule.select(&tree, &children), Some(children[0]));
    }

    #[test]
    fn default_rule_follows_direction() {
        let table = HeadRuleTable::english();
        assert_eq!(
            table.default_rule(Direction::Left).direction(),
            Direction::LeftExcept
        );
        assert_eq!(
            table.default_rule(Direction::RightDis).direction(),
            Direction::RightExcept
        );
        assert!(table.has_default());
    }
}
