use std::io;

use thiserror::Error;

/// Treebank IO error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IOError {
    /// Error in file IO.
    #[error("error reading treebank")]
    IO(#[from] io::Error),

    /// Bracket parsing error.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Bracket parsing errors.
#[derive(Debug, Error, Eq, PartialEq)]
#[non_exhaustive]
pub enum ParseError {
    /// The input contains no tree.
    #[error("no tree in input")]
    Empty,

    /// Brackets do not balance.
    #[error("unbalanced brackets: {value:?}")]
    UnbalancedBrackets { value: String },

    /// A constituent has a label but no children.
    #[error("constituent without children: {value:?}")]
    EmptyConstituent { value: String },

    /// Non-whitespace material after a complete tree.
    #[error("trailing material after tree: {value:?}")]
    TrailingMaterial { value: String },
}

/// Head-selection errors.
#[derive(Debug, Error, Eq, PartialEq)]
#[non_exhaustive]
pub enum HeadError {
    /// The node does not exist in the tree.
    #[error("node {node:?} is out of bounds for tree with {node_count:?} nodes")]
    NodeOutOfBounds { node: usize, node_count: usize },

    /// Head selection was requested for a leaf.
    #[error("cannot determine the head of leaf {node:?}")]
    HeadOfLeaf { node: usize },

    /// No rule covers the category and no default rule is configured.
    #[error("no head rule for category {category:?} in subtree {subtree}")]
    NoHeadRule { category: String, subtree: String },
}
