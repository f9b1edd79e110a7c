use constree::HeadError;
use thiserror::Error;

/// Errors building a dependency structure.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BuildError {
    /// Head selection failed.
    #[error(transparent)]
    Head(#[from] HeadError),

    /// A relation the builder relies on is missing from the registry.
    #[error("relation {name:?} is not in the registry")]
    MissingRelation { name: String },
}

/// Errors loading a relation table.
#[derive(Debug, Error, Eq, PartialEq)]
#[non_exhaustive]
pub enum RelationError {
    /// A definition names a parent that precedes it nowhere in the table.
    #[error("unknown parent relation {parent:?} for {name:?}")]
    UnknownParent { name: String, parent: String },

    /// More than one definition has no parent.
    #[error("multiple hierarchy roots: {first:?} and {second:?}")]
    MultipleRoots { first: String, second: String },

    /// The same short name is defined twice.
    #[error("duplicate relation {name:?}")]
    Duplicate { name: String },

    /// The table contains no definitions.
    #[error("empty relation table")]
    Empty,
}

/// Interchange parsing errors.
#[derive(Debug, Error, Eq, PartialEq)]
#[non_exhaustive]
pub enum ParseError {
    /// The relation short name is not in the registry.
    #[error("unknown relation {name:?}")]
    UnknownRelation { name: String },

    /// The string is not of the form `relation(word-index, word-index)`.
    #[error("malformed dependency: {value:?}")]
    Malformed { value: String },
}
