//! Textual interchange form for typed dependencies.
//!
//! A dependency renders as `relation(word-index, word-index)` — that is
//! its `Display` implementation — and this module parses the form back.
//! Parsing a rendered dependency reproduces the relation name and both
//! word/index pairs.

use crate::dependency::{TypedDependency, WordNode};
use crate::error::ParseError;
use crate::registry::Registry;
use crate::relation::Relation;

/// Parse a dependency in the interchange form.
///
/// The relation is resolved against the registry; a parameterized name
/// like `nmod:because_of` resolves through its family, creating the
/// relation if this registry has not seen the word yet. An unknown
/// short name or a string without the expected shape is an error.
pub fn parse(value: &str, registry: &Registry) -> Result<TypedDependency, ParseError> {
    let malformed = || ParseError::Malformed {
        value: value.to_owned(),
    };

    let trimmed = value.trim();
    let open = trimmed.find('(').ok_or_else(malformed)?;
    if !trimmed.ends_with(')') || open == 0 {
        return Err(malformed());
    }

    let name = &trimmed[..open];
    let inner = &trimmed[open + 1..trimmed.len() - 1];
    let comma = inner.find(',').ok_or_else(malformed)?;

    let gov = parse_word(&inner[..comma]).ok_or_else(malformed)?;
    let dep = parse_word(&inner[comma + 1..]).ok_or_else(malformed)?;
    let relation = lookup_relation(registry, name)?;

    Ok(TypedDependency::new(relation, gov, dep))
}

/// Parse `word-index`; the index follows the last dash, so hyphenated
/// words survive.
fn parse_word(value: &str) -> Option<WordNode> {
    let value = value.trim();
    let dash = value.rfind('-')?;
    let index: usize = value[dash + 1..].parse().ok()?;
    Some(WordNode::new(&value[..dash], index))
}

fn lookup_relation(registry: &Registry, name: &str) -> Result<Relation, ParseError> {
    if let Some(relation) = registry.lookup(name) {
        return Ok(relation);
    }

    if let Some(colon) = name.find(':') {
        if let Some(parent) = registry.lookup(&name[..colon]) {
            return Ok(registry.get_or_create(&parent, &name[colon + 1..]));
        }
    }

    Err(ParseError::UnknownRelation {
        name: name.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use constree::head::HeadFinder;
    use constree::penn::parse_tree;

    use crate::builder::StructureBuilder;
    use crate::error::ParseError;
    use crate::registry::Registry;

    use super::parse;

    #[test]
    fn round_trip_through_the_builder() {
        let registry = Registry::english();
        let head_finder = HeadFinder::english();
        let builder = StructureBuilder::new(&registry, &head_finder);
        let structure = builder
            .build(
                parse_tree(
                    "(S (NP (PRP She)) (VP (VBD gave) (NP (PRP me)) (NP (DT a) (NN raise))))",
                )
                .unwrap(),
            )
            .unwrap();

        for dependency in structure.basic_dependencies() {
            let parsed = parse(&dependency.to_string(), &registry).unwrap();
            assert_eq!(parsed, dependency);
        }
    }

    #[test]
    fn parameterized_names_resolve_through_their_family() {
        let registry = Registry::english();
        let parsed = parse("nmod:because_of(left-2, rain-6)", &registry).unwrap();
        let relation = parsed.relation().unwrap();
        assert_eq!(relation.short_name(), "nmod:because_of");
        assert_eq!(relation.parent().unwrap().short_name(), "nmod");
        assert_eq!(parsed.gov().index(), 2);
        assert_eq!(parsed.dep().index(), 6);
    }

    #[test]
    fn hyphenated_words_survive() {
        let registry = Registry::english();
        let parsed = parse("nsubj(said-2, vice-president-1)", &registry).unwrap();
        assert_eq!(parsed.dep().word(), "vice-president");
        assert_eq!(parsed.dep().index(), 1);
        assert_eq!(parsed.to_string(), "nsubj(said-2, vice-president-1)");
    }

    #[test]
    fn unknown_relations_are_rejected() {
        let registry = Registry::english();
        assert_eq!(
            parse("frobnicate(a-1, b-2)", &registry).unwrap_err(),
            ParseError::UnknownRelation {
                name: "frobnicate".to_owned()
            }
        );
    }

    #[test]
    fn malformed_strings_are_rejected() {
        let registry = Registry::english();
        for value in &[
            "nsubj",
            "nsubj(gave-2 She-1)",
            "nsubj(gave-2, She-1",
            "nsubj(gave, She-1)",
            "nsubj(gave-x, She-1)",
            "(gave-2, She-1)",
        ] {
            assert!(
                matches!(
                    parse(value, &registry),
                    Err(ParseError::Malformed { .. })
                ),
                "{:?} should be malformed",
                value
            );
        }
    }
}
