//! The relation registry.
//!
//! A registry owns the relation hierarchy for one language. It is built
//! once from an ordered list of definitions and then shared by any
//! number of concurrent conversions; the only writes after construction
//! are insertions of parameterized relations (`nmod:<word>`,
//! `conj:<word>`) observed during collapsing, which are memoized so
//! that at most one relation object ever exists per distinct word.

use std::collections::HashMap;
use std::sync::{Mutex, RwLock};

use crate::english;
use crate::error::RelationError;
use crate::matcher::TriggerPattern;
use crate::relation::Relation;

/// A relation definition, as supplied by a relation table.
pub struct RelationDef {
    short_name: String,
    long_name: String,
    parent: Option<String>,
    restriction: Vec<String>,
    triggers: Vec<TriggerPattern>,
}

impl RelationDef {
    /// Define a relation. A definition without a parent is the
    /// hierarchy root; a table has exactly one.
    pub fn new(short_name: impl Into<String>, long_name: impl Into<String>) -> Self {
        RelationDef {
            short_name: short_name.into(),
            long_name: long_name.into(),
            parent: None,
            restriction: Vec::new(),
            triggers: Vec::new(),
        }
    }

    /// Set the parent relation, by short name.
    pub fn parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Set the basic categories under which the triggers apply.
    pub fn restriction(mut self, categories: &[&str]) -> Self {
        self.restriction = categories.iter().map(|&c| c.to_owned()).collect();
        self
    }

    /// Add a trigger pattern.
    pub fn trigger(mut self, pattern: TriggerPattern) -> Self {
        self.triggers.push(pattern);
        self
    }
}

/// A registry of grammatical relations.
pub struct Registry {
    relations: RwLock<Vec<Relation>>,
    preps: Mutex<HashMap<String, Relation>>,
    conjs: Mutex<HashMap<String, Relation>>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry").finish_non_exhaustive()
    }
}

impl Registry {
    /// Build a registry from an ordered list of definitions.
    ///
    /// Definitions must precede their children; the first definition is
    /// the hierarchy root and must be the only one without a parent.
    pub fn from_definitions(definitions: Vec<RelationDef>) -> Result<Registry, RelationError> {
        let mut relations: Vec<Relation> = Vec::with_capacity(definitions.len());

        for def in definitions {
            if relations.iter().any(|r| r.short_name() == def.short_name) {
                return Err(RelationError::Duplicate {
                    name: def.short_name,
                });
            }

            let parent = match def.parent {
                Some(parent_name) => Some(
                    relations
                        .iter()
                        .find(|r| r.short_name() == parent_name)
                        .cloned()
                        .ok_or(RelationError::UnknownParent {
                            name: def.short_name.clone(),
                            parent: parent_name,
                        })?,
                ),
                None => {
                    if let Some(root) = relations.first() {
                        return Err(RelationError::MultipleRoots {
                            first: root.short_name().to_owned(),
                            second: def.short_name,
                        });
                    }
                    None
                }
            };

            relations.push(Relation::new(
                def.short_name,
                def.long_name,
                parent,
                def.restriction,
                def.triggers,
            ));
        }

        if relations.is_empty() {
            return Err(RelationError::Empty);
        }

        Ok(Registry {
            relations: RwLock::new(relations),
            preps: Mutex::new(HashMap::new()),
            conjs: Mutex::new(HashMap::new()),
        })
    }

    /// The registry for English.
    pub fn english() -> Registry {
        // The built-in table is closed under parent references.
        Registry::from_definitions(english::definitions())
            .expect("the English relation table is inconsistent")
    }

    /// Look up a relation by short name.
    ///
    /// Finds both table relations and parameterized relations created
    /// earlier through [`get_or_create`](Registry::get_or_create).
    pub fn lookup(&self, short_name: &str) -> Option<Relation> {
        self.relations
            .read()
            .expect("relation list lock poisoned")
            .iter()
            .find(|r| r.short_name() == short_name)
            .cloned()
    }

    /// Get or create the parameterized variant of `parent` for `word`.
    ///
    /// The word is lowercased. Each family's memoization map is guarded
    /// by its own mutex, so concurrent callers observe exactly one
    /// relation object per distinct word.
    pub fn get_or_create(&self, parent: &Relation, word: &str) -> Relation {
        let word = word.to_lowercase();
        let family = if parent.short_name() == "conj" {
            &self.conjs
        } else {
            &self.preps
        };

        let mut memo = family.lock().expect("memoization map lock poisoned");
        if let Some(rel) = memo.get(&word) {
            return rel.clone();
        }

        let rel = Relation::parameterized(parent.clone(), &word);
        memo.insert(word, rel.clone());
        self.relations
            .write()
            .expect("relation list lock poisoned")
            .push(rel.clone());

        rel
    }

    /// Get a snapshot of the relations, in definition order followed by
    /// parameterized relations in creation order.
    pub fn relations(&self) -> Vec<Relation> {
        self.relations
            .read()
            .expect("relation list lock poisoned")
            .clone()
    }

    /// Get the hierarchy root.
    pub fn root_relation(&self) -> Relation {
        self.relations
            .read()
            .expect("relation list lock poisoned")
            .first()
            .cloned()
            .expect("a registry is never empty")
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use crate::error::RelationError;

    use super::{Registry, RelationDef};

    fn small_table() -> Vec<RelationDef> {
        vec![
            RelationDef::new("dep", "dependent"),
            RelationDef::new("mod", "modifier").parent("dep"),
            RelationDef::new("nmod", "nominal modifier").parent("mod"),
            RelationDef::new("conj", "conjunct").parent("dep"),
        ]
    }

    #[test]
    fn definitions_resolve_parents() {
        let registry = Registry::from_definitions(small_table()).unwrap();
        let nmod = registry.lookup("nmod").unwrap();
        assert_eq!(nmod.parent().unwrap().short_name(), "mod");
        assert_eq!(registry.root_relation().short_name(), "dep");
    }

    #[test]
    fn unknown_parent_is_rejected() {
        let defs = vec![
            RelationDef::new("dep", "dependent"),
            RelationDef::new("nmod", "nominal modifier").parent("mod"),
        ];
        assert_eq!(
            Registry::from_definitions(defs).unwrap_err(),
            RelationError::UnknownParent {
                name: "nmod".to_owned(),
                parent: "mod".to_owned()
            }
        );
    }

    #[test]
    fn second_root_is_rejected() {
        let defs = vec![
            RelationDef::new("dep", "dependent"),
            RelationDef::new("other", "another root"),
        ];
        assert_eq!(
            Registry::from_definitions(defs).unwrap_err(),
            RelationError::MultipleRoots {
                first: "dep".to_owned(),
                second: "other".to_owned()
            }
        );
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let defs = vec![
            RelationDef::new("dep", "dependent"),
            RelationDef::new("dep", "dependent again").parent("dep"),
        ];
        assert_eq!(
            Registry::from_definitions(defs).unwrap_err(),
            RelationError::Duplicate {
                name: "dep".to_owned()
            }
        );
    }

    #[test]
    fn parameterized_relations_are_memoized() {
        let registry = Registry::from_definitions(small_table()).unwrap();
        let nmod = registry.lookup("nmod").unwrap();

        let first = registry.get_or_create(&nmod, "Because_Of");
        let second = registry.get_or_create(&nmod, "because_of");
        assert_eq!(first, second);
        assert_eq!(first.short_name(), "nmod:because_of");

        // The new relation is visible to lookups and snapshots.
        assert_eq!(registry.lookup("nmod:because_of"), Some(first));
        assert!(registry
            .relations()
            .iter()
            .any(|r| r.short_name() == "nmod:because_of"));
    }

    #[test]
    fn conjunctions_use_their_own_family() {
        let registry = Registry::from_definitions(small_table()).unwrap();
        let conj = registry.lookup("conj").unwrap();
        let and = registry.get_or_create(&conj, "and");
        assert_eq!(and.short_name(), "conj:and");
        assert!(conj.ancestor_of(&and));
    }

    #[test]
    fn concurrent_creation_yields_one_relation_per_word() {
        let registry = Arc::new(Registry::from_definitions(small_table()).unwrap());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    let nmod = registry.lookup("nmod").unwrap();
                    registry.get_or_create(&nmod, "during").short_name().to_owned()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), "nmod:during");
        }

        let created = registry
            .relations()
            .iter()
            .filter(|r| r.short_name() == "nmod:during")
            .count();
        assert_eq!(created, 1);
    }
}
