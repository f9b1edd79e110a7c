//! The collapsing pipeline.
//!
//! A fixed sequence of destructive passes over a typed-dependency list.
//! Every pass tolerates already-collapsed input and input that is no
//! longer tree-shaped; passes tombstone edges they consume and the
//! final cleanup removes the tombstones and restores the total order.

use std::collections::HashSet;

use sdgraph::builder::Structure;
use sdgraph::dependency::{prune, TypedDependency};
use sdgraph::registry::Registry;

use crate::conj;
use crate::prep;
use crate::referent;

/// Policy switches for the full pipeline.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CollapseOptions {
    /// Record referent edges for relative clauses.
    pub include_referents: bool,
    /// Redirect edges from relativizers onto their referents.
    pub collapse_referents: bool,
    /// Copy outer arguments onto open clausal complements.
    pub include_extra_subjects: bool,
}

impl CollapseOptions {
    /// Every policy switched off.
    pub fn none() -> Self {
        CollapseOptions {
            include_referents: false,
            collapse_referents: false,
            include_extra_subjects: false,
        }
    }

    /// Every policy switched on.
    pub fn maximal() -> Self {
        CollapseOptions {
            include_referents: true,
            collapse_referents: true,
            include_extra_subjects: true,
        }
    }
}

impl Default for CollapseOptions {
    fn default() -> Self {
        CollapseOptions::none()
    }
}

/// Runs the collapsing passes over dependency lists.
pub struct Collapser<'a> {
    registry: &'a Registry,
    options: CollapseOptions,
}

impl<'a> Collapser<'a> {
    /// Construct a collapser with every policy off.
    pub fn new(registry: &'a Registry) -> Self {
        Collapser {
            registry,
            options: CollapseOptions::none(),
        }
    }

    /// Set the policy options.
    pub fn with_options(mut self, options: CollapseOptions) -> Self {
        self.options = options;
        self
    }

    /// The tree-preserving collapse: dependency correction, stray
    /// coordination removal, multi-word preposition fusion, cleanup.
    pub fn collapse(&self, deps: &mut Vec<TypedDependency>) {
        correct_dependencies(deps, self.registry);
        erase_multi_conj(deps);
        prep::collapse_multiword(deps, self.registry);
        cleanup(deps);
    }

    /// The full pipeline, including preposition and conjunction
    /// collapsing, conjunct propagation, and the policy-controlled
    /// referent and extra-subject passes. The result is a graph that
    /// may contain re-entrancies and small cycles.
    pub fn cc_process(&self, deps: &mut Vec<TypedDependency>) {
        correct_dependencies(deps, self.registry);
        erase_multi_conj(deps);
        prep::collapse_multiword(deps, self.registry);
        prep::collapse_prep_and_poss(deps, self.registry);
        conj::collapse_conjunctions(deps, self.registry);
        if self.options.include_referents {
            referent::add_referents(deps, self.registry);
            if self.options.collapse_referents {
                referent::collapse_referents(deps);
            }
        }
        conj::propagate_conjuncts(deps, self.registry);
        if self.options.include_extra_subjects {
            referent::add_extra_subjects(deps, self.registry);
        }
        cleanup(deps);
    }
}

/// Collapsed dependencies of a structure: basic dependencies through
/// the tree-preserving collapse.
pub fn collapsed_dependencies(
    structure: &Structure,
    registry: &Registry,
) -> Vec<TypedDependency> {
    let mut deps = structure.basic_dependencies();
    Collapser::new(registry).collapse(&mut deps);
    deps
}

/// Fully processed dependencies of a structure: dependencies with
/// extras through the full pipeline under the given options.
pub fn cc_processed_dependencies(
    structure: &Structure,
    registry: &Registry,
    options: CollapseOptions,
) -> Vec<TypedDependency> {
    let mut deps = structure.dependencies_with_extras();
    Collapser::new(registry).with_options(options).cc_process(&mut deps);
    deps
}

/// Reclassify subjects of passive predicates and drop exact repeats.
fn correct_dependencies(deps: &mut Vec<TypedDependency>, registry: &Registry) {
    let passive: HashSet<usize> = deps
        .iter()
        .filter(|d| d.is_live() && d.is("auxpass"))
        .map(|d| d.gov().index())
        .collect();

    if !passive.is_empty() {
        let nsubjpass = registry.lookup("nsubjpass");
        let csubjpass = registry.lookup("csubjpass");

        for dependency in deps.iter_mut() {
            if !passive.contains(&dependency.gov().index()) {
                continue;
            }
            if dependency.is("nsubj") {
                if let Some(relation) = &nsubjpass {
                    dependency.set_relation(relation.clone());
                }
            } else if dependency.is("csubj") {
                if let Some(relation) = &csubjpass {
                    dependency.set_relation(relation.clone());
                }
            }
        }
    }

    dedup(deps);
}

/// Coordination markers govern nothing; edges hanging off them are
/// leftovers that would come loose during collapsing.
fn erase_multi_conj(deps: &mut Vec<TypedDependency>) {
    const STRAY: &[&str] = &["advmod", "aux", "auxpass", "cc", "conj", "dep"];

    let markers: HashSet<usize> = deps
        .iter()
        .filter(|d| d.is_live() && d.is("cc"))
        .map(|d| d.dep().index())
        .collect();
    if markers.is_empty() {
        return;
    }

    for dependency in deps.iter_mut() {
        if let Some(relation) = dependency.relation() {
            if STRAY.contains(&relation.short_name())
                && markers.contains(&dependency.gov().index())
            {
                dependency.kill();
            }
        }
    }
}

fn dedup(deps: &mut Vec<TypedDependency>) {
    let mut seen: Vec<TypedDependency> = Vec::new();
    deps.retain(|dependency| {
        if seen.contains(dependency) {
            false
        } else {
            seen.push(dependency.clone());
            true
        }
    });
}

/// Strip generic edges shadowed by a collapsed preposition edge, drop
/// tombstones and exact repeats, and restore the total order.
fn cleanup(deps: &mut Vec<TypedDependency>) {
    let collapsed: Vec<(usize, usize)> = deps
        .iter()
        .filter(|d| d.is_live())
        .filter(|d| {
            d.relation().map_or(false, |r| {
                r.short_name().starts_with("nmod:") || r.short_name() == "agent"
            })
        })
        .map(|d| (d.gov().index(), d.dep().index()))
        .collect();

    for dependency in deps.iter_mut() {
        if dependency.is_live()
            && dependency.is("dep")
            && collapsed.contains(&(dependency.gov().index(), dependency.dep().index()))
        {
            dependency.kill();
        }
    }

    dedup(deps);
    prune(deps);
}
