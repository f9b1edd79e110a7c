//! Relative-clause referents and extra subjects.

use sdgraph::dependency::{TypedDependency, WordNode};
use sdgraph::registry::Registry;

const RELATIVIZERS: &[&str] = &[
    "who", "whom", "which", "that", "whose", "where", "when", "why",
];

const SUBJECTS: &[&str] = &["nsubj", "nsubjpass", "csubj", "csubjpass"];

fn is_relativizer(word: &WordNode) -> bool {
    RELATIVIZERS.contains(&word.word().to_lowercase().as_str())
}

/// Record a referent edge for every relative clause.
///
/// For each relative-clause-modifier edge, the leftmost relativizing
/// word among the clause head's dependents and their dependents becomes
/// the referent of the modified noun.
pub(crate) fn add_referents(deps: &mut Vec<TypedDependency>, registry: &Registry) {
    let ref_relation = match registry.lookup("ref") {
        Some(relation) => relation,
        None => return,
    };

    let mut additions: Vec<TypedDependency> = Vec::new();

    for dependency in deps.iter() {
        if !(dependency.is_live() && dependency.is("rcmod")) {
            continue;
        }
        let noun = dependency.gov();
        let clause = dependency.dep();

        let mut referent: Option<WordNode> = None;
        for edge in deps.iter() {
            if !edge.is_live() || !is_relativizer(edge.dep()) {
                continue;
            }

            let under_clause = edge.gov().index() == clause.index()
                || deps.iter().any(|d| {
                    d.is_live()
                        && d.gov().index() == clause.index()
                        && d.dep().index() == edge.gov().index()
                });
            if !under_clause {
                continue;
            }

            if referent
                .as_ref()
                .map_or(true, |best| edge.dep().index() < best.index())
            {
                referent = Some(edge.dep().clone());
            }
        }

        if let Some(referent) = referent {
            let mut addition =
                TypedDependency::new(ref_relation.clone(), noun.clone(), referent);
            addition.set_extra(true);
            if !deps.contains(&addition) && !additions.contains(&addition) {
                additions.push(addition);
            }
        }
    }

    deps.extend(additions);
}

/// Redirect edges targeting a relativizer onto its referent noun.
pub(crate) fn collapse_referents(deps: &mut Vec<TypedDependency>) {
    let referents: Vec<(WordNode, usize)> = deps
        .iter()
        .filter(|d| d.is_live() && d.is("ref"))
        .map(|d| (d.gov().clone(), d.dep().index()))
        .collect();

    for (noun, relativizer) in referents {
        for dependency in deps.iter_mut() {
            if dependency.is_live()
                && !dependency.is("ref")
                && dependency.dep().index() == relativizer
            {
                dependency.set_dep(noun.clone());
            }
        }
    }
}

/// Give open clausal complements the subject they share with the outer
/// clause: its object when it has one, otherwise its subject.
pub(crate) fn add_extra_subjects(deps: &mut Vec<TypedDependency>, registry: &Registry) {
    let nsubj = match registry.lookup("nsubj") {
        Some(relation) => relation,
        None => return,
    };

    let mut additions: Vec<TypedDependency> = Vec::new();

    for dependency in deps.iter() {
        if !(dependency.is_live() && dependency.is("xcomp")) {
            continue;
        }
        let outer = dependency.gov();
        let inner = dependency.dep();

        let has_subject = deps.iter().any(|d| {
            d.is_live()
                && d.gov().index() == inner.index()
                && d.relation()
                    .map_or(false, |r| SUBJECTS.contains(&r.short_name()))
        });
        if has_subject {
            continue;
        }

        // A bare "to" complement with its own auxiliary is elliptical;
        // it gets no subject.
        if inner.word().eq_ignore_ascii_case("to")
            && deps
                .iter()
                .any(|d| d.is_live() && d.is("aux") && d.gov().index() == inner.index())
        {
            continue;
        }

        let source = deps
            .iter()
            .find(|d| {
                d.is_live()
                    && !d.extra()
                    && d.gov().index() == outer.index()
                    && matches!(
                        d.relation().map(|r| r.short_name()),
                        Some("dobj") | Some("iobj")
                    )
            })
            .or_else(|| {
                deps.iter().find(|d| {
                    d.is_live()
                        && !d.extra()
                        && d.gov().index() == outer.index()
                        && d.relation()
                            .map_or(false, |r| SUBJECTS.contains(&r.short_name()))
                })
            });

        if let Some(source) = source {
            let mut addition =
                TypedDependency::new(nsubj.clone(), inner.clone(), source.dep().clone());
            addition.set_extra(true);
            if !deps.contains(&addition) && !additions.contains(&addition) {
                additions.push(addition);
            }
        }
    }

    deps.extend(additions);
}
