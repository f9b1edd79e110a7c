//! Conjunction collapsing and conjunct propagation.

use std::collections::HashSet;

use itertools::Itertools;
use sdgraph::dependency::TypedDependency;
use sdgraph::registry::Registry;

const NEGATIVE_COORDINATORS: &[&str] = &["instead", "rather", "not"];

const AND_EQUIVALENTS: &[&str] = &["also", "well", "mention", "&", "plus"];

/// Normalize a coordinator to the relation it names.
fn coordinator_name(word: &str) -> String {
    let word = word.to_lowercase();
    if NEGATIVE_COORDINATORS.contains(&word.as_str()) {
        "negcc".to_owned()
    } else if AND_EQUIVALENTS.contains(&word.as_str()) {
        "and".to_owned()
    } else {
        word
    }
}

/// Rewrite each generic conjunct edge to `conj:<coordinator>`, then
/// delete coordination edges that named at least one conjunct.
pub(crate) fn collapse_conjunctions(deps: &mut Vec<TypedDependency>, registry: &Registry) {
    let conj_base = match registry.lookup("conj") {
        Some(relation) => relation,
        None => return,
    };

    // Coordinators by governor, in surface order.
    let coordinators: Vec<(usize, usize, usize, String)> = deps
        .iter()
        .enumerate()
        .filter(|(_, d)| d.is_live() && d.is("cc"))
        .map(|(pos, d)| {
            (
                pos,
                d.gov().index(),
                d.dep().index(),
                d.dep().word().to_owned(),
            )
        })
        .sorted_by_key(|&(_, gov, coordinator, _)| (gov, coordinator))
        .collect();

    let mut used = HashSet::new();
    for k in 0..deps.len() {
        if !(deps[k].is_live() && deps[k].is("conj")) {
            continue;
        }
        let gov = deps[k].gov().index();
        let dependent = deps[k].dep().index();

        // The nearest coordinator before the conjunct decides the name;
        // a conjunct before every coordinator takes the first one.
        let chosen = coordinators
            .iter()
            .filter(|&&(_, g, _, _)| g == gov)
            .filter(|&&(_, _, c, _)| c < dependent)
            .last()
            .or_else(|| coordinators.iter().find(|&&(_, g, _, _)| g == gov));

        if let Some((pos, _, _, word)) = chosen {
            let relation = registry.get_or_create(&conj_base, &coordinator_name(word));
            deps[k].set_relation(relation);
            used.insert(*pos);
        }
    }

    for pos in used {
        deps[pos].kill();
    }
}

/// Relations that re-fire across coordinated predicates.
const PROPAGATED: &[&str] = &[
    "nsubj",
    "nsubjpass",
    "csubj",
    "csubjpass",
    "dobj",
    "iobj",
    "neg",
];

const SUBJECTS: &[&str] = &["nsubj", "nsubjpass", "csubj", "csubjpass"];

/// Propagate arguments of a conjunction's governor onto its conjuncts.
///
/// Extra edges do not propagate — long-distance relative-clause
/// dependencies would otherwise fire twice — and a conjunct that
/// already has a subject keeps it. Subjects switch between active and
/// passive according to the conjunct's own marking.
pub(crate) fn propagate_conjuncts(deps: &mut Vec<TypedDependency>, registry: &Registry) {
    let mut additions: Vec<TypedDependency> = Vec::new();

    for dependency in deps.iter() {
        if !dependency.is_live() {
            continue;
        }
        let relation = match dependency.relation() {
            Some(relation) => relation,
            None => continue,
        };
        if !(relation.short_name() == "conj" || relation.short_name().starts_with("conj:")) {
            continue;
        }

        let gov = dependency.gov();
        let conjunct = dependency.dep();

        for source in deps.iter() {
            if !source.is_live() || source.extra() {
                continue;
            }
            let source_relation = match source.relation() {
                Some(relation) => relation,
                None => continue,
            };
            if !PROPAGATED.contains(&source_relation.short_name()) {
                continue;
            }
            if source.gov().index() != gov.index() {
                continue;
            }
            if source.dep().index() == conjunct.index() {
                continue;
            }

            let is_subject = SUBJECTS.contains(&source_relation.short_name());
            if is_subject
                && deps.iter().any(|d| {
                    d.is_live()
                        && d.gov().index() == conjunct.index()
                        && d.relation()
                            .map_or(false, |r| SUBJECTS.contains(&r.short_name()))
                })
            {
                continue;
            }

            // Voice follows the conjunct: a passive-marked or bare
            // participial conjunct takes the passive subject relation.
            let new_relation = if is_subject
                && matches!(
                    source_relation.short_name(),
                    "nsubj" | "nsubjpass"
                ) {
                let passive = conjunct.tag() == Some("VBN")
                    || deps.iter().any(|d| {
                        d.is_live()
                            && d.is("auxpass")
                            && d.gov().index() == conjunct.index()
                    });
                let name = if passive { "nsubjpass" } else { "nsubj" };
                match registry.lookup(name) {
                    Some(relation) => relation,
                    None => source_relation.clone(),
                }
            } else {
                source_relation.clone()
            };

            let mut addition =
                TypedDependency::new(new_relation, conjunct.clone(), source.dep().clone());
            addition.set_extra(true);

            if !deps.contains(&addition) && !additions.contains(&addition) {
                additions.push(addition);
            }
        }
    }

    deps.extend(additions);
}
