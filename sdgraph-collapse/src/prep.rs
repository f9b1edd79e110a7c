//! Preposition collapsing.
//!
//! Two families of passes fold prepositions into relation labels. The
//! multi-word pass runs in every collapsed variant and fuses known
//! two- and three-word prepositions (`because of`, `by means of`) into
//! one `nmod:<words>` edge. The general pass runs in the full pipeline
//! only and folds every remaining preposition with an object into
//! `nmod:<word>` (or `agent` for a passive `by`), including coordinated
//! prepositional phrases.

use std::collections::BTreeMap;

use sdgraph::dependency::{TypedDependency, WordNode};
use sdgraph::registry::Registry;
use sdgraph::relation::Relation;

const TWO_WORD_PREPS: &[(&str, &str)] = &[
    ("according", "to"),
    ("ahead", "of"),
    ("along", "with"),
    ("apart", "from"),
    ("as", "for"),
    ("aside", "from"),
    ("because", "of"),
    ("close", "to"),
    ("contrary", "to"),
    ("due", "to"),
    ("instead", "of"),
    ("next", "to"),
    ("out", "of"),
    ("prior", "to"),
    ("such", "as"),
    ("thanks", "to"),
    ("together", "with"),
    ("up", "to"),
];

const THREE_WORD_PREPS: &[(&str, &str, &str)] = &[
    ("by", "means", "of"),
    ("in", "accordance", "with"),
    ("in", "addition", "to"),
    ("in", "case", "of"),
    ("in", "front", "of"),
    ("in", "place", "of"),
    ("in", "spite", "of"),
    ("on", "account", "of"),
    ("on", "behalf", "of"),
    ("on", "top", "of"),
    ("with", "regard", "to"),
    ("with", "respect", "to"),
];

/// Relations that attach a preposition to its external governor.
const GOVERNING: &[&str] = &["prep", "advmod", "dep", "mark", "amod"];

/// Relations linking the words of a multi-word preposition.
const INTERNAL: &[&str] = &["pcomp", "mwe", "prep", "advmod", "dep", "aux", "pobj"];

/// Relations from a preposition to its object.
const OBJECT: &[&str] = &["pobj", "pcomp", "dobj", "dep"];

fn rel_in(dependency: &TypedDependency, names: &[&str]) -> bool {
    match dependency.relation() {
        Some(relation) => names.contains(&relation.short_name()),
        None => false,
    }
}

fn position<F>(deps: &[TypedDependency], pred: F) -> Option<usize>
where
    F: Fn(&TypedDependency) -> bool,
{
    deps.iter().position(|d| d.is_live() && pred(d))
}

/// The words mentioned by live edges, by index.
fn occurrences(deps: &[TypedDependency]) -> BTreeMap<usize, WordNode> {
    let mut words = BTreeMap::new();
    for dependency in deps.iter().filter(|d| d.is_live()) {
        for word in [dependency.gov(), dependency.dep()] {
            if word.index() > 0 {
                words.entry(word.index()).or_insert_with(|| word.clone());
            }
        }
    }
    words
}

fn is_pair(a: &WordNode, b: &WordNode) -> bool {
    let (a, b) = (a.word().to_lowercase(), b.word().to_lowercase());
    TWO_WORD_PREPS
        .iter()
        .any(|&(w1, w2)| w1 == a && w2 == b)
}

fn is_triple(a: &WordNode, b: &WordNode, c: &WordNode) -> bool {
    let (a, b, c) = (
        a.word().to_lowercase(),
        b.word().to_lowercase(),
        c.word().to_lowercase(),
    );
    THREE_WORD_PREPS
        .iter()
        .any(|&(w1, w2, w3)| w1 == a && w2 == b && w3 == c)
}

fn between(dependency: &TypedDependency, a: usize, b: usize) -> bool {
    (dependency.gov().index() == a && dependency.dep().index() == b)
        || (dependency.gov().index() == b && dependency.dep().index() == a)
}

/// Move edges governed by a consumed preposition word onto the
/// external governor; temporal modifiers go with the object instead.
fn reparent_consumed(
    deps: &mut Vec<TypedDependency>,
    consumed: &[usize],
    gov: &WordNode,
    obj: &WordNode,
) {
    for dependency in deps.iter_mut() {
        if dependency.is_live() && consumed.contains(&dependency.gov().index()) {
            if dependency.is("tmod") {
                dependency.set_gov(obj.clone());
            } else {
                dependency.set_gov(gov.clone());
            }
        }
    }
}

/// Fuse known multi-word prepositions into single `nmod:<words>` edges.
pub(crate) fn collapse_multiword(deps: &mut Vec<TypedDependency>, registry: &Registry) {
    let nmod = match registry.lookup("nmod") {
        Some(relation) => relation,
        None => return,
    };

    let words = occurrences(deps);

    for (&index, w1) in &words {
        if let Some(w2) = words.get(&(index + 1)) {
            if is_pair(w1, w2) {
                collapse_pair(deps, registry, &nmod, w1, w2);
            }

            if let Some(w3) = words.get(&(index + 2)) {
                if is_triple(w1, w2, w3) {
                    collapse_triple(deps, registry, &nmod, w1, w2, w3);
                }
            }
        }
    }
}

/// The three attachment shapes a two-word preposition shows up in: the
/// object off the second word with the first word governed from
/// outside, everything off the first word (flat), or everything off the
/// second word.
#[derive(Clone, Copy)]
enum PairShape {
    Internal,
    Flat,
    Second,
}

fn collapse_pair(
    deps: &mut Vec<TypedDependency>,
    registry: &Registry,
    nmod: &Relation,
    w1: &WordNode,
    w2: &WordNode,
) {
    for &shape in &[PairShape::Internal, PairShape::Flat, PairShape::Second] {
        if try_pair(deps, registry, nmod, w1, w2, shape) {
            return;
        }
    }
}

fn try_pair(
    deps: &mut Vec<TypedDependency>,
    registry: &Registry,
    nmod: &Relation,
    w1: &WordNode,
    w2: &WordNode,
    shape: PairShape,
) -> bool {
    let (gov_target, obj_source) = match shape {
        PairShape::Internal => (w1.index(), w2.index()),
        PairShape::Flat => (w1.index(), w1.index()),
        PairShape::Second => (w2.index(), w2.index()),
    };
    let outside = |index: usize| index != w1.index() && index != w2.index();

    let governing = position(deps, |d| {
        rel_in(d, GOVERNING) && d.dep().index() == gov_target && outside(d.gov().index())
    });
    let internal = position(deps, |d| {
        rel_in(d, INTERNAL) && between(d, w1.index(), w2.index())
    });
    let object = position(deps, |d| {
        rel_in(d, OBJECT) && d.gov().index() == obj_source && outside(d.dep().index())
    });

    let (governing, internal, object) = match (governing, internal, object) {
        (Some(governing), Some(internal), Some(object)) => (governing, internal, object),
        _ => return false,
    };

    let gov = deps[governing].gov().clone();
    let obj = deps[object].dep().clone();
    let name = format!(
        "{}_{}",
        w1.word().to_lowercase(),
        w2.word().to_lowercase()
    );
    let relation = registry.get_or_create(nmod, &name);

    deps[governing].kill();
    deps[internal].kill();
    deps[object].kill();
    deps.push(TypedDependency::new(relation, gov.clone(), obj.clone()));
    reparent_consumed(deps, &[w1.index(), w2.index()], &gov, &obj);

    true
}

fn collapse_triple(
    deps: &mut Vec<TypedDependency>,
    registry: &Registry,
    nmod: &Relation,
    w1: &WordNode,
    w2: &WordNode,
    w3: &WordNode,
) {
    let outside =
        |index: usize| index != w1.index() && index != w2.index() && index != w3.index();

    let governing = position(deps, |d| {
        rel_in(d, GOVERNING) && d.dep().index() == w1.index() && outside(d.gov().index())
    });
    let inner1 = position(deps, |d| {
        rel_in(d, INTERNAL) && between(d, w1.index(), w2.index())
    });
    let inner2 = position(deps, |d| {
        rel_in(d, INTERNAL) && between(d, w2.index(), w3.index())
    });

    // Nested form: the object hangs off the last word; flat form: off
    // the first.
    let object = position(deps, |d| {
        rel_in(d, OBJECT) && d.gov().index() == w3.index() && outside(d.dep().index())
    })
    .or_else(|| {
        position(deps, |d| {
            rel_in(d, OBJECT) && d.gov().index() == w1.index() && outside(d.dep().index())
        })
    });

    let (governing, inner1, inner2, object) = match (governing, inner1, inner2, object) {
        (Some(governing), Some(inner1), Some(inner2), Some(object)) => {
            (governing, inner1, inner2, object)
        }
        _ => return,
    };

    let gov = deps[governing].gov().clone();
    let obj = deps[object].dep().clone();
    let name = format!(
        "{}_{}_{}",
        w1.word().to_lowercase(),
        w2.word().to_lowercase(),
        w3.word().to_lowercase()
    );
    let relation = registry.get_or_create(nmod, &name);

    deps[governing].kill();
    deps[inner1].kill();
    deps[inner2].kill();
    deps[object].kill();
    deps.push(TypedDependency::new(relation, gov.clone(), obj.clone()));
    reparent_consumed(
        deps,
        &[w1.index(), w2.index(), w3.index()],
        &gov,
        &obj,
    );
}

/// Fold remaining prepositions and possessive markers.
pub(crate) fn collapse_prep_and_poss(deps: &mut Vec<TypedDependency>, registry: &Registry) {
    collapse_possessives(deps);
    collapse_preps(deps, registry);
}

/// A possessive marker hanging off the possessor of a `poss` edge is
/// spent once the edge exists.
fn collapse_possessives(deps: &mut Vec<TypedDependency>) {
    let owners: Vec<usize> = deps
        .iter()
        .filter(|d| d.is_live() && d.is("poss"))
        .map(|d| d.dep().index())
        .collect();

    for dependency in deps.iter_mut() {
        if dependency.is_live()
            && dependency.is("possessive")
            && owners.contains(&dependency.gov().index())
        {
            dependency.kill();
        }
    }
}

fn collapse_preps(deps: &mut Vec<TypedDependency>, registry: &Registry) {
    let nmod = match registry.lookup("nmod") {
        Some(relation) => relation,
        None => return,
    };
    let agent = registry.lookup("agent");

    let mut i = 0;
    while i < deps.len() {
        if !(deps[i].is_live() && deps[i].is("prep")) {
            i += 1;
            continue;
        }

        let gov = deps[i].gov().clone();
        let p = deps[i].dep().clone();

        let object = position(deps, |d| {
            matches!(
                d.relation().map(Relation::short_name),
                Some("pobj") | Some("pcomp")
            ) && d.gov().index() == p.index()
        });
        let object = match object {
            Some(object) => object,
            None => {
                i += 1;
                continue;
            }
        };
        let obj = deps[object].dep().clone();

        // A passive governor turns "by" into the agent relation.
        let passive = deps
            .iter()
            .any(|d| d.is_live() && d.is("auxpass") && d.gov().index() == gov.index());
        let main_relation = if p.word().eq_ignore_ascii_case("by") && passive {
            match &agent {
                Some(agent) => agent.clone(),
                None => registry.get_or_create(&nmod, p.word()),
            }
        } else {
            registry.get_or_create(&nmod, p.word())
        };

        collapse_conjoined_preps(deps, registry, &nmod, &main_relation, &gov, &p, &obj);

        deps[i].kill();
        deps[object].kill();
        deps.push(TypedDependency::new(
            main_relation,
            gov.clone(),
            obj.clone(),
        ));

        // Whatever else hung off the preposition moves to the governor.
        for dependency in deps.iter_mut() {
            if dependency.is_live() && dependency.gov().index() == p.index() {
                dependency.set_gov(gov.clone());
            }
        }

        i += 1;
    }
}

/// Coordinated prepositional phrases.
///
/// Each conjoined preposition gets its own collapsed edge from a copy
/// of the governor: with its own object when it has one (distinct
/// phrases), otherwise sharing the first preposition's object. A
/// conjunct spelling the same preposition reuses the same relation.
fn collapse_conjoined_preps(
    deps: &mut Vec<TypedDependency>,
    registry: &Registry,
    nmod: &Relation,
    main_relation: &Relation,
    gov: &WordNode,
    p: &WordNode,
    obj: &WordNode,
) {
    let conjuncts: Vec<usize> = deps
        .iter()
        .enumerate()
        .filter(|(_, d)| d.is_live() && d.is("conj") && d.gov().index() == p.index())
        .map(|(pos, _)| pos)
        .collect();
    if conjuncts.is_empty() {
        return;
    }

    for pos in conjuncts {
        let p2 = deps[pos].dep().clone();
        let relation = if p2.word().eq_ignore_ascii_case(p.word()) {
            main_relation.clone()
        } else {
            registry.get_or_create(nmod, p2.word())
        };

        let object2 = position(deps, |d| {
            matches!(
                d.relation().map(Relation::short_name),
                Some("pobj") | Some("pcomp")
            ) && d.gov().index() == p2.index()
        });

        deps[pos].kill();
        match object2 {
            Some(object2) => {
                let obj2 = deps[object2].dep().clone();
                deps[object2].kill();
                deps.push(TypedDependency::new(relation, gov.clone(), obj2));
            }
            None => {
                deps.push(TypedDependency::new(relation, gov.clone(), obj.clone()));
            }
        }
    }

    // The coordination marker between the prepositions goes too.
    for dependency in deps.iter_mut() {
        if dependency.is_live() && dependency.is("cc") && dependency.gov().index() == p.index() {
            dependency.kill();
        }
    }
}
