//! The English relation set.
//!
//! Relations are declared in an ordered table: short name, descriptive
//! name, parent in the hierarchy, the basic categories the triggers
//! apply under, and the trigger matchers themselves. Matchers are plain
//! functions over the indexed, head-percolated tree; each one returns
//! the nodes standing in its relation to the node under consideration.
//!
//! Several relations carry no triggers at all: they only enter the
//! picture through later rewriting (`nsubjpass`, `agent`, `ref`, the
//! parameterized `nmod:<word>` and `conj:<word>` families) or are
//! synthesized by the builder (`root`, `dep`).

use constree::label::basic_category;
use constree::tree::Tree;

use crate::matcher::TriggerPattern;
use crate::registry::RelationDef;

const BE_FORMS: &[&str] = &[
    "am", "is", "are", "was", "were", "be", "been", "being", "'s", "'re", "'m", "ai",
];

const GET_FORMS: &[&str] = &["get", "gets", "got", "gotten", "getting"];

const MODAL_AUX: &[&str] = &[
    "have", "has", "had", "having", "do", "does", "did", "will", "shall", "would", "should",
    "can", "could", "may", "might", "must",
];

const NEGATIONS: &[&str] = &["not", "n't", "never"];

const CCOMP_MARKERS: &[&str] = &["that", "whether"];

const ADVCL_MARKERS: &[&str] = &[
    "because", "although", "though", "while", "if", "unless", "until", "since", "after",
    "before", "when", "once", "whereas", "as",
];

const TEMPORAL_NOUNS: &[&str] = &[
    "today", "tomorrow", "yesterday", "tonight", "week", "month", "year", "morning",
    "afternoon", "evening", "night",
];

const COORDINATED: &[&str] = &[
    "NP", "NX", "VP", "S", "SQ", "SINV", "ADJP", "ADVP", "UCP", "PP",
];

/// The ordered English relation table.
pub fn definitions() -> Vec<RelationDef> {
    vec![
        RelationDef::new("dep", "dependent"),
        RelationDef::new("root", "root").parent("dep"),
        RelationDef::new("aux", "auxiliary")
            .parent("dep")
            .restriction(&["VP", "SQ", "SINV"])
            .trigger(TriggerPattern::new(aux)),
        RelationDef::new("auxpass", "passive auxiliary")
            .parent("aux")
            .restriction(&["VP", "SQ", "SINV"])
            .trigger(TriggerPattern::new(auxpass)),
        RelationDef::new("cop", "copula")
            .parent("aux")
            .restriction(&["VP"])
            .trigger(TriggerPattern::new(cop)),
        RelationDef::new("arg", "argument").parent("dep"),
        RelationDef::new("agent", "agent").parent("arg"),
        RelationDef::new("comp", "complement").parent("arg"),
        RelationDef::new("acomp", "adjectival complement")
            .parent("comp")
            .restriction(&["VP"])
            .trigger(TriggerPattern::new(acomp)),
        RelationDef::new("ccomp", "clausal complement")
            .parent("comp")
            .restriction(&["VP"])
            .trigger(TriggerPattern::new(ccomp)),
        RelationDef::new("xcomp", "open clausal complement")
            .parent("comp")
            .restriction(&["VP"])
            .trigger(TriggerPattern::new(xcomp)),
        RelationDef::new("pcomp", "prepositional complement")
            .parent("comp")
            .restriction(&["PP"])
            .trigger(TriggerPattern::new(pcomp)),
        RelationDef::new("obj", "object").parent("comp"),
        RelationDef::new("dobj", "direct object")
            .parent("obj")
            .restriction(&["VP"])
            .trigger(TriggerPattern::new(dobj)),
        RelationDef::new("iobj", "indirect object")
            .parent("obj")
            .restriction(&["VP"])
            .trigger(TriggerPattern::new(iobj)),
        RelationDef::new("pobj", "object of preposition")
            .parent("obj")
            .restriction(&["PP", "WHPP"])
            .trigger(TriggerPattern::new(pobj)),
        RelationDef::new("subj", "subject").parent("arg"),
        RelationDef::new("nsubj", "nominal subject")
            .parent("subj")
            .restriction(&["S", "SQ", "SINV"])
            .trigger(TriggerPattern::new(nsubj)),
        RelationDef::new("nsubjpass", "passive nominal subject").parent("nsubj"),
        RelationDef::new("csubj", "clausal subject")
            .parent("subj")
            .restriction(&["S"])
            .trigger(TriggerPattern::new(csubj)),
        RelationDef::new("csubjpass", "passive clausal subject").parent("csubj"),
        RelationDef::new("cc", "coordination")
            .parent("dep")
            .restriction(COORDINATED)
            .trigger(TriggerPattern::new(cc)),
        RelationDef::new("conj", "conjunct")
            .parent("dep")
            .restriction(COORDINATED)
            .trigger(TriggerPattern::new(conj)),
        RelationDef::new("expl", "expletive")
            .parent("dep")
            .restriction(&["S", "SQ", "SINV"])
            .trigger(TriggerPattern::new(expl)),
        RelationDef::new("mod", "modifier").parent("dep"),
        RelationDef::new("amod", "adjectival modifier")
            .parent("mod")
            .restriction(&["NP", "NX"])
            .trigger(TriggerPattern::new(amod)),
        RelationDef::new("advmod", "adverbial modifier")
            .parent("mod")
            .restriction(&["VP", "S", "SQ", "SINV", "ADJP", "ADVP", "NP"])
            .trigger(TriggerPattern::new(advmod)),
        RelationDef::new("neg", "negation modifier")
            .parent("advmod")
            .restriction(&["VP", "S", "SQ", "SINV", "ADJP"])
            .trigger(TriggerPattern::new(neg)),
        RelationDef::new("det", "determiner")
            .parent("mod")
            .restriction(&["NP", "NX", "WHNP"])
            .trigger(TriggerPattern::new(det)),
        RelationDef::new("predet", "predeterminer")
            .parent("mod")
            .restriction(&["NP"])
            .trigger(TriggerPattern::new(predet)),
        RelationDef::new("nummod", "numeric modifier")
            .parent("mod")
            .restriction(&["NP", "QP"])
            .trigger(TriggerPattern::new(nummod)),
        RelationDef::new("compound", "compound modifier")
            .parent("mod")
            .restriction(&["NP", "NX"])
            .trigger(TriggerPattern::new(compound)),
        RelationDef::new("appos", "appositional modifier")
            .parent("mod")
            .restriction(&["NP"])
            .trigger(TriggerPattern::new(appos)),
        RelationDef::new("poss", "possession modifier")
            .parent("mod")
            .restriction(&["NP", "WHNP"])
            .trigger(TriggerPattern::new(poss)),
        RelationDef::new("possessive", "possessive modifier")
            .parent("mod")
            .restriction(&["NP"])
            .trigger(TriggerPattern::new(possessive)),
        RelationDef::new("prt", "phrasal verb particle")
            .parent("mod")
            .restriction(&["VP"])
            .trigger(TriggerPattern::new(prt)),
        RelationDef::new("prep", "prepositional modifier")
            .parent("mod")
            .restriction(&["VP", "NP", "ADJP", "ADVP", "S", "SQ", "SINV"])
            .trigger(TriggerPattern::new(prep)),
        RelationDef::new("nmod", "nominal modifier").parent("mod"),
        RelationDef::new("tmod", "temporal modifier")
            .parent("mod")
            .restriction(&["VP", "S"])
            .trigger(TriggerPattern::new(tmod)),
        RelationDef::new("rcmod", "relative clause modifier")
            .parent("mod")
            .restriction(&["NP", "WHNP"])
            .trigger(TriggerPattern::new(rcmod)),
        RelationDef::new("advcl", "adverbial clause modifier")
            .parent("mod")
            .restriction(&["VP", "S"])
            .trigger(TriggerPattern::new(advcl)),
        RelationDef::new("mark", "marker")
            .parent("mod")
            .restriction(&["SBAR"])
            .trigger(TriggerPattern::new(mark)),
        RelationDef::new("mwe", "multi-word expression")
            .parent("mod")
            .restriction(&["PP"])
            .trigger(TriggerPattern::new(mwe)),
        RelationDef::new("punct", "punctuation").parent("dep"),
        RelationDef::new("ref", "referent").parent("dep"),
    ]
}

fn cat<'a>(tree: &'a Tree, node: usize) -> &'a str {
    tree[node].label().basic_category()
}

fn word_of<'a>(tree: &'a Tree, node: usize) -> Option<&'a str> {
    tree[node].label().word()
}

fn tag_of<'a>(tree: &'a Tree, node: usize) -> Option<&'a str> {
    tree[node].label().tag()
}

/// Split a node's children around its head child.
fn split_at_head(tree: &Tree, node: usize) -> Option<(&[usize], usize, &[usize])> {
    let idx = tree[node].label().index()?;
    let children = tree.children(node);
    let pos = children
        .iter()
        .position(|&c| tree[c].label().index() == Some(idx))?;
    Some((&children[..pos], children[pos], &children[pos + 1..]))
}

fn is_word(tree: &Tree, node: usize, words: &[&str]) -> bool {
    match word_of(tree, node) {
        Some(word) => words.contains(&word.to_lowercase().as_str()),
        None => false,
    }
}

fn verbal_tag(tag: Option<&str>) -> bool {
    matches!(
        tag,
        Some("VB") | Some("VBD") | Some("VBG") | Some("VBN") | Some("VBP") | Some("VBZ")
    )
}

/// A preterminal auxiliary candidate: a modal, `to`, or a form of
/// be/have/do and friends.
fn is_aux_word(tree: &Tree, node: usize) -> bool {
    if !tree.is_preterminal(node) {
        return false;
    }
    match cat(tree, node) {
        "MD" | "TO" => true,
        c if c.starts_with("VB") => {
            is_word(tree, node, BE_FORMS) || is_word(tree, node, MODAL_AUX)
        }
        _ => false,
    }
}

fn nsubj(tree: &Tree, node: usize) -> Vec<usize> {
    let (before, _, after) = match split_at_head(tree, node) {
        Some(parts) => parts,
        None => return Vec::new(),
    };

    match cat(tree, node) {
        "S" => before
            .iter()
            .copied()
            .filter(|&c| cat(tree, c) == "NP")
            .collect(),
        "SQ" | "SINV" => after
            .iter()
            .copied()
            .filter(|&c| cat(tree, c) == "NP")
            .take(1)
            .collect(),
        _ => Vec::new(),
    }
}

fn csubj(tree: &Tree, node: usize) -> Vec<usize> {
    let (before, _, _) = match split_at_head(tree, node) {
        Some(parts) => parts,
        None => return Vec::new(),
    };

    before
        .iter()
        .copied()
        .filter(|&c| matches!(cat(tree, c), "S" | "SBAR"))
        .collect()
}

fn object_nps(tree: &Tree, node: usize) -> Vec<usize> {
    let (_, head, after) = match split_at_head(tree, node) {
        Some(parts) => parts,
        None => return Vec::new(),
    };

    // Only verbal heads take objects; under a copula the predicate is
    // the head itself.
    if !verbal_tag(tag_of(tree, head)) {
        return Vec::new();
    }

    after
        .iter()
        .copied()
        .filter(|&c| cat(tree, c) == "NP" && !is_word(tree, c, TEMPORAL_NOUNS))
        .collect()
}

fn dobj(tree: &Tree, node: usize) -> Vec<usize> {
    let mut nps = object_nps(tree, node);
    if nps.len() > 1 {
        nps.remove(0);
    }
    nps
}

fn iobj(tree: &Tree, node: usize) -> Vec<usize> {
    let nps = object_nps(tree, node);
    if nps.len() > 1 {
        vec![nps[0]]
    } else {
        Vec::new()
    }
}

fn pobj(tree: &Tree, node: usize) -> Vec<usize> {
    let (_, _, after) = match split_at_head(tree, node) {
        Some(parts) => parts,
        None => return Vec::new(),
    };

    after
        .iter()
        .copied()
        .filter(|&c| matches!(cat(tree, c), "NP" | "WHNP"))
        .collect()
}

fn pcomp(tree: &Tree, node: usize) -> Vec<usize> {
    let (_, _, after) = match split_at_head(tree, node) {
        Some(parts) => parts,
        None => return Vec::new(),
    };

    after
        .iter()
        .copied()
        .filter(|&c| matches!(cat(tree, c), "PP" | "S" | "SBAR" | "ADVP"))
        .collect()
}

fn acomp(tree: &Tree, node: usize) -> Vec<usize> {
    let (_, head, after) = match split_at_head(tree, node) {
        Some(parts) => parts,
        None => return Vec::new(),
    };

    if !verbal_tag(tag_of(tree, head)) {
        return Vec::new();
    }

    after
        .iter()
        .copied()
        .filter(|&c| cat(tree, c) == "ADJP")
        .collect()
}

fn ccomp(tree: &Tree, node: usize) -> Vec<usize> {
    let (_, head, after) = match split_at_head(tree, node) {
        Some(parts) => parts,
        None => return Vec::new(),
    };

    if !verbal_tag(tag_of(tree, head)) {
        return Vec::new();
    }

    after
        .iter()
        .copied()
        .filter(|&c| cat(tree, c) == "SBAR" && ccomp_clause(tree, c))
        .collect()
}

/// A complement clause starts with `that`/`whether` or with no
/// complementizer at all.
fn ccomp_clause(tree: &Tree, sbar: usize) -> bool {
    let first = match tree.children(sbar).first() {
        Some(&first) => first,
        None => return false,
    };

    match cat(tree, first) {
        "IN" | "DT" => is_word(tree, first, CCOMP_MARKERS),
        "S" => true,
        _ => false,
    }
}

fn xcomp(tree: &Tree, node: usize) -> Vec<usize> {
    let (_, head, after) = match split_at_head(tree, node) {
        Some(parts) => parts,
        None => return Vec::new(),
    };

    if !verbal_tag(tag_of(tree, head)) {
        return Vec::new();
    }

    after
        .iter()
        .copied()
        .filter(|&c| cat(tree, c) == "S" && open_clause(tree, c))
        .collect()
}

/// An open clause: verbal or infinitival, with no subject of its own.
fn open_clause(tree: &Tree, clause: usize) -> bool {
    let (before, _, _) = match split_at_head(tree, clause) {
        Some(parts) => parts,
        None => return false,
    };

    if before.iter().any(|&c| cat(tree, c) == "NP") {
        return false;
    }

    matches!(tag_of(tree, clause), Some("TO"))
        || verbal_tag(tag_of(tree, clause))
}

fn aux(tree: &Tree, node: usize) -> Vec<usize> {
    let (before, head, _) = match split_at_head(tree, node) {
        Some(parts) => parts,
        None => return Vec::new(),
    };

    // Auxiliaries precede a verbal head; before a predicative head the
    // verb is a copula instead.
    if !(cat(tree, head) == "VP" || verbal_tag(tag_of(tree, head))) {
        return Vec::new();
    }

    before
        .iter()
        .copied()
        .filter(|&c| is_aux_word(tree, c))
        .collect()
}

fn auxpass(tree: &Tree, node: usize) -> Vec<usize> {
    let (before, head, _) = match split_at_head(tree, node) {
        Some(parts) => parts,
        None => return Vec::new(),
    };

    if tag_of(tree, head) != Some("VBN") {
        return Vec::new();
    }

    before
        .iter()
        .copied()
        .filter(|&c| {
            tree.is_preterminal(c)
                && cat(tree, c).starts_with("VB")
                && (is_word(tree, c, BE_FORMS) || is_word(tree, c, GET_FORMS))
        })
        .collect()
}

fn cop(tree: &Tree, node: usize) -> Vec<usize> {
    let (before, head, _) = match split_at_head(tree, node) {
        Some(parts) => parts,
        None => return Vec::new(),
    };

    if !matches!(cat(tree, head), "ADJP" | "NP") {
        return Vec::new();
    }

    before
        .iter()
        .copied()
        .filter(|&c| {
            tree.is_preterminal(c)
                && cat(tree, c).starts_with("VB")
                && is_word(tree, c, BE_FORMS)
        })
        .collect()
}

fn non_head_children(tree: &Tree, node: usize) -> Vec<usize> {
    match split_at_head(tree, node) {
        Some((before, _, after)) => before.iter().chain(after.iter()).copied().collect(),
        None => Vec::new(),
    }
}

fn det(tree: &Tree, node: usize) -> Vec<usize> {
    non_head_children(tree, node)
        .into_iter()
        .filter(|&c| tree.is_preterminal(c) && matches!(cat(tree, c), "DT" | "WDT"))
        .collect()
}

fn predet(tree: &Tree, node: usize) -> Vec<usize> {
    non_head_children(tree, node)
        .into_iter()
        .filter(|&c| tree.is_preterminal(c) && cat(tree, c) == "PDT")
        .collect()
}

fn nummod(tree: &Tree, node: usize) -> Vec<usize> {
    non_head_children(tree, node)
        .into_iter()
        .filter(|&c| tree.is_preterminal(c) && cat(tree, c) == "CD")
        .collect()
}

fn amod(tree: &Tree, node: usize) -> Vec<usize> {
    non_head_children(tree, node)
        .into_iter()
        .filter(|&c| {
            cat(tree, c) == "ADJP"
                || (tree.is_preterminal(c) && matches!(cat(tree, c), "JJ" | "JJR" | "JJS"))
        })
        .collect()
}

fn compound(tree: &Tree, node: usize) -> Vec<usize> {
    let (before, _, _) = match split_at_head(tree, node) {
        Some(parts) => parts,
        None => return Vec::new(),
    };

    before
        .iter()
        .copied()
        .filter(|&c| {
            tree.is_preterminal(c)
                && matches!(cat(tree, c), "NN" | "NNS" | "NNP" | "NNPS")
        })
        .collect()
}

fn appos(tree: &Tree, node: usize) -> Vec<usize> {
    let (_, _, after) = match split_at_head(tree, node) {
        Some(parts) => parts,
        None => return Vec::new(),
    };

    let children = tree.children(node);
    after
        .iter()
        .copied()
        .filter(|&c| {
            if cat(tree, c) != "NP" {
                return false;
            }
            let pos = match children.iter().position(|&x| x == c) {
                Some(pos) => pos,
                None => return false,
            };
            pos > 0 && cat(tree, children[pos - 1]) == ","
        })
        .collect()
}

fn poss(tree: &Tree, node: usize) -> Vec<usize> {
    non_head_children(tree, node)
        .into_iter()
        .filter(|&c| {
            if tree.is_preterminal(c) && cat(tree, c) == "PRP$" {
                return true;
            }
            if cat(tree, c) != "NP" {
                return false;
            }
            match tree.children(c).last() {
                Some(&last) => tree.is_preterminal(last) && cat(tree, last) == "POS",
                None => false,
            }
        })
        .collect()
}

fn possessive(tree: &Tree, node: usize) -> Vec<usize> {
    non_head_children(tree, node)
        .into_iter()
        .filter(|&c| tree.is_preterminal(c) && cat(tree, c) == "POS")
        .collect()
}

fn prt(tree: &Tree, node: usize) -> Vec<usize> {
    let (_, _, after) = match split_at_head(tree, node) {
        Some(parts) => parts,
        None => return Vec::new(),
    };

    after
        .iter()
        .copied()
        .filter(|&c| cat(tree, c) == "PRT" || (tree.is_preterminal(c) && cat(tree, c) == "RP"))
        .collect()
}

fn prep(tree: &Tree, node: usize) -> Vec<usize> {
    non_head_children(tree, node)
        .into_iter()
        .filter(|&c| cat(tree, c) == "PP")
        .collect()
}

fn advmod(tree: &Tree, node: usize) -> Vec<usize> {
    non_head_children(tree, node)
        .into_iter()
        .filter(|&c| {
            let negated = is_word(tree, c, NEGATIONS);
            if tree.is_preterminal(c) {
                matches!(cat(tree, c), "RB" | "RBR" | "RBS") && !negated
            } else {
                cat(tree, c) == "ADVP" && !negated
            }
        })
        .collect()
}

fn neg(tree: &Tree, node: usize) -> Vec<usize> {
    non_head_children(tree, node)
        .into_iter()
        .filter(|&c| {
            is_word(tree, c, NEGATIONS)
                && ((tree.is_preterminal(c) && cat(tree, c) == "RB") || cat(tree, c) == "ADVP")
        })
        .collect()
}

fn expl(tree: &Tree, node: usize) -> Vec<usize> {
    tree.children(node)
        .iter()
        .copied()
        .filter(|&c| {
            (tree.is_preterminal(c) && cat(tree, c) == "EX")
                || (cat(tree, c) == "NP" && tag_of(tree, c) == Some("EX"))
        })
        .collect()
}

fn tmod(tree: &Tree, node: usize) -> Vec<usize> {
    non_head_children(tree, node)
        .into_iter()
        .filter(|&c| cat(tree, c) == "NP" && is_word(tree, c, TEMPORAL_NOUNS))
        .collect()
}

fn rcmod(tree: &Tree, node: usize) -> Vec<usize> {
    let (_, _, after) = match split_at_head(tree, node) {
        Some(parts) => parts,
        None => return Vec::new(),
    };

    after
        .iter()
        .copied()
        .filter(|&c| {
            if cat(tree, c) != "SBAR" {
                return false;
            }
            match tree.children(c).first() {
                Some(&first) => cat(tree, first).starts_with("WH"),
                None => false,
            }
        })
        .collect()
}

fn advcl(tree: &Tree, node: usize) -> Vec<usize> {
    non_head_children(tree, node)
        .into_iter()
        .filter(|&c| {
            if cat(tree, c) != "SBAR" {
                return false;
            }
            match tree.children(c).first() {
                Some(&first) => {
                    matches!(cat(tree, first), "IN" | "ADVP" | "RB")
                        && is_word(tree, first, ADVCL_MARKERS)
                }
                None => false,
            }
        })
        .collect()
}

fn mark(tree: &Tree, node: usize) -> Vec<usize> {
    let (before, _, _) = match split_at_head(tree, node) {
        Some(parts) => parts,
        None => return Vec::new(),
    };

    before
        .iter()
        .copied()
        .filter(|&c| tree.is_preterminal(c) && matches!(cat(tree, c), "IN" | "DT" | "TO"))
        .collect()
}

fn mwe(tree: &Tree, node: usize) -> Vec<usize> {
    let (before, head, after) = match split_at_head(tree, node) {
        Some(parts) => parts,
        None => return Vec::new(),
    };

    let head_idx = match tree[head].label().index() {
        Some(idx) => idx,
        None => return Vec::new(),
    };

    before
        .iter()
        .chain(after.iter())
        .copied()
        .filter(|&c| {
            if !(tree.is_preterminal(c) && matches!(cat(tree, c), "IN" | "TO" | "RB")) {
                return false;
            }
            match tree[c].label().index() {
                Some(idx) => idx + 1 == head_idx || head_idx + 1 == idx,
                None => false,
            }
        })
        .collect()
}

fn cc(tree: &Tree, node: usize) -> Vec<usize> {
    non_head_children(tree, node)
        .into_iter()
        .filter(|&c| (tree.is_preterminal(c) && cat(tree, c) == "CC") || cat(tree, c) == "CONJP")
        .collect()
}

const NOT_A_CONJUNCT: &[&str] = &[
    "CC", "CONJP", ",", ":", ".", "``", "''", "-LRB-", "-RRB-",
];

fn conj(tree: &Tree, node: usize) -> Vec<usize> {
    let has_coordination = tree
        .children(node)
        .iter()
        .any(|&c| cat(tree, c) == "CC" || cat(tree, c) == "CONJP");
    if !has_coordination {
        return Vec::new();
    }

    let (_, _, after) = match split_at_head(tree, node) {
        Some(parts) => parts,
        None => return Vec::new(),
    };

    after
        .iter()
        .copied()
        .filter(|&c| !NOT_A_CONJUNCT.contains(&basic_category(tree[c].label().value())))
        .collect()
}
