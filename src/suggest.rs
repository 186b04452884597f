//! Fuzzy ranking of object reference strings against a query.

use std::sync::Once;

use rapidfuzz::fuzz;

use crate::inventory::Inventory;

/// Default score threshold below which matches are dropped.
pub const DEFAULT_THRESHOLD: f64 = 50.0;

/// One ranked match, shaped according to which of `with_index`/`with_score`
/// the caller asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum Suggestion {
    RefOnly(String),
    RefIndex(String, usize),
    RefScore(String, f64),
    RefScoreIndex(String, f64, usize),
}

impl Suggestion {
    pub fn reference(&self) -> &str {
        match self {
            Suggestion::RefOnly(r)
            | Suggestion::RefIndex(r, _)
            | Suggestion::RefScore(r, _)
            | Suggestion::RefScoreIndex(r, _, _) => r,
        }
    }
}

static BACKEND_NOTICE: Once = Once::new();

/// Log a one-time advisory the first time `suggest` runs without an
/// accelerated string-distance backend enabled. Mirrors the upstream
/// project's one-shot warning when `python-Levenshtein` is absent.
fn note_backend_once() {
    BACKEND_NOTICE.call_once(|| {
        if !cfg!(feature = "simd-backend") {
            log::warn!(
                "no accelerated string-distance backend enabled; suggest() \
                 is using rapidfuzz's portable scalar scorer. Enable the \
                 `simd-backend` feature for faster matching."
            );
        }
    });
}

fn reference_string(obj: &crate::data_object::DataObjStr) -> String {
    format!(":{}:{}:`{}`", obj.domain, obj.role, obj.name)
}

/// Rank every object's reference string against `query` by token-set ratio,
/// descending by score with ties broken by original index, dropping
/// anything below `threshold`.
pub fn suggest(
    inventory: &Inventory,
    query: &str,
    with_index: bool,
    with_score: bool,
    threshold: f64,
) -> Vec<Suggestion> {
    note_backend_once();

    let query_lower = query.to_ascii_lowercase();

    let mut scored: Vec<(String, f64, usize)> = inventory
        .objects
        .iter()
        .enumerate()
        .map(|(idx, obj)| {
            let reference = reference_string(obj);
            let score = fuzz::token_set_ratio(
                query_lower.chars(),
                reference.to_ascii_lowercase().chars(),
            );
            (reference, score, idx)
        })
        .filter(|(_, score, _)| *score >= threshold)
        .collect();

    scored.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.2.cmp(&b.2))
    });

    scored
        .into_iter()
        .map(|(reference, score, idx)| match (with_index, with_score) {
            (false, false) => Suggestion::RefOnly(reference),
            (true, false) => Suggestion::RefIndex(reference, idx),
            (false, true) => Suggestion::RefScore(reference, score),
            (true, true) => Suggestion::RefScoreIndex(reference, score, idx),
        })
        .collect()
}
