//! Fuzzy organisation-name matching.
//!
//! Jaro-Winkler similarity over trimmed, lower-cased names, scaled 0-100.
//! Callers pass candidates in a deterministic order; the first candidate at
//! the maximum score wins, so results are reproducible across runs.

use rapidfuzz::distance::jaro_winkler;

/// Similarity score between two names, 0-100.
pub fn similarity(query: &str, candidate: &str) -> f64 {
    jaro_winkler::similarity(normalize(query).chars(), normalize(candidate).chars()) * 100.0
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Best candidate at or above `threshold`, or `None`.
///
/// A score exactly at the threshold counts as a match. Below-threshold
/// results are "no match", never an error: the conservative default is to
/// create a new entity rather than risk an incorrect merge.
pub fn best_match<'a, I>(query: &str, candidates: I, threshold: f64) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(&str, f64)> = None;
    for candidate in candidates {
        let score = similarity(query, candidate);
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((candidate, score));
        }
    }
    match best {
        Some((candidate, score)) if score >= threshold => Some(candidate),
        _ => None,
    }
}
