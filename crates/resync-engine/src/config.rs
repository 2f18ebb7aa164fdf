//! Run configuration for the reconciliation engine.

use serde::{Deserialize, Serialize};

/// Default similarity cutoff for treating two organisation names as the
/// same entity. Trades false merges against false splits; callers needing
/// different precision/recall override it.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 90.0;

/// Field-length limit the target enforces on custom-field comments.
pub const DEFAULT_COMMENT_LIMIT: usize = 50;

/// How to fill a missing start/end month when only the year is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingMonthRule {
    /// Uniformly random month, avoiding a January bias in reporting.
    /// Not reproducible across runs unless the run is seeded.
    Random,
    /// Always substitute the given month.
    Fixed(u32),
    /// Treat the whole date as unknown.
    Skip,
}

/// Engine options, one value per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncOptions {
    /// Similarity score (0-100) at or above which an employer name matches
    /// an existing organisation.
    pub match_threshold: f64,
    pub missing_month: MissingMonthRule,
    /// Email domains excluded from contact reconciliation (the
    /// institution's own addresses are maintained elsewhere).
    pub excluded_email_domains: Vec<String>,
    /// Maximum custom-field comment length accepted by the target.
    pub comment_limit: usize,
    /// Seed for month substitution and fallback identifier bases.
    pub seed: Option<u64>,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            missing_month: MissingMonthRule::Random,
            excluded_email_domains: vec!["iitb.ac.in".to_string()],
            comment_limit: DEFAULT_COMMENT_LIMIT,
            seed: None,
        }
    }
}
