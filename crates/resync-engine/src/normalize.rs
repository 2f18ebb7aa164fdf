//! Field normalization: sentinels, dates, money, multi-valued text.
//!
//! The source feed is partially null and loosely typed. Every rule here
//! substitutes a documented fallback instead of failing; store-level
//! failures are the only fatal ones.

use chrono::NaiveDate;
use rand::Rng;

use resync_store::parse_int_lossy;

use crate::config::MissingMonthRule;

/// Sentinel for absent or unparseable numeric fields. A sentinel year
/// suppresses date construction downstream.
pub const NUMERIC_SENTINEL: i64 = 0;

/// Parse a numeric cell, substituting the sentinel for nulls and junk.
pub fn numeric_or_sentinel(value: Option<&str>) -> i64 {
    value.and_then(parse_int_lossy).unwrap_or(NUMERIC_SENTINEL)
}

/// Resolve a month cell through the configured substitution rule.
///
/// Out-of-range values are treated the same as missing ones.
pub fn resolve_month(
    value: Option<&str>,
    rule: MissingMonthRule,
    rng: &mut impl Rng,
) -> Option<u32> {
    let parsed = value
        .and_then(parse_int_lossy)
        .and_then(|month| u32::try_from(month).ok())
        .filter(|month| (1..=12).contains(month));
    match parsed {
        Some(month) => Some(month),
        None => match rule {
            MissingMonthRule::Random => Some(rng.gen_range(1..=12)),
            MissingMonthRule::Fixed(month) => Some(month.clamp(1, 12)),
            MissingMonthRule::Skip => None,
        },
    }
}

/// First-of-month employment date. A sentinel year, or a skipped month,
/// yields no date rather than a malformed one.
pub fn employment_date(year: i64, month: Option<u32>) -> Option<NaiveDate> {
    if year == NUMERIC_SENTINEL {
        return None;
    }
    let year = i32::try_from(year).ok()?;
    NaiveDate::from_ymd_opt(year, month?, 1)
}

/// Salary range, present only when both bounds are known.
pub fn income_range(min: i64, max: i64) -> Option<String> {
    if min == NUMERIC_SENTINEL || max == NUMERIC_SENTINEL {
        return None;
    }
    Some(format!("${} - ${}", thousands(min), thousands(max)))
}

fn thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (position, digit) in digits.chars().enumerate() {
        if position > 0 && (digits.len() - position) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if value < 0 { format!("-{grouped}") } else { grouped }
}

/// Split a multi-valued sector cell into title-cased entries.
///
/// The textual conjunction is rewritten to the delimiter first, so
/// "Tech, and Finance" splits the same as "Tech, Finance".
pub fn split_sectors(raw: &str) -> Vec<String> {
    raw.replace(", and ", ", ")
        .replace(", ", ",")
        .split(',')
        .map(|entry| title_case(entry.trim()))
        .filter(|entry| !entry.is_empty())
        .collect()
}

/// Capitalize the first letter of each word, lower-case the rest.
pub fn title_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut at_word_start = true;
    for c in raw.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
                at_word_start = false;
            } else {
                out.extend(c.to_lowercase());
            }
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

/// Standardized company name when the feed has one, raw employer name
/// otherwise.
pub fn preferred_name(standardized: Option<&str>, raw: Option<&str>) -> Option<String> {
    standardized.or(raw).map(str::to_string)
}

/// Canonical form of a LinkedIn value: no trailing slash, no scheme or
/// `www.` prefix. Applied to both sides of the contact diff.
pub fn clean_linkedin_url(url: &str) -> String {
    let url = url.trim();
    let url = url.strip_suffix('/').unwrap_or(url);
    for prefix in ["https://www.", "http://www.", "www."] {
        if let Some(stripped) = url.strip_prefix(prefix) {
            return stripped.to_string();
        }
    }
    url.to_string()
}

/// Lower-cased email addresses out of a possibly multi-valued cell.
pub fn split_emails(raw: &str) -> impl Iterator<Item = String> + '_ {
    raw.split("; ")
        .map(|email| email.trim().to_lowercase())
        .filter(|email| !email.is_empty())
}

/// Whether an address belongs to one of the excluded domains.
pub fn is_excluded_email(email: &str, excluded_domains: &[String]) -> bool {
    excluded_domains
        .iter()
        .any(|domain| email.ends_with(&format!("@{domain}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn sentinel_covers_null_and_junk() {
        assert_eq!(numeric_or_sentinel(None), 0);
        assert_eq!(numeric_or_sentinel(Some("n/a")), 0);
        assert_eq!(numeric_or_sentinel(Some("2020")), 2020);
        assert_eq!(numeric_or_sentinel(Some("2020.0")), 2020);
    }

    #[test]
    fn month_rules() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(
            resolve_month(Some("3"), MissingMonthRule::Skip, &mut rng),
            Some(3)
        );
        assert_eq!(resolve_month(None, MissingMonthRule::Skip, &mut rng), None);
        assert_eq!(
            resolve_month(None, MissingMonthRule::Fixed(6), &mut rng),
            Some(6)
        );
        let substituted =
            resolve_month(Some("13"), MissingMonthRule::Random, &mut rng).expect("substituted");
        assert!((1..=12).contains(&substituted));
    }

    #[test]
    fn sentinel_year_yields_no_date() {
        assert_eq!(employment_date(0, Some(5)), None);
        assert_eq!(employment_date(2020, None), None);
        assert_eq!(
            employment_date(2020, Some(5)),
            NaiveDate::from_ymd_opt(2020, 5, 1)
        );
    }

    #[test]
    fn income_needs_both_bounds() {
        assert_eq!(income_range(80_000, 95_000).as_deref(), Some("$80,000 - $95,000"));
        assert_eq!(income_range(0, 95_000), None);
        assert_eq!(income_range(80_000, 0), None);
        assert_eq!(income_range(1_250_500, 2_000_000).as_deref(), Some("$1,250,500 - $2,000,000"));
    }

    #[test]
    fn sectors_split_on_conjunction_and_title_case() {
        assert_eq!(split_sectors("Tech, and Finance"), vec!["Tech", "Finance"]);
        assert_eq!(
            split_sectors("tech, finance, and retail"),
            vec!["Tech", "Finance", "Retail"]
        );
        assert_eq!(split_sectors("INFORMATION TECHNOLOGY"), vec!["Information Technology"]);
    }

    #[test]
    fn linkedin_cleaning_is_idempotent() {
        let cleaned = clean_linkedin_url("https://www.linkedin.com/in/jdoe/");
        assert_eq!(cleaned, "linkedin.com/in/jdoe");
        assert_eq!(clean_linkedin_url(&cleaned), cleaned);
        assert_eq!(
            clean_linkedin_url("www.linkedin.com/in/jdoe"),
            "linkedin.com/in/jdoe"
        );
    }

    #[test]
    fn emails_split_and_lower() {
        let emails: Vec<String> = split_emails("JDoe@Example.org; j.doe@corp.example").collect();
        assert_eq!(emails, vec!["jdoe@example.org", "j.doe@corp.example"]);
    }

    #[test]
    fn excluded_domains_match_whole_domain() {
        let excluded = vec!["iitb.ac.in".to_string()];
        assert!(is_excluded_email("student@iitb.ac.in", &excluded));
        assert!(!is_excluded_email("alum@gmail.com", &excluded));
    }
}
