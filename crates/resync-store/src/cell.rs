//! Cell-level parsing helpers shared by snapshot implementations.
//!
//! Snapshot exports are untyped: boolean columns carry "True"/"False",
//! integer columns pick up float artifacts ("12345.0") on the way through
//! spreadsheet tools, and empty cells mean absent. These helpers keep that
//! tolerance in one place.

/// Trim a raw cell; empty after trimming means absent.
pub fn clean(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parse a boolean cell. Unrecognized text is treated as absent.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "yes" | "1" => Some(true),
        "false" | "f" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Parse an integer cell, accepting float artifacts like "12345.0".
pub fn parse_int_lossy(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = trimmed.parse::<i64>() {
        return Some(parsed);
    }
    match trimmed.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => Some(parsed.trunc() as i64),
        _ => None,
    }
}

/// The numeric suffix of a contact type label ("LinkedIn 12" -> 12).
///
/// Labels without digits, or with suffixes of 100 and above, are free text
/// rather than slot numbers.
pub fn slot_suffix(label: &str) -> Option<u32> {
    let digits: String = label.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    match digits.parse::<u32>() {
        Ok(suffix) if suffix < 100 => Some(suffix),
        _ => None,
    }
}
