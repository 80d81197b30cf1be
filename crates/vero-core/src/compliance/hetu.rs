//! Henkilötunnus (Finnish personal identity code) detection.
//!
//! Format `DDMMYYCZZZQ`: birth date, century sign (`+` 1800s, `-` 1900s,
//! `A` 2000s), individual number and a check character. Used to keep patient
//! identifiers out of free-text fields and uploaded documents.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

const CHECK_CHARS: &[u8; 31] = b"0123456789ABCDEFHJKLMNPRSTUVWXY";

static HETU_PATTERN: OnceLock<Regex> = OnceLock::new();

fn pattern() -> &'static Regex {
    HETU_PATTERN.get_or_init(|| {
        // ASCII word boundaries: letters such as `ä` next to a code do not hide it.
        Regex::new(
            r"(?-u:\b)([0-9]{2})(0[1-9]|1[0-2])([0-9]{2})([+\-A])([0-9]{3})([0-9A-Y])(?-u:\b)",
        )
        .expect("Invalid regex pattern")
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HetuMatch {
    pub value: String,
    /// Byte offset into the scanned text.
    pub position: usize,
    /// Day in range and check character correct.
    pub is_valid: bool,
}

/// Every HETU-shaped token in `text`, valid or not.
pub fn detect_hetu(text: &str) -> Vec<HetuMatch> {
    pattern()
        .find_iter(text)
        .map(|m| HetuMatch {
            value: m.as_str().to_string(),
            position: m.start(),
            is_valid: is_valid_hetu(m.as_str()),
        })
        .collect()
}

/// True if `text` contains anything that looks like a HETU.
///
/// Shape alone is enough: a mistyped identifier is still personal data.
pub fn contains_hetu(text: &str) -> bool {
    pattern().is_match(text)
}

/// Validate a single 11-character HETU.
pub fn is_valid_hetu(hetu: &str) -> bool {
    let bytes = hetu.as_bytes();
    if bytes.len() != 11 || !matches!(bytes[6], b'+' | b'-' | b'A') {
        return false;
    }

    let digits = |range: std::ops::Range<usize>| -> Option<u32> {
        hetu.get(range)
            .filter(|s| s.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|s| s.parse().ok())
    };

    let (Some(day), Some(month), Some(date_part), Some(individual)) =
        (digits(0..2), digits(2..4), digits(0..6), digits(7..10))
    else {
        return false;
    };
    if !(1..=31).contains(&day) || !(1..=12).contains(&month) {
        return false;
    }

    let number = u64::from(date_part) * 1000 + u64::from(individual);
    let expected = CHECK_CHARS[(number % 31) as usize];
    bytes[10] == expected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_codes() {
        assert!(is_valid_hetu("131052-308T"));
        assert!(is_valid_hetu("010101A123N"));
        assert!(is_valid_hetu("311299+999E"));
    }

    #[test]
    fn test_wrong_check_character() {
        assert!(!is_valid_hetu("131052-308U"));
    }

    #[test]
    fn test_day_out_of_range() {
        assert!(!is_valid_hetu("001052-308T"));
        assert!(!is_valid_hetu("321052-308T"));
    }

    #[test]
    fn test_detect_reports_position_and_validity() {
        let text = "Potilas 131052-308T, kontrolli 131052-308U.";
        let found = detect_hetu(text);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].value, "131052-308T");
        assert_eq!(found[0].position, 8);
        assert!(found[0].is_valid);
        assert!(!found[1].is_valid);
    }

    #[test]
    fn test_month_outside_pattern_is_not_detected() {
        assert!(detect_hetu("131352-308T").is_empty());
    }

    #[test]
    fn test_detected_next_to_non_ascii_letters() {
        let found = detect_hetu("hetuä131052-308Tö");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].value, "131052-308T");
        assert_eq!(found[0].position, "hetuä".len());
        assert!(detect_hetu("x131052-308T").is_empty());
    }

    #[test]
    fn test_contains() {
        assert!(contains_hetu("ref 010101A123N"));
        assert!(!contains_hetu("Terveystalo tilitys 01/2026"));
        assert!(!contains_hetu("FI2112345600000785"));
    }
}
