//! Interface name pattern expansion.
//!
//! A pattern such as `Ethernet[1-60]/[1-4]` carries numeric range markers
//! (`[start-end]`, inclusive). Expansion substitutes every combination of
//! marker values into the literal skeleton, rightmost marker varying fastest.

use std::ops::RangeInclusive;
use std::sync::OnceLock;

use regex_lite::Regex;
use thiserror::Error;

/// Upper bound on the number of names a single pattern may produce.
pub const MAX_EXPANSION: usize = 65_536;

const MARKER_PATTERN: &str = r"\[([0-9]+)-([0-9]+)\]";

/// A pattern whose range markers cannot be expanded
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("Invalid range {marker} in {pattern}: start must be lower than end")]
    Inverted { marker: String, pattern: String },
    #[error("Invalid range {marker} in {pattern}: bound does not fit an interface number")]
    Unparseable { marker: String, pattern: String },
    #[error("Pattern {pattern} expands to more than {limit} names")]
    TooLarge { pattern: String, limit: usize },
}

fn marker_regex() -> Option<&'static Regex> {
    static MARKER: OnceLock<Option<Regex>> = OnceLock::new();
    MARKER.get_or_init(|| Regex::new(MARKER_PATTERN).ok()).as_ref()
}

fn parse_bound(digits: &str, marker: &str, pattern: &str) -> Result<u32, RangeError> {
    digits.parse::<u32>().map_err(|_| RangeError::Unparseable {
        marker: marker.to_string(),
        pattern: pattern.to_string(),
    })
}

/// Expand an interface pattern into concrete interface names.
///
/// A pattern without markers expands to itself. Markers are substituted by
/// position, so adjacent markers and markers sharing the same range text
/// are handled the same as any other.
pub fn expand(pattern: &str) -> Result<Vec<String>, RangeError> {
    // Literal text between markers; always one more entry than `ranges`.
    let mut literals: Vec<&str> = Vec::new();
    let mut ranges: Vec<RangeInclusive<u32>> = Vec::new();
    let mut cursor = 0;
    let Some(marker_re) = marker_regex() else {
        return Ok(vec![pattern.to_string()]);
    };

    for caps in marker_re.captures_iter(pattern) {
        let Some(whole) = caps.get(0) else { continue };
        let marker = whole.as_str();
        let start = parse_bound(&caps[1], marker, pattern)?;
        let end = parse_bound(&caps[2], marker, pattern)?;
        if start >= end {
            return Err(RangeError::Inverted {
                marker: marker.to_string(),
                pattern: pattern.to_string(),
            });
        }

        literals.push(&pattern[cursor..whole.start()]);
        ranges.push(start..=end);
        cursor = whole.end();
    }

    if ranges.is_empty() {
        return Ok(vec![pattern.to_string()]);
    }
    literals.push(&pattern[cursor..]);

    let total = ranges
        .iter()
        .try_fold(1usize, |acc, r| acc.checked_mul((r.end() - r.start()) as usize + 1))
        .filter(|n| *n <= MAX_EXPANSION)
        .ok_or_else(|| RangeError::TooLarge {
            pattern: pattern.to_string(),
            limit: MAX_EXPANSION,
        })?;

    let mut names = Vec::with_capacity(total);
    let mut current: Vec<u32> = ranges.iter().map(|r| *r.start()).collect();

    loop {
        names.push(render(&literals, &current));

        // Advance like an odometer: bump the rightmost marker, carrying left.
        let mut pos = ranges.len();
        loop {
            if pos == 0 {
                return Ok(names);
            }
            pos -= 1;
            if current[pos] < *ranges[pos].end() {
                current[pos] += 1;
                break;
            }
            current[pos] = *ranges[pos].start();
        }
    }
}

fn render(literals: &[&str], values: &[u32]) -> String {
    let capacity = literals.iter().map(|l| l.len()).sum::<usize>() + values.len() * 3;
    let mut name = String::with_capacity(capacity);
    for (literal, value) in literals.iter().zip(values) {
        name.push_str(literal);
        name.push_str(&value.to_string());
    }
    if let Some(tail) = literals.last() {
        name.push_str(tail);
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_markers_returns_pattern() {
        assert_eq!(expand("Management1").unwrap(), vec!["Management1"]);
        assert_eq!(expand("Management1").unwrap(), expand("Management1").unwrap());
        assert_eq!(expand("mgmt0").unwrap(), vec!["mgmt0"]);
    }

    #[test]
    fn test_single_marker_ascending() {
        assert_eq!(
            expand("Ethernet[1-3]").unwrap(),
            vec!["Ethernet1", "Ethernet2", "Ethernet3"]
        );

        let names = expand("Ethernet1/[1-48]").unwrap();
        assert_eq!(names.len(), 48);
        assert_eq!(names.first().map(String::as_str), Some("Ethernet1/1"));
        assert_eq!(names.last().map(String::as_str), Some("Ethernet1/48"));
    }

    #[test]
    fn test_two_markers_rightmost_fastest() {
        assert_eq!(
            expand("X[1-2]/[1-2]").unwrap(),
            vec!["X1/1", "X1/2", "X2/1", "X2/2"]
        );
    }

    #[test]
    fn test_product_cardinality() {
        let names = expand("Ethernet[1-60]/[1-4]").unwrap();
        assert_eq!(names.len(), 240);
        assert_eq!(names[0], "Ethernet1/1");
        assert_eq!(names[3], "Ethernet1/4");
        assert_eq!(names[4], "Ethernet2/1");
        assert_eq!(names[239], "Ethernet60/4");

        assert_eq!(expand("e[1-3]/[5-6]/[0-1]").unwrap().len(), 3 * 2 * 2);
    }

    #[test]
    fn test_adjacent_markers_substitute_by_position() {
        assert_eq!(expand("p[1-2][1-2]").unwrap(), vec!["p11", "p12", "p21", "p22"]);
        assert_eq!(expand("[3-4]x").unwrap(), vec!["3x", "4x"]);
    }

    #[test]
    fn test_literal_characters_preserved() {
        assert_eq!(
            expand("Gi0/[1-2].100 (uplink)").unwrap(),
            vec!["Gi0/1.100 (uplink)", "Gi0/2.100 (uplink)"]
        );
        // Non-numeric brackets are literal text, not markers.
        assert_eq!(expand("port[a-b]").unwrap(), vec!["port[a-b]"]);
    }

    #[test]
    fn test_inverted_or_equal_range_rejected() {
        let err = expand("Ethernet[4-1]").unwrap_err();
        assert_eq!(
            err,
            RangeError::Inverted {
                marker: "[4-1]".to_string(),
                pattern: "Ethernet[4-1]".to_string(),
            }
        );
        assert!(err.to_string().contains("[4-1]"));
        assert!(err.to_string().contains("Ethernet[4-1]"));

        assert!(matches!(expand("Ethernet[2-2]"), Err(RangeError::Inverted { .. })));
        assert!(matches!(expand("Ethernet[1-2]/[3-3]"), Err(RangeError::Inverted { .. })));
    }

    #[test]
    fn test_oversized_bounds_rejected() {
        assert!(matches!(
            expand("Ethernet[1-99999999999]"),
            Err(RangeError::Unparseable { .. })
        ));
        assert!(matches!(
            expand("Ethernet[1-1000]/[1-1000]"),
            Err(RangeError::TooLarge { limit: MAX_EXPANSION, .. })
        ));
    }
}
