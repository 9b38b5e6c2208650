//! Duration expression parsing and formatting.
//!
//! A duration is one or more `<number><unit>` segments. With a single trailing
//! unit, everything before it may be a full arithmetic expression
//! (`"(sqrt(100)+1e1)^2s"`); with two or more segments the string is a
//! combined duration (`"1h30m"`) and each segment is a plain numeric literal.
//!
//! Results are clamped to `[MIN_DURATION_MS, MAX_DURATION_MS]` -- out-of-range
//! values are corrected, never rejected.

use thiserror::Error;

use crate::expr::{self, ExprError};

/// Shortest mute the system will apply: 1 second.
pub const MIN_DURATION_MS: i64 = 1_000;

/// Longest mute the system will apply: 29 days 23:59:59.
pub const MAX_DURATION_MS: i64 =
    29 * 24 * 3_600_000 + 23 * 3_600_000 + 59 * 60_000 + 59 * 1_000;

/// Errors from duration parsing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DurationError {
    /// Empty input
    #[error("empty duration")]
    Empty,

    /// No recognizable time unit
    #[error("no time unit in '{0}'")]
    MissingUnit(String),

    /// The expression before the unit failed to evaluate
    #[error("invalid duration expression '{input}'")]
    Expression {
        input: String,
        #[source]
        source: ExprError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Days,
    Hours,
    Minutes,
    Seconds,
}

impl Unit {
    fn factor_ms(self) -> f64 {
        match self {
            Unit::Days => 86_400_000.0,
            Unit::Hours => 3_600_000.0,
            Unit::Minutes => 60_000.0,
            Unit::Seconds => 1_000.0,
        }
    }
}

/// Unit words ordered longest-first so the longest spelling always wins
/// (`"1second"` is one second, not one `d` preceded by garbage).
const UNIT_WORDS: [(&str, Unit); 12] = [
    ("seconds", Unit::Seconds),
    ("second", Unit::Seconds),
    ("hours", Unit::Hours),
    ("hour", Unit::Hours),
    ("mins", Unit::Minutes),
    ("days", Unit::Days),
    ("min", Unit::Minutes),
    ("day", Unit::Days),
    ("s", Unit::Seconds),
    ("h", Unit::Hours),
    ("m", Unit::Minutes),
    ("d", Unit::Days),
];

#[derive(Debug, Clone, Copy)]
struct Segment {
    value: f64,
    unit: Unit,
}

/// Parse a duration expression into clamped milliseconds.
pub fn parse_duration(input: &str) -> Result<i64, DurationError> {
    if input.is_empty() {
        return Err(DurationError::Empty);
    }

    let segments = scan_segments(input);
    if segments.len() > 1 {
        let total: f64 = segments
            .iter()
            .map(|seg| seg.value * seg.unit.factor_ms())
            .sum();
        return Ok(clamp_ms(total));
    }

    let (expr_text, unit) = split_unit_suffix(input)
        .ok_or_else(|| DurationError::MissingUnit(input.to_string()))?;

    let value = match fast_parse(expr_text) {
        Some(value) => value,
        None => expr::evaluate(expr_text).map_err(|source| DurationError::Expression {
            input: input.to_string(),
            source,
        })?,
    };

    Ok(clamp_ms(value * unit.factor_ms()))
}

/// Substitute `{t}` with a counter, then parse.
///
/// Used for escalation durations such as `"{t}^2h"`: three warnings mute for
/// nine hours.
pub fn parse_counted(template: &str, count: u32) -> Result<i64, DurationError> {
    parse_duration(&template.replace("{t}", &count.to_string()))
}

/// Render milliseconds as a compact `1d2h3m4s` string.
pub fn format_duration(milliseconds: i64) -> String {
    let total_secs = milliseconds / 1_000;
    let days = total_secs / 86_400;
    let hours = total_secs / 3_600 % 24;
    let minutes = total_secs / 60 % 60;
    let seconds = total_secs % 60;

    let mut out = String::new();
    if days > 0 {
        out.push_str(&format!("{days}d"));
    }
    if hours > 0 {
        out.push_str(&format!("{hours}h"));
    }
    if minutes > 0 {
        out.push_str(&format!("{minutes}m"));
    }
    if seconds > 0 {
        out.push_str(&format!("{seconds}s"));
    }
    if out.is_empty() {
        out.push_str("0s");
    }
    out
}

/// Collect all non-overlapping `<number><unit>` segments.
fn scan_segments(input: &str) -> Vec<Segment> {
    let bytes = input.as_bytes();
    let mut segments = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i].is_ascii_digit() {
            let start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            if i < bytes.len() && bytes[i] == b'.' {
                i += 1;
                while i < bytes.len() && bytes[i].is_ascii_digit() {
                    i += 1;
                }
            }
            if let Some((unit, len)) = match_unit_at(input, i) {
                if let Ok(value) = input[start..i].parse::<f64>() {
                    segments.push(Segment { value, unit });
                }
                i += len;
            }
        } else {
            i += 1;
        }
    }
    segments
}

/// Match the longest unit word at `pos`, case-insensitively.
fn match_unit_at(input: &str, pos: usize) -> Option<(Unit, usize)> {
    let rest = &input[pos..];
    for (word, unit) in UNIT_WORDS {
        if rest.len() >= word.len()
            && rest.is_char_boundary(word.len())
            && rest[..word.len()].eq_ignore_ascii_case(word)
        {
            return Some((unit, word.len()));
        }
    }
    None
}

/// Split off the longest unit word ending the string, leaving a non-empty
/// expression before it.
fn split_unit_suffix(input: &str) -> Option<(&str, Unit)> {
    for (word, unit) in UNIT_WORDS {
        if input.len() > word.len() {
            let split = input.len() - word.len();
            if input.is_char_boundary(split) && input[split..].eq_ignore_ascii_case(word) {
                return Some((&input[..split], unit));
            }
        }
    }
    None
}

/// Accept a plain numeric literal only when its canonical rendering
/// round-trips; everything else goes through the full evaluator.
fn fast_parse(text: &str) -> Option<f64> {
    let value: f64 = text.parse().ok()?;
    (value.is_finite() && value.to_string() == text).then_some(value)
}

fn clamp_ms(ms: f64) -> i64 {
    if ms < MIN_DURATION_MS as f64 {
        MIN_DURATION_MS
    } else if ms > MAX_DURATION_MS as f64 {
        MAX_DURATION_MS
    } else {
        ms as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_single_units() {
        assert_eq!(parse_duration("1h").unwrap(), 3_600_000);
        assert_eq!(parse_duration("10min").unwrap(), 600_000);
        assert_eq!(parse_duration("2days").unwrap(), 172_800_000);
        assert_eq!(parse_duration("45s").unwrap(), 45_000);
        assert_eq!(parse_duration("1second").unwrap(), 1_000);
    }

    #[test]
    fn test_case_insensitive_units() {
        assert_eq!(parse_duration("1H").unwrap(), 3_600_000);
        assert_eq!(parse_duration("10MIN").unwrap(), 600_000);
        assert_eq!(parse_duration("2Days").unwrap(), 172_800_000);
    }

    #[test]
    fn test_combined_durations() {
        assert_eq!(parse_duration("1h30m").unwrap(), 5_400_000);
        assert_eq!(parse_duration("2d6h15m").unwrap(), 195_300_000);
        assert_eq!(parse_duration("1m30s").unwrap(), 90_000);
    }

    #[test]
    fn test_fractional_values() {
        assert_eq!(parse_duration("1.5h").unwrap(), 5_400_000);
        assert_eq!(parse_duration("0.5m30s").unwrap(), 60_000);
    }

    #[test]
    fn test_expression_durations() {
        assert_eq!(parse_duration("(sqrt(100)+1e1)^2s").unwrap(), 400_000);
        assert_eq!(parse_duration("2^4h").unwrap(), 57_600_000);
        assert_eq!(parse_duration("10*6m").unwrap(), 3_600_000);
    }

    #[test]
    fn test_clamping() {
        assert_eq!(parse_duration("0s").unwrap(), MIN_DURATION_MS);
        assert_eq!(parse_duration("999d").unwrap(), MAX_DURATION_MS);
        assert_eq!(parse_duration("500d500d").unwrap(), MAX_DURATION_MS);
        assert_eq!(parse_duration("-5h").unwrap(), MIN_DURATION_MS);
    }

    #[test]
    fn test_max_duration_constant() {
        // 29 days, 23 hours, 59 minutes, 59 seconds
        assert_eq!(MAX_DURATION_MS, 2_591_999_000);
        assert_eq!(parse_duration("29d23h59m59s").unwrap(), MAX_DURATION_MS);
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse_duration(""), Err(DurationError::Empty));
        assert_eq!(
            parse_duration("100"),
            Err(DurationError::MissingUnit("100".to_string()))
        );
        assert_eq!(
            parse_duration("abc"),
            Err(DurationError::MissingUnit("abc".to_string()))
        );
        assert_eq!(
            parse_duration("h"),
            Err(DurationError::MissingUnit("h".to_string()))
        );
    }

    #[test]
    fn test_expression_errors_carry_cause() {
        match parse_duration("2+a2h") {
            Err(DurationError::Expression { source, .. }) => {
                assert_eq!(source, ExprError::InvalidCharacter('a'));
            }
            other => panic!("unexpected: {other:?}"),
        }
        match parse_duration("2+/h") {
            Err(DurationError::Expression { source, .. }) => {
                assert!(matches!(source, ExprError::Malformed(_)));
            }
            other => panic!("unexpected: {other:?}"),
        }
        match parse_duration("1/0h") {
            Err(DurationError::Expression { source, .. }) => {
                assert_eq!(source, ExprError::NonFinite);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_non_ascii_input_is_rejected_not_panicking() {
        assert!(parse_duration("十分").is_err());
        assert!(matches!(
            parse_duration("10分h"),
            Err(DurationError::Expression { .. })
        ));
    }

    #[test]
    fn test_counted_template() {
        assert_eq!(parse_counted("{t}^2h", 3).unwrap(), 9 * 3_600_000);
        assert_eq!(parse_counted("10min", 5).unwrap(), 600_000);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(5_400_000), "1h30m");
        assert_eq!(format_duration(86_400_000), "1d");
        assert_eq!(format_duration(90_061_000), "1d1h1m1s");
        assert_eq!(format_duration(500), "0s");
    }

    #[test]
    fn test_format_round_trip() {
        let ms = parse_duration("1d2h3m4s").unwrap();
        assert_eq!(format_duration(ms), "1d2h3m4s");
    }

    proptest! {
        #[test]
        fn parsed_durations_are_clamped(
            value in 0u64..10_000_000,
            unit in prop::sample::select(vec!["s", "m", "h", "d"]),
        ) {
            let ms = parse_duration(&format!("{value}{unit}")).unwrap();
            prop_assert!((MIN_DURATION_MS..=MAX_DURATION_MS).contains(&ms));
        }

        #[test]
        fn combined_durations_are_clamped(
            hours in 0u32..10_000,
            minutes in 0u32..10_000,
        ) {
            let ms = parse_duration(&format!("{hours}h{minutes}m")).unwrap();
            prop_assert!((MIN_DURATION_MS..=MAX_DURATION_MS).contains(&ms));
        }
    }
}
