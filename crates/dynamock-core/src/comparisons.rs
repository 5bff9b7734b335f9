//! Expectations for asserting on stored row values in tests.
//!
//! An [`Expectation`] checks one decoded attribute value. Plain values compare
//! for equality; the other variants express looser constraints such as shell
//! globs, regular expressions or ISO datetime bounds.

use chrono::{DateTime, Datelike, Timelike, Utc};
use regex::Regex;

use crate::codec::{self, NativeValue};

/// Constraints for [`Expectation::Iso`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IsoExpectation {
    /// Earliest accepted instant.
    pub min: Option<DateTime<Utc>>,
    /// Latest accepted instant.
    pub max: Option<DateTime<Utc>>,
    /// Required year.
    pub year: Option<i32>,
    /// Required month.
    pub month: Option<u32>,
    /// Required day of month.
    pub day: Option<u32>,
    /// Required hour.
    pub hour: Option<u32>,
    /// Required minute.
    pub minute: Option<u32>,
    /// Required second.
    pub second: Option<u32>,
    /// Accept a missing value.
    pub nullable: bool,
}

/// A constraint on one attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum Expectation {
    /// The value equals this one.
    Equals(NativeValue),
    /// The string value matches a shell-style glob.
    Like {
        /// `*`, `?` and `[...]` glob pattern.
        pattern: String,
        /// Compare case-insensitively.
        ignore_case: bool,
        /// Accept a missing value.
        nullable: bool,
    },
    /// The string value matches a regular expression anchored at its start.
    Matches {
        /// The regular expression.
        regex: String,
        /// Named groups and the text each must capture.
        groups: Vec<(String, String)>,
        /// Accept a missing value.
        nullable: bool,
    },
    /// The value is missing or equals this one.
    Optional(NativeValue),
    /// Any value, including none.
    Anything,
    /// The value is one of these.
    In(Vec<NativeValue>),
    /// The value is none of these.
    NotIn(Vec<NativeValue>),
    /// The value is present.
    NotNull,
    /// The value is an ISO datetime within the given constraints.
    Iso(IsoExpectation),
    /// The value's kind (see [`NativeValue::kind`]) is one of these.
    KindOf(Vec<&'static str>),
}

impl Expectation {
    /// A case-sensitive glob that accepts a missing value.
    #[must_use]
    pub fn like(pattern: impl Into<String>) -> Self {
        Self::Like {
            pattern: pattern.into(),
            ignore_case: false,
            nullable: true,
        }
    }

    /// A regular expression that rejects a missing value.
    #[must_use]
    pub fn matches(regex: impl Into<String>) -> Self {
        Self::Matches {
            regex: regex.into(),
            groups: Vec::new(),
            nullable: false,
        }
    }

    /// Any ISO datetime.
    #[must_use]
    pub fn iso() -> Self {
        Self::Iso(IsoExpectation::default())
    }

    /// Check `value`, the decoded attribute `key` or `None` when absent.
    ///
    /// Returns a description of the mismatch on failure.
    pub fn check(&self, key: &str, value: Option<&NativeValue>) -> Result<(), String> {
        let value = value.filter(|v| !matches!(v, NativeValue::Null));
        match self {
            Self::Anything => Ok(()),
            Self::Equals(expected) => {
                if value == Some(expected) {
                    Ok(())
                } else {
                    Err(format!(
                        "Expected the row value for \"{key}\" to be {expected:?}, but instead it was {value:?}."
                    ))
                }
            }
            Self::Optional(expected) => match value {
                None => Ok(()),
                Some(v) if v == expected => Ok(()),
                Some(v) => Err(format!(
                    "Expected the value of \"{key}\" to match {expected:?} instead of {v:?}."
                )),
            },
            Self::NotNull => value
                .map(|_| ())
                .ok_or_else(|| format!("Expected the value of \"{key}\" not to be null.")),
            Self::In(allowed) => match value {
                Some(v) if allowed.contains(v) => Ok(()),
                _ => Err(format!(
                    "Expected the value of \"{key}\" to be one of {allowed:?}, found {value:?}."
                )),
            },
            Self::NotIn(excluded) => match value {
                Some(v) if excluded.contains(v) => Err(format!(
                    "Expected the value of \"{key}\" not to be any of {excluded:?}, but it was {v:?}."
                )),
                _ => Ok(()),
            },
            Self::KindOf(kinds) => {
                let kind = value.map_or("null", NativeValue::kind);
                if kinds.contains(&kind) {
                    Ok(())
                } else {
                    Err(format!(
                        "Expected the value of \"{key}\" to be one of the kinds {kinds:?}, but it was {kind}."
                    ))
                }
            }
            Self::Like {
                pattern,
                ignore_case,
                nullable,
            } => {
                let Some(value) = value else {
                    return nullable
                        .then_some(())
                        .ok_or_else(|| format!("Expected the value of \"{key}\" not to be null."));
                };
                let text = value.as_str().unwrap_or_default();
                let matched = glob_to_regex(pattern, *ignore_case)
                    .map_err(|e| format!("Invalid glob \"{pattern}\": {e}"))?
                    .is_match(text);
                if matched {
                    Ok(())
                } else {
                    Err(format!(
                        "Expected the value of \"{key}\" to match the specified comparison \"{pattern}\" != {value:?}."
                    ))
                }
            }
            Self::Matches {
                regex,
                groups,
                nullable,
            } => check_regex(key, value, regex, groups, *nullable),
            Self::Iso(iso) => check_iso(key, value, iso),
        }
    }

    /// Panic with a readable message when `value` does not satisfy the
    /// expectation.
    pub fn assert(&self, key: &str, value: Option<&NativeValue>) {
        if let Err(message) = self.check(key, value) {
            panic!("{message}");
        }
    }
}

impl From<NativeValue> for Expectation {
    fn from(value: NativeValue) -> Self {
        Self::Equals(value)
    }
}

impl From<&str> for Expectation {
    fn from(value: &str) -> Self {
        Self::Equals(value.into())
    }
}

impl From<i64> for Expectation {
    fn from(value: i64) -> Self {
        Self::Equals(value.into())
    }
}

fn check_regex(
    key: &str,
    value: Option<&NativeValue>,
    regex: &str,
    groups: &[(String, String)],
    nullable: bool,
) -> Result<(), String> {
    let prefix = format!("Expected the value of \"{key}\"");
    let Some(value) = value else {
        return nullable
            .then_some(())
            .ok_or_else(|| format!("{prefix} to match the pattern \"{regex}\"."));
    };
    let anchored = Regex::new(&format!("^(?:{regex})")).map_err(|e| format!("Invalid regex: {e}"))?;
    let text = value.as_str().unwrap_or_default();
    let captures = anchored
        .captures(text)
        .ok_or_else(|| format!("{prefix} to match the pattern \"{regex}\"."))?;

    for (group, expected) in groups {
        let actual = captures.name(group).map(|m| m.as_str());
        if actual != Some(expected.as_str()) {
            return Err(format!(
                "{prefix} to have the matching group \"{group}\" with the value \"{expected}\" and not {actual:?}."
            ));
        }
    }
    Ok(())
}

fn check_iso(key: &str, value: Option<&NativeValue>, iso: &IsoExpectation) -> Result<(), String> {
    let prefix = format!("Expected the ISO datetime value of the \"{key}\"");
    let dt = match value {
        None if iso.nullable => return Ok(()),
        None => return Err(format!("{prefix} not to be null.")),
        Some(NativeValue::Datetime(dt)) => *dt,
        Some(NativeValue::String(s)) => codec::parse_datetime(s)
            .map_err(|_| format!("{prefix} to be an ISO datetime string."))?,
        Some(_) => return Err(format!("{prefix} to be an ISO datetime string.")),
    };

    if iso.min.is_some_and(|min| dt < min) {
        return Err(format!("{prefix} to be a more recent value."));
    }
    if iso.max.is_some_and(|max| dt > max) {
        return Err(format!("{prefix} to be a less recent value."));
    }
    let fields = [
        ("year", iso.year.map(i64::from), i64::from(dt.year())),
        ("month", iso.month.map(i64::from), i64::from(dt.month())),
        ("day", iso.day.map(i64::from), i64::from(dt.day())),
        ("hour", iso.hour.map(i64::from), i64::from(dt.hour())),
        ("minute", iso.minute.map(i64::from), i64::from(dt.minute())),
        ("second", iso.second.map(i64::from), i64::from(dt.second())),
    ];
    for (field, expected, actual) in fields {
        if let Some(expected) = expected {
            if expected != actual {
                return Err(format!("{prefix} to be the {field} {expected}."));
            }
        }
    }
    Ok(())
}

/// Translate a shell-style glob into an anchored regular expression.
///
/// `*` matches any run of characters, `?` a single character and `[...]` a
/// character class, negated with a leading `!`. An unterminated `[` is
/// literal.
pub fn glob_to_regex(pattern: &str, ignore_case: bool) -> Result<Regex, regex::Error> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::from(if ignore_case { "(?si)^" } else { "(?s)^" });

    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            '[' => {
                let mut j = i + 1;
                if chars.get(j) == Some(&'!') {
                    j += 1;
                }
                if chars.get(j) == Some(&']') {
                    j += 1;
                }
                while j < chars.len() && chars[j] != ']' {
                    j += 1;
                }
                if j >= chars.len() {
                    out.push_str(r"\[");
                } else {
                    let mut body = &chars[i + 1..j];
                    out.push('[');
                    if body.first() == Some(&'!') {
                        out.push('^');
                        body = &body[1..];
                    } else if body.first() == Some(&'^') {
                        out.push('\\');
                    }
                    for c in body {
                        if matches!(c, '\\' | '[' | '&' | '~') {
                            out.push('\\');
                        }
                        out.push(*c);
                    }
                    out.push(']');
                    i = j;
                }
            }
            c => out.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
        i += 1;
    }

    out.push('$');
    Regex::new(&out)
}
