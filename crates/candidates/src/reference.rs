use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@(?:[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?\.)+[A-Za-z]{2,}$")
        .expect("email regex")
});

static PHONE_SHAPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9\s().-]*[0-9][0-9\s().-]*$").expect("phone regex"));

const MIN_PHONE_DIGITS: usize = 8;
const MAX_PHONE_DIGITS: usize = 15;
const NATIONAL_NUMBER_DIGITS: usize = 10;

/// A normalized, machine-resolvable contact token.
///
/// This is what gets handed to the assignment workflow on commit. It is kept
/// apart from any display text a candidate carries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ContactReference {
    /// Lowercased email address
    Email(String),
    /// E.164 phone number (`+` followed by digits)
    Phone(String),
}

impl ContactReference {
    /// Parse raw user input or a stored login into a normalized reference.
    ///
    /// Emails are trimmed and lowercased. Phone numbers may carry spaces,
    /// dashes, dots and parentheses; a bare national number gets
    /// `default_country_code` prepended.
    #[must_use]
    pub fn parse(raw: &str, default_country_code: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        if trimmed.contains('@') {
            return Self::parse_email(trimmed);
        }

        Self::parse_phone(trimmed, default_country_code)
    }

    fn parse_email(trimmed: &str) -> Option<Self> {
        if !EMAIL_RE.is_match(trimmed) {
            return None;
        }
        Some(Self::Email(trimmed.to_lowercase()))
    }

    fn parse_phone(trimmed: &str, default_country_code: &str) -> Option<Self> {
        if !PHONE_SHAPE_RE.is_match(trimmed) {
            return None;
        }

        let explicit_country = trimmed.starts_with('+');
        let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();

        let normalized = if explicit_country {
            digits
        } else if digits.len() == NATIONAL_NUMBER_DIGITS {
            format!("{default_country_code}{digits}")
        } else {
            digits
        };

        if !(MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&normalized.len()) {
            return None;
        }
        // A national number too short to carry a country code is not dialable.
        if !explicit_country && normalized.len() < NATIONAL_NUMBER_DIGITS {
            return None;
        }

        Some(Self::Phone(format!("+{normalized}")))
    }

    /// The normalized token
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Email(value) | Self::Phone(value) => value,
        }
    }

    #[must_use]
    pub const fn is_phone(&self) -> bool {
        matches!(self, Self::Phone(_))
    }
}

impl fmt::Display for ContactReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input made only of digits, `+` and phone separators.
///
/// Used to tell "a malformed phone number" apart from "a name that matched
/// nothing" when choosing a status message.
#[must_use]
pub fn looks_like_phone(raw: &str) -> bool {
    PHONE_SHAPE_RE.is_match(raw.trim())
}

/// Input that was presumably meant as an email address.
#[must_use]
pub fn looks_like_email(raw: &str) -> bool {
    raw.trim().contains('@')
}
