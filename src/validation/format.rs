//! Format validators and normalizers.
//!
//! # Responsibilities
//! - Identifier shape checks (UUID or prefixed code, per deployment)
//! - Email and phone shape checks
//! - Normalization of contact fields before forwarding
//!
//! # Design Decisions
//! - Patterns compiled once into process-wide statics, never mutated
//! - Surrounding whitespace is trimmed, never a reason to reject
//! - Pure functions: safe to call from any number of requests at once

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static UUID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
        .expect("Invalid regex")
});

static PREFIXED_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z]{3})[0-9]{3}$").expect("Invalid regex"));

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@(?:[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?\.)+[A-Za-z]{2,}$")
        .expect("Invalid regex")
});

static E164_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+[1-9][0-9]{7,14}$").expect("Invalid regex"));

static LENIENT_PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9 ()\-]+$").expect("Invalid regex"));

/// Minimum number of digits a non-strict phone number must carry.
const LENIENT_PHONE_MIN_DIGITS: usize = 10;

/// The entity an identifier names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierKind {
    Event,
    User,
    Customer,
    Category,
    Ticket,
    Generic,
}

impl IdentifierKind {
    /// Field label used in rejection messages.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Event => "event",
            Self::User => "user",
            Self::Customer => "customer",
            Self::Category => "category",
            Self::Ticket => "ticket",
            Self::Generic => "resource",
        }
    }

    /// Three-letter prefix under the [`IdentifierScheme::PrefixedCode`] scheme.
    /// `None` for the generic kind, which accepts any uppercase prefix.
    pub const fn code_prefix(self) -> Option<&'static str> {
        match self {
            Self::Event => Some("EVT"),
            Self::User => Some("USR"),
            Self::Customer => Some("CUS"),
            Self::Category => Some("CAT"),
            Self::Ticket => Some("TKT"),
            Self::Generic => None,
        }
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Canonical identifier shape for a deployment.
///
/// Exactly one scheme is active at a time; the two shapes are never accepted
/// side by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierScheme {
    /// 8-4-4-4-12 hexadecimal groups, case-insensitive.
    #[default]
    Uuid,
    /// Three uppercase letters followed by exactly three digits, case-sensitive.
    PrefixedCode,
}

impl IdentifierScheme {
    /// Returns true if `value` is a well-formed identifier of `kind`.
    pub fn is_valid(self, kind: IdentifierKind, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() {
            return false;
        }

        match self {
            Self::Uuid => UUID_RE.is_match(&value.to_ascii_lowercase()),
            Self::PrefixedCode => match PREFIXED_CODE_RE.captures(value) {
                Some(caps) => match kind.code_prefix() {
                    Some(prefix) => caps.get(1).is_some_and(|m| m.as_str() == prefix),
                    None => true,
                },
                None => false,
            },
        }
    }

    /// Human-readable description of the expected shape for `kind`.
    pub fn expected_shape(self, kind: IdentifierKind) -> String {
        match self {
            Self::Uuid => "a valid UUID".to_string(),
            Self::PrefixedCode => match kind.code_prefix() {
                Some(prefix) => format!("a valid {prefix}### code"),
                None => "a valid AAA### code".to_string(),
            },
        }
    }
}

/// Validate an identifier against the default (UUID) scheme.
pub fn is_valid_identifier(kind: IdentifierKind, value: &str) -> bool {
    IdentifierScheme::default().is_valid(kind, value)
}

/// Validate an email address.
///
/// An empty value is valid only when the field is optional.
pub fn is_valid_email(value: &str, required: bool) -> bool {
    let value = value.trim();
    if value.is_empty() {
        return !required;
    }
    EMAIL_RE.is_match(value)
}

/// Validate a phone number. Phone is always optional, so empty is valid.
///
/// `strict` demands E.164 (`+` then 8-15 digits, no leading zero). Otherwise
/// digits, spaces, hyphens and parentheses are accepted as long as at least
/// ten digits are present.
pub fn is_valid_phone(value: &str, strict: bool) -> bool {
    let value = value.trim();
    if value.is_empty() {
        return true;
    }

    if strict {
        return E164_RE.is_match(value);
    }

    LENIENT_PHONE_RE.is_match(value)
        && value.chars().filter(char::is_ascii_digit).count() >= LENIENT_PHONE_MIN_DIGITS
}

/// Trim and lowercase an email address.
pub fn normalize_email(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Strip everything but digits, keeping a leading `+` if the input had one.
pub fn normalize_phone(value: &str) -> String {
    let value = value.trim();
    let mut normalized = String::with_capacity(value.len());
    if value.starts_with('+') {
        normalized.push('+');
    }
    normalized.extend(value.chars().filter(char::is_ascii_digit));
    normalized
}

/// Trim and title-case each whitespace-separated token.
///
/// Embedded capitals are not preserved: "mC donald" becomes "Mc Donald".
pub fn normalize_name(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
