//! Validation gate.
//!
//! # Responsibilities
//! - Find identifiers embedded in the request path and query string
//! - Apply the matching format validator to each
//! - Check the request body against the payload kind its route declares
//!
//! # Design Decisions
//! - Recognized segments are an explicit rule table, auditable in isolation
//! - First failure wins: exactly one reason is reported
//! - Empty identifier segments count as absent, not invalid
//! - Pure: no I/O and no logging; the HTTP layer decides what to log

use std::collections::HashMap;

use serde_json::Value;

use crate::validation::format::{is_valid_email, IdentifierKind, IdentifierScheme};
use crate::validation::payload::{expected_payload, Payload, PayloadKind, PayloadRules};

/// Query parameters, last value wins on duplicate keys.
pub type QueryParams = HashMap<String, String>;

/// An identifier that follows `prefix` and runs until `terminator` or the
/// end of the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathRule {
    pub prefix: &'static str,
    pub terminator: char,
    pub kind: IdentifierKind,
}

impl PathRule {
    /// Extract the identifier token this rule recognizes in `path`.
    ///
    /// Only the first occurrence of the prefix is considered.
    pub fn extract<'a>(&self, path: &'a str) -> Option<&'a str> {
        let start = path.find(self.prefix)? + self.prefix.len();
        let token = path.get(start..)?.split(self.terminator).next()?;
        (!token.is_empty()).then_some(token)
    }
}

pub const PATH_RULES: &[PathRule] = &[
    PathRule {
        prefix: "/events/",
        terminator: '/',
        kind: IdentifierKind::Event,
    },
    PathRule {
        prefix: "/customers/",
        terminator: '/',
        kind: IdentifierKind::Customer,
    },
    PathRule {
        prefix: "/tickets/",
        terminator: '/',
        kind: IdentifierKind::Ticket,
    },
    PathRule {
        prefix: "/users/",
        terminator: '/',
        kind: IdentifierKind::User,
    },
];

/// What a recognized query key must contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryCheck {
    Identifier(IdentifierKind),
    Email,
}

pub const QUERY_RULES: &[(&str, QueryCheck)] = &[
    ("user_id", QueryCheck::Identifier(IdentifierKind::User)),
    ("customer_id", QueryCheck::Identifier(IdentifierKind::Customer)),
    ("email", QueryCheck::Email),
];

/// Why the gate refused a request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct GateRejection {
    /// The offending field, e.g. `event_id`, `email`, `payload`.
    pub field: String,
    /// Client-facing reason.
    pub message: String,
}

impl GateRejection {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Rejects malformed identifiers and payloads before any backend call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationGate {
    rules: PayloadRules,
}

impl ValidationGate {
    pub fn new(scheme: IdentifierScheme, strict_phone: bool) -> Self {
        Self {
            rules: PayloadRules {
                scheme,
                strict_phone,
            },
        }
    }

    pub fn scheme(&self) -> IdentifierScheme {
        self.rules.scheme
    }

    pub fn check_path(&self, path: &str) -> Result<(), GateRejection> {
        for rule in PATH_RULES {
            let Some(token) = rule.extract(path) else {
                continue;
            };
            if !self.rules.scheme.is_valid(rule.kind, token) {
                return Err(GateRejection::new(
                    format!("{}_id", rule.kind.label()),
                    format!(
                        "invalid {} ID format: must be {}",
                        rule.kind.label(),
                        self.rules.scheme.expected_shape(rule.kind)
                    ),
                ));
            }
        }
        Ok(())
    }

    pub fn check_query(&self, query: &QueryParams) -> Result<(), GateRejection> {
        for (key, check) in QUERY_RULES {
            let Some(value) = query.get(*key).filter(|v| !v.is_empty()) else {
                continue;
            };
            match check {
                QueryCheck::Identifier(kind) => {
                    if !self.rules.scheme.is_valid(*kind, value) {
                        return Err(GateRejection::new(
                            *key,
                            format!(
                                "invalid {key} in query: must be {}",
                                self.rules.scheme.expected_shape(*kind)
                            ),
                        ));
                    }
                }
                QueryCheck::Email => {
                    if !is_valid_email(value, false) {
                        return Err(GateRejection::new(*key, "invalid email format in query"));
                    }
                }
            }
        }
        Ok(())
    }

    pub fn check_payload(&self, kind: PayloadKind, body: &Value) -> Result<(), GateRejection> {
        let field = format!("{}_payload", kind.label());
        if !body.is_object() {
            return Err(GateRejection::new(
                field,
                format!("invalid {kind} payload: request body must be a JSON object"),
            ));
        }

        let valid = Payload::decode(kind, body)
            .map(|payload| payload.is_valid(self.rules))
            .unwrap_or(false);
        if valid {
            Ok(())
        } else {
            Err(GateRejection::new(
                field,
                format!(
                    "invalid {kind} payload: {}",
                    expected_payload(kind, self.rules.scheme)
                ),
            ))
        }
    }
}

/// Parse a raw query string. Duplicate keys keep their last value.
pub fn parse_query(raw: Option<&str>) -> QueryParams {
    raw.map(|q| {
        url::form_urlencoded::parse(q.as_bytes())
            .into_owned()
            .collect()
    })
    .unwrap_or_default()
}
