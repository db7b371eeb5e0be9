//! Payload-shape validators.
//!
//! Each payload kind composes the format validators over its fields. A
//! payload is valid only if every field check passes; there is no partial
//! success. Callers wanting per-field detail use the format validators
//! directly.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::validation::format::{
    is_valid_email, is_valid_phone, normalize_email, normalize_name, normalize_phone,
    IdentifierKind, IdentifierScheme,
};

/// The logical payload a route carries in its request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadKind {
    User,
    Customer,
    Event,
    Ticket,
}

impl PayloadKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Customer => "customer",
            Self::Event => "event",
            Self::Ticket => "ticket",
        }
    }
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Settings that affect how payload fields are checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PayloadRules {
    pub scheme: IdentifierScheme,
    pub strict_phone: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CustomerPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EventPayload {
    pub name: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TicketPayload {
    #[serde(alias = "eventId")]
    pub event_id: Option<String>,
    #[serde(alias = "userId")]
    pub user_id: Option<String>,
    #[serde(alias = "categoryId")]
    pub category_id: Option<String>,
}

/// A decoded request body, tagged by kind.
#[derive(Debug, Clone)]
pub enum Payload {
    User(UserPayload),
    Customer(CustomerPayload),
    Event(EventPayload),
    Ticket(TicketPayload),
}

impl Payload {
    /// Decode `value` as the payload `kind` declares.
    ///
    /// Fields of the wrong JSON type fail decoding; unknown fields are ignored.
    pub fn decode(kind: PayloadKind, value: &Value) -> Result<Self, serde_json::Error> {
        Ok(match kind {
            PayloadKind::User => Self::User(UserPayload::deserialize(value)?),
            PayloadKind::Customer => Self::Customer(CustomerPayload::deserialize(value)?),
            PayloadKind::Event => Self::Event(EventPayload::deserialize(value)?),
            PayloadKind::Ticket => Self::Ticket(TicketPayload::deserialize(value)?),
        })
    }

    pub fn kind(&self) -> PayloadKind {
        match self {
            Self::User(_) => PayloadKind::User,
            Self::Customer(_) => PayloadKind::Customer,
            Self::Event(_) => PayloadKind::Event,
            Self::Ticket(_) => PayloadKind::Ticket,
        }
    }

    pub fn is_valid(&self, rules: PayloadRules) -> bool {
        match self {
            Self::User(p) => is_valid_user_payload(
                field(&p.name),
                field(&p.email),
                field(&p.phone),
                rules.strict_phone,
            ),
            Self::Customer(p) => is_valid_customer_payload(
                field(&p.name),
                field(&p.email),
                field(&p.phone),
                rules.strict_phone,
            ),
            Self::Event(p) => is_valid_event_payload(field(&p.name), field(&p.location)),
            Self::Ticket(p) => is_valid_ticket_payload(
                rules.scheme,
                field(&p.event_id),
                field(&p.user_id),
                field(&p.category_id),
            ),
        }
    }
}

fn field(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

fn present(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Name required; email and phone optional but well-formed when present.
pub fn is_valid_user_payload(name: &str, email: &str, phone: &str, strict_phone: bool) -> bool {
    present(name) && is_valid_email(email, false) && is_valid_phone(phone, strict_phone)
}

/// Name and email required; phone optional but well-formed when present.
pub fn is_valid_customer_payload(
    name: &str,
    email: &str,
    phone: &str,
    strict_phone: bool,
) -> bool {
    present(name) && is_valid_email(email, true) && is_valid_phone(phone, strict_phone)
}

pub fn is_valid_event_payload(name: &str, location: &str) -> bool {
    present(name) && present(location)
}

/// All three identifiers required and well-formed under `scheme`.
pub fn is_valid_ticket_payload(
    scheme: IdentifierScheme,
    event_id: &str,
    user_id: &str,
    category_id: &str,
) -> bool {
    scheme.is_valid(IdentifierKind::Event, event_id)
        && scheme.is_valid(IdentifierKind::User, user_id)
        && scheme.is_valid(IdentifierKind::Category, category_id)
}

/// What a valid payload of `kind` looks like, for rejection messages.
pub fn expected_payload(kind: PayloadKind, scheme: IdentifierScheme) -> String {
    match kind {
        PayloadKind::User => {
            "name is required; email and phone must be well-formed when present".to_string()
        }
        PayloadKind::Customer => {
            "name and a well-formed email are required; phone must be well-formed when present"
                .to_string()
        }
        PayloadKind::Event => "name and location are required".to_string(),
        PayloadKind::Ticket => match scheme {
            IdentifierScheme::Uuid => {
                "event_id, user_id and category_id are required and must each be a valid UUID"
                    .to_string()
            }
            IdentifierScheme::PrefixedCode => "event_id, user_id and category_id are required \
                 and must be valid EVT###, USR### and CAT### codes"
                .to_string(),
        },
    }
}

/// Normalize contact fields of a request body in place before forwarding.
///
/// Emails are lowercased and trimmed, phones reduced to digits. Person names
/// are title-cased only when `names` is set.
pub fn normalize_payload(kind: PayloadKind, body: &mut Value, names: bool) {
    if !matches!(kind, PayloadKind::User | PayloadKind::Customer) {
        return;
    }
    let Some(object) = body.as_object_mut() else {
        return;
    };

    if let Some(Value::String(email)) = object.get_mut("email") {
        *email = normalize_email(email);
    }
    if let Some(Value::String(phone)) = object.get_mut("phone") {
        *phone = normalize_phone(phone);
    }
    if names {
        if let Some(Value::String(name)) = object.get_mut("name") {
            *name = normalize_name(name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const EVENT: &str = "1c248f4a-f1a8-4556-9f1a-1b6a21bfadb7";
    const USER: &str = "9b2e6c1d-3f4a-4b5c-8d6e-7f8091a2b3c4";
    const CATEGORY: &str = "0a1b2c3d-4e5f-4a6b-9c7d-8e9f0a1b2c3d";

    #[test]
    fn test_user_payload() {
        assert!(is_valid_user_payload("Francisco", "fran@osmi.com", "", false));
        assert!(is_valid_user_payload("Francisco", "", "", false));
        assert!(!is_valid_user_payload("Francisco", "invalid-email", "", false));
        assert!(!is_valid_user_payload("", "fran@osmi.com", "", false));
        assert!(!is_valid_user_payload("   ", "", "", false));
        assert!(!is_valid_user_payload("Francisco", "", "12", false));
    }

    #[test]
    fn test_customer_payload_requires_email() {
        assert!(is_valid_customer_payload("Ana", "ana@osmi.com", "", true));
        assert!(!is_valid_customer_payload("Ana", "", "", true));
        assert!(!is_valid_customer_payload("", "ana@osmi.com", "", true));
        assert!(!is_valid_customer_payload("Ana", "ana@osmi.com", "555-1234", true));
    }

    #[test]
    fn test_event_payload() {
        assert!(is_valid_event_payload("Concert", "Arena"));
        assert!(!is_valid_event_payload("Concert", "  "));
        assert!(!is_valid_event_payload("", "Arena"));
    }

    #[test]
    fn test_ticket_payload() {
        let scheme = IdentifierScheme::Uuid;
        assert!(is_valid_ticket_payload(scheme, EVENT, USER, CATEGORY));
        assert!(!is_valid_ticket_payload(scheme, EVENT, USER, ""));
        assert!(!is_valid_ticket_payload(scheme, "EVT123", USER, CATEGORY));

        let codes = IdentifierScheme::PrefixedCode;
        assert!(is_valid_ticket_payload(codes, "EVT123", "USR001", "CAT042"));
        assert!(!is_valid_ticket_payload(codes, "EVT123", "USR001", "EVT042"));
    }

    #[test]
    fn test_decode_accepts_camel_case_ids() {
        let body = json!({ "eventId": EVENT, "userId": USER, "categoryId": CATEGORY });
        let payload = Payload::decode(PayloadKind::Ticket, &body).unwrap();
        assert_eq!(payload.kind(), PayloadKind::Ticket);
        assert!(payload.is_valid(PayloadRules::default()));
    }

    #[test]
    fn test_decode_missing_fields_is_invalid() {
        let payload = Payload::decode(PayloadKind::Ticket, &json!({ "event_id": EVENT })).unwrap();
        assert!(!payload.is_valid(PayloadRules::default()));

        let payload = Payload::decode(PayloadKind::Customer, &json!({ "name": "Ana" })).unwrap();
        assert!(!payload.is_valid(PayloadRules::default()));
    }

    #[test]
    fn test_decode_rejects_wrong_types() {
        assert!(Payload::decode(PayloadKind::Event, &json!({ "name": 42 })).is_err());
        assert!(Payload::decode(PayloadKind::Event, &json!("name")).is_err());
    }

    #[test]
    fn test_null_fields_treated_as_absent() {
        let body = json!({ "name": "Ana", "email": null });
        let payload = Payload::decode(PayloadKind::User, &body).unwrap();
        assert!(payload.is_valid(PayloadRules::default()));
    }

    #[test]
    fn test_normalize_payload() {
        let mut body = json!({
            "name": "ana  MARIA",
            "email": " Ana@Example.COM ",
            "phone": "+1 (555) 123-4567",
            "note": "untouched"
        });
        normalize_payload(PayloadKind::Customer, &mut body, false);
        assert_eq!(body["email"], "ana@example.com");
        assert_eq!(body["phone"], "+15551234567");
        assert_eq!(body["name"], "ana  MARIA");
        assert_eq!(body["note"], "untouched");

        normalize_payload(PayloadKind::Customer, &mut body, true);
        assert_eq!(body["name"], "Ana Maria");
    }

    #[test]
    fn test_normalize_skips_non_contact_payloads() {
        let mut body = json!({ "name": "rock night", "email": "X@Y.ORG" });
        normalize_payload(PayloadKind::Event, &mut body, true);
        assert_eq!(body["email"], "X@Y.ORG");
    }

    #[test]
    fn test_expected_payload_mentions_shape() {
        let message = expected_payload(PayloadKind::Ticket, IdentifierScheme::Uuid);
        assert!(message.contains("a valid UUID"));
        let message = expected_payload(PayloadKind::Ticket, IdentifierScheme::PrefixedCode);
        assert!(message.contains("EVT###, USR### and CAT###"));
    }
}
