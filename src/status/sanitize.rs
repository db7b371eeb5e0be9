//! Strip internal envelopes from backend error descriptions.
//!
//! Backend errors may reach the gateway rendered as
//! `rpc error: code = InvalidArgument desc = "name is required"`. Only the
//! description proper is ever shown to clients.

const RPC_ERROR_PREFIX: &str = "rpc error:";
const CODE_MARKER: &str = "code =";
const DESC_MARKER: &str = "desc =";

/// Remove protocol envelope markers and surrounding quotes.
pub fn sanitize_description(raw: &str) -> String {
    let mut text = raw.trim();
    text = text.strip_prefix(RPC_ERROR_PREFIX).unwrap_or(text).trim_start();

    if let Some(idx) = text.find(DESC_MARKER) {
        text = text.get(idx + DESC_MARKER.len()..).unwrap_or("");
    } else if text.starts_with(CODE_MARKER) {
        // code only, no description
        text = "";
    }

    let text = text.trim();
    let text = text.strip_prefix('"').unwrap_or(text);
    let text = text.strip_suffix('"').unwrap_or(text);
    text.trim().to_string()
}

/// Pull the status name out of a `code = <Name>` marker, if there is one.
pub fn extract_code_name(raw: &str) -> Option<&str> {
    let idx = raw.find(CODE_MARKER)?;
    raw.get(idx + CODE_MARKER.len()..)?
        .split_whitespace()
        .next()
        .filter(|name| !name.is_empty())
}
