//! Route matching logic.
//!
//! # Responsibilities
//! - Match the HTTP method (exact)
//! - Match path templates with `{param}` segments (case-sensitive)
//! - Capture parameter values for the RPC message
//!
//! # Design Decisions
//! - Path matching is case-sensitive, segment by segment
//! - A parameter segment matches exactly one non-empty segment
//! - Captured values are forwarded as-is, without percent-decoding
//! - No regex to guarantee O(n) matching

use axum::http::Method;

/// One segment of a compiled path template.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A compiled path template such as `/v1/events/{public_id}/categories`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    template: String,
    segments: Vec<Segment>,
}

impl PathTemplate {
    /// Compile a template. Segments wrapped in braces become parameters.
    pub fn new(template: impl Into<String>) -> Self {
        let template = template.into();
        let segments = split_segments(&template)
            .map(|segment| {
                match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                    Some(name) if !name.is_empty() => Segment::Param(name.to_string()),
                    _ => Segment::Literal(segment.to_string()),
                }
            })
            .collect();

        Self { template, segments }
    }

    /// The template as written in the configuration.
    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Number of literal segments; used to prefer specific routes.
    pub fn literal_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Literal(_)))
            .count()
    }

    /// Parameter names in declaration order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Match `path`, returning captured `(name, value)` pairs on success.
    pub fn captures(&self, path: &str) -> Option<Vec<(String, String)>> {
        let mut params = Vec::new();
        let mut parts = split_segments(path);

        for segment in &self.segments {
            let part = parts.next()?;
            match segment {
                Segment::Literal(literal) if literal == part => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => params.push((name.clone(), part.to_string())),
            }
        }

        if parts.next().is_some() {
            return None;
        }
        Some(params)
    }
}

/// Path segments, ignoring leading, trailing and repeated slashes.
fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Matches the HTTP method of a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodMatcher {
    method: Method,
}

impl MethodMatcher {
    /// Create a matcher from a configured method name (case-insensitive).
    pub fn parse(method: &str) -> Option<Self> {
        Method::from_bytes(method.to_ascii_uppercase().as_bytes())
            .ok()
            .map(|method| Self { method })
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn matches(&self, method: &Method) -> bool {
        self.method == *method
    }
}
