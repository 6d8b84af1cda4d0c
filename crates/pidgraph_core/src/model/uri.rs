//! Absolute URI validation shared by the model, builders and facade.
//!
//! # Invariants
//! - A URI is accepted only with a scheme and a non-empty remainder.
//! - `http`/`https` URIs additionally require an authority (`//host`).
//! - Characters that cannot appear inside a SPARQL `IRIREF` are rejected.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static ABSOLUTE_URI_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^([A-Za-z][A-Za-z0-9+.\-]*):([^\s<>"{}|\\^`\x00-\x20]+)$"#)
        .expect("valid absolute uri regex")
});

/// Error returned when a value is not a well-formed absolute URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidUriError {
    pub value: String,
}

impl Display for InvalidUriError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "not a well-formed absolute uri: `{}`", self.value)
    }
}

impl Error for InvalidUriError {}

/// Returns whether `value` is a well-formed absolute URI.
pub fn is_absolute_uri(value: &str) -> bool {
    let Some(captures) = ABSOLUTE_URI_RE.captures(value) else {
        return false;
    };

    let scheme = captures[1].to_ascii_lowercase();
    if scheme == "http" || scheme == "https" {
        return captures[2]
            .strip_prefix("//")
            .and_then(|rest| rest.split(['/', '?', '#']).next())
            .is_some_and(|authority| !authority.is_empty());
    }

    true
}

/// Validates `value` as an absolute URI.
///
/// # Errors
/// - Returns [`InvalidUriError`] carrying the rejected input.
pub fn validate_absolute_uri(value: &str) -> Result<(), InvalidUriError> {
    if is_absolute_uri(value) {
        Ok(())
    } else {
        Err(InvalidUriError {
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{is_absolute_uri, validate_absolute_uri};

    #[test]
    fn accepts_common_absolute_uris() {
        assert!(is_absolute_uri("https://example.org/r1"));
        assert!(is_absolute_uri("http://example.org"));
        assert!(is_absolute_uri("urn:uuid:6b1e2c1a-0000-4000-8000-000000000001"));
        assert!(is_absolute_uri("https://pid.example.org/kos/19050#hasLabel"));
    }

    #[test]
    fn rejects_relative_blank_and_malformed_values() {
        assert!(!is_absolute_uri(""));
        assert!(!is_absolute_uri("   "));
        assert!(!is_absolute_uri("example.org/r1"));
        assert!(!is_absolute_uri("/relative/path"));
        assert!(!is_absolute_uri("https:no-authority"));
        assert!(!is_absolute_uri("https:///missing-host"));
        assert!(!is_absolute_uri("https://example.org/with space"));
        assert!(!is_absolute_uri("https://example.org/<injected>"));
    }

    #[test]
    fn validate_reports_rejected_value() {
        let err = validate_absolute_uri("not a uri").unwrap_err();
        assert_eq!(err.value, "not a uri");
        assert!(err.to_string().contains("not a uri"));
    }
}
