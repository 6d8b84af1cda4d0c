//! Term escaping for SPARQL statements.

use crate::model::uri::is_absolute_uri;
use crate::model::vocab::xsd;
use crate::sparql::{SparqlError, SparqlResult};

/// Renders `value` as an `IRIREF` (`<...>`).
///
/// # Errors
/// - [`SparqlError::InvalidIri`] when `value` is not an absolute URI.
pub fn format_iri(value: &str) -> SparqlResult<String> {
    if !is_absolute_uri(value) {
        return Err(SparqlError::InvalidIri(value.to_string()));
    }
    Ok(format!("<{value}>"))
}

/// Renders a comma-separated IRI list, e.g. for `IN (...)` filters.
pub fn format_iri_list<S: AsRef<str>>(values: &[S]) -> SparqlResult<String> {
    let rendered = values
        .iter()
        .map(|value| format_iri(value.as_ref()))
        .collect::<SparqlResult<Vec<_>>>()?;
    Ok(rendered.join(", "))
}

/// Renders a string literal, typed when `datatype` is given.
///
/// `xsd:string` is rendered as a plain literal.
pub fn format_literal(lexical: &str, datatype: Option<&str>) -> SparqlResult<String> {
    let quoted = format!("\"{}\"", escape_string(lexical));
    match datatype {
        Some(datatype) if datatype != xsd::STRING => {
            Ok(format!("{quoted}^^{}", format_iri(datatype)?))
        }
        _ => Ok(quoted),
    }
}

/// Escapes string content for a double-quoted SPARQL literal.
pub fn escape_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{escape_string, format_iri, format_iri_list, format_literal};
    use crate::model::vocab::xsd;
    use crate::sparql::SparqlError;

    #[test]
    fn iri_rendering_rejects_injection() {
        assert_eq!(
            format_iri("https://example.org/a").unwrap(),
            "<https://example.org/a>"
        );
        let err = format_iri("https://example.org/a> } ; DROP ALL ; {").unwrap_err();
        assert!(matches!(err, SparqlError::InvalidIri(_)));
    }

    #[test]
    fn literal_rendering_escapes_quotes_and_newlines() {
        assert_eq!(escape_string("say \"hi\"\n"), "say \\\"hi\\\"\\n");
        assert_eq!(
            format_literal("a\"b", None).unwrap(),
            "\"a\\\"b\""
        );
        assert_eq!(
            format_literal("2", Some(xsd::INTEGER)).unwrap(),
            "\"2\"^^<http://www.w3.org/2001/XMLSchema#integer>"
        );
        assert_eq!(format_literal("x", Some(xsd::STRING)).unwrap(), "\"x\"");
    }

    #[test]
    fn iri_list_is_comma_separated() {
        let list = format_iri_list(&["https://example.org/a", "https://example.org/b"]).unwrap();
        assert_eq!(list, "<https://example.org/a>, <https://example.org/b>");
    }
}
