//! Parameterized SPARQL statements.
//!
//! Templates carry `@name` placeholders. Values are escaped when bound and
//! substituted in a single pass, so bound text is never re-scanned for
//! placeholders. Templates must not contain language tags (`"x"@en`).

use crate::sparql::escape::{format_iri, format_iri_list, format_literal};
use crate::sparql::{SparqlError, SparqlResult};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

static PARAMETER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@([A-Za-z_][A-Za-z0-9_]*)").expect("valid parameter regex"));

/// SPARQL template with escaped parameter bindings.
#[derive(Debug, Clone)]
pub struct ParameterizedStatement {
    template: String,
    bindings: BTreeMap<String, String>,
}

impl ParameterizedStatement {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            bindings: BTreeMap::new(),
        }
    }

    /// Binds `@name` to an IRI.
    pub fn set_uri(&mut self, name: &str, uri: &str) -> SparqlResult<&mut Self> {
        let rendered = format_iri(uri)?;
        Ok(self.bind(name, rendered))
    }

    /// Binds `@name` to a comma-separated IRI list.
    pub fn set_uri_list<S: AsRef<str>>(
        &mut self,
        name: &str,
        uris: &[S],
    ) -> SparqlResult<&mut Self> {
        let rendered = format_iri_list(uris)?;
        Ok(self.bind(name, rendered))
    }

    /// Binds `@name` to a plain string literal.
    pub fn set_literal(&mut self, name: &str, text: &str) -> &mut Self {
        // Plain literals have no IRI component and cannot fail.
        let rendered = format_literal(text, None).unwrap_or_default();
        self.bind(name, rendered)
    }

    /// Binds `@name` to an unsigned integer token (LIMIT/OFFSET).
    pub fn set_integer(&mut self, name: &str, value: u64) -> &mut Self {
        self.bind(name, value.to_string())
    }

    /// Binds `@name` to statement text that was rendered from escaped terms.
    pub(crate) fn set_fragment(&mut self, name: &str, fragment: impl Into<String>) -> &mut Self {
        self.bind(name, fragment.into())
    }

    /// Substitutes all placeholders.
    ///
    /// # Errors
    /// - [`SparqlError::UnboundParameter`] for the first placeholder without a value.
    pub fn render(&self) -> SparqlResult<String> {
        let mut out = String::with_capacity(self.template.len());
        let mut last = 0;
        for captures in PARAMETER_RE.captures_iter(&self.template) {
            let Some(whole) = captures.get(0) else {
                continue;
            };
            let name = &captures[1];
            let value = self
                .bindings
                .get(name)
                .ok_or_else(|| SparqlError::UnboundParameter(name.to_string()))?;
            out.push_str(&self.template[last..whole.start()]);
            out.push_str(value);
            last = whole.end();
        }
        out.push_str(&self.template[last..]);
        Ok(out)
    }

    fn bind(&mut self, name: &str, rendered: String) -> &mut Self {
        self.bindings.insert(name.to_string(), rendered);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::ParameterizedStatement;
    use crate::sparql::SparqlError;

    #[test]
    fn substitutes_escaped_values() {
        let mut statement =
            ParameterizedStatement::new("SELECT * WHERE { @subject ?p @label }");
        statement
            .set_uri("subject", "https://example.org/r1")
            .unwrap()
            .set_literal("label", "@subject \" }");

        assert_eq!(
            statement.render().unwrap(),
            "SELECT * WHERE { <https://example.org/r1> ?p \"@subject \\\" }\" }"
        );
    }

    #[test]
    fn unbound_parameter_is_an_error() {
        let statement = ParameterizedStatement::new("ASK { @subject ?p ?o }");
        assert_eq!(
            statement.render().unwrap_err(),
            SparqlError::UnboundParameter("subject".to_string())
        );
    }

    #[test]
    fn invalid_iri_is_rejected_at_bind_time() {
        let mut statement = ParameterizedStatement::new("ASK { @subject ?p ?o }");
        assert!(statement.set_uri("subject", "relative/path").is_err());
    }
}
