//! Entity and value model.
//!
//! # Responsibility
//! - Represent one subject and its multi-valued properties.
//! - Tag every property value as literal, reference or nested entity.
//!
//! # Invariants
//! - Property order and per-property value order follow insertion order.
//! - `Entity::validate` must succeed before the entity is written.

use crate::model::uri::{validate_absolute_uri, InvalidUriError};
use crate::model::vocab::{rdf, xsd};
use chrono::{DateTime, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Literal value with its lexical form and optional datatype IRI.
///
/// `datatype == None` means a plain (untyped) literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Literal {
    pub lexical: String,
    pub datatype: Option<String>,
}

impl Literal {
    /// Creates an untyped literal.
    pub fn plain(lexical: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: None,
        }
    }

    /// Creates a literal with an explicit datatype IRI.
    pub fn typed(lexical: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: Some(datatype.into()),
        }
    }

    /// Creates an `xsd:dateTime` literal in canonical round-trippable form.
    pub fn date_time<Tz: TimeZone>(value: &DateTime<Tz>) -> Self {
        Self::typed(canonical_date_time(value), xsd::DATE_TIME)
    }

    /// Returns whether the lexical form is empty after trimming.
    pub fn is_blank(&self) -> bool {
        self.lexical.trim().is_empty()
    }
}

/// Renders a timestamp in the canonical `xsd:dateTime` form.
///
/// UTC with a `Z` suffix; the fraction keeps only significant digits and is
/// omitted when zero.
pub fn canonical_date_time<Tz: TimeZone>(value: &DateTime<Tz>) -> String {
    let utc = value.with_timezone(&Utc);
    let mut out = utc.format("%Y-%m-%dT%H:%M:%S").to_string();
    let nanos = utc.nanosecond() % 1_000_000_000;
    if nanos > 0 {
        let fraction = format!("{nanos:09}");
        out.push('.');
        out.push_str(fraction.trim_end_matches('0'));
    }
    out.push('Z');
    out
}

/// One property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Value {
    Literal(Literal),
    /// Plain resource reference by absolute URI.
    Reference(String),
    /// Sub-entity stored under its own subject.
    Nested(Box<Entity>),
}

impl Value {
    pub fn literal(lexical: impl Into<String>) -> Self {
        Self::Literal(Literal::plain(lexical))
    }

    pub fn reference(uri: impl Into<String>) -> Self {
        Self::Reference(uri.into())
    }

    pub fn nested(entity: Entity) -> Self {
        Self::Nested(Box::new(entity))
    }

    /// Text form used for business-key joins and URI checks.
    ///
    /// Nested entities yield their id.
    pub fn as_text(&self) -> &str {
        match self {
            Self::Literal(literal) => literal.lexical.as_str(),
            Self::Reference(uri) => uri.as_str(),
            Self::Nested(entity) => entity.id.as_str(),
        }
    }

    pub fn as_nested(&self) -> Option<&Entity> {
        match self {
            Self::Nested(entity) => Some(entity),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::literal(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::literal(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Literal(Literal::typed(value.to_string(), xsd::INTEGER))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        let lexical = if value.is_nan() {
            "NaN".to_string()
        } else if value == f64::INFINITY {
            "INF".to_string()
        } else if value == f64::NEG_INFINITY {
            "-INF".to_string()
        } else {
            value.to_string()
        };
        Self::Literal(Literal::typed(lexical, xsd::DOUBLE))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Literal(Literal::typed(value.to_string(), xsd::BOOLEAN))
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Value {
    fn from(value: DateTime<Tz>) -> Self {
        Self::Literal(Literal::date_time(&value))
    }
}

impl From<Entity> for Value {
    fn from(value: Entity) -> Self {
        Self::nested(value)
    }
}

/// Subject with ordered, multi-valued properties.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    pub properties: Vec<(String, Vec<Value>)>,
}

impl Entity {
    /// Creates an entity without properties.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            properties: Vec::new(),
        }
    }

    /// Creates an entity whose id is `prefix` followed by a random UUID.
    ///
    /// Used for nested entities that have no business identity of their own.
    pub fn with_generated_id(prefix: &str) -> Self {
        Self::new(format!("{prefix}{}", Uuid::new_v4()))
    }

    /// Appends `value` to `predicate`, creating the property on first use.
    pub fn add(&mut self, predicate: &str, value: impl Into<Value>) -> &mut Self {
        let value = value.into();
        match self.properties.iter_mut().find(|(key, _)| key == predicate) {
            Some((_, values)) => values.push(value),
            None => self.properties.push((predicate.to_string(), vec![value])),
        }
        self
    }

    /// Builder-style variant of [`Entity::add`].
    pub fn with(mut self, predicate: &str, value: impl Into<Value>) -> Self {
        self.add(predicate, value);
        self
    }

    /// Replaces all values of `predicate`.
    pub fn set(&mut self, predicate: &str, values: Vec<Value>) {
        match self.properties.iter_mut().find(|(key, _)| key == predicate) {
            Some((_, existing)) => *existing = values,
            None => self.properties.push((predicate.to_string(), values)),
        }
    }

    /// Returns all values of `predicate`, empty when absent.
    pub fn values(&self, predicate: &str) -> &[Value] {
        self.properties
            .iter()
            .find(|(key, _)| key == predicate)
            .map_or(&[], |(_, values)| values.as_slice())
    }

    pub fn first_value(&self, predicate: &str) -> Option<&Value> {
        self.values(predicate).first()
    }

    /// First `rdf:type` value, used to pick nested descriptors.
    pub fn type_uri(&self) -> Option<&str> {
        self.first_value(rdf::TYPE).map(Value::as_text)
    }

    pub fn is_empty(&self) -> bool {
        self.properties.iter().all(|(_, values)| values.is_empty())
    }

    /// Validates the id of this entity and of every nested entity.
    ///
    /// # Errors
    /// - Returns the first id that is not an absolute URI.
    pub fn validate(&self) -> Result<(), InvalidUriError> {
        validate_absolute_uri(&self.id)?;
        for (_, values) in &self.properties {
            for nested in values.iter().filter_map(Value::as_nested) {
                nested.validate()?;
            }
        }
        Ok(())
    }
}
