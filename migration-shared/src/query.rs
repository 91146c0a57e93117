//! Source query: an ordered mapping of field name to values.

use serde::{Deserialize, Serialize};

/// A field → values query understood by paginated sources.
///
/// Fields keep their insertion order. Adding a field that already exists
/// replaces its values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    fields: Vec<(String, Vec<String>)>,
}

impl SearchQuery {
    /// Create an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the values for a field.
    pub fn add<I, S>(&mut self, field: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let field = field.into();
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some((_, existing)) => *existing = values,
            None => self.fields.push((field, values)),
        }
    }

    /// Builder form of [`SearchQuery::add`].
    pub fn with_field<I, S>(mut self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add(field, values);
        self
    }

    /// Iterate over `(field, values)` pairs in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Values for a single field, if present.
    pub fn values(&self, field: &str) -> Option<&[String]> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, values)| values.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
