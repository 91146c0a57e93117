//! Vidispine metadata document model.
//!
//! Vidispine omits empty arrays and unset strings from its JSON, so every
//! field defaults.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Field carrying the asset status of a collection or item.
const ASSET_STATUS_FIELD: &str = "gnm_asset_status";

/// Status value marking assets that were moved to external archive storage.
const EXTERNAL_ARCHIVE_STATUS: &str = "Archived to External";

/// A single value of a metadata field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaValue {
    pub value: String,
    pub uuid: String,
    pub user: String,
    pub timestamp: String,
    pub change: String,
}

/// A named metadata field with zero or more values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaField {
    pub name: String,
    pub value: Vec<MetaValue>,
    pub uuid: String,
    pub user: String,
    pub timestamp: String,
    pub change: String,
}

impl MetaField {
    /// Just the string values of this field.
    pub fn string_values(&self) -> Vec<String> {
        self.value.iter().map(|v| v.value.clone()).collect()
    }
}

/// A named group of fields, possibly with nested groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaGroup {
    pub name: String,
    pub field: Vec<MetaField>,
    pub group: Vec<MetaGroup>,
    pub uuid: String,
    pub user: String,
    pub timestamp: String,
    pub change: String,
}

impl MetaGroup {
    pub fn field_for_name(&self, field_name: &str) -> Option<&MetaField> {
        self.field.iter().find(|f| f.name == field_name)
    }

    /// Values of a field directly inside this group. Nested groups are not searched.
    pub fn value_for_field(&self, field_name: &str) -> Option<Vec<String>> {
        self.field_for_name(field_name).map(MetaField::string_values)
    }
}

/// Metadata valid over a time range of the asset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaTimespan {
    pub field: Vec<MetaField>,
    pub group: Vec<MetaGroup>,
    pub start: String,
    pub end: String,
}

impl MetaTimespan {
    pub fn root_field_for_name(&self, field_name: &str) -> Option<&MetaField> {
        self.field.iter().find(|f| f.name == field_name)
    }

    /// Values of a field, looking at root fields first and then each group in order.
    pub fn value_for_field(&self, field_name: &str) -> Option<Vec<String>> {
        if let Some(field) = self.root_field_for_name(field_name) {
            return Some(field.string_values());
        }
        self.group
            .iter()
            .find_map(|group| group.value_for_field(field_name))
    }

    /// First value of a field, or `default` when the field is absent or empty.
    pub fn first_value_for_field(&self, field_name: &str, default: &str) -> String {
        self.value_for_field(field_name)
            .and_then(|values| values.into_iter().next())
            .unwrap_or_else(|| default.to_string())
    }

    /// All values of a field, or `default` when the field is absent.
    pub fn all_values_for_field(&self, field_name: &str, default: Vec<String>) -> Vec<String> {
        self.value_for_field(field_name).unwrap_or(default)
    }

    pub fn group_for_name(&self, group_name: &str) -> Option<&MetaGroup> {
        self.group.iter().find(|g| g.name == group_name)
    }

    /// Number of times `expected` appears among the values of `field_name`.
    pub fn count_matches(&self, field_name: &str, expected: &str) -> usize {
        self.value_for_field(field_name)
            .map(|values| values.iter().filter(|v| v.as_str() == expected).count())
            .unwrap_or(0)
    }

    fn is_unbounded(&self) -> bool {
        self.start == "-INF" && self.end == "+INF"
    }
}

/// Top-level metadata document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    pub revision: String,
    /// Root group name(s).
    pub group: Vec<String>,
    pub timespan: Vec<MetaTimespan>,
}

impl Metadata {
    /// The timespan covering the whole asset (`-INF` to `+INF`), if present.
    pub fn default_timespan(&self) -> Option<&MetaTimespan> {
        self.timespan.iter().find(|ts| ts.is_unbounded())
    }

    /// First value of `gnm_asset_status` in the default timespan.
    pub fn status(&self) -> Option<String> {
        let values = self.default_timespan()?.value_for_field(ASSET_STATUS_FIELD)?;
        if values.len() > 1 {
            warn!(values = ?values, "Multiple status values present, using the first");
        }
        values.into_iter().next()
    }

    pub fn is_external_archive(&self) -> bool {
        self.status().as_deref() == Some(EXTERNAL_ARCHIVE_STATUS)
    }
}
