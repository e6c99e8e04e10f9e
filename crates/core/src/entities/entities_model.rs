//! Entity domain models.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::ValidationError;

/// Name of a configured entity.
///
/// Restricted to `[A-Za-z0-9_-]+` because it names files in the data directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityName(pub(super) String);

impl EntityName {
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ValidationError::InvalidInput(
                "entity name must not be empty".to_string(),
            ));
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(ValidationError::InvalidInput(format!(
                "entity name '{}' may only contain letters, digits, '_' and '-'",
                name
            )));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for EntityName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EntityName> for String {
    fn from(name: EntityName) -> Self {
        name.0
    }
}

impl AsRef<str> for EntityName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// How raw records of one day are turned into a single value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    /// One point per record, `y` read from the value field.
    #[default]
    None,
    /// Number of records per day.
    Count,
    /// Sum of the value field per day.
    Sum,
}

impl Aggregation {
    pub fn requires_value_field(&self) -> bool {
        !matches!(self, Aggregation::Count)
    }
}

/// Equality filter applied to remote queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFilterConfig {
    pub field: String,
    pub value: String,
}

/// Where and how to pull records for an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub collection_name: String,
    pub timestamp_field: String,
    #[serde(default)]
    pub value_field: Option<String>,
    #[serde(default)]
    pub aggregation: Aggregation,
    #[serde(default)]
    pub filter: Option<RecordFilterConfig>,
}

impl SourceConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.collection_name.trim().is_empty() {
            return Err(ValidationError::MissingField("collection_name".to_string()));
        }
        if self.timestamp_field.trim().is_empty() {
            return Err(ValidationError::MissingField("timestamp_field".to_string()));
        }
        let has_value_field = self
            .value_field
            .as_deref()
            .is_some_and(|f| !f.trim().is_empty());
        if self.aggregation.requires_value_field() && !has_value_field {
            return Err(ValidationError::MissingField(format!(
                "value_field (required by aggregation on '{}')",
                self.collection_name
            )));
        }
        Ok(())
    }
}

/// A configured entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityConfig {
    pub name: EntityName,
    #[serde(default)]
    pub source: Option<SourceConfig>,
}
