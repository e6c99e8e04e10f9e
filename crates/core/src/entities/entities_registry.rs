//! Immutable set of configured entities.

use log::debug;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use super::entities_model::{Aggregation, EntityConfig, EntityName, SourceConfig};
use crate::errors::{Error, Result, ValidationError};

#[derive(Debug, Deserialize)]
struct RegistryFile {
    #[serde(rename = "entity", default)]
    entities: Vec<EntityConfig>,
}

/// Registry of every entity the pipeline knows about, loaded once at start-up.
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    entities: BTreeMap<EntityName, EntityConfig>,
}

impl EntityRegistry {
    /// Builds a registry, rejecting duplicate names and invalid sources.
    pub fn new(configs: Vec<EntityConfig>) -> Result<Self> {
        let mut entities = BTreeMap::new();
        for config in configs {
            if let Some(source) = &config.source {
                source.validate().map_err(|e| {
                    Error::Config(format!("entity '{}': {}", config.name, e))
                })?;
            }
            let name = config.name.clone();
            if entities.insert(name.clone(), config).is_some() {
                return Err(Error::Config(format!("duplicate entity '{}'", name)));
            }
        }
        Ok(Self { entities })
    }

    /// The entities served when no registry file is configured.
    pub fn builtin() -> Self {
        let mut entities = BTreeMap::new();
        for config in [
            builtin_entity("sales", "sales_records", "sale_date", Some("amount"), Aggregation::None),
            builtin_entity(
                "part_stock_log",
                "inventory_movements",
                "movement_date",
                Some("quantity_change"),
                Aggregation::Sum,
            ),
            builtin_entity(
                "product_stocks",
                "daily_product_stock_levels",
                "record_date",
                Some("stock_level"),
                Aggregation::None,
            ),
            builtin_entity(
                "service_request_counts",
                "service_tickets",
                "created",
                None,
                Aggregation::Count,
            ),
        ] {
            entities.insert(config.name.clone(), config);
        }
        Self { entities }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: RegistryFile = toml::from_str(content)?;
        Self::new(file.entities)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let registry = Self::from_toml_str(&content)?;
        debug!(
            "Loaded {} entities from {}",
            registry.len(),
            path.display()
        );
        Ok(registry)
    }

    /// Looks up a configured entity by its raw name.
    pub fn resolve(&self, name: &str) -> Result<&EntityConfig> {
        EntityName::new(name)
            .ok()
            .and_then(|n| self.entities.get(&n))
            .ok_or_else(|| Error::UnknownEntity(name.to_string()))
    }

    /// Like [`resolve`](Self::resolve), but also requires a remote source.
    pub fn resolve_source(&self, name: &str) -> Result<(&EntityName, &SourceConfig)> {
        let config = self.resolve(name)?;
        let source = config.source.as_ref().ok_or_else(|| {
            Error::Validation(ValidationError::InvalidInput(format!(
                "entity '{}' has no remote source configured",
                name
            )))
        })?;
        Ok((&config.name, source))
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntityConfig> {
        self.entities.values()
    }

    pub fn names(&self) -> Vec<&EntityName> {
        self.entities.keys().collect()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

fn builtin_entity(
    name: &str,
    collection_name: &str,
    timestamp_field: &str,
    value_field: Option<&str>,
    aggregation: Aggregation,
) -> EntityConfig {
    EntityConfig {
        name: EntityName(name.to_string()),
        source: Some(SourceConfig {
            collection_name: collection_name.to_string(),
            timestamp_field: timestamp_field.to_string(),
            value_field: value_field.map(str::to_string),
            aggregation,
            filter: None,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registry_is_valid() {
        let registry = EntityRegistry::builtin();
        assert_eq!(registry.len(), 4);
        for config in registry.iter() {
            config.source.as_ref().unwrap().validate().unwrap();
        }
        let counts = registry.resolve("service_request_counts").unwrap();
        assert_eq!(
            counts.source.as_ref().unwrap().aggregation,
            Aggregation::Count
        );
    }

    #[test]
    fn resolve_rejects_unknown_and_unsafe_names() {
        let registry = EntityRegistry::builtin();
        assert!(matches!(
            registry.resolve("unknown"),
            Err(Error::UnknownEntity(_))
        ));
        assert!(matches!(
            registry.resolve("../sales"),
            Err(Error::UnknownEntity(_))
        ));
    }

    #[test]
    fn parses_toml_registry() {
        let registry = EntityRegistry::from_toml_str(
            r#"
            [[entity]]
            name = "tickets"
            [entity.source]
            collection_name = "service_tickets"
            timestamp_field = "created"
            aggregation = "count"
            [entity.source.filter]
            field = "status"
            value = "open"

            [[entity]]
            name = "manual_only"
            "#,
        )
        .unwrap();

        assert_eq!(registry.len(), 2);
        let (_, source) = registry.resolve_source("tickets").unwrap();
        assert_eq!(source.filter.as_ref().unwrap().value, "open");
        assert!(matches!(
            registry.resolve_source("manual_only"),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn rejects_duplicates_and_bad_names() {
        let duplicate = r#"
            [[entity]]
            name = "sales"
            [[entity]]
            name = "sales"
        "#;
        assert!(matches!(
            EntityRegistry::from_toml_str(duplicate),
            Err(Error::Config(_))
        ));
        assert!(EntityRegistry::from_toml_str("[[entity]]\nname = \"a/b\"\n").is_err());
    }

    #[test]
    fn rejects_sum_source_without_value_field() {
        let toml = r#"
            [[entity]]
            name = "stock"
            [entity.source]
            collection_name = "inventory_movements"
            timestamp_field = "movement_date"
            aggregation = "sum"
        "#;
        assert!(matches!(
            EntityRegistry::from_toml_str(toml),
            Err(Error::Config(_))
        ));
    }
}
