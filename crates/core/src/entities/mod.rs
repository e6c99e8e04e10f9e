//! Entities module - configured series and their remote sources.

mod entities_model;
mod entities_registry;

pub use entities_model::{Aggregation, EntityConfig, EntityName, RecordFilterConfig, SourceConfig};
pub use entities_registry::EntityRegistry;
