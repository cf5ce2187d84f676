//! Declarative entity mappings.
//!
//! Each entity type carried by the storefront declares which of its fields
//! back term filters; every field not named by a template is stored but not
//! indexed, which keeps arbitrary upstream payloads cheap to hold.

use std::collections::BTreeMap;

use serde_json::{json, Value};

use crate::errors::StorageError;

/// Review entity name used in data source names and batches.
pub const REVIEW_ENTITY: &str = "review";

/// Rating metadata entity name.
pub const RATING_METADATA_ENTITY: &str = "rating_metadata";

/// Declarative mapping configuration for one entity type.
pub trait EntityConfig: Send + Sync {
    /// Entity name as used in naming, batches and mapping registration.
    fn entity_name(&self) -> &'static str;

    /// Mapping fragment merged into the entity's mapping registration.
    fn settings(&self) -> Value;
}

/// Review mapping.
///
/// `product_id`, `customer_id` and `visibility` back the storefront filters;
/// everything else in a review document is stored only. Templates match in
/// order, so the catch-all comes last.
pub struct ReviewConfig;

impl EntityConfig for ReviewConfig {
    fn entity_name(&self) -> &'static str {
        REVIEW_ENTITY
    }

    fn settings(&self) -> Value {
        json!({
            "dynamic_templates": [
                {
                    "product_id_mapping": {
                        "match": "product_id",
                        "mapping": { "index": true }
                    }
                },
                {
                    "customer_id_mapping": {
                        "match": "customer_id",
                        "mapping": { "index": true }
                    }
                },
                {
                    "visibility_mapping": {
                        "match": "visibility",
                        "mapping": { "index": true }
                    }
                },
                {
                    "default_mapping": {
                        "match": "*",
                        "match_mapping_type": "*",
                        "mapping": { "index": false }
                    }
                }
            ]
        })
    }
}

/// Rating metadata mapping: fetched by id only, so nothing is indexed.
pub struct RatingMetadataConfig;

impl EntityConfig for RatingMetadataConfig {
    fn entity_name(&self) -> &'static str {
        RATING_METADATA_ENTITY
    }

    fn settings(&self) -> Value {
        json!({
            "dynamic_templates": [
                {
                    "default_mapping": {
                        "match": "*",
                        "match_mapping_type": "*",
                        "mapping": { "index": false }
                    }
                }
            ]
        })
    }
}

/// Registry of entity configurations keyed by entity name.
pub struct EntityConfigRegistry {
    configs: BTreeMap<String, Box<dyn EntityConfig>>,
}

impl EntityConfigRegistry {
    /// Registry pre-populated with the storefront entities.
    pub fn storefront() -> Self {
        let mut registry = Self {
            configs: BTreeMap::new(),
        };
        registry.register(Box::new(ReviewConfig));
        registry.register(Box::new(RatingMetadataConfig));
        registry
    }

    /// Add or replace the configuration for one entity type.
    pub fn register(&mut self, config: Box<dyn EntityConfig>) {
        self.configs.insert(config.entity_name().to_string(), config);
    }

    /// Look up the configuration for an entity type.
    ///
    /// Unknown entity names are wiring mistakes and fail as configuration
    /// errors.
    pub fn get(&self, entity: &str) -> Result<&dyn EntityConfig, StorageError> {
        self.configs
            .get(entity)
            .map(|config| config.as_ref())
            .ok_or_else(|| {
                StorageError::configuration(format!(
                    "no entity config registered for '{}'",
                    entity
                ))
            })
    }
}

impl Default for EntityConfigRegistry {
    fn default() -> Self {
        Self::storefront()
    }
}
