//! OpenSearch implementation of the data definition contract.
//!
//! One engine call per operation. Alias changes travel as multi-action
//! requests, which the engine applies atomically.

use std::sync::Arc;

use async_trait::async_trait;
use opensearch::indices::{
    IndicesCreateParts, IndicesDeleteParts, IndicesExistsParts, IndicesPutMappingParts,
    IndicesRefreshParts,
};
use serde_json::{json, Map, Value};
use tracing::{debug, error};

use crate::errors::StorageError;
use crate::interfaces::DataDefinition;
use crate::opensearch::connection::ConnectionPool;
use crate::opensearch::entity_config::EntityConfigRegistry;

/// DDL adapter over the engine's indices API.
pub struct OpenSearchDataDefinition {
    pool: Arc<ConnectionPool>,
    entities: EntityConfigRegistry,
}

impl OpenSearchDataDefinition {
    /// Adapter with the storefront entity configurations.
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self::with_entities(pool, EntityConfigRegistry::storefront())
    }

    /// Adapter with an explicit entity configuration registry.
    pub fn with_entities(pool: Arc<ConnectionPool>, entities: EntityConfigRegistry) -> Self {
        Self { pool, entities }
    }

    /// Merge an entity's declarative templates with explicit field
    /// definitions into one mapping body.
    fn mapping_body(mut settings: Value, field_schema: Map<String, Value>) -> Value {
        if field_schema.is_empty() {
            return settings;
        }
        if let Some(body) = settings.as_object_mut() {
            let properties = body
                .entry("properties".to_string())
                .or_insert_with(|| json!({}));
            if let Some(properties) = properties.as_object_mut() {
                properties.extend(field_schema);
            }
        }
        settings
    }

    /// Alias actions for an atomic switch: add the new binding and remove
    /// the old one in the same request.
    fn switch_actions(alias: &str, old_data_source: &str, new_data_source: &str) -> Value {
        json!({
            "actions": [
                { "add": { "index": new_data_source, "alias": alias } },
                { "remove": { "index": old_data_source, "alias": alias } }
            ]
        })
    }

    async fn update_aliases(&self, body: Value, context: String) -> Result<(), StorageError> {
        let client = self.pool.connection().await?;
        let response = client
            .indices()
            .update_aliases()
            .body(body)
            .send()
            .await
            .map_err(|e| StorageError::state(format!("{}: {}", context, e)))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Alias update failed");
            return Err(StorageError::state(format!(
                "{}: status {}: {}",
                context, status, error_body
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl DataDefinition for OpenSearchDataDefinition {
    async fn create_data_source(&self, name: &str, metadata: Value) -> Result<(), StorageError> {
        let client = self.pool.connection().await?;
        let target = format!("data source '{}'", name);
        let response = client
            .indices()
            .create(IndicesCreateParts::Index(name))
            .body(metadata)
            .send()
            .await
            .map_err(|e| StorageError::could_not_save(target.as_str(), e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(data_source = %name, status = %status, body = %error_body, "Create data source failed");
            return Err(StorageError::could_not_save(
                target.as_str(),
                format!("status {}: {}", status, error_body),
            ));
        }

        debug!(data_source = %name, "Data source created");
        Ok(())
    }

    async fn exists_data_source(&self, name: &str) -> Result<bool, StorageError> {
        let client = self.pool.connection().await?;
        let response = client
            .indices()
            .exists(IndicesExistsParts::Index(&[name]))
            .send()
            .await
            .map_err(|e| StorageError::runtime(e.to_string(), format!("exists '{}'", name)))?;

        Ok(response.status_code().is_success())
    }

    async fn delete_data_source(&self, name: &str) -> Result<(), StorageError> {
        let client = self.pool.connection().await?;
        let target = format!("data source '{}'", name);
        let response = client
            .indices()
            .delete(IndicesDeleteParts::Index(&[name]))
            .send()
            .await
            .map_err(|e| StorageError::could_not_delete(target.as_str(), e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(data_source = %name, status = %status, body = %error_body, "Delete data source failed");
            return Err(StorageError::could_not_delete(
                target.as_str(),
                format!("status {}: {}", status, error_body),
            ));
        }

        debug!(data_source = %name, "Data source deleted");
        Ok(())
    }

    async fn refresh_data_source(&self, name: &str) -> Result<(), StorageError> {
        let client = self.pool.connection().await?;
        let response = client
            .indices()
            .refresh(IndicesRefreshParts::Index(&[name]))
            .send()
            .await
            .map_err(|e| StorageError::runtime(e.to_string(), format!("refresh '{}'", name)))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(data_source = %name, status = %status, body = %error_body, "Refresh failed");
            return Err(StorageError::runtime(
                format!("refresh failed with status {}: {}", status, error_body),
                format!("refresh '{}'", name),
            ));
        }

        debug!(data_source = %name, "Data source refreshed");
        Ok(())
    }

    async fn create_entity(
        &self,
        data_source: &str,
        entity: &str,
        field_schema: Map<String, Value>,
    ) -> Result<(), StorageError> {
        let settings = self.entities.get(entity)?.settings();
        let body = Self::mapping_body(settings, field_schema);
        let target = format!("entity '{}' in data source '{}'", entity, data_source);

        let client = self.pool.connection().await?;
        let response = client
            .indices()
            .put_mapping(IndicesPutMappingParts::Index(&[data_source]))
            .body(body)
            .send()
            .await
            .map_err(|e| StorageError::could_not_save(target.as_str(), e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(
                data_source = %data_source,
                entity = %entity,
                status = %status,
                body = %error_body,
                "Create entity mapping failed"
            );
            return Err(StorageError::could_not_save(
                target.as_str(),
                format!("status {}: {}", status, error_body),
            ));
        }

        debug!(data_source = %data_source, entity = %entity, "Entity mapping created");
        Ok(())
    }

    async fn create_alias(&self, alias: &str, data_source: &str) -> Result<(), StorageError> {
        let body = json!({
            "actions": [
                { "add": { "index": data_source, "alias": alias } }
            ]
        });
        let context = format!("could not bind alias '{}' to '{}'", alias, data_source);
        self.update_aliases(body, context).await?;

        debug!(alias = %alias, data_source = %data_source, "Alias created");
        Ok(())
    }

    async fn switch_alias(
        &self,
        alias: &str,
        old_data_source: &str,
        new_data_source: &str,
    ) -> Result<(), StorageError> {
        let body = Self::switch_actions(alias, old_data_source, new_data_source);
        let context = format!(
            "could not switch alias '{}' from '{}' to '{}'",
            alias, old_data_source, new_data_source
        );
        self.update_aliases(body, context).await?;

        debug!(
            alias = %alias,
            old_data_source = %old_data_source,
            new_data_source = %new_data_source,
            "Alias switched"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_body_merges_schema_into_properties() {
        let settings = json!({ "dynamic_templates": [] });
        let mut schema = Map::new();
        schema.insert("product_id".to_string(), json!({ "type": "integer" }));

        let body = OpenSearchDataDefinition::mapping_body(settings, schema);

        assert_eq!(body["dynamic_templates"], json!([]));
        assert_eq!(body["properties"]["product_id"], json!({ "type": "integer" }));
    }

    #[test]
    fn test_mapping_body_without_schema_is_settings_alone() {
        let settings = json!({ "dynamic_templates": [{ "x": {} }] });

        let body = OpenSearchDataDefinition::mapping_body(settings.clone(), Map::new());

        assert_eq!(body, settings);
    }

    #[test]
    fn test_mapping_body_extends_existing_properties() {
        let settings = json!({ "properties": { "id": { "type": "long" } } });
        let mut schema = Map::new();
        schema.insert("name".to_string(), json!({ "type": "keyword" }));

        let body = OpenSearchDataDefinition::mapping_body(settings, schema);

        assert_eq!(body["properties"]["id"], json!({ "type": "long" }));
        assert_eq!(body["properties"]["name"], json!({ "type": "keyword" }));
    }

    #[test]
    fn test_switch_travels_as_one_request_with_both_actions() {
        let body = OpenSearchDataDefinition::switch_actions(
            "reviews_storefront_review",
            "reviews_storefront_review_v1",
            "reviews_storefront_review_v2",
        );

        let actions = body["actions"].as_array().unwrap();
        assert_eq!(actions.len(), 2);
        assert_eq!(
            actions[0]["add"],
            json!({ "index": "reviews_storefront_review_v2", "alias": "reviews_storefront_review" })
        );
        assert_eq!(
            actions[1]["remove"],
            json!({ "index": "reviews_storefront_review_v1", "alias": "reviews_storefront_review" })
        );
    }
}
