//! Data-source and alias name resolution.
//!
//! Every physical index this layer touches is named here and nowhere else.
//! Physical names carry a version suffix so a reindex can build the next
//! version alongside the live one; read aliases drop the version and stay
//! stable across cutovers.

use std::sync::Arc;

use crate::config::StorageConfig;

/// Resolves physical data source names and read alias names.
///
/// Physical names follow `{prefix}_{entityType}_{storeQualifier}_v{version}`.
/// Callers pass scope qualifiers most specific first (store code, then entity
/// type); empty qualifiers are skipped, so store-unqualified entities simply
/// pass an empty store code.
#[derive(Debug, Clone)]
pub struct State {
    config: Arc<StorageConfig>,
}

impl State {
    pub fn new(config: Arc<StorageConfig>) -> Self {
        Self { config }
    }

    /// Physical name of the current-version data source for a scope.
    ///
    /// The version is read from configuration; it is bumped by the external
    /// reindex cutover, never recomputed here. Writes and DDL use this name,
    /// reads never do.
    ///
    /// # Arguments
    ///
    /// * `qualifiers` - Scope parts, most specific first (e.g.
    ///   `["default", "rating_metadata"]`); empty parts are skipped
    pub fn current_source_name(&self, qualifiers: &[&str]) -> String {
        self.source_name_for_version(qualifiers, self.config.source_current_version)
    }

    /// Physical data source name for an explicit version.
    ///
    /// Reindex tooling addresses the next version through this while the
    /// alias still points at the current one.
    pub fn source_name_for_version(&self, qualifiers: &[&str], version: u32) -> String {
        format!(
            "{}_v{}",
            self.scoped_name(&self.config.source_prefix, qualifiers),
            version
        )
    }

    /// Stable read alias for a scope.
    ///
    /// All reads resolve through the alias so an in-flight reader never
    /// observes a half-finished cutover.
    pub fn alias_name(&self, qualifiers: &[&str]) -> String {
        self.scoped_name(&self.config.alias_name, qualifiers)
    }

    fn scoped_name(&self, base: &str, qualifiers: &[&str]) -> String {
        let mut parts = vec![base];
        parts.extend(qualifiers.iter().rev().filter(|q| !q.is_empty()).copied());
        parts.join("_")
    }
}
