//! Process-wide schema cache.

use std::any::TypeId;
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;
use tracing::debug;

use super::descriptor::{build_schema, TableSchema};
use super::{Entity, EntityRef};
use crate::error::CompileResult;

static SCHEMAS: Lazy<DashMap<TypeId, Arc<TableSchema>>> = Lazy::new(DashMap::new);

/// Type-indexed registry of resolved table schemas.
///
/// Each entity is resolved on first use and shared afterwards. Two threads
/// racing on the same type may both build it; the first insert wins and
/// both get the same `Arc`. Failed builds are not cached.
pub struct SchemaRegistry;

impl SchemaRegistry {
    pub fn get<E: Entity>() -> CompileResult<Arc<TableSchema>> {
        Self::resolve(EntityRef::of::<E>())
    }

    pub fn resolve(entity: EntityRef) -> CompileResult<Arc<TableSchema>> {
        if let Some(schema) = SCHEMAS.get(&entity.type_id()) {
            return Ok(Arc::clone(schema.value()));
        }

        let schema = Arc::new(build_schema(entity)?);
        debug!(
            entity = %entity,
            table = %schema.table,
            columns = schema.columns.len(),
            "registered entity schema"
        );

        let entry = SCHEMAS.entry(entity.type_id()).or_insert(schema);
        Ok(Arc::clone(entry.value()))
    }

    pub fn is_registered<E: Entity>() -> bool {
        SCHEMAS.contains_key(&TypeId::of::<E>())
    }
}
