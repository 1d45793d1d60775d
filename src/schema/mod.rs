//! Schema descriptor: entity registration and table mapping.
//!
//! Entities implement [`Entity`] to describe their columns once. The
//! [`SchemaRegistry`] resolves that description into a cached
//! [`TableSchema`] keyed by the entity's type.
//!
//! ```
//! use heron::schema::{Entity, EntityDef, FieldDef, Row, SchemaRegistry};
//! use heron::sql::ColumnType;
//!
//! struct Country {
//!     id: i32,
//!     name: String,
//! }
//!
//! impl Entity for Country {
//!     fn describe() -> EntityDef {
//!         EntityDef::new("Country")
//!             .field(FieldDef::scalar("Id", ColumnType::Int32).column_name("ID").auto_increment())
//!             .field(FieldDef::scalar("Name", ColumnType::String).length(50))
//!     }
//!
//!     fn row(&self) -> Row {
//!         Row::new().set("Id", self.id).set("Name", self.name.as_str())
//!     }
//! }
//!
//! let schema = SchemaRegistry::get::<Country>().unwrap();
//! assert_eq!(schema.key().unwrap().name, "ID");
//! ```

mod descriptor;
mod registry;

pub use descriptor::{
    build_schema, ColumnSchema, EntityDef, FieldDef, FieldKind, ForeignKeyDef, ForeignKeySchema,
    Relation, TableSchema,
};
pub use registry::SchemaRegistry;

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::CompileResult;
use crate::sql::types::Value;

/// A persisted entity type.
pub trait Entity: 'static {
    /// Declarative table and column metadata.
    fn describe() -> EntityDef;

    /// Current field values, keyed by field name.
    fn row(&self) -> Row;
}

/// Field values of one entity instance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    values: Vec<(&'static str, Value)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field value, replacing any earlier value for the field.
    #[must_use]
    pub fn set(mut self, field: &'static str, value: impl Into<Value>) -> Self {
        let value = value.into();
        match self.values.iter_mut().find(|(f, _)| *f == field) {
            Some(slot) => slot.1 = value,
            None => self.values.push((field, value)),
        }
        self
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.iter().find(|(f, _)| *f == field).map(|(_, v)| v)
    }
}

/// Type-erased handle to an entity type.
#[derive(Clone, Copy)]
pub struct EntityRef {
    type_id: TypeId,
    type_name: &'static str,
    describe: fn() -> EntityDef,
}

impl EntityRef {
    pub fn of<T: Entity>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            describe: T::describe,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Full Rust type path.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Fresh declarative metadata.
    pub fn definition(&self) -> EntityDef {
        (self.describe)()
    }

    /// Resolved schema from the registry.
    pub fn schema(&self) -> CompileResult<Arc<TableSchema>> {
        SchemaRegistry::resolve(*self)
    }
}

impl PartialEq for EntityRef {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for EntityRef {}

impl Hash for EntityRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityRef({})", self.type_name)
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let short = self.type_name.rsplit("::").next().unwrap_or(self.type_name);
        f.write_str(short)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::types::ColumnType;

    struct Widget;
    impl Entity for Widget {
        fn describe() -> EntityDef {
            EntityDef::new("Widget").field(FieldDef::scalar("Id", ColumnType::Int32))
        }
        fn row(&self) -> Row {
            Row::new().set("Id", 1)
        }
    }

    #[test]
    fn test_entity_ref_identity() {
        let a = EntityRef::of::<Widget>();
        let b = EntityRef::of::<Widget>();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "Widget");
        assert!(a.type_name().ends_with("::Widget"));
    }

    #[test]
    fn test_row_set_replaces() {
        let row = Row::new().set("Name", "a").set("Name", "b");
        assert_eq!(row.get("Name"), Some(&Value::from("b")));
        assert_eq!(row.get("Missing"), None);
    }
}
