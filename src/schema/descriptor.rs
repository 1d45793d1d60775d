//! Declarative entity metadata and the resolved table schema.
//!
//! An entity describes itself with an [`EntityDef`]: the table name, an
//! optional alias and one [`FieldDef`] per field. [`build_schema`] resolves
//! that into a [`TableSchema`]: column names, the primary key, foreign keys
//! and indexes, validated once.

use std::collections::HashSet;

use super::EntityRef;
use crate::error::{CompileError, CompileResult};
use crate::sql::ddl::ReferentialAction;
use crate::sql::types::ColumnType;

// =============================================================================
// Declarative metadata
// =============================================================================

/// Table-level metadata of an entity.
#[derive(Debug, Clone)]
#[must_use = "builders have no effect until used"]
pub struct EntityDef {
    pub table: String,
    pub alias: Option<String>,
    pub fields: Vec<FieldDef>,
}

impl EntityDef {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            alias: None,
            fields: Vec::new(),
        }
    }

    /// Short alias used to qualify columns in multi-table statements.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// The key field: explicit `key`/`auto_increment`, else a field named `Id`.
    fn key_field(&self) -> Option<&FieldDef> {
        self.fields
            .iter()
            .filter(|f| !f.ignored)
            .find(|f| f.key || f.auto_increment)
            .or_else(|| {
                self.fields
                    .iter()
                    .filter(|f| !f.ignored && matches!(f.kind, FieldKind::Scalar(_)))
                    .find(|f| f.name.eq_ignore_ascii_case("id"))
            })
    }
}

/// Why an entity's key column could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyError {
    Missing(EntityRef),
    Collection(EntityRef),
    Cycle(EntityRef),
}

impl KeyError {
    fn into_schema_error(self, owner: &str, field: &str) -> CompileError {
        let message = match self {
            KeyError::Missing(entity) => {
                format!("field `{field}` references {entity}, which has no key")
            }
            KeyError::Collection(entity) => {
                format!("field `{field}` references {entity}, whose key is a collection")
            }
            KeyError::Cycle(entity) => {
                format!("field `{field}` references {entity}, whose key references itself")
            }
        };
        CompileError::schema(owner, message)
    }
}

/// Column name and type of `entity`'s key. A key that is itself a reference
/// is followed to the scalar key it stores.
fn key_column(entity: EntityRef) -> Result<(String, ColumnType), KeyError> {
    let mut chain = Vec::new();
    key_column_in(entity, &mut chain)
}

fn key_column_in(
    entity: EntityRef,
    chain: &mut Vec<EntityRef>,
) -> Result<(String, ColumnType), KeyError> {
    if chain.contains(&entity) {
        return Err(KeyError::Cycle(entity));
    }
    chain.push(entity);

    let def = entity.definition();
    let field = def.key_field().ok_or(KeyError::Missing(entity))?;
    match field.kind {
        FieldKind::Scalar(ty) => Ok((field.column(), ty)),
        FieldKind::Reference(target) => {
            let (target_column, ty) = key_column_in(target, chain)?;
            let column = field
                .column_name
                .clone()
                .unwrap_or_else(|| format!("{}{target_column}", field.name));
            Ok((column, ty))
        }
        FieldKind::Collection(_) => Err(KeyError::Collection(entity)),
    }
}

/// What a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A plain value.
    Scalar(ColumnType),
    /// A single referenced entity, stored as that entity's key.
    Reference(EntityRef),
    /// A collection of entities. Never a column.
    Collection(EntityRef),
}

/// Foreign key declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ForeignKeyDef {
    /// Explicit target. `None` infers it from the field's declared type.
    pub target: Option<EntityRef>,
    /// Join table for many-to-many collections.
    pub through: Option<EntityRef>,
    pub on_delete: ReferentialAction,
    pub on_update: ReferentialAction,
}

/// Per-field metadata.
#[derive(Debug, Clone)]
#[must_use = "builders have no effect until used"]
pub struct FieldDef {
    pub name: &'static str,
    pub kind: FieldKind,
    pub column_name: Option<String>,
    pub key: bool,
    pub auto_increment: bool,
    pub nullable: bool,
    pub length: u32,
    pub foreign_key: Option<ForeignKeyDef>,
    /// `Some(unique)` when the column is indexed.
    pub index: Option<bool>,
    pub ignored: bool,
}

impl FieldDef {
    fn with_kind(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            column_name: None,
            key: false,
            auto_increment: false,
            nullable: false,
            length: 0,
            foreign_key: None,
            index: None,
            ignored: false,
        }
    }

    pub fn scalar(name: &'static str, column_type: ColumnType) -> Self {
        Self::with_kind(name, FieldKind::Scalar(column_type))
    }

    /// A field whose declared type is another entity.
    pub fn reference<T: super::Entity>(name: &'static str) -> Self {
        Self::with_kind(name, FieldKind::Reference(EntityRef::of::<T>()))
    }

    /// A navigation collection of another entity.
    pub fn collection<T: super::Entity>(name: &'static str) -> Self {
        Self::with_kind(name, FieldKind::Collection(EntityRef::of::<T>()))
    }

    /// Override the column name.
    pub fn column_name(mut self, name: impl Into<String>) -> Self {
        self.column_name = Some(name.into());
        self
    }

    pub fn key(mut self) -> Self {
        self.key = true;
        self
    }

    /// Engine-assigned surrogate key. Implies `key`.
    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self.key = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn length(mut self, length: u32) -> Self {
        self.length = length;
        self
    }

    /// Foreign key to the field's declared entity type.
    pub fn foreign_key(mut self) -> Self {
        self.foreign_key.get_or_insert_with(ForeignKeyDef::default);
        self
    }

    /// Foreign key to an explicit entity.
    pub fn foreign_key_to<T: super::Entity>(mut self) -> Self {
        self.foreign_key
            .get_or_insert_with(ForeignKeyDef::default)
            .target = Some(EntityRef::of::<T>());
        self
    }

    /// Many-to-many through a join entity.
    pub fn through<J: super::Entity>(mut self) -> Self {
        self.foreign_key
            .get_or_insert_with(ForeignKeyDef::default)
            .through = Some(EntityRef::of::<J>());
        self
    }

    pub fn on_delete(mut self, action: ReferentialAction) -> Self {
        self.foreign_key
            .get_or_insert_with(ForeignKeyDef::default)
            .on_delete = action;
        self
    }

    pub fn on_update(mut self, action: ReferentialAction) -> Self {
        self.foreign_key
            .get_or_insert_with(ForeignKeyDef::default)
            .on_update = action;
        self
    }

    pub fn index(mut self) -> Self {
        self.index = Some(false);
        self
    }

    pub fn unique_index(mut self) -> Self {
        self.index = Some(true);
        self
    }

    /// Exclude from persistence.
    pub fn ignore(mut self) -> Self {
        self.ignored = true;
        self
    }

    /// Declared or default column name. References default to the field
    /// name followed by the target's key column, resolved in `build_schema`.
    fn column(&self) -> String {
        self.column_name
            .clone()
            .unwrap_or_else(|| self.name.to_string())
    }
}

// =============================================================================
// Resolved schema
// =============================================================================

/// A resolved foreign key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeySchema {
    pub target: EntityRef,
    pub target_table: String,
    pub target_column: String,
    pub on_delete: ReferentialAction,
    pub on_update: ReferentialAction,
}

/// A persisted column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSchema {
    /// Entity field the column maps.
    pub field: &'static str,
    pub name: String,
    pub column_type: ColumnType,
    pub length: u32,
    pub nullable: bool,
    pub key: bool,
    pub auto_increment: bool,
    pub foreign_key: Option<ForeignKeySchema>,
    /// `Some(unique)` when indexed.
    pub index: Option<bool>,
}

/// A navigation field that is not a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    pub field: &'static str,
    pub target: EntityRef,
    pub through: Option<EntityRef>,
}

/// Resolved table mapping of one entity type. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub entity: EntityRef,
    pub table: String,
    pub alias: Option<String>,
    /// Persisted columns in declaration order.
    pub columns: Vec<ColumnSchema>,
    pub relations: Vec<Relation>,
}

impl TableSchema {
    pub fn column_for_field(&self, field: &str) -> Option<&ColumnSchema> {
        self.columns.iter().find(|c| c.field == field)
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn key(&self) -> Option<&ColumnSchema> {
        self.columns.iter().find(|c| c.key)
    }

    pub fn auto_increment_column(&self) -> Option<&ColumnSchema> {
        self.columns.iter().find(|c| c.auto_increment)
    }

    pub fn relation(&self, field: &str) -> Option<&Relation> {
        self.relations.iter().find(|r| r.field == field)
    }

    /// Key column or a schema error naming the entity.
    pub fn require_key(&self) -> CompileResult<&ColumnSchema> {
        self.key()
            .ok_or_else(|| CompileError::schema(self.entity.to_string(), "no primary key column"))
    }
}

// =============================================================================
// Building
// =============================================================================

/// Resolve an entity's declarative metadata into its table schema.
pub fn build_schema(entity: EntityRef) -> CompileResult<TableSchema> {
    let def = entity.definition();
    let name = entity.to_string();
    let key_field = def.key_field().map(|f| f.name);

    let auto_count = def
        .fields
        .iter()
        .filter(|f| !f.ignored && f.auto_increment)
        .count();
    if auto_count > 1 {
        return Err(CompileError::schema(&name, "more than one auto-increment column"));
    }
    let key_count = def
        .fields
        .iter()
        .filter(|f| !f.ignored && (f.key || f.auto_increment))
        .count();
    if key_count > 1 {
        return Err(CompileError::schema(&name, "more than one key column"));
    }

    let mut columns = Vec::new();
    let mut relations = Vec::new();
    let mut seen = HashSet::new();

    for field in def.fields.iter().filter(|f| !f.ignored) {
        let is_key = key_field == Some(field.name);

        let (column_name, column_type, declared_target) = match field.kind {
            FieldKind::Collection(target) => {
                relations.push(Relation {
                    field: field.name,
                    target,
                    through: field.foreign_key.and_then(|fk| fk.through),
                });
                continue;
            }
            FieldKind::Scalar(ty) => (field.column(), ty, None),
            FieldKind::Reference(target) => {
                let (target_key, key_type) = key_column(target)
                    .map_err(|e| e.into_schema_error(&name, field.name))?;
                let column = field
                    .column_name
                    .clone()
                    .unwrap_or_else(|| format!("{}{target_key}", field.name));
                (column, key_type, Some(target))
            }
        };

        let foreign_key = match field.foreign_key {
            None => None,
            Some(fk) => {
                let target = fk.target.or(declared_target).ok_or_else(|| {
                    CompileError::schema(
                        &name,
                        format!(
                            "foreign key on `{}` has no target entity and its type is not an entity",
                            field.name
                        ),
                    )
                })?;
                let (target_column, _) = key_column(target)
                    .map_err(|e| e.into_schema_error(&name, field.name))?;
                let target_def = target.definition();
                Some(ForeignKeySchema {
                    target,
                    target_table: target_def.table.clone(),
                    target_column,
                    on_delete: fk.on_delete,
                    on_update: fk.on_update,
                })
            }
        };

        if !seen.insert(column_name.to_lowercase()) {
            return Err(CompileError::schema(
                &name,
                format!("duplicate column `{column_name}`"),
            ));
        }

        columns.push(ColumnSchema {
            field: field.name,
            name: column_name,
            column_type,
            length: field.length,
            nullable: field.nullable && !is_key,
            key: is_key,
            auto_increment: field.auto_increment,
            foreign_key,
            index: field.index,
        });
    }

    if columns.is_empty() {
        return Err(CompileError::schema(&name, "no persisted columns"));
    }

    Ok(TableSchema {
        entity,
        table: def.table,
        alias: def.alias,
        columns,
        relations,
    })
}
