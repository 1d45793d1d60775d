//! Tables visible to one statement and how their columns are qualified.

use std::sync::Arc;

use crate::error::{CompileError, CompileResult};
use crate::expression::Member;
use crate::schema::{ColumnSchema, EntityRef, TableSchema};
use crate::sql::query::TableRef;

/// The entities a statement reads from: the primary table first, then
/// joined and implicitly referenced tables in the order they were added.
///
/// A subquery scope also sees the tables of its enclosing statements.
/// Those are never added to the subquery's FROM list and keep the
/// qualifier they render with in the enclosing statement.
#[derive(Debug, Clone)]
pub struct Scope {
    tables: Vec<Arc<TableSchema>>,
    outer: Vec<(Arc<TableSchema>, String)>,
}

impl Scope {
    pub fn new(primary: EntityRef) -> CompileResult<Self> {
        Ok(Self {
            tables: vec![primary.schema()?],
            outer: Vec::new(),
        })
    }

    /// Scope of a subquery nested in `enclosing`.
    pub fn nested(primary: EntityRef, enclosing: &Scope) -> CompileResult<Self> {
        let mut outer: Vec<_> = enclosing
            .tables
            .iter()
            .map(|t| (Arc::clone(t), enclosing.qualifier(t).to_string()))
            .collect();
        outer.extend(
            enclosing
                .outer
                .iter()
                .filter(|(t, _)| !enclosing.contains(t.entity))
                .cloned(),
        );
        Ok(Self {
            tables: vec![primary.schema()?],
            outer,
        })
    }

    /// Add an entity. Returns `false` when it was already in scope.
    pub fn add(&mut self, entity: EntityRef) -> CompileResult<bool> {
        if self.contains(entity) {
            return Ok(false);
        }
        self.tables.push(entity.schema()?);
        Ok(true)
    }

    pub fn primary(&self) -> &TableSchema {
        &self.tables[0]
    }

    pub fn contains(&self, entity: EntityRef) -> bool {
        self.tables.iter().any(|t| t.entity == entity)
    }

    /// Whether `entity` belongs to an enclosing statement rather than this one.
    pub fn is_outer(&self, entity: EntityRef) -> bool {
        !self.contains(entity) && self.outer.iter().any(|(t, _)| t.entity == entity)
    }

    pub fn is_multi_table(&self) -> bool {
        self.tables.len() > 1
    }

    pub fn tables(&self) -> impl Iterator<Item = &TableSchema> {
        self.tables.iter().map(|t| t.as_ref())
    }

    pub fn schema(&self, entity: EntityRef) -> Option<&TableSchema> {
        self.tables().find(|t| t.entity == entity)
    }

    /// Name columns of `schema` are qualified with: its alias once more than
    /// one table is involved, otherwise the table name.
    pub fn qualifier<'a>(&self, schema: &'a TableSchema) -> &'a str {
        match &schema.alias {
            Some(alias) if self.is_multi_table() => alias,
            _ => &schema.table,
        }
    }

    /// FROM/JOIN entry for `schema`, aliased when the qualifier is an alias.
    pub fn table_ref(&self, schema: &TableSchema) -> TableRef {
        let table = TableRef::new(&schema.table);
        match &schema.alias {
            Some(alias) if self.is_multi_table() => table.with_alias(alias),
            _ => table,
        }
    }

    /// Resolve a member to its qualifier and column. Tables of this
    /// statement shadow those of enclosing statements.
    pub fn resolve(&self, member: &Member) -> CompileResult<(&str, &ColumnSchema)> {
        let (schema, qualifier) = match self.schema(member.entity) {
            Some(schema) => (schema, self.qualifier(schema)),
            None => self
                .outer
                .iter()
                .find(|(t, _)| t.entity == member.entity)
                .map(|(t, q)| (t.as_ref(), q.as_str()))
                .ok_or_else(|| {
                    CompileError::unsupported(member, "entity is not part of this statement")
                })?,
        };
        let column = schema.column_for_field(member.field).ok_or_else(|| {
            CompileError::unsupported(member, "field is not a persisted column")
        })?;
        Ok((qualifier, column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Entity, EntityDef, FieldDef, Row};
    use crate::sql::types::ColumnType;

    struct Left;
    impl Entity for Left {
        fn describe() -> EntityDef {
            EntityDef::new("LeftTable")
                .alias("l")
                .field(FieldDef::scalar("Id", ColumnType::Int32))
                .field(FieldDef::scalar("Notes", ColumnType::String).ignore())
        }
        fn row(&self) -> Row {
            Row::new()
        }
    }

    struct Right;
    impl Entity for Right {
        fn describe() -> EntityDef {
            EntityDef::new("RightTable").field(FieldDef::scalar("Id", ColumnType::Int32))
        }
        fn row(&self) -> Row {
            Row::new()
        }
    }

    #[test]
    fn test_alias_only_when_multi_table() {
        let mut scope = Scope::new(EntityRef::of::<Left>()).unwrap();
        assert_eq!(scope.qualifier(scope.primary()), "LeftTable");

        assert!(scope.add(EntityRef::of::<Right>()).unwrap());
        assert!(!scope.add(EntityRef::of::<Right>()).unwrap());
        assert_eq!(scope.qualifier(scope.primary()), "l");
        assert_eq!(scope.table_ref(scope.primary()), TableRef::new("LeftTable").with_alias("l"));
    }

    #[test]
    fn test_nested_scope_sees_enclosing_tables() {
        let mut enclosing = Scope::new(EntityRef::of::<Left>()).unwrap();
        enclosing.add(EntityRef::of::<Right>()).unwrap();

        let inner = Scope::nested(EntityRef::of::<Right>(), &enclosing).unwrap();
        assert!(!inner.is_multi_table());
        assert!(inner.is_outer(EntityRef::of::<Left>()));
        assert!(!inner.is_outer(EntityRef::of::<Right>()));

        let left = Member {
            entity: EntityRef::of::<Left>(),
            field: "Id",
        };
        assert_eq!(inner.resolve(&left).unwrap().0, "l");
        let right = Member {
            entity: EntityRef::of::<Right>(),
            field: "Id",
        };
        assert_eq!(inner.resolve(&right).unwrap().0, "RightTable");
    }

    #[test]
    fn test_resolve_errors() {
        let scope = Scope::new(EntityRef::of::<Left>()).unwrap();
        let ignored = Member {
            entity: EntityRef::of::<Left>(),
            field: "Notes",
        };
        assert!(scope.resolve(&ignored).is_err());

        let outside = Member {
            entity: EntityRef::of::<Right>(),
            field: "Id",
        };
        assert!(scope.resolve(&outside).is_err());
    }
}
