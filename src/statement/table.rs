//! CREATE / DROP TABLE arguments for an entity.

use tracing::debug;

use super::STATEMENT_SEPARATOR;
use crate::error::CompileResult;
use crate::options::{CompileOptions, EnumMode};
use crate::schema::{ColumnSchema, Entity, EntityRef, TableSchema};
use crate::sql::ddl::{ColumnDef, CreateIndex, CreateTable, DropTable, TableConstraint};
use crate::sql::dialect::{helpers, Dialect, SqlDialect};
use crate::sql::types::ColumnType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Create,
    Drop,
}

/// DDL for the table of one entity.
///
/// CREATE emits the table with its primary and foreign keys, one index per
/// indexed column, then any auto-increment objects the dialect needs. DROP
/// removes those objects first, then the table.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "statement arguments have no effect until rendered with to_sql()"]
pub struct TableArgs {
    entity: EntityRef,
    action: Action,
    options: CompileOptions,
}

impl TableArgs {
    pub fn create<E: Entity>() -> Self {
        Self::new::<E>(Action::Create)
    }

    pub fn drop<E: Entity>() -> Self {
        Self::new::<E>(Action::Drop)
    }

    fn new<E: Entity>(action: Action) -> Self {
        Self {
            entity: EntityRef::of::<E>(),
            action,
            options: CompileOptions::default(),
        }
    }

    pub fn options(mut self, options: CompileOptions) -> Self {
        self.options = options;
        self
    }

    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.options.dialect = dialect;
        self
    }

    /// Statements in execution order.
    pub fn statements(&self) -> CompileResult<Vec<String>> {
        let schema = self.entity.schema()?;
        let statements = match self.action {
            Action::Create => self.create_statements(&schema)?,
            Action::Drop => self.drop_statements(&schema),
        };
        debug!(
            table = %schema.table,
            dialect = %self.options.dialect,
            statements = statements.len(),
            "rendered table ddl"
        );
        Ok(statements)
    }

    pub fn to_sql(&self) -> CompileResult<String> {
        Ok(self.statements()?.join(STATEMENT_SEPARATOR))
    }

    fn identifier(&self, name: String) -> String {
        helpers::truncate_identifier(&name, self.options.dialect.max_identifier_length())
    }

    fn column_def(&self, column: &ColumnSchema) -> ColumnDef {
        let column_type = match (column.column_type, self.options.enum_mode) {
            (ColumnType::Enum, EnumMode::Name) => ColumnType::String,
            (ty, _) => ty,
        };
        let mut def = ColumnDef::new(&column.name, column_type).length(column.length);
        if column.nullable {
            def = def.nullable();
        }
        if column.auto_increment {
            def = def.auto_increment();
        }
        def
    }

    fn create_statements(&self, schema: &TableSchema) -> CompileResult<Vec<String>> {
        let dialect = self.options.dialect;
        let table = &schema.table;

        let mut create = CreateTable::new(table);
        for column in &schema.columns {
            create = create.column(self.column_def(column));
        }
        if let Some(key) = schema.key() {
            create = create.constraint(TableConstraint::primary_key(
                self.identifier(format!("PK_{table}")),
                [key.name.as_str()],
            ));
        }
        for column in &schema.columns {
            if let Some(fk) = &column.foreign_key {
                create = create.constraint(
                    TableConstraint::foreign_key(
                        self.identifier(format!("FK_{table}_{}", column.name)),
                        [column.name.as_str()],
                        &fk.target_table,
                        [fk.target_column.as_str()],
                    )
                    .with_actions(fk.on_delete, fk.on_update),
                );
            }
        }

        let mut statements = vec![create.to_sql(dialect)?];
        for column in &schema.columns {
            if let Some(unique) = column.index {
                let mut index =
                    CreateIndex::new(self.identifier(format!("IX_{table}_{}", column.name)), table)
                        .column(&column.name);
                if unique {
                    index = index.unique();
                }
                statements.push(index.to_sql(dialect));
            }
        }
        if let Some(column) = schema.auto_increment_column() {
            statements.extend(dialect.create_auto_increment_statements(table, &column.name));
        }
        Ok(statements)
    }

    fn drop_statements(&self, schema: &TableSchema) -> Vec<String> {
        let dialect = self.options.dialect;
        let mut statements = Vec::new();
        if let Some(column) = schema.auto_increment_column() {
            statements.extend(dialect.drop_auto_increment_statements(&schema.table, &column.name));
        }
        statements.push(DropTable::new(&schema.table).to_sql(dialect));
        statements
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompileError;
    use crate::schema::{EntityDef, FieldDef, Row};
    use crate::sql::ddl::ReferentialAction;
    use crate::sql::test_utils::validate_sql;

    struct Region;
    impl Entity for Region {
        fn describe() -> EntityDef {
            EntityDef::new("Region")
                .field(FieldDef::scalar("Id", ColumnType::Int32).column_name("ID").auto_increment())
                .field(FieldDef::scalar("Code", ColumnType::String).length(8).unique_index())
        }
        fn row(&self) -> Row {
            Row::new()
        }
    }

    struct Store;
    impl Entity for Store {
        fn describe() -> EntityDef {
            EntityDef::new("Store")
                .field(FieldDef::scalar("Id", ColumnType::Int32).column_name("ID").auto_increment())
                .field(
                    FieldDef::reference::<Region>("Region")
                        .foreign_key()
                        .on_delete(ReferentialAction::Cascade)
                        .index(),
                )
                .field(FieldDef::scalar("Kind", ColumnType::Enum).length(20))
                .field(FieldDef::scalar("Notes", ColumnType::String).nullable())
        }
        fn row(&self) -> Row {
            Row::new()
        }
    }

    #[test]
    fn test_create_mysql() {
        let statements = TableArgs::create::<Store>().statements().unwrap();
        assert_eq!(
            statements,
            vec![
                "CREATE TABLE Store (`ID` INT NOT NULL AUTO_INCREMENT, `RegionID` INT NOT NULL, `Kind` INT NOT NULL, `Notes` TEXT, CONSTRAINT PK_Store PRIMARY KEY (`ID`), CONSTRAINT FK_Store_RegionID FOREIGN KEY (`RegionID`) REFERENCES Region (`ID`) ON DELETE CASCADE)",
                "CREATE INDEX IX_Store_RegionID ON Store (`RegionID`)",
            ]
        );
        for sql in &statements {
            validate_sql(sql, Dialect::MySql).unwrap();
        }
    }

    #[test]
    fn test_unique_index_and_enum_names() {
        let statements = TableArgs::create::<Region>()
            .dialect(Dialect::Sqlite)
            .statements()
            .unwrap();
        assert_eq!(
            statements[1],
            "CREATE UNIQUE INDEX \"IX_Region_Code\" ON \"Region\" (\"Code\")"
        );

        let sql = TableArgs::create::<Store>()
            .options(CompileOptions::new(Dialect::MySql).with_enums_as_strings())
            .to_sql()
            .unwrap();
        assert!(sql.contains("`Kind` VARCHAR(20) NOT NULL"));
    }

    #[test]
    fn test_oracle_sequence_and_trigger() {
        let create = TableArgs::create::<Region>()
            .dialect(Dialect::Oracle)
            .statements()
            .unwrap();
        assert_eq!(create.len(), 4);
        assert_eq!(create[2], "CREATE SEQUENCE \"Region_ID\" START WITH 1 INCREMENT BY 1");
        assert!(create[3].starts_with("CREATE OR REPLACE TRIGGER \"Region_ID\""));

        let drop = TableArgs::drop::<Region>().dialect(Dialect::Oracle).statements().unwrap();
        assert_eq!(
            drop,
            vec![
                "DROP TRIGGER \"Region_ID\"",
                "DROP SEQUENCE \"Region_ID\"",
                "DROP TABLE \"Region\"",
            ]
        );
    }

    #[test]
    fn test_drop_without_auto_increment_objects() {
        let sql = TableArgs::drop::<Store>().dialect(Dialect::MsSql).to_sql().unwrap();
        assert_eq!(sql, "DROP TABLE [Store]");
    }

    #[test]
    fn test_unsupported_action_is_reported() {
        struct Strict;
        impl Entity for Strict {
            fn describe() -> EntityDef {
                EntityDef::new("Strict")
                    .field(FieldDef::scalar("Id", ColumnType::Int32).key())
                    .field(
                        FieldDef::reference::<Region>("Region")
                            .foreign_key()
                            .on_update(ReferentialAction::Cascade),
                    )
            }
            fn row(&self) -> Row {
                Row::new()
            }
        }
        let err = TableArgs::create::<Strict>()
            .dialect(Dialect::Oracle)
            .statements()
            .unwrap_err();
        assert!(matches!(err, CompileError::NotSupportedByDialect { .. }));
    }
}
