//! Entities shared by the integration tests.

#![allow(dead_code)]

use heron::prelude::*;
use sqlparser::dialect::{GenericDialect, MsSqlDialect, MySqlDialect, SQLiteDialect};
use sqlparser::parser::Parser;
use uuid::Uuid;

pub struct TestClass {
    pub id: i32,
    pub guid: Uuid,
    pub name: Option<String>,
    pub active: bool,
}

impl TestClass {
    pub const ID: Field<TestClass, i32> = Field::new("Id");
    pub const GUID: Field<TestClass, Uuid> = Field::new("Guid");
    pub const NAME: Field<TestClass, Option<String>> = Field::new("Name");
    pub const ACTIVE: Field<TestClass, bool> = Field::new("Active");

    pub fn new(id: i32, name: &str) -> Self {
        Self {
            id,
            guid: Uuid::from_u128(id as u128),
            name: Some(name.to_string()),
            active: true,
        }
    }
}

impl Entity for TestClass {
    fn describe() -> EntityDef {
        EntityDef::new("TestClass")
            .field(FieldDef::scalar("Id", ColumnType::Int32).column_name("ID").auto_increment())
            .field(FieldDef::scalar("Guid", ColumnType::Guid))
            .field(FieldDef::scalar("Name", ColumnType::String).length(50).nullable())
            .field(FieldDef::scalar("Active", ColumnType::Bool))
    }

    fn row(&self) -> Row {
        Row::new()
            .set("Id", self.id)
            .set("Guid", self.guid)
            .set("Name", self.name.clone())
            .set("Active", self.active)
    }
}

pub struct TestClass2 {
    pub id: i32,
    pub name: String,
    pub parent_id: i32,
}

impl TestClass2 {
    pub const ID: Field<TestClass2, i32> = Field::new("Id");
    pub const NAME: Field<TestClass2, String> = Field::new("Name");
    pub const PARENT: Field<TestClass2, i32> = Field::new("Parent");
}

impl Entity for TestClass2 {
    fn describe() -> EntityDef {
        EntityDef::new("TestClass2")
            .field(FieldDef::scalar("Id", ColumnType::Int32).column_name("ID").auto_increment())
            .field(FieldDef::scalar("Name", ColumnType::String).length(50))
            .field(FieldDef::reference::<TestClass>("Parent").foreign_key())
    }

    fn row(&self) -> Row {
        Row::new()
            .set("Id", self.id)
            .set("Name", self.name.as_str())
            .set("Parent", self.parent_id)
    }
}

pub struct Country {
    pub id: i32,
    pub name: String,
    pub code: String,
}

impl Country {
    pub const ID: Field<Country, i32> = Field::new("Id");
    pub const NAME: Field<Country, String> = Field::new("Name");
    pub const CODE: Field<Country, String> = Field::new("Code");
}

impl Entity for Country {
    fn describe() -> EntityDef {
        EntityDef::new("Country")
            .field(FieldDef::scalar("Id", ColumnType::Int32).column_name("ID").auto_increment())
            .field(FieldDef::scalar("Name", ColumnType::String).length(50))
            .field(FieldDef::scalar("Code", ColumnType::String).length(2).unique_index())
            .field(FieldDef::collection::<Company>("Companies"))
    }

    fn row(&self) -> Row {
        Row::new()
            .set("Id", self.id)
            .set("Name", self.name.as_str())
            .set("Code", self.code.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompanyKind {
    Private,
    Public,
}

impl SqlEnum for CompanyKind {
    fn variant_name(&self) -> &'static str {
        match self {
            CompanyKind::Private => "Private",
            CompanyKind::Public => "Public",
        }
    }

    fn discriminant(&self) -> i64 {
        match self {
            CompanyKind::Private => 0,
            CompanyKind::Public => 1,
        }
    }
}

pub struct Company {
    pub id: i32,
    pub name: String,
    pub country_id: i32,
    pub kind: CompanyKind,
}

impl Company {
    pub const ID: Field<Company, i32> = Field::new("Id");
    pub const NAME: Field<Company, String> = Field::new("Name");
    pub const COUNTRY: Field<Company, i32> = Field::new("Country");
    pub const KIND: Field<Company, CompanyKind> = Field::new("Kind");
}

impl Entity for Company {
    fn describe() -> EntityDef {
        EntityDef::new("Company")
            .field(FieldDef::scalar("Id", ColumnType::Int32).column_name("ID").auto_increment())
            .field(FieldDef::scalar("Name", ColumnType::String).length(100))
            .field(
                FieldDef::reference::<Country>("Country")
                    .foreign_key()
                    .on_delete(ReferentialAction::Cascade)
                    .index(),
            )
            .field(FieldDef::scalar("Kind", ColumnType::Enum))
    }

    fn row(&self) -> Row {
        Row::new()
            .set("Id", self.id)
            .set("Name", self.name.as_str())
            .set("Country", self.country_id)
            .set("Kind", Value::from_enum(&self.kind))
    }
}

/// Parse `sql` with sqlparser, panicking with the parser error.
pub fn validate(sql: &str, dialect: Dialect) {
    let parser_dialect: Box<dyn sqlparser::dialect::Dialect> = match dialect {
        Dialect::MySql => Box::new(MySqlDialect {}),
        Dialect::MsSql => Box::new(MsSqlDialect {}),
        Dialect::Sqlite => Box::new(SQLiteDialect {}),
        Dialect::Oracle | Dialect::Access => Box::new(GenericDialect {}),
    };
    if let Err(e) = Parser::parse_sql(&*parser_dialect, sql) {
        panic!("invalid SQL for {dialect}: {e}\nSQL: {sql}");
    }
}
