//! # Heron
//!
//! Compiles typed entity expressions into SQL text for MySQL, SQL Server,
//! Oracle, SQLite and Access.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │        Entity metadata (describe() per entity type)      │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [schema registry]
//! ┌─────────────────────────────────────────────────────────┐
//! │        TableSchema (columns, keys, foreign keys)         │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!  Field<E, T> ──► Expression trees
//!                          │
//!                          ▼ [translate]
//! ┌─────────────────────────────────────────────────────────┐
//! │              SQL AST (Expr, Query, DML, DDL)             │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [dialect]
//! ┌─────────────────────────────────────────────────────────┐
//! │                       SQL text                           │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use heron::prelude::*;
//!
//! struct Country {
//!     id: i32,
//!     name: String,
//! }
//!
//! impl Country {
//!     const ID: Field<Country, i32> = Field::new("Id");
//!     const NAME: Field<Country, String> = Field::new("Name");
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
//! let sql = SelectArgs::select::<Country>([Country::NAME])
//!     .and_where(Country::ID.eq(1))
//!     .to_sql()
//!     .unwrap();
//! assert_eq!(sql, "SELECT `Name` FROM Country WHERE Country.`ID` = 1");
//! ```

pub mod config;
pub mod error;
pub mod expression;
pub mod options;
pub mod schema;
pub mod sql;
pub mod statement;
pub mod translate;

pub use error::{CompileError, CompileResult};
pub use options::{CompileOptions, EnumMode};
pub use sql::dialect::{Dialect, SqlDialect};

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::error::{CompileError, CompileResult};
    pub use crate::expression::{
        avg, count, count_all, exists, max, min, not_exists, sum, Expression, Field,
        IntoExpression, ValueList,
    };
    pub use crate::options::{CompileOptions, EnumMode};
    pub use crate::schema::{Entity, EntityDef, FieldDef, Row, SchemaRegistry};
    pub use crate::sql::ddl::ReferentialAction;
    pub use crate::sql::dialect::{Dialect, SqlDialect};
    pub use crate::sql::types::{ColumnType, SqlEnum, Value};
    pub use crate::statement::{
        DeleteArgs, InsertArgs, SelectArgs, TableArgs, UpdateArgs, Where, STATEMENT_SEPARATOR,
    };
}
