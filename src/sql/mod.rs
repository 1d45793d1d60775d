//! SQL generation module.
//!
//! This module renders the fragment trees produced by the translator into
//! dialect-specific SQL text. It includes:
//!
//! - [`query`] - SELECT rendering, joins and paging
//! - [`expr`] - Expression fragment AST
//! - [`ddl`] - CREATE TABLE, CREATE INDEX, DROP TABLE
//! - [`dml`] - INSERT, UPDATE, DELETE
//! - [`token`] - Token types for SQL generation
//! - [`dialect`] - SQL dialect implementations
//! - [`types`] - Column types and literal values

pub mod ddl;
pub mod dialect;
pub mod dml;
pub mod expr;
pub mod query;
pub mod token;
pub mod types;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types at the sql module level
pub use dialect::{AutoIncrement, Dialect, LimitType, SqlDialect};
pub use expr::{BinaryOperator, Expr, SortDir};
pub use query::{Join, JoinType, OrderByExpr, Paging, Query, TableRef};
pub use token::{Token, TokenStream};
pub use types::{ColumnType, SqlEnum, Value};

// Re-export DDL types
pub use ddl::{ColumnDef, CreateIndex, CreateTable, DropTable, ReferentialAction, TableConstraint};

// Re-export DML types
pub use dml::{Delete, Insert, Update};
