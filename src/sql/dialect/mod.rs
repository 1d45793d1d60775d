//! SQL Dialect definitions and formatting rules.
//!
//! This module provides a trait-based abstraction for SQL dialect differences.
//! Each dialect implements `SqlDialect` to handle its specific syntax:
//!
//! - Identifier quoting: `` ` `` (MySQL columns), `[]` (MSSQL/Access), `"` (Oracle/SQLite)
//! - Pagination: `LIMIT o,c` vs `TOP c` vs a `ROWNUM` wrapper
//! - Literal formats for booleans, floats, dates, GUIDs and binary data
//! - Column type definitions and auto-increment strategy for DDL
//! - Batch limits for multi-row INSERT and DELETE
//!
//! # Usage
//!
//! ```
//! use heron::sql::dialect::{Dialect, SqlDialect};
//!
//! let dialect = Dialect::MsSql;
//! assert_eq!(dialect.quote_column("Name"), "[Name]");
//! ```
//!
//! # Capabilities
//!
//! | Feature | MySQL | MSSQL | Oracle | SQLite | Access |
//! |---------|-------|-------|--------|--------|--------|
//! | Paging | LIMIT | TOP | ROWNUM | LIMIT | TOP |
//! | Offset | ✓ | ❌ | ✓ | ✓ | ❌ |
//! | Rows per INSERT | 1000 | 1000 | 1 | 500 | 1 |
//! | Identifier length | 64 | 128 | 30 | - | 64 |
//! | Auto-increment | AUTO_INCREMENT | IDENTITY | sequence + trigger | AUTOINCREMENT | AUTOINCREMENT type |
//! | Table existence check | ✓ | ✓ | ✓ | ✓ | ❌ |

mod access;
pub mod helpers;
mod mssql;
mod mysql;
mod oracle;
mod sqlite;

pub use access::Access;
pub use mssql::MsSql;
pub use mysql::MySql;
pub use oracle::Oracle;
pub use sqlite::Sqlite;

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ddl::ReferentialAction;
use super::token::TokenStream;
use super::types::{ColumnType, Value};
use crate::error::{CompileError, CompileResult};

/// How a dialect restricts the number of returned rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitType {
    /// No paging support at all.
    None,
    /// `SELECT TOP n ...`, no offset.
    Top,
    /// Trailing `LIMIT offset,count`.
    Limit,
    /// Subquery wrapper filtered on `ROWNUM`.
    RowNum,
}

/// How an auto-increment column is declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoIncrement {
    /// Keyword after the column type: `INT AUTO_INCREMENT`.
    Inline(&'static str),
    /// Keyword after the inline primary key: `INTEGER PRIMARY KEY AUTOINCREMENT`.
    AfterPrimaryKey(&'static str),
    /// Keyword used in place of the column type.
    ReplacesType(&'static str),
    /// Separate sequence and insert trigger.
    SequenceTrigger,
}

/// SQL dialect trait - defines how SQL constructs are rendered.
///
/// Implementations handle dialect-specific syntax differences.
/// The default implementations cover what most of the supported engines share.
pub trait SqlDialect: std::fmt::Debug {
    /// Dialect name for display/logging.
    fn name(&self) -> &'static str;

    // =========================================================================
    // Identifier and Literal Quoting
    // =========================================================================

    /// Quote a column name.
    ///
    /// - MySQL: `` `column` ``
    /// - MSSQL/Access: `[column]`
    /// - Oracle/SQLite: `"column"`
    fn quote_column(&self, ident: &str) -> String;

    /// Quote a table name or table alias. Defaults to the column quote.
    ///
    /// MySQL leaves table names bare.
    fn quote_table(&self, ident: &str) -> String {
        self.quote_column(ident)
    }

    /// Quote a string literal.
    ///
    /// All dialects use single quotes with `''` for escaping.
    /// Override for Unicode prefix (MSSQL N'...').
    fn quote_string(&self, s: &str) -> String {
        helpers::quote_string_single(s)
    }

    /// Format a boolean literal.
    ///
    /// - MySQL/MSSQL/Oracle/SQLite: `1`/`0`
    /// - Access: `TRUE`/`FALSE`
    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_numeric(b)
    }

    /// Format a NULL literal.
    fn format_null(&self) -> &'static str {
        "NULL"
    }

    /// Format a double. Non-finite values are rejected unless overridden.
    fn format_f64(&self, f: f64) -> CompileResult<String> {
        helpers::format_f64(f)
            .ok_or_else(|| CompileError::not_supported(self.name(), format!("float literal {f}")))
    }

    /// Format a single. Non-finite values are rejected unless overridden.
    fn format_f32(&self, f: f32) -> CompileResult<String> {
        helpers::format_f32(f)
            .ok_or_else(|| CompileError::not_supported(self.name(), format!("float literal {f}")))
    }

    // =========================================================================
    // Date/Time
    // =========================================================================

    /// Format a date and time literal.
    ///
    /// - MySQL/SQLite: `'YYYY-MM-DD HH:MM:SS[.fff]'`
    /// - MSSQL: `'YYYY-MM-DDTHH:MM:SS[.fff]'`
    /// - Oracle: `TO_DATE(...)` / `TO_TIMESTAMP(...)`
    /// - Access: `#m/d/yyyy H:mm:ss#`
    fn format_datetime(&self, dt: &NaiveDateTime) -> String {
        helpers::format_datetime_quoted(dt)
    }

    /// Format a date literal: `'YYYY-MM-DD'` by default.
    fn format_date(&self, d: &NaiveDate) -> String {
        format!("'{}'", helpers::date_text(d))
    }

    /// Format a time-of-day literal: `'HH:MM:SS[.fff]'` by default.
    fn format_time(&self, t: &NaiveTime) -> String {
        format!("'{}'", helpers::time_text(t))
    }

    // =========================================================================
    // Other Literals
    // =========================================================================

    /// Format a GUID literal as a quoted string by default.
    fn format_guid(&self, g: &Uuid) -> String {
        self.quote_string(&g.to_string())
    }

    /// Format a binary literal.
    ///
    /// - MySQL/SQLite: `X'0A0B'`
    /// - MSSQL: `0x0A0B`
    /// - Oracle: `HEXTORAW('0A0B')`
    /// - Access: no literal form
    fn format_bytes(&self, bytes: &[u8]) -> CompileResult<String> {
        Ok(format!("X'{}'", helpers::hex_upper(bytes)))
    }

    /// Render any literal value.
    ///
    /// Enum values render as their integer value here. Callers that want
    /// member names resolve them first (see `CompileOptions::resolve_value`).
    fn format_literal(&self, value: &Value) -> CompileResult<String> {
        match value {
            Value::Null => Ok(self.format_null().into()),
            Value::Bool(b) => Ok(self.format_bool(*b).into()),
            Value::Int(n) => Ok(n.to_string()),
            Value::UInt(n) => Ok(n.to_string()),
            Value::Float32(f) => self.format_f32(*f),
            Value::Float64(f) => self.format_f64(*f),
            Value::Decimal(d) => Ok(d.normalize().to_string()),
            Value::String(s) => Ok(self.quote_string(s)),
            Value::Char(c) => Ok(self.quote_string(&c.to_string())),
            Value::DateTime(dt) => Ok(self.format_datetime(dt)),
            Value::Date(d) => Ok(self.format_date(d)),
            Value::Time(t) => Ok(self.format_time(t)),
            Value::Guid(g) => Ok(self.format_guid(g)),
            Value::Bytes(b) => self.format_bytes(b),
            Value::Enum { value, .. } => Ok(value.to_string()),
            Value::List(_) => Err(CompileError::unknown_literal(
                self.name(),
                value.type_name(),
            )),
        }
    }

    // =========================================================================
    // Pagination
    // =========================================================================

    /// Paging strategy.
    fn limit_type(&self) -> LimitType;

    /// Emit the trailing LIMIT clause for `LimitType::Limit` dialects.
    ///
    /// A zero `count` with a positive offset means "every row after offset".
    /// The default spells that with the largest unsigned 64-bit value (MySQL).
    fn emit_limit(&self, offset: u64, count: u64) -> TokenStream {
        helpers::emit_limit_comma(offset, count, "18446744073709551615")
    }

    // =========================================================================
    // Operators and Functions
    // =========================================================================

    /// Infix modulo operator.
    fn modulo_operator(&self) -> &'static str {
        "%"
    }

    /// Whether modulo is written as a `MOD(a, b)` call (Oracle).
    fn modulo_as_function(&self) -> bool {
        false
    }

    /// Remap a function name for this dialect.
    ///
    /// - `UPPER` → `UCASE`, `LOWER` → `LCASE` (Access)
    /// - `LENGTH` → `LEN` (MSSQL, Access)
    ///
    /// Returns `Some(new_name)` if the function should be remapped, `None` to keep original.
    /// The input is matched case-insensitively.
    fn remap_function(&self, name: &str) -> Option<&'static str> {
        let _ = name;
        None
    }

    /// Whether FROM-clause aliases need the AS keyword (Access).
    fn table_alias_keyword(&self) -> bool {
        false
    }

    // =========================================================================
    // DDL Support
    // =========================================================================

    /// Column type definition for a host type. `length` 0 means unbounded.
    fn column_type_definition(&self, ty: ColumnType, length: u32) -> String;

    /// Auto-increment strategy.
    fn auto_increment(&self) -> AutoIncrement;

    /// Name of the generated sequence/trigger for an auto-increment column.
    fn auto_increment_name(&self, table: &str, column: &str) -> String {
        helpers::truncate_identifier(&format!("{table}_{column}"), self.max_identifier_length())
    }

    /// Statements that must run after CREATE TABLE to make `column`
    /// auto-increment. Empty unless the strategy is `SequenceTrigger`.
    fn create_auto_increment_statements(&self, table: &str, column: &str) -> Vec<String> {
        let _ = (table, column);
        Vec::new()
    }

    /// Statements that must run before DROP TABLE to remove the
    /// auto-increment machinery of `column`.
    fn drop_auto_increment_statements(&self, table: &str, column: &str) -> Vec<String> {
        let _ = (table, column);
        Vec::new()
    }

    /// Whether a foreign key may carry `action` for ON DELETE (or ON UPDATE
    /// when `on_update` is set).
    fn supports_referential_action(&self, action: ReferentialAction, on_update: bool) -> bool {
        let _ = (action, on_update);
        true
    }

    /// Query returning a row when `table` exists.
    fn table_exists_query(&self, table: &str) -> CompileResult<String>;

    /// INSERT of one row whose only written column, `key`, is
    /// engine-assigned.
    fn insert_default_row(&self, table: &str, key: &str) -> CompileResult<String> {
        let _ = key;
        Ok(format!("INSERT INTO {} DEFAULT VALUES", self.quote_table(table)))
    }

    // =========================================================================
    // Limits
    // =========================================================================

    /// Most rows a single INSERT may carry.
    fn max_batch_rows(&self) -> usize;

    /// Longest identifier in bytes, `None` for unlimited.
    fn max_identifier_length(&self) -> Option<usize>;

    /// Whether a DELETE may target several keys at once.
    fn supports_multi_row_delete(&self) -> bool {
        self.max_batch_rows() > 1
    }
}

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    MySql,
    #[serde(alias = "sqlserver", alias = "tsql")]
    MsSql,
    Oracle,
    Sqlite,
    #[serde(alias = "jet")]
    Access,
}

impl Dialect {
    /// Every supported dialect.
    pub const ALL: [Dialect; 5] = [
        Dialect::MySql,
        Dialect::MsSql,
        Dialect::Oracle,
        Dialect::Sqlite,
        Dialect::Access,
    ];

    /// Get the dialect implementation.
    pub fn dialect(&self) -> &'static dyn SqlDialect {
        match self {
            Dialect::MySql => &MySql,
            Dialect::MsSql => &MsSql,
            Dialect::Oracle => &Oracle,
            Dialect::Sqlite => &Sqlite,
            Dialect::Access => &Access,
        }
    }
}

/// Error returned when parsing an unknown dialect name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown dialect '{0}' (expected mysql, mssql, oracle, sqlite or access)")]
pub struct UnknownDialect(pub String);

impl FromStr for Dialect {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mysql" => Ok(Dialect::MySql),
            "mssql" | "sqlserver" | "tsql" => Ok(Dialect::MsSql),
            "oracle" => Ok(Dialect::Oracle),
            "sqlite" => Ok(Dialect::Sqlite),
            "access" | "jet" => Ok(Dialect::Access),
            _ => Err(UnknownDialect(s.to_string())),
        }
    }
}

// Implement SqlDialect for Dialect enum by delegating to concrete types
impl SqlDialect for Dialect {
    fn name(&self) -> &'static str {
        self.dialect().name()
    }

    fn quote_column(&self, ident: &str) -> String {
        self.dialect().quote_column(ident)
    }

    fn quote_table(&self, ident: &str) -> String {
        self.dialect().quote_table(ident)
    }

    fn quote_string(&self, s: &str) -> String {
        self.dialect().quote_string(s)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        self.dialect().format_bool(b)
    }

    fn format_null(&self) -> &'static str {
        self.dialect().format_null()
    }

    fn format_f64(&self, f: f64) -> CompileResult<String> {
        self.dialect().format_f64(f)
    }

    fn format_f32(&self, f: f32) -> CompileResult<String> {
        self.dialect().format_f32(f)
    }

    fn format_datetime(&self, dt: &NaiveDateTime) -> String {
        self.dialect().format_datetime(dt)
    }

    fn format_date(&self, d: &NaiveDate) -> String {
        self.dialect().format_date(d)
    }

    fn format_time(&self, t: &NaiveTime) -> String {
        self.dialect().format_time(t)
    }

    fn format_guid(&self, g: &Uuid) -> String {
        self.dialect().format_guid(g)
    }

    fn format_bytes(&self, bytes: &[u8]) -> CompileResult<String> {
        self.dialect().format_bytes(bytes)
    }

    fn format_literal(&self, value: &Value) -> CompileResult<String> {
        self.dialect().format_literal(value)
    }

    fn limit_type(&self) -> LimitType {
        self.dialect().limit_type()
    }

    fn emit_limit(&self, offset: u64, count: u64) -> TokenStream {
        self.dialect().emit_limit(offset, count)
    }

    fn modulo_operator(&self) -> &'static str {
        self.dialect().modulo_operator()
    }

    fn modulo_as_function(&self) -> bool {
        self.dialect().modulo_as_function()
    }

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        self.dialect().remap_function(name)
    }

    fn table_alias_keyword(&self) -> bool {
        self.dialect().table_alias_keyword()
    }

    fn column_type_definition(&self, ty: ColumnType, length: u32) -> String {
        self.dialect().column_type_definition(ty, length)
    }

    fn auto_increment(&self) -> AutoIncrement {
        self.dialect().auto_increment()
    }

    fn auto_increment_name(&self, table: &str, column: &str) -> String {
        self.dialect().auto_increment_name(table, column)
    }

    fn create_auto_increment_statements(&self, table: &str, column: &str) -> Vec<String> {
        self.dialect().create_auto_increment_statements(table, column)
    }

    fn drop_auto_increment_statements(&self, table: &str, column: &str) -> Vec<String> {
        self.dialect().drop_auto_increment_statements(table, column)
    }

    fn supports_referential_action(&self, action: ReferentialAction, on_update: bool) -> bool {
        self.dialect().supports_referential_action(action, on_update)
    }

    fn table_exists_query(&self, table: &str) -> CompileResult<String> {
        self.dialect().table_exists_query(table)
    }

    fn insert_default_row(&self, table: &str, key: &str) -> CompileResult<String> {
        self.dialect().insert_default_row(table, key)
    }

    fn max_batch_rows(&self) -> usize {
        self.dialect().max_batch_rows()
    }

    fn max_identifier_length(&self) -> Option<usize> {
        self.dialect().max_identifier_length()
    }

    fn supports_multi_row_delete(&self) -> bool {
        self.dialect().supports_multi_row_delete()
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.dialect().name())
    }
}
