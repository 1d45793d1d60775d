//! Microsoft Access (Jet/ACE) dialect.
//!
//! - Square bracket identifier quoting
//! - TRUE/FALSE literals, `#m/d/yyyy H:mm:ss#` dates
//! - `{guid {...}}` GUID literals, no binary literals
//! - TOP for limiting, no offset
//! - UCASE/LCASE/LEN, infix MOD
//! - `Table AS alias` in FROM
//! - AUTOINCREMENT as a column type
//! - One row per INSERT, no SQL query for table existence

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use uuid::Uuid;

use super::helpers;
use super::{AutoIncrement, LimitType, SqlDialect};
use crate::error::{CompileError, CompileResult};
use crate::sql::ddl::ReferentialAction;
use crate::sql::types::ColumnType;

/// Microsoft Access dialect.
#[derive(Debug, Clone, Copy)]
pub struct Access;

impl SqlDialect for Access {
    fn name(&self) -> &'static str {
        "access"
    }

    fn quote_column(&self, ident: &str) -> String {
        helpers::quote_bracket(ident)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_keyword(b)
    }

    fn format_datetime(&self, dt: &NaiveDateTime) -> String {
        helpers::format_datetime_access(dt)
    }

    fn format_date(&self, d: &NaiveDate) -> String {
        helpers::format_date_access(d)
    }

    fn format_time(&self, t: &NaiveTime) -> String {
        format!("#{}:{:02}:{:02}#", t.hour(), t.minute(), t.second())
    }

    fn format_guid(&self, g: &Uuid) -> String {
        format!("{{guid {{{g}}}}}")
    }

    fn format_bytes(&self, _bytes: &[u8]) -> CompileResult<String> {
        Err(CompileError::unknown_literal(self.name(), "bytes"))
    }

    fn limit_type(&self) -> LimitType {
        LimitType::Top
    }

    fn modulo_operator(&self) -> &'static str {
        "MOD"
    }

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        helpers::remap_function_access(name)
    }

    fn table_alias_keyword(&self) -> bool {
        true
    }

    fn column_type_definition(&self, ty: ColumnType, length: u32) -> String {
        helpers::column_type_access(ty, length)
    }

    fn auto_increment(&self) -> AutoIncrement {
        AutoIncrement::ReplacesType("AUTOINCREMENT")
    }

    fn supports_referential_action(&self, action: ReferentialAction, _on_update: bool) -> bool {
        !matches!(
            action,
            ReferentialAction::Restrict | ReferentialAction::SetDefault
        )
    }

    fn table_exists_query(&self, _table: &str) -> CompileResult<String> {
        Err(CompileError::not_supported(self.name(), "table existence query"))
    }

    fn insert_default_row(&self, _table: &str, _key: &str) -> CompileResult<String> {
        Err(CompileError::not_supported(self.name(), "INSERT without column values"))
    }

    fn max_batch_rows(&self) -> usize {
        1
    }

    fn max_identifier_length(&self) -> Option<usize> {
        Some(64)
    }
}
