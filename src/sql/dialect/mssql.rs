//! MSSQL (SQL Server) dialect.
//!
//! MSSQL has significant differences from the others:
//! - Square bracket identifier quoting (`[name]`)
//! - BIT columns, 1/0 literals
//! - TOP for limiting, no offset in the generated SQL
//! - N'...' prefix for Unicode strings
//! - `0x..` binary literals
//! - IDENTITY(1,1) for auto-increment
//! - LEN instead of LENGTH

use chrono::NaiveDateTime;

use super::helpers;
use super::{AutoIncrement, LimitType, SqlDialect};
use crate::error::CompileResult;
use crate::sql::types::ColumnType;

/// MSSQL (SQL Server) dialect.
#[derive(Debug, Clone, Copy)]
pub struct MsSql;

impl SqlDialect for MsSql {
    fn name(&self) -> &'static str {
        "mssql"
    }

    fn quote_column(&self, ident: &str) -> String {
        helpers::quote_bracket(ident)
    }

    fn quote_string(&self, s: &str) -> String {
        if !s.is_ascii() {
            helpers::quote_string_unicode(s)
        } else {
            helpers::quote_string_single(s)
        }
    }

    fn format_datetime(&self, dt: &NaiveDateTime) -> String {
        // The T separator keeps DATETIME parsing independent of SET LANGUAGE.
        format!("'{}'", helpers::datetime_text(dt, 'T'))
    }

    fn format_bytes(&self, bytes: &[u8]) -> CompileResult<String> {
        Ok(format!("0x{}", helpers::hex_upper(bytes)))
    }

    fn limit_type(&self) -> LimitType {
        LimitType::Top
    }

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        helpers::remap_function_mssql(name)
    }

    fn column_type_definition(&self, ty: ColumnType, length: u32) -> String {
        helpers::column_type_mssql(ty, length)
    }

    fn auto_increment(&self) -> AutoIncrement {
        AutoIncrement::Inline("IDENTITY(1,1)")
    }

    fn table_exists_query(&self, table: &str) -> CompileResult<String> {
        Ok(format!(
            "SELECT TABLE_NAME FROM INFORMATION_SCHEMA.TABLES WHERE TABLE_NAME = {}",
            self.quote_string(table)
        ))
    }

    fn max_batch_rows(&self) -> usize {
        1000
    }

    fn max_identifier_length(&self) -> Option<usize> {
        Some(128)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_unicode_strings() {
        assert_eq!(MsSql.quote_string("plain"), "'plain'");
        assert_eq!(MsSql.quote_string("Zürich"), "N'Zürich'");
    }

    #[test]
    fn test_datetime_literal() {
        let dt = NaiveDate::from_ymd_opt(2024, 1, 31)
            .unwrap()
            .and_hms_milli_opt(13, 45, 0, 5)
            .unwrap();
        assert_eq!(MsSql.format_datetime(&dt), "'2024-01-31T13:45:00.005'");
    }

    #[test]
    fn test_identity() {
        assert_eq!(MsSql.auto_increment(), AutoIncrement::Inline("IDENTITY(1,1)"));
        assert!(MsSql.create_auto_increment_statements("T", "ID").is_empty());
    }
}
