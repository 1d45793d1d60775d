//! SQLite SQL dialect.
//!
//! - Double-quote identifier quoting
//! - Dynamic typing, INTEGER/REAL/TEXT/BLOB storage classes
//! - `LIMIT offset,count`, with `-1` as the open bound
//! - AUTOINCREMENT only on `INTEGER PRIMARY KEY`
//! - No identifier length limit

use super::helpers;
use super::{AutoIncrement, LimitType, SqlDialect};
use crate::error::CompileResult;
use crate::sql::token::TokenStream;
use crate::sql::types::ColumnType;

/// SQLite SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct Sqlite;

impl SqlDialect for Sqlite {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn quote_column(&self, ident: &str) -> String {
        helpers::quote_double(ident)
    }

    fn limit_type(&self) -> LimitType {
        LimitType::Limit
    }

    fn emit_limit(&self, offset: u64, count: u64) -> TokenStream {
        helpers::emit_limit_comma(offset, count, "-1")
    }

    fn column_type_definition(&self, ty: ColumnType, length: u32) -> String {
        helpers::column_type_sqlite(ty, length)
    }

    fn auto_increment(&self) -> AutoIncrement {
        AutoIncrement::AfterPrimaryKey("AUTOINCREMENT")
    }

    fn table_exists_query(&self, table: &str) -> CompileResult<String> {
        Ok(format!(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = {}",
            self.quote_string(table)
        ))
    }

    fn max_batch_rows(&self) -> usize {
        500
    }

    fn max_identifier_length(&self) -> Option<usize> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::dialect::Dialect;

    #[test]
    fn test_open_ended_limit() {
        assert_eq!(
            Sqlite.emit_limit(10, 0).serialize(Dialect::Sqlite),
            "LIMIT 10,-1"
        );
    }

    #[test]
    fn test_long_names_untouched() {
        let name = Sqlite.auto_increment_name("AVeryLongTableNameIndeed", "AVeryLongColumnName");
        assert_eq!(name, "AVeryLongTableNameIndeed_AVeryLongColumnName");
    }
}
