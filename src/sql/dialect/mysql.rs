//! MySQL SQL dialect.
//!
//! MySQL differences from the other engines:
//! - Backtick column quoting (`` `name` ``), bare table names
//! - Boolean is TINYINT(1), returns 1/0
//! - `LIMIT offset,count` for pagination
//! - AUTO_INCREMENT after the column type
//! - No SET DEFAULT referential action on InnoDB

use super::helpers;
use super::{AutoIncrement, LimitType, SqlDialect};
use crate::error::CompileResult;
use crate::sql::ddl::ReferentialAction;
use crate::sql::types::ColumnType;

/// MySQL SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct MySql;

impl SqlDialect for MySql {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn quote_column(&self, ident: &str) -> String {
        helpers::quote_backtick(ident)
    }

    fn quote_table(&self, ident: &str) -> String {
        ident.to_string()
    }

    fn limit_type(&self) -> LimitType {
        LimitType::Limit
    }

    // Uses default emit_limit (LIMIT o,c with u64::MAX as the open bound)

    fn column_type_definition(&self, ty: ColumnType, length: u32) -> String {
        helpers::column_type_mysql(ty, length)
    }

    fn auto_increment(&self) -> AutoIncrement {
        AutoIncrement::Inline("AUTO_INCREMENT")
    }

    fn supports_referential_action(&self, action: ReferentialAction, _on_update: bool) -> bool {
        action != ReferentialAction::SetDefault
    }

    fn table_exists_query(&self, table: &str) -> CompileResult<String> {
        Ok(format!(
            "SELECT TABLE_NAME FROM information_schema.TABLES WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = {}",
            self.quote_string(table)
        ))
    }

    fn insert_default_row(&self, table: &str, _key: &str) -> CompileResult<String> {
        Ok(format!("INSERT INTO {} () VALUES ()", self.quote_table(table)))
    }

    fn max_batch_rows(&self) -> usize {
        1000
    }

    fn max_identifier_length(&self) -> Option<usize> {
        Some(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_datetime_literal() {
        let dt = NaiveDate::from_ymd_opt(2024, 1, 31)
            .unwrap()
            .and_hms_opt(13, 45, 0)
            .unwrap();
        assert_eq!(MySql.format_datetime(&dt), "'2024-01-31 13:45:00'");
    }

    #[test]
    fn test_open_ended_limit() {
        use crate::sql::dialect::Dialect;
        assert_eq!(
            MySql.emit_limit(20, 0).serialize(Dialect::MySql),
            "LIMIT 20,18446744073709551615"
        );
    }

    #[test]
    fn test_set_default_rejected() {
        assert!(!MySql.supports_referential_action(ReferentialAction::SetDefault, false));
        assert!(MySql.supports_referential_action(ReferentialAction::Cascade, true));
    }
}
