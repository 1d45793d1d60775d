//! Oracle SQL dialect.
//!
//! Oracle differences from the other engines:
//! - Double-quote identifier quoting, 30-byte identifiers
//! - No boolean column type, NUMBER(1) with 1/0
//! - Paging by wrapping the query and filtering on ROWNUM
//! - TO_DATE / TO_TIMESTAMP for date literals
//! - BINARY_DOUBLE special values for NaN and infinities
//! - Auto-increment through a sequence plus BEFORE INSERT trigger
//! - MOD(a, b) instead of an infix modulo operator
//! - One row per INSERT
//! - No ON UPDATE actions on foreign keys

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use super::helpers;
use super::{AutoIncrement, LimitType, SqlDialect};
use crate::error::CompileResult;
use crate::sql::ddl::ReferentialAction;
use crate::sql::types::ColumnType;

/// Oracle SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct Oracle;

impl SqlDialect for Oracle {
    fn name(&self) -> &'static str {
        "oracle"
    }

    fn quote_column(&self, ident: &str) -> String {
        helpers::quote_double(ident)
    }

    fn format_f64(&self, f: f64) -> CompileResult<String> {
        if f.is_nan() {
            return Ok("BINARY_DOUBLE_NAN".into());
        }
        if f.is_infinite() {
            return Ok(if f > 0.0 {
                "BINARY_DOUBLE_INFINITY".into()
            } else {
                "-BINARY_DOUBLE_INFINITY".into()
            });
        }
        // The extremes do not survive a round trip through NUMBER.
        if f == f64::MAX {
            return Ok("TO_BINARY_DOUBLE('1.7976931348623157E+308')".into());
        }
        if f == f64::MIN {
            return Ok("TO_BINARY_DOUBLE('-1.7976931348623157E+308')".into());
        }
        Ok(helpers::format_f64(f).unwrap_or_default())
    }

    fn format_f32(&self, f: f32) -> CompileResult<String> {
        if f.is_nan() {
            return Ok("BINARY_FLOAT_NAN".into());
        }
        if f.is_infinite() {
            return Ok(if f > 0.0 {
                "BINARY_FLOAT_INFINITY".into()
            } else {
                "-BINARY_FLOAT_INFINITY".into()
            });
        }
        if f == f32::MAX {
            return Ok("TO_BINARY_FLOAT('3.4028235E+38')".into());
        }
        if f == f32::MIN {
            return Ok("TO_BINARY_FLOAT('-3.4028235E+38')".into());
        }
        Ok(helpers::format_f32(f).unwrap_or_default())
    }

    fn format_datetime(&self, dt: &NaiveDateTime) -> String {
        let text = helpers::datetime_text(dt, ' ');
        if dt.nanosecond() == 0 {
            format!("TO_DATE('{text}', 'YYYY-MM-DD HH24:MI:SS')")
        } else {
            format!("TO_TIMESTAMP('{text}', 'YYYY-MM-DD HH24:MI:SS.FF3')")
        }
    }

    fn format_date(&self, d: &NaiveDate) -> String {
        format!("TO_DATE('{}', 'YYYY-MM-DD')", helpers::date_text(d))
    }

    fn format_time(&self, t: &NaiveTime) -> String {
        let text = helpers::time_text(t);
        if t.nanosecond() == 0 {
            format!("TO_DATE('{text}', 'HH24:MI:SS')")
        } else {
            format!("TO_TIMESTAMP('{text}', 'HH24:MI:SS.FF3')")
        }
    }

    fn format_bytes(&self, bytes: &[u8]) -> CompileResult<String> {
        Ok(format!("HEXTORAW('{}')", helpers::hex_upper(bytes)))
    }

    fn limit_type(&self) -> LimitType {
        LimitType::RowNum
    }

    fn modulo_as_function(&self) -> bool {
        true
    }

    fn column_type_definition(&self, ty: ColumnType, length: u32) -> String {
        helpers::column_type_oracle(ty, length)
    }

    fn auto_increment(&self) -> AutoIncrement {
        AutoIncrement::SequenceTrigger
    }

    fn create_auto_increment_statements(&self, table: &str, column: &str) -> Vec<String> {
        let name = self.quote_table(&self.auto_increment_name(table, column));
        vec![
            format!("CREATE SEQUENCE {name} START WITH 1 INCREMENT BY 1"),
            format!(
                "CREATE OR REPLACE TRIGGER {name} BEFORE INSERT ON {} FOR EACH ROW BEGIN SELECT {name}.NEXTVAL INTO :NEW.{} FROM DUAL; END;",
                self.quote_table(table),
                self.quote_column(column)
            ),
        ]
    }

    fn drop_auto_increment_statements(&self, table: &str, column: &str) -> Vec<String> {
        let name = self.quote_table(&self.auto_increment_name(table, column));
        vec![
            format!("DROP TRIGGER {name}"),
            format!("DROP SEQUENCE {name}"),
        ]
    }

    fn supports_referential_action(&self, action: ReferentialAction, on_update: bool) -> bool {
        if on_update {
            return action == ReferentialAction::NoAction;
        }
        !matches!(
            action,
            ReferentialAction::Restrict | ReferentialAction::SetDefault
        )
    }

    fn table_exists_query(&self, table: &str) -> CompileResult<String> {
        Ok(format!(
            "SELECT TABLE_NAME FROM USER_TABLES WHERE TABLE_NAME = {}",
            self.quote_string(table)
        ))
    }

    /// The key trigger overwrites the NULL with the next sequence value.
    fn insert_default_row(&self, table: &str, key: &str) -> CompileResult<String> {
        Ok(format!(
            "INSERT INTO {} ({}) VALUES (NULL)",
            self.quote_table(table),
            self.quote_column(key)
        ))
    }

    fn max_batch_rows(&self) -> usize {
        1
    }

    fn max_identifier_length(&self) -> Option<usize> {
        Some(30)
    }
}
