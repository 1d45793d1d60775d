//! Shared helper functions for SQL dialect implementations.
//!
//! This module provides reusable building blocks that dialects can compose
//! to implement the `SqlDialect` trait with minimal duplication.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use sha2::{Digest, Sha256};

use super::super::token::{Token, TokenStream};
use super::super::types::ColumnType;

// =============================================================================
// Identifier Quoting
// =============================================================================

/// Quote identifier with double quotes (ANSI style).
/// Used by: Oracle, SQLite
pub fn quote_double(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote identifier with backticks.
/// Used by: MySQL columns
pub fn quote_backtick(ident: &str) -> String {
    format!("`{}`", ident.replace('`', "``"))
}

/// Quote identifier with square brackets.
/// Used by: MSSQL, Access
pub fn quote_bracket(ident: &str) -> String {
    format!("[{}]", ident.replace(']', "]]"))
}

// =============================================================================
// String Quoting
// =============================================================================

/// Quote string with single quotes (standard SQL).
/// Used by: All dialects
pub fn quote_string_single(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Quote string with N prefix for Unicode.
/// Used by: MSSQL for non-ASCII strings
pub fn quote_string_unicode(s: &str) -> String {
    format!("N'{}'", s.replace('\'', "''"))
}

// =============================================================================
// Boolean / Number Formatting
// =============================================================================

/// Format boolean as numeric 1/0.
/// Used by: MySQL, MSSQL, SQLite, Oracle
pub fn format_bool_numeric(b: bool) -> &'static str {
    if b {
        "1"
    } else {
        "0"
    }
}

/// Format boolean as TRUE/FALSE keywords.
/// Used by: Access
pub fn format_bool_keyword(b: bool) -> &'static str {
    if b {
        "TRUE"
    } else {
        "FALSE"
    }
}

/// Format a finite double with ryu. Returns `None` for NaN and infinities.
pub fn format_f64(f: f64) -> Option<String> {
    if !f.is_finite() {
        return None;
    }
    let mut buffer = ryu::Buffer::new();
    Some(buffer.format_finite(f).to_string())
}

/// Format a finite single with ryu. Returns `None` for NaN and infinities.
pub fn format_f32(f: f32) -> Option<String> {
    if !f.is_finite() {
        return None;
    }
    let mut buffer = ryu::Buffer::new();
    Some(buffer.format_finite(f).to_string())
}

/// Upper-case hex digits of a byte slice.
pub fn hex_upper(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02X}")).collect()
}

// =============================================================================
// Date / Time Formatting
// =============================================================================

/// `YYYY-MM-DD HH:MM:SS`, with milliseconds when the value has a fraction.
pub fn datetime_text(dt: &NaiveDateTime, separator: char) -> String {
    let date = dt.format("%Y-%m-%d");
    format!("{date}{separator}{}", time_text(&dt.time()))
}

/// `HH:MM:SS`, with milliseconds when the value has a fraction.
pub fn time_text(t: &NaiveTime) -> String {
    if t.nanosecond() == 0 {
        t.format("%H:%M:%S").to_string()
    } else {
        t.format("%H:%M:%S%.3f").to_string()
    }
}

pub fn date_text(d: &NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

/// Quoted `'YYYY-MM-DD HH:MM:SS'` literal.
/// Used by: MySQL, SQLite
pub fn format_datetime_quoted(dt: &NaiveDateTime) -> String {
    format!("'{}'", datetime_text(dt, ' '))
}

/// Earliest date an Access date literal may carry.
pub const ACCESS_MIN_YEAR: i32 = 100;

/// `#m/d/yyyy H:mm:ss#` Access literal, clamped to 0100-01-01.
pub fn format_datetime_access(dt: &NaiveDateTime) -> String {
    if dt.year() < ACCESS_MIN_YEAR {
        return format!("#1/1/{ACCESS_MIN_YEAR:04} 0:00:00#");
    }
    format!(
        "#{}/{}/{:04} {}:{:02}:{:02}#",
        dt.month(),
        dt.day(),
        dt.year(),
        dt.hour(),
        dt.minute(),
        dt.second()
    )
}

/// `#m/d/yyyy#` Access literal, clamped to 0100-01-01.
pub fn format_date_access(d: &NaiveDate) -> String {
    if d.year() < ACCESS_MIN_YEAR {
        return format!("#1/1/{ACCESS_MIN_YEAR:04}#");
    }
    format!("#{}/{}/{:04}#", d.month(), d.day(), d.year())
}

// =============================================================================
// Pagination
// =============================================================================

/// Emit `LIMIT offset,count`. A zero count means "no upper bound" and is
/// spelled with the dialect's sentinel.
/// Used by: MySQL, SQLite
pub fn emit_limit_comma(offset: u64, count: u64, unbounded: &str) -> TokenStream {
    let mut ts = TokenStream::new();
    ts.push(Token::Limit)
        .space()
        .push(Token::Number(offset))
        .comma();
    if count == 0 {
        ts.push(Token::Raw(unbounded.into()));
    } else {
        ts.push(Token::Number(count));
    }
    ts
}

// =============================================================================
// Function Remapping
// =============================================================================

/// Remap functions for MSSQL.
pub fn remap_function_mssql(name: &str) -> Option<&'static str> {
    match name.to_uppercase().as_str() {
        "LENGTH" => Some("LEN"),
        _ => None,
    }
}

/// Remap functions for Access (Jet/ACE SQL).
pub fn remap_function_access(name: &str) -> Option<&'static str> {
    match name.to_uppercase().as_str() {
        "UPPER" => Some("UCASE"),
        "LOWER" => Some("LCASE"),
        "LENGTH" => Some("LEN"),
        _ => None,
    }
}

// =============================================================================
// Column Type Definitions
// =============================================================================

/// Column type definitions for MySQL.
pub fn column_type_mysql(ty: ColumnType, length: u32) -> String {
    match ty {
        ColumnType::Bool => "TINYINT(1)".into(),
        ColumnType::Int8 => "TINYINT".into(),
        ColumnType::UInt8 => "TINYINT UNSIGNED".into(),
        ColumnType::Int16 => "SMALLINT".into(),
        ColumnType::UInt16 => "SMALLINT UNSIGNED".into(),
        ColumnType::Int32 | ColumnType::Enum => "INT".into(),
        ColumnType::UInt32 => "INT UNSIGNED".into(),
        ColumnType::Int64 => "BIGINT".into(),
        ColumnType::UInt64 => "BIGINT UNSIGNED".into(),
        ColumnType::Float32 => "FLOAT".into(),
        ColumnType::Float64 => "DOUBLE".into(),
        ColumnType::Decimal => "DECIMAL(18, 4)".into(),
        ColumnType::String if length == 0 => "TEXT".into(),
        ColumnType::String => format!("VARCHAR({length})"),
        ColumnType::Char => "CHAR(1)".into(),
        ColumnType::DateTime => "DATETIME".into(),
        ColumnType::Date => "DATE".into(),
        ColumnType::Time => "TIME".into(),
        ColumnType::Guid => "CHAR(36)".into(),
        ColumnType::Bytes if length == 0 => "BLOB".into(),
        ColumnType::Bytes => format!("VARBINARY({length})"),
    }
}

/// Column type definitions for MSSQL.
pub fn column_type_mssql(ty: ColumnType, length: u32) -> String {
    match ty {
        ColumnType::Bool => "BIT".into(),
        ColumnType::Int8 | ColumnType::Int16 => "SMALLINT".into(),
        ColumnType::UInt8 => "TINYINT".into(),
        ColumnType::UInt16 | ColumnType::Int32 | ColumnType::Enum => "INT".into(),
        ColumnType::UInt32 | ColumnType::Int64 => "BIGINT".into(),
        ColumnType::UInt64 => "DECIMAL(20, 0)".into(),
        ColumnType::Float32 => "REAL".into(),
        ColumnType::Float64 => "FLOAT".into(),
        ColumnType::Decimal => "DECIMAL(18, 4)".into(),
        ColumnType::String if length == 0 => "VARCHAR(MAX)".into(),
        ColumnType::String => format!("VARCHAR({length})"),
        ColumnType::Char => "CHAR(1)".into(),
        ColumnType::DateTime => "DATETIME".into(),
        ColumnType::Date => "DATE".into(),
        ColumnType::Time => "TIME".into(),
        ColumnType::Guid => "UNIQUEIDENTIFIER".into(),
        ColumnType::Bytes if length == 0 => "VARBINARY(MAX)".into(),
        ColumnType::Bytes => format!("VARBINARY({length})"),
    }
}

/// Column type definitions for SQLite.
pub fn column_type_sqlite(ty: ColumnType, length: u32) -> String {
    match ty {
        ColumnType::Bool
        | ColumnType::Int8
        | ColumnType::UInt8
        | ColumnType::Int16
        | ColumnType::UInt16
        | ColumnType::Int32
        | ColumnType::UInt32
        | ColumnType::Int64
        | ColumnType::UInt64
        | ColumnType::Enum => "INTEGER".into(),
        ColumnType::Float32 | ColumnType::Float64 => "REAL".into(),
        ColumnType::Decimal => "NUMERIC".into(),
        ColumnType::String if length == 0 => "TEXT".into(),
        ColumnType::String => format!("VARCHAR({length})"),
        ColumnType::Char => "CHAR(1)".into(),
        ColumnType::DateTime => "DATETIME".into(),
        ColumnType::Date => "DATE".into(),
        ColumnType::Time => "TIME".into(),
        ColumnType::Guid => "CHAR(36)".into(),
        ColumnType::Bytes => "BLOB".into(),
    }
}

/// Longest VARCHAR2 before Oracle needs a CLOB.
const ORACLE_MAX_VARCHAR2: u32 = 4000;
/// Longest RAW before Oracle needs a BLOB.
const ORACLE_MAX_RAW: u32 = 2000;

/// Column type definitions for Oracle.
pub fn column_type_oracle(ty: ColumnType, length: u32) -> String {
    match ty {
        ColumnType::Bool => "NUMBER(1)".into(),
        ColumnType::Int8 | ColumnType::UInt8 => "NUMBER(3)".into(),
        ColumnType::Int16 | ColumnType::UInt16 => "NUMBER(5)".into(),
        ColumnType::Int32 | ColumnType::UInt32 | ColumnType::Enum => "NUMBER".into(),
        ColumnType::Int64 => "NUMBER(19)".into(),
        ColumnType::UInt64 => "NUMBER(20)".into(),
        ColumnType::Float32 => "BINARY_FLOAT".into(),
        ColumnType::Float64 => "BINARY_DOUBLE".into(),
        ColumnType::Decimal => "NUMBER(18, 4)".into(),
        ColumnType::String if length == 0 || length > ORACLE_MAX_VARCHAR2 => "CLOB".into(),
        ColumnType::String => format!("VARCHAR2({length})"),
        ColumnType::Char => "CHAR(1)".into(),
        ColumnType::DateTime | ColumnType::Date | ColumnType::Time => "DATE".into(),
        ColumnType::Guid => "CHAR(36)".into(),
        ColumnType::Bytes if length == 0 || length > ORACLE_MAX_RAW => "BLOB".into(),
        ColumnType::Bytes => format!("RAW({length})"),
    }
}

/// Longest TEXT/BINARY column before Access needs MEMO/LONGBINARY.
const ACCESS_MAX_TEXT: u32 = 255;

/// Column type definitions for Access.
pub fn column_type_access(ty: ColumnType, length: u32) -> String {
    match ty {
        ColumnType::Bool => "BIT".into(),
        ColumnType::Int8 | ColumnType::UInt8 => "BYTE".into(),
        ColumnType::Int16 => "SHORT".into(),
        ColumnType::UInt16 | ColumnType::Int32 | ColumnType::Enum => "LONG".into(),
        ColumnType::UInt32 => "DECIMAL(10, 0)".into(),
        ColumnType::Int64 => "DECIMAL(19, 0)".into(),
        ColumnType::UInt64 => "DECIMAL(20, 0)".into(),
        ColumnType::Float32 => "SINGLE".into(),
        ColumnType::Float64 => "DOUBLE".into(),
        ColumnType::Decimal => "DECIMAL(18, 4)".into(),
        ColumnType::String if length == 0 || length > ACCESS_MAX_TEXT => "MEMO".into(),
        ColumnType::String => format!("TEXT({length})"),
        ColumnType::Char => "TEXT(1)".into(),
        ColumnType::DateTime | ColumnType::Date | ColumnType::Time => "DATETIME".into(),
        ColumnType::Guid => "GUID".into(),
        ColumnType::Bytes if length == 0 || length > ACCESS_MAX_TEXT => "LONGBINARY".into(),
        ColumnType::Bytes => format!("BINARY({length})"),
    }
}

// =============================================================================
// Generated Names
// =============================================================================

/// Length of the hash suffix appended to shortened names.
const NAME_HASH_LEN: usize = 8;

/// Fit a generated name (sequence, trigger, index) into `max` bytes.
///
/// Names that fit are returned unchanged. Longer names keep a prefix and
/// gain `_` plus the first eight hex digits of the SHA-256 of the full name,
/// so distinct long names stay distinct.
pub fn truncate_identifier(name: &str, max: Option<usize>) -> String {
    let Some(max) = max else {
        return name.to_string();
    };
    if name.len() <= max {
        return name.to_string();
    }

    let mut hasher = Sha256::new();
    hasher.update(name.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    let suffix = &digest[..NAME_HASH_LEN];

    let budget = max.saturating_sub(NAME_HASH_LEN + 1);
    let mut prefix = String::with_capacity(budget);
    for ch in name.chars() {
        if prefix.len() + ch.len_utf8() > budget {
            break;
        }
        prefix.push(ch);
    }
    format!("{prefix}_{suffix}")
}
