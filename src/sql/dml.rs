//! DML (Data Manipulation Language) support.
//!
//! This module provides types and builders for generating DML statements
//! (INSERT, UPDATE, DELETE) across the supported dialects. Splitting rows
//! into batches the dialect accepts is the caller's job.
//!
//! # Examples
//!
//! ```
//! use heron::sql::dml::{Delete, Insert, Update};
//! use heron::sql::{Dialect, Expr};
//!
//! let insert = Insert::into("Country")
//!     .columns(["Name"])
//!     .values([Expr::literal("France")]);
//! assert_eq!(
//!     insert.to_sql(Dialect::MySql).unwrap(),
//!     "INSERT INTO Country (`Name`) VALUES ('France')"
//! );
//!
//! let update = Update::table("Country")
//!     .set("Name", Expr::literal("Spain"))
//!     .filter(Expr::qualified("Country", "ID").eq(Expr::literal(2)));
//! assert_eq!(
//!     update.to_sql(Dialect::MySql).unwrap(),
//!     "UPDATE Country SET `Name` = 'Spain' WHERE Country.`ID` = 2"
//! );
//!
//! let delete = Delete::from("Country");
//! assert_eq!(delete.to_sql(Dialect::MySql).unwrap(), "DELETE FROM Country");
//! ```

use super::dialect::Dialect;
use super::expr::Expr;
use super::token::{Token, TokenStream};
use crate::error::CompileResult;

// ============================================================================
// INSERT
// ============================================================================

/// INSERT statement.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "DML statements have no effect until converted to SQL with to_sql()"]
pub struct Insert {
    pub table: String,
    pub columns: Vec<String>,
    pub values: Vec<Vec<Expr>>,
}

impl Insert {
    /// Create a new INSERT statement.
    pub fn into(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Set the columns to insert into.
    pub fn columns(mut self, cols: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.columns = cols.into_iter().map(Into::into).collect();
        self
    }

    /// Add a row of values.
    pub fn values(mut self, vals: impl IntoIterator<Item = Expr>) -> Self {
        self.values.push(vals.into_iter().collect());
        self
    }

    /// Add multiple rows of values.
    pub fn values_many(mut self, rows: impl IntoIterator<Item = Vec<Expr>>) -> Self {
        self.values.extend(rows);
        self
    }

    pub fn to_sql(&self, dialect: Dialect) -> CompileResult<String> {
        Ok(self.to_tokens(dialect)?.serialize(dialect))
    }

    pub fn to_tokens(&self, dialect: Dialect) -> CompileResult<TokenStream> {
        let mut ts = TokenStream::new();

        ts.push(Token::Insert)
            .space()
            .push(Token::Into)
            .space()
            .push(Token::TableIdent(self.table.clone()));

        if !self.columns.is_empty() {
            ts.space().lparen();
            for (i, col) in self.columns.iter().enumerate() {
                if i > 0 {
                    ts.comma().space();
                }
                ts.push(Token::Ident(col.clone()));
            }
            ts.rparen();
        }

        ts.space().push(Token::Values).space();
        for (row_idx, row) in self.values.iter().enumerate() {
            if row_idx > 0 {
                ts.comma().space();
            }
            ts.lparen();
            for (i, val) in row.iter().enumerate() {
                if i > 0 {
                    ts.comma().space();
                }
                ts.append(&val.to_tokens(dialect)?);
            }
            ts.rparen();
        }

        Ok(ts)
    }
}

// ============================================================================
// UPDATE
// ============================================================================

/// UPDATE statement.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "DML statements have no effect until converted to SQL with to_sql()"]
pub struct Update {
    pub table: String,
    pub assignments: Vec<(String, Expr)>,
    pub where_clause: Option<Expr>,
}

impl Update {
    /// Create a new UPDATE statement.
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            assignments: Vec::new(),
            where_clause: None,
        }
    }

    /// Add a SET assignment.
    pub fn set(mut self, column: impl Into<String>, value: Expr) -> Self {
        self.assignments.push((column.into(), value));
        self
    }

    /// Add a WHERE condition, ANDed with any existing one.
    pub fn filter(mut self, expr: Expr) -> Self {
        self.where_clause = Some(match self.where_clause.take() {
            Some(existing) => existing.and(expr),
            None => expr,
        });
        self
    }

    pub fn to_sql(&self, dialect: Dialect) -> CompileResult<String> {
        Ok(self.to_tokens(dialect)?.serialize(dialect))
    }

    pub fn to_tokens(&self, dialect: Dialect) -> CompileResult<TokenStream> {
        let mut ts = TokenStream::new();

        ts.push(Token::Update)
            .space()
            .push(Token::TableIdent(self.table.clone()))
            .space()
            .push(Token::Set)
            .space();

        for (i, (col, val)) in self.assignments.iter().enumerate() {
            if i > 0 {
                ts.comma().space();
            }
            ts.push(Token::Ident(col.clone()))
                .space()
                .push(Token::Eq)
                .space()
                .append(&val.to_tokens(dialect)?);
        }

        if let Some(filter) = &self.where_clause {
            ts.space()
                .push(Token::Where)
                .space()
                .append(&filter.to_tokens(dialect)?);
        }

        Ok(ts)
    }
}

// ============================================================================
// DELETE
// ============================================================================

/// DELETE statement.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "DML statements have no effect until converted to SQL with to_sql()"]
pub struct Delete {
    pub table: String,
    pub where_clause: Option<Expr>,
}

impl Delete {
    /// Create a new DELETE statement.
    pub fn from(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            where_clause: None,
        }
    }

    /// Add a WHERE condition, ANDed with any existing one.
    pub fn filter(mut self, expr: Expr) -> Self {
        self.where_clause = Some(match self.where_clause.take() {
            Some(existing) => existing.and(expr),
            None => expr,
        });
        self
    }

    pub fn to_sql(&self, dialect: Dialect) -> CompileResult<String> {
        Ok(self.to_tokens(dialect)?.serialize(dialect))
    }

    pub fn to_tokens(&self, dialect: Dialect) -> CompileResult<TokenStream> {
        let mut ts = TokenStream::new();

        ts.push(Token::Delete)
            .space()
            .push(Token::From)
            .space()
            .push(Token::TableIdent(self.table.clone()));

        if let Some(filter) = &self.where_clause {
            ts.space()
                .push(Token::Where)
                .space()
                .append(&filter.to_tokens(dialect)?);
        }

        Ok(ts)
    }
}
