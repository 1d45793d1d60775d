//! Query builder - construct SELECT statements with a fluent API.
//!
//! Paging follows the dialect's [`LimitType`]: a trailing `LIMIT o,c`,
//! `TOP c` after SELECT, or a ROWNUM filter around the whole query.

use super::dialect::{Dialect, LimitType, SqlDialect};
use super::expr::{Expr, SortDir};
use super::token::{Token, TokenStream};
use crate::error::{CompileError, CompileResult};

// =============================================================================
// Table Reference
// =============================================================================

/// A table in FROM or JOIN with an optional alias.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct TableRef {
    pub table: String,
    pub alias: Option<String>,
}

impl TableRef {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.into(),
            alias: None,
        }
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn to_tokens(&self, dialect: Dialect) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::TableIdent(self.table.clone()));
        if let Some(alias) = &self.alias {
            ts.space();
            if dialect.table_alias_keyword() {
                ts.push(Token::As).space();
            }
            ts.push(Token::TableIdent(alias.clone()));
        }
        ts
    }
}

// =============================================================================
// Joins
// =============================================================================

/// Type of join.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
    Right,
}

/// A JOIN clause on a single key equality.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub join_type: JoinType,
    pub table: TableRef,
    pub left: Expr,
    pub right: Expr,
}

impl Join {
    pub fn to_tokens(&self, dialect: Dialect) -> CompileResult<TokenStream> {
        let mut ts = TokenStream::new();
        match self.join_type {
            JoinType::Inner => ts.push(Token::Inner),
            JoinType::Left => ts.push(Token::Left).space().push(Token::Outer),
            JoinType::Right => ts.push(Token::Right).space().push(Token::Outer),
        };
        ts.space()
            .push(Token::Join)
            .space()
            .append(&self.table.to_tokens(dialect))
            .space()
            .push(Token::On)
            .space()
            .append(&self.left.to_tokens(dialect)?)
            .push(Token::Eq)
            .append(&self.right.to_tokens(dialect)?);
        Ok(ts)
    }
}

// =============================================================================
// Order By
// =============================================================================

/// ORDER BY item.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderByExpr {
    pub expr: Expr,
    pub dir: SortDir,
}

impl OrderByExpr {
    pub fn asc(expr: Expr) -> Self {
        Self {
            expr,
            dir: SortDir::Asc,
        }
    }

    pub fn desc(expr: Expr) -> Self {
        Self {
            expr,
            dir: SortDir::Desc,
        }
    }

    pub fn to_tokens(&self, dialect: Dialect) -> CompileResult<TokenStream> {
        let mut ts = self.expr.to_tokens(dialect)?;
        if self.dir == SortDir::Desc {
            ts.space().push(Token::Desc);
        }
        Ok(ts)
    }
}

// =============================================================================
// Paging
// =============================================================================

/// Row window: skip `offset` rows, return `count` rows (0 = no upper bound).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Paging {
    pub offset: u64,
    pub count: u64,
}

impl Paging {
    pub fn new(offset: u64, count: u64) -> Self {
        Self { offset, count }
    }

    /// Paging only applies when it restricts something.
    pub fn is_active(&self) -> bool {
        self.offset > 0 || self.count > 0
    }
}

// =============================================================================
// Query
// =============================================================================

/// A SELECT statement.
#[derive(Debug, Clone, PartialEq, Default)]
#[must_use = "builders have no effect until used"]
pub struct Query {
    pub distinct: bool,
    pub select: Vec<Expr>,
    pub from: Vec<TableRef>,
    pub joins: Vec<Join>,
    pub where_clause: Option<Expr>,
    pub order_by: Vec<OrderByExpr>,
    pub paging: Option<Paging>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(mut self, exprs: Vec<Expr>) -> Self {
        self.select = exprs;
        self
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    pub fn from(mut self, table: TableRef) -> Self {
        self.from.push(table);
        self
    }

    pub fn join(mut self, join_type: JoinType, table: TableRef, left: Expr, right: Expr) -> Self {
        self.joins.push(Join {
            join_type,
            table,
            left,
            right,
        });
        self
    }

    /// Add a WHERE condition, ANDed with any existing one.
    pub fn filter(mut self, condition: Expr) -> Self {
        self.where_clause = Some(match self.where_clause.take() {
            Some(existing) => existing.and(condition),
            None => condition,
        });
        self
    }

    pub fn order_by(mut self, exprs: Vec<OrderByExpr>) -> Self {
        self.order_by = exprs;
        self
    }

    pub fn page(mut self, offset: u64, count: u64) -> Self {
        self.paging = Some(Paging::new(offset, count));
        self
    }

    fn active_paging(&self) -> Option<Paging> {
        self.paging.filter(Paging::is_active)
    }

    /// Render for a dialect, paging included.
    pub fn to_tokens(&self, dialect: Dialect) -> CompileResult<TokenStream> {
        let Some(paging) = self.active_paging() else {
            return self.core_tokens(dialect, None, true, None, false);
        };

        match dialect.limit_type() {
            LimitType::Limit => {
                let mut ts = self.core_tokens(dialect, None, true, None, false)?;
                ts.space()
                    .append(&dialect.emit_limit(paging.offset, paging.count));
                Ok(ts)
            }
            LimitType::Top => {
                if paging.offset > 0 {
                    return Err(CompileError::not_supported(
                        dialect.name(),
                        format!("row offset {}", paging.offset),
                    ));
                }
                self.core_tokens(dialect, Some(paging.count), true, None, false)
            }
            LimitType::RowNum => {
                // The wrapper selects `*` from the inner query, which needs
                // distinct column names.
                let inner = self.core_tokens(dialect, None, true, None, true)?;
                Ok(wrap_rownum(inner, paging))
            }
            LimitType::None => Err(CompileError::not_supported(dialect.name(), "paging")),
        }
    }

    /// Render as the body of a correlated EXISTS: no ORDER BY, no paging,
    /// and `correlation` appended to the WHERE clause.
    pub fn to_tokens_correlated(
        &self,
        dialect: Dialect,
        correlation: &Expr,
    ) -> CompileResult<TokenStream> {
        self.core_tokens(dialect, None, false, Some(correlation), false)
    }

    pub fn to_sql(&self, dialect: Dialect) -> CompileResult<String> {
        Ok(self.to_tokens(dialect)?.serialize(dialect))
    }

    fn core_tokens(
        &self,
        dialect: Dialect,
        top: Option<u64>,
        with_order_by: bool,
        correlation: Option<&Expr>,
        unique_names: bool,
    ) -> CompileResult<TokenStream> {
        let mut ts = TokenStream::new();

        ts.push(Token::Select).space();
        if self.distinct {
            ts.push(Token::Distinct).space();
        }
        if let Some(n) = top {
            ts.push(Token::Top).space().push(Token::Number(n)).space();
        }

        if self.select.is_empty() {
            ts.push(Token::Star);
        }
        let aliases = if unique_names {
            self.unique_aliases()
        } else {
            vec![None; self.select.len()]
        };
        for (i, (expr, alias)) in self.select.iter().zip(&aliases).enumerate() {
            if i > 0 {
                ts.comma().space();
            }
            ts.append(&expr.to_tokens(dialect)?);
            if let Some(alias) = alias {
                ts.space()
                    .push(Token::As)
                    .space()
                    .push(Token::Ident(alias.clone()));
            }
        }

        ts.space().push(Token::From).space();
        ts.append(&self.from_tokens(dialect)?);

        match (&self.where_clause, correlation) {
            (Some(filter), Some(corr)) => {
                ts.space().push(Token::Where).space();
                if filter.is_or() {
                    ts.lparen().append(&filter.to_tokens(dialect)?).rparen();
                } else {
                    ts.append(&filter.to_tokens(dialect)?);
                }
                ts.space()
                    .push(Token::And)
                    .space()
                    .append(&corr.to_tokens(dialect)?);
            }
            (Some(filter), None) => {
                ts.space()
                    .push(Token::Where)
                    .space()
                    .append(&filter.to_tokens(dialect)?);
            }
            (None, Some(corr)) => {
                ts.space()
                    .push(Token::Where)
                    .space()
                    .append(&corr.to_tokens(dialect)?);
            }
            (None, None) => {}
        }

        if with_order_by && !self.order_by.is_empty() {
            ts.space().push(Token::OrderBy).space();
            for (i, item) in self.order_by.iter().enumerate() {
                if i > 0 {
                    ts.comma().space();
                }
                ts.append(&item.to_tokens(dialect)?);
            }
        }

        Ok(ts)
    }

    /// Aliases for projected columns whose name repeats an earlier one:
    /// `Name`, `Name` becomes `Name`, `Name AS Name_2`.
    fn unique_aliases(&self) -> Vec<Option<String>> {
        let mut taken: Vec<String> = self
            .select
            .iter()
            .filter_map(Expr::output_name)
            .map(str::to_ascii_lowercase)
            .collect();
        let mut seen = Vec::new();
        self.select
            .iter()
            .map(|expr| {
                let name = expr.output_name()?;
                let key = name.to_ascii_lowercase();
                if !seen.contains(&key) {
                    seen.push(key);
                    return None;
                }
                let alias = (2..)
                    .map(|n| format!("{name}_{n}"))
                    .find(|a| !taken.contains(&a.to_ascii_lowercase()))?;
                taken.push(alias.to_ascii_lowercase());
                Some(alias)
            })
            .collect()
    }

    /// FROM list plus joins. Joins attach to the first table; further
    /// tables follow the joins, comma-separated, so every ON clause only
    /// sees tables to its left.
    ///
    /// Access only accepts a join followed by more joins or tables when the
    /// join is parenthesized: `(A INNER JOIN B ON ..) INNER JOIN C ON ..`.
    fn from_tokens(&self, dialect: Dialect) -> CompileResult<TokenStream> {
        let mut ts = TokenStream::new();
        let Some((first, rest)) = self.from.split_first() else {
            return Ok(ts);
        };

        let nested = if dialect.table_alias_keyword() && !self.joins.is_empty() {
            self.joins.len() - 1 + usize::from(!rest.is_empty())
        } else {
            0
        };
        for _ in 0..nested {
            ts.lparen();
        }
        ts.append(&first.to_tokens(dialect));
        for (i, join) in self.joins.iter().enumerate() {
            ts.space().append(&join.to_tokens(dialect)?);
            if i < nested {
                ts.rparen();
            }
        }
        for table in rest {
            ts.comma().space().append(&table.to_tokens(dialect));
        }
        Ok(ts)
    }
}

/// Oracle paging: filter the finished query on ROWNUM.
fn wrap_rownum(inner: TokenStream, paging: Paging) -> TokenStream {
    let mut ts = TokenStream::new();
    ts.push(Token::Select)
        .space()
        .push(Token::Star)
        .space()
        .push(Token::From)
        .space()
        .lparen();

    if paging.offset == 0 {
        ts.append(&inner)
            .rparen()
            .space()
            .push(Token::Where)
            .space()
            .push(Token::Raw("ROWNUM".into()))
            .space()
            .push(Token::Lte)
            .space()
            .push(Token::Number(paging.count));
        return ts;
    }

    ts.push(Token::Select)
        .space()
        .push(Token::Raw("q.*, ROWNUM rnum".into()))
        .space()
        .push(Token::From)
        .space()
        .lparen()
        .append(&inner)
        .rparen()
        .space()
        .push(Token::Raw("q".into()));
    if paging.count > 0 {
        ts.space()
            .push(Token::Where)
            .space()
            .push(Token::Raw("ROWNUM".into()))
            .space()
            .push(Token::Lte)
            .space()
            .push(Token::Number(paging.offset.saturating_add(paging.count)));
    }
    ts.rparen()
        .space()
        .push(Token::Where)
        .space()
        .push(Token::Raw("rnum".into()))
        .space()
        .push(Token::Gt)
        .space()
        .push(Token::Number(paging.offset));
    ts
}
