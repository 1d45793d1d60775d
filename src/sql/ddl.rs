//! DDL (Data Definition Language) support.
//!
//! This module provides types and builders for generating DDL statements
//! (CREATE TABLE, CREATE INDEX, DROP TABLE) across the supported dialects.
//! Column types come from the dialect's type mapping; auto-increment follows
//! the dialect's [`AutoIncrement`] strategy.
//!
//! # Examples
//!
//! ```
//! use heron::sql::ddl::{ColumnDef, CreateTable, TableConstraint};
//! use heron::sql::{ColumnType, Dialect};
//!
//! let table = CreateTable::new("Country")
//!     .column(ColumnDef::new("ID", ColumnType::Int32).auto_increment())
//!     .column(ColumnDef::new("Name", ColumnType::String).length(50).nullable())
//!     .constraint(TableConstraint::primary_key("PK_Country", ["ID"]));
//!
//! assert_eq!(
//!     table.to_sql(Dialect::MySql).unwrap(),
//!     "CREATE TABLE Country (`ID` INT NOT NULL AUTO_INCREMENT, `Name` VARCHAR(50), CONSTRAINT PK_Country PRIMARY KEY (`ID`))"
//! );
//! ```

use std::fmt;

use super::dialect::{AutoIncrement, Dialect, SqlDialect};
use super::token::{Token, TokenStream};
use super::types::ColumnType;
use crate::error::{CompileError, CompileResult};

// ============================================================================
// CREATE TABLE
// ============================================================================

/// CREATE TABLE statement.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "DDL statements have no effect until converted to SQL with to_sql()"]
pub struct CreateTable {
    pub name: String,
    pub columns: Vec<ColumnDef>,
    pub constraints: Vec<TableConstraint>,
}

impl CreateTable {
    /// Create a new CREATE TABLE statement.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            constraints: Vec::new(),
        }
    }

    /// Add a column definition.
    pub fn column(mut self, col: ColumnDef) -> Self {
        self.columns.push(col);
        self
    }

    /// Add a table constraint.
    pub fn constraint(mut self, constraint: TableConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Convert to SQL for the given dialect.
    pub fn to_sql(&self, dialect: Dialect) -> CompileResult<String> {
        Ok(self.to_tokens(dialect)?.serialize(dialect))
    }

    /// Convert to token stream.
    pub fn to_tokens(&self, dialect: Dialect) -> CompileResult<TokenStream> {
        let mut ts = TokenStream::new();

        ts.push(Token::Create)
            .space()
            .push(Token::Table)
            .space()
            .push(Token::TableIdent(self.name.clone()))
            .space()
            .lparen();

        // SQLite only allows AUTOINCREMENT on an inline INTEGER PRIMARY KEY,
        // so that column carries the key and the table constraint is skipped.
        let inline_key = matches!(dialect.auto_increment(), AutoIncrement::AfterPrimaryKey(_))
            && self.columns.iter().any(|c| c.auto_increment);

        let mut first = true;
        for col in &self.columns {
            if !first {
                ts.comma().space();
            }
            first = false;
            ts.append(&col.to_tokens(dialect));
        }

        for constraint in &self.constraints {
            if inline_key && matches!(constraint, TableConstraint::PrimaryKey { .. }) {
                continue;
            }
            if !first {
                ts.comma().space();
            }
            first = false;
            ts.append(&constraint.to_tokens(dialect)?);
        }

        ts.rparen();
        Ok(ts)
    }
}

// ============================================================================
// Column Definition
// ============================================================================

/// Column definition for CREATE TABLE.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    pub column_type: ColumnType,
    /// Declared length for text and binary columns, 0 for unbounded.
    pub length: u32,
    pub nullable: bool,
    pub auto_increment: bool,
}

impl ColumnDef {
    /// Create a new NOT NULL column definition.
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            length: 0,
            nullable: false,
            auto_increment: false,
        }
    }

    pub fn length(mut self, length: u32) -> Self {
        self.length = length;
        self
    }

    /// Mark column as nullable.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    /// Convert to token stream.
    pub fn to_tokens(&self, dialect: Dialect) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::Ident(self.name.clone())).space();

        let strategy = self.auto_increment.then(|| dialect.auto_increment());

        if let Some(AutoIncrement::ReplacesType(keyword)) = strategy {
            // Access counters are implicitly NOT NULL.
            ts.push(Token::Raw(keyword.into()));
            return ts;
        }

        ts.push(Token::Raw(
            dialect.column_type_definition(self.column_type, self.length),
        ));

        if !self.nullable {
            ts.space().push(Token::Not).space().push(Token::Null);
        }

        match strategy {
            Some(AutoIncrement::Inline(keyword)) => {
                ts.space().push(Token::Raw(keyword.into()));
            }
            Some(AutoIncrement::AfterPrimaryKey(keyword)) => {
                ts.space()
                    .push(Token::Primary)
                    .space()
                    .push(Token::Key)
                    .space()
                    .push(Token::Raw(keyword.into()));
            }
            Some(AutoIncrement::SequenceTrigger) | Some(AutoIncrement::ReplacesType(_)) | None => {}
        }

        ts
    }
}

// ============================================================================
// Table Constraints
// ============================================================================

/// Table-level constraints.
#[derive(Debug, Clone, PartialEq)]
pub enum TableConstraint {
    PrimaryKey {
        name: String,
        columns: Vec<String>,
    },
    ForeignKey {
        name: String,
        columns: Vec<String>,
        ref_table: String,
        ref_columns: Vec<String>,
        on_delete: ReferentialAction,
        on_update: ReferentialAction,
    },
}

impl TableConstraint {
    /// Create a named PRIMARY KEY constraint.
    pub fn primary_key(
        name: impl Into<String>,
        columns: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        TableConstraint::PrimaryKey {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a named FOREIGN KEY constraint with no referential actions.
    pub fn foreign_key(
        name: impl Into<String>,
        columns: impl IntoIterator<Item = impl Into<String>>,
        ref_table: impl Into<String>,
        ref_columns: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        TableConstraint::ForeignKey {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            ref_table: ref_table.into(),
            ref_columns: ref_columns.into_iter().map(Into::into).collect(),
            on_delete: ReferentialAction::NoAction,
            on_update: ReferentialAction::NoAction,
        }
    }

    /// Set ON DELETE / ON UPDATE on a foreign key. No effect on other constraints.
    pub fn with_actions(mut self, delete: ReferentialAction, update: ReferentialAction) -> Self {
        if let TableConstraint::ForeignKey {
            on_delete,
            on_update,
            ..
        } = &mut self
        {
            *on_delete = delete;
            *on_update = update;
        }
        self
    }

    /// Convert to token stream.
    pub fn to_tokens(&self, dialect: Dialect) -> CompileResult<TokenStream> {
        let mut ts = TokenStream::new();

        match self {
            TableConstraint::PrimaryKey { name, columns } => {
                ts.push(Token::Constraint)
                    .space()
                    .push(Token::TableIdent(name.clone()))
                    .space()
                    .push(Token::Primary)
                    .space()
                    .push(Token::Key)
                    .space()
                    .append(&column_list(columns));
            }
            TableConstraint::ForeignKey {
                name,
                columns,
                ref_table,
                ref_columns,
                on_delete,
                on_update,
            } => {
                ts.push(Token::Constraint)
                    .space()
                    .push(Token::TableIdent(name.clone()))
                    .space()
                    .push(Token::Foreign)
                    .space()
                    .push(Token::Key)
                    .space()
                    .append(&column_list(columns))
                    .space()
                    .push(Token::References)
                    .space()
                    .push(Token::TableIdent(ref_table.clone()))
                    .space()
                    .append(&column_list(ref_columns));

                for (action, on_update) in [(*on_delete, false), (*on_update, true)] {
                    if action == ReferentialAction::NoAction {
                        continue;
                    }
                    if !dialect.supports_referential_action(action, on_update) {
                        let event = if on_update { "ON UPDATE" } else { "ON DELETE" };
                        return Err(CompileError::not_supported(
                            dialect.name(),
                            format!("{event} {action}"),
                        ));
                    }
                    ts.space().push(Token::On).space().push(if on_update {
                        Token::Update
                    } else {
                        Token::Delete
                    });
                    ts.space().append(&action.to_tokens());
                }
            }
        }

        Ok(ts)
    }
}

fn column_list(columns: &[String]) -> TokenStream {
    let mut ts = TokenStream::new();
    ts.lparen();
    for (i, col) in columns.iter().enumerate() {
        if i > 0 {
            ts.comma().space();
        }
        ts.push(Token::Ident(col.clone()));
    }
    ts.rparen();
    ts
}

/// Referential actions for foreign keys.
///
/// `NoAction` is the engine default and renders no clause at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReferentialAction {
    #[default]
    NoAction,
    Restrict,
    Cascade,
    SetNull,
    SetDefault,
}

impl ReferentialAction {
    /// Convert to token stream.
    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        match self {
            ReferentialAction::NoAction => ts.push(Token::Raw("NO ACTION".into())),
            ReferentialAction::Restrict => ts.push(Token::Restrict),
            ReferentialAction::Cascade => ts.push(Token::Cascade),
            ReferentialAction::SetNull => ts.push(Token::SetNull),
            ReferentialAction::SetDefault => ts.push(Token::SetDefault),
        };
        ts
    }
}

impl fmt::Display for ReferentialAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ReferentialAction::NoAction => "NO ACTION",
            ReferentialAction::Restrict => "RESTRICT",
            ReferentialAction::Cascade => "CASCADE",
            ReferentialAction::SetNull => "SET NULL",
            ReferentialAction::SetDefault => "SET DEFAULT",
        };
        f.write_str(text)
    }
}

// ============================================================================
// CREATE INDEX
// ============================================================================

/// CREATE INDEX statement.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "DDL statements have no effect until converted to SQL with to_sql()"]
pub struct CreateIndex {
    pub name: String,
    pub table: String,
    pub columns: Vec<String>,
    pub unique: bool,
}

impl CreateIndex {
    /// Create a new CREATE INDEX statement.
    pub fn new(name: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            columns: Vec::new(),
            unique: false,
        }
    }

    /// Add a column to the index.
    pub fn column(mut self, col: impl Into<String>) -> Self {
        self.columns.push(col.into());
        self
    }

    /// Make this a UNIQUE index.
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Convert to SQL for the given dialect.
    pub fn to_sql(&self, dialect: Dialect) -> String {
        self.to_tokens().serialize(dialect)
    }

    /// Convert to token stream.
    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();

        ts.push(Token::Create).space();
        if self.unique {
            ts.push(Token::Unique).space();
        }
        ts.push(Token::Index)
            .space()
            .push(Token::TableIdent(self.name.clone()))
            .space()
            .push(Token::On)
            .space()
            .push(Token::TableIdent(self.table.clone()))
            .space()
            .append(&column_list(&self.columns));

        ts
    }
}

// ============================================================================
// DROP TABLE
// ============================================================================

/// DROP TABLE statement.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "DDL statements have no effect until converted to SQL with to_sql()"]
pub struct DropTable {
    pub name: String,
}

impl DropTable {
    /// Create a new DROP TABLE statement.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Convert to SQL for the given dialect.
    pub fn to_sql(&self, dialect: Dialect) -> String {
        self.to_tokens().serialize(dialect)
    }

    /// Convert to token stream.
    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::Drop)
            .space()
            .push(Token::Table)
            .space()
            .push(Token::TableIdent(self.name.clone()));
        ts
    }
}
