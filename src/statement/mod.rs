//! Statement builders.
//!
//! Each builder collects arguments through fluent calls and renders SQL
//! text on demand. Rendering never mutates the arguments, so rendering twice
//! yields the same text.
//!
//! - [`SelectArgs`] - projection, joins, WHERE, ORDER BY, paging
//! - [`InsertArgs`] / [`UpdateArgs`] / [`DeleteArgs`] - row writes, chunked
//!   into batches the dialect accepts
//! - [`TableArgs`] - CREATE / DROP for an entity's table
//! - [`Where`] - accumulated predicates

mod delete;
mod insert;
mod select;
mod table;
mod update;
mod where_clause;

pub use delete::DeleteArgs;
pub use insert::InsertArgs;
pub use select::{JoinArgs, SelectArgs};
pub use table::TableArgs;
pub use update::UpdateArgs;
pub use where_clause::Where;

use crate::error::{CompileError, CompileResult};
use crate::expression::Member;
use crate::options::CompileOptions;
use crate::schema::{ColumnSchema, Row, TableSchema};
use crate::sql::expr::Expr;

/// Separator between statements of one batch.
pub const STATEMENT_SEPARATOR: &str = ";\n";

/// Literal for a column's value in an entity row.
fn row_literal(
    schema: &TableSchema,
    row: &Row,
    column: &ColumnSchema,
    options: &CompileOptions,
) -> CompileResult<Expr> {
    let value = row.get(column.field).ok_or_else(|| {
        CompileError::schema(
            schema.entity.to_string(),
            format!("row has no value for field `{}`", column.field),
        )
    })?;
    Ok(Expr::Literal(options.resolve_value(value.clone())))
}

/// Exclusions must name persisted fields of the statement's entity.
fn check_exclusions(schema: &TableSchema, excluded: &[Member]) -> CompileResult<()> {
    for member in excluded {
        if member.entity != schema.entity || schema.column_for_field(member.field).is_none() {
            return Err(CompileError::unsupported(
                member,
                format!("not a persisted field of {}", schema.entity),
            ));
        }
    }
    Ok(())
}

fn is_excluded(excluded: &[Member], column: &ColumnSchema) -> bool {
    excluded.iter().any(|m| m.field == column.field)
}
