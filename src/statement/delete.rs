//! DELETE statement arguments.

use tracing::debug;

use super::where_clause::Where;
use super::{row_literal, STATEMENT_SEPARATOR};
use crate::error::CompileResult;
use crate::expression::Expression;
use crate::options::CompileOptions;
use crate::schema::{Entity, EntityRef, Row};
use crate::sql::dialect::{Dialect, SqlDialect};
use crate::sql::dml::Delete;
use crate::sql::expr::Expr;
use crate::sql::types::Value;
use crate::translate::{Scope, Translator};

#[derive(Debug, Clone, PartialEq)]
enum Target {
    Rows(Vec<Row>),
    Ids(Vec<Value>),
    Filter(Where),
    All,
}

/// Arguments of a DELETE.
///
/// Key-based deletes are chunked: a batch of one key renders `pk = v`, a
/// larger batch `pk IN (..)`. Dialects without multi-row DELETE get one
/// statement per key, see [`DeleteArgs::requires_chunking`].
#[derive(Debug, Clone, PartialEq)]
#[must_use = "statement arguments have no effect until rendered with to_sql()"]
pub struct DeleteArgs {
    entity: EntityRef,
    target: Target,
    options: CompileOptions,
}

impl DeleteArgs {
    fn with_target<E: Entity>(target: Target) -> Self {
        Self {
            entity: EntityRef::of::<E>(),
            target,
            options: CompileOptions::default(),
        }
    }

    /// Delete one entity by its primary key.
    pub fn delete<E: Entity>(item: &E) -> Self {
        Self::delete_many(std::iter::once(item))
    }

    pub fn delete_many<'a, E: Entity>(items: impl IntoIterator<Item = &'a E>) -> Self {
        Self::with_target::<E>(Target::Rows(items.into_iter().map(Entity::row).collect()))
    }

    pub fn delete_by_id<E: Entity>(id: impl Into<Value>) -> Self {
        Self::with_target::<E>(Target::Ids(vec![id.into()]))
    }

    pub fn delete_by_ids<E: Entity, V: Into<Value>>(ids: impl IntoIterator<Item = V>) -> Self {
        Self::with_target::<E>(Target::Ids(ids.into_iter().map(Into::into).collect()))
    }

    pub fn delete_where<E: Entity>(predicate: Expression) -> Self {
        let mut clause = Where::new();
        clause.and(predicate);
        Self::with_target::<E>(Target::Filter(clause))
    }

    /// Delete every row of the table.
    pub fn delete_all<E: Entity>() -> Self {
        Self::with_target::<E>(Target::All)
    }

    /// Narrow a predicate delete. On a key-based delete the predicate
    /// replaces the keys.
    pub fn and_where(mut self, predicate: Expression) -> Self {
        match &mut self.target {
            Target::Filter(clause) => {
                clause.and(predicate);
            }
            _ => {
                let mut clause = Where::new();
                clause.and(predicate);
                self.target = Target::Filter(clause);
            }
        }
        self
    }

    pub fn options(mut self, options: CompileOptions) -> Self {
        self.options = options;
        self
    }

    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.options.dialect = dialect;
        self
    }

    /// Whether callers must issue one DELETE per key on `dialect`.
    pub fn requires_chunking(dialect: Dialect) -> bool {
        !dialect.supports_multi_row_delete()
    }

    /// DELETE statements, one per batch of keys.
    pub fn batches(&self) -> CompileResult<Vec<String>> {
        let scope = Scope::new(self.entity)?;
        let schema = scope.primary();
        let dialect = self.options.dialect;

        let keys = match &self.target {
            Target::All => return Ok(vec![Delete::from(&schema.table).to_sql(dialect)?]),
            Target::Filter(clause) => {
                let translator = Translator::new(&scope, self.options);
                let mut delete = Delete::from(&schema.table);
                if let Some(filter) = clause.translate(&translator)? {
                    delete = delete.filter(filter);
                }
                return Ok(vec![delete.to_sql(dialect)?]);
            }
            Target::Ids(ids) => ids
                .iter()
                .map(|id| Expr::Literal(self.options.resolve_value(id.clone())))
                .collect::<Vec<_>>(),
            Target::Rows(rows) => {
                let key = schema.require_key()?;
                rows.iter()
                    .map(|row| row_literal(schema, row, key, &self.options))
                    .collect::<CompileResult<Vec<_>>>()?
            }
        };

        let key = schema.require_key()?;
        let column = Expr::qualified(scope.qualifier(schema), &key.name);
        let batch_rows = self.options.batch_rows();
        let statements = keys
            .chunks(batch_rows)
            .map(|chunk| {
                let filter = match chunk {
                    [single] => column.clone().eq(single.clone()),
                    _ => Expr::In {
                        expr: Box::new(column.clone()),
                        values: chunk.to_vec(),
                        negated: false,
                    },
                };
                Delete::from(&schema.table).filter(filter).to_sql(dialect)
            })
            .collect::<CompileResult<Vec<_>>>()?;

        debug!(
            table = %schema.table,
            keys = keys.len(),
            batch_rows,
            batches = statements.len(),
            "chunked delete"
        );
        Ok(statements)
    }

    pub fn to_sql(&self) -> CompileResult<String> {
        Ok(self.batches()?.join(STATEMENT_SEPARATOR))
    }
}
