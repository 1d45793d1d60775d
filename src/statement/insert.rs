//! INSERT statement arguments.

use tracing::debug;

use super::{check_exclusions, is_excluded, row_literal, STATEMENT_SEPARATOR};
use crate::error::{CompileError, CompileResult};
use crate::expression::Member;
use crate::options::CompileOptions;
use crate::schema::{ColumnSchema, Entity, EntityRef, Row};
use crate::sql::dialect::{Dialect, SqlDialect};
use crate::sql::dml::Insert;

/// Arguments of an INSERT of one or more entity rows.
///
/// Auto-increment columns are never written. Rows are split into batches
/// of at most [`CompileOptions::batch_rows`] rows, one statement each.
/// A table whose only written column is auto-increment gets one
/// default-row INSERT per row in the dialect's form.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "statement arguments have no effect until rendered with to_sql()"]
pub struct InsertArgs {
    entity: EntityRef,
    rows: Vec<Row>,
    excluded: Vec<Member>,
    options: CompileOptions,
}

impl InsertArgs {
    pub fn insert<E: Entity>(item: &E) -> Self {
        Self::insert_many(std::iter::once(item))
    }

    pub fn insert_many<'a, E: Entity>(items: impl IntoIterator<Item = &'a E>) -> Self {
        Self {
            entity: EntityRef::of::<E>(),
            rows: items.into_iter().map(Entity::row).collect(),
            excluded: Vec::new(),
            options: CompileOptions::default(),
        }
    }

    /// Leave a field out of the column and value lists.
    pub fn exclude(mut self, field: impl Into<Member>) -> Self {
        self.excluded.push(field.into());
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

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// One INSERT per batch of rows.
    pub fn batches(&self) -> CompileResult<Vec<String>> {
        let schema = self.entity.schema()?;
        check_exclusions(&schema, &self.excluded)?;

        let writable: Vec<_> = schema.columns.iter().filter(|c| !c.auto_increment).collect();
        if writable.is_empty() {
            return self.default_rows(&schema.table, schema.auto_increment_column());
        }
        let columns: Vec<_> = writable
            .into_iter()
            .filter(|c| !is_excluded(&self.excluded, c))
            .collect();
        if columns.is_empty() {
            return Err(CompileError::schema(
                self.entity.to_string(),
                "every column is excluded from the insert",
            ));
        }

        let batch_rows = self.options.batch_rows();
        let statements = self
            .rows
            .chunks(batch_rows)
            .map(|chunk| {
                let values = chunk
                    .iter()
                    .map(|row| {
                        columns
                            .iter()
                            .map(|c| row_literal(&schema, row, c, &self.options))
                            .collect::<CompileResult<Vec<_>>>()
                    })
                    .collect::<CompileResult<Vec<_>>>()?;
                Insert::into(&schema.table)
                    .columns(columns.iter().map(|c| c.name.as_str()))
                    .values_many(values)
                    .to_sql(self.options.dialect)
            })
            .collect::<CompileResult<Vec<_>>>()?;

        debug!(
            table = %schema.table,
            rows = self.rows.len(),
            batch_rows,
            batches = statements.len(),
            "chunked insert"
        );
        Ok(statements)
    }

    pub fn to_sql(&self) -> CompileResult<String> {
        Ok(self.batches()?.join(STATEMENT_SEPARATOR))
    }

    fn default_rows(
        &self,
        table: &str,
        key: Option<&ColumnSchema>,
    ) -> CompileResult<Vec<String>> {
        let key = key.ok_or_else(|| {
            CompileError::schema(self.entity.to_string(), "no writable columns")
        })?;
        let statement = self.options.dialect.insert_default_row(table, &key.name)?;
        debug!(table = %table, rows = self.rows.len(), "default-row insert");
        Ok(vec![statement; self.rows.len()])
    }
}
