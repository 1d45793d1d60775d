//! UPDATE statement arguments.

use tracing::debug;

use super::where_clause::Where;
use super::{check_exclusions, is_excluded, row_literal, STATEMENT_SEPARATOR};
use crate::error::{CompileError, CompileResult};
use crate::expression::{Expression, Member};
use crate::options::CompileOptions;
use crate::schema::{ColumnSchema, Entity, EntityRef, Row};
use crate::sql::dialect::Dialect;
use crate::sql::dml::Update;
use crate::sql::expr::Expr;
use crate::translate::{Scope, Translator};

enum RowFilter<'a> {
    Explicit(Expr),
    Key(&'a ColumnSchema),
}

/// Arguments of an UPDATE of one or more entity rows.
///
/// Every non-key column is written. Each row gets its own statement, keyed
/// on the primary key unless an explicit WHERE is given. Statements are
/// grouped into batches of [`CompileOptions::batch_rows`].
#[derive(Debug, Clone, PartialEq)]
#[must_use = "statement arguments have no effect until rendered with to_sql()"]
pub struct UpdateArgs {
    entity: EntityRef,
    rows: Vec<Row>,
    excluded: Vec<Member>,
    where_clause: Where,
    options: CompileOptions,
}

impl UpdateArgs {
    pub fn update<E: Entity>(item: &E) -> Self {
        Self::update_many(std::iter::once(item))
    }

    pub fn update_many<'a, E: Entity>(items: impl IntoIterator<Item = &'a E>) -> Self {
        Self {
            entity: EntityRef::of::<E>(),
            rows: items.into_iter().map(Entity::row).collect(),
            excluded: Vec::new(),
            where_clause: Where::new(),
            options: CompileOptions::default(),
        }
    }

    /// Leave a field out of the SET list.
    pub fn exclude(mut self, field: impl Into<Member>) -> Self {
        self.excluded.push(field.into());
        self
    }

    /// Replace the primary-key condition with an explicit predicate.
    pub fn and_where(mut self, predicate: Expression) -> Self {
        self.where_clause.and(predicate);
        self
    }

    pub fn or_where(mut self, predicate: Expression) -> Self {
        self.where_clause.or(predicate);
        self
    }

    pub fn where_mut(&mut self) -> &mut Where {
        &mut self.where_clause
    }

    pub fn options(mut self, options: CompileOptions) -> Self {
        self.options = options;
        self
    }

    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.options.dialect = dialect;
        self
    }

    /// UPDATE statements grouped into batches, joined by `;\n` within each.
    pub fn batches(&self) -> CompileResult<Vec<String>> {
        let scope = Scope::new(self.entity)?;
        let schema = scope.primary();
        check_exclusions(schema, &self.excluded)?;

        let assigned: Vec<_> = schema
            .columns
            .iter()
            .filter(|c| !c.key && !c.auto_increment && !is_excluded(&self.excluded, c))
            .collect();
        if assigned.is_empty() {
            return Err(CompileError::schema(
                schema.entity.to_string(),
                "no columns left to update",
            ));
        }

        let translator = Translator::new(&scope, self.options);
        let filter = match self.where_clause.translate(&translator)? {
            Some(filter) => RowFilter::Explicit(filter),
            None => RowFilter::Key(schema.require_key()?),
        };

        let statements = self
            .rows
            .iter()
            .map(|row| {
                let mut update = Update::table(&schema.table);
                for column in &assigned {
                    update = update.set(
                        &column.name,
                        row_literal(schema, row, column, &self.options)?,
                    );
                }
                let condition = match &filter {
                    RowFilter::Explicit(filter) => filter.clone(),
                    RowFilter::Key(key) => Expr::qualified(scope.qualifier(schema), &key.name)
                        .eq(row_literal(schema, row, key, &self.options)?),
                };
                update.filter(condition).to_sql(self.options.dialect)
            })
            .collect::<CompileResult<Vec<_>>>()?;

        let batch_rows = self.options.batch_rows();
        let batches: Vec<String> = statements
            .chunks(batch_rows)
            .map(|chunk| chunk.join(STATEMENT_SEPARATOR))
            .collect();
        debug!(
            table = %schema.table,
            rows = self.rows.len(),
            batches = batches.len(),
            "chunked update"
        );
        Ok(batches)
    }

    pub fn to_sql(&self) -> CompileResult<String> {
        Ok(self.batches()?.join(STATEMENT_SEPARATOR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::Field;
    use crate::schema::{EntityDef, FieldDef};
    use crate::sql::test_utils::validate_sql;
    use crate::sql::types::ColumnType;

    struct Account {
        id: i32,
        owner: String,
        balance: f64,
    }

    impl Account {
        const OWNER: Field<Account, String> = Field::new("Owner");
        const BALANCE: Field<Account, f64> = Field::new("Balance");

        fn new(id: i32, owner: &str, balance: f64) -> Self {
            Self {
                id,
                owner: owner.to_string(),
                balance,
            }
        }
    }

    impl Entity for Account {
        fn describe() -> EntityDef {
            EntityDef::new("Account")
                .field(FieldDef::scalar("Id", ColumnType::Int32).column_name("ID").auto_increment())
                .field(FieldDef::scalar("Owner", ColumnType::String).length(80))
                .field(FieldDef::scalar("Balance", ColumnType::Float64))
        }

        fn row(&self) -> Row {
            Row::new()
                .set("Id", self.id)
                .set("Owner", self.owner.as_str())
                .set("Balance", self.balance)
        }
    }

    #[test]
    fn test_update_keyed_on_primary_key() {
        let sql = UpdateArgs::update(&Account::new(7, "ann", 1.5)).to_sql().unwrap();
        assert_eq!(
            sql,
            "UPDATE Account SET `Owner` = 'ann', `Balance` = 1.5 WHERE Account.`ID` = 7"
        );
        validate_sql(&sql, Dialect::MySql).unwrap();
    }

    #[test]
    fn test_explicit_where_replaces_key() {
        let sql = UpdateArgs::update(&Account::new(7, "ann", 0.0))
            .exclude(Account::OWNER)
            .and_where(Account::OWNER.eq("ann"))
            .dialect(Dialect::Sqlite)
            .to_sql()
            .unwrap();
        assert_eq!(
            sql,
            "UPDATE \"Account\" SET \"Balance\" = 0.0 WHERE \"Account\".\"Owner\" = 'ann'"
        );
    }

    #[test]
    fn test_batches_join_statements() {
        let accounts = [
            Account::new(1, "a", 1.0),
            Account::new(2, "b", 2.0),
            Account::new(3, "c", 3.0),
        ];
        let args = UpdateArgs::update_many(&accounts)
            .exclude(Account::BALANCE)
            .options(CompileOptions::default().with_max_batch_rows(2));
        let batches = args.batches().unwrap();
        assert_eq!(batches.len(), 2);
        assert_eq!(
            batches[0],
            "UPDATE Account SET `Owner` = 'a' WHERE Account.`ID` = 1;\nUPDATE Account SET `Owner` = 'b' WHERE Account.`ID` = 2"
        );
        assert_eq!(args.to_sql().unwrap().matches(STATEMENT_SEPARATOR).count(), 2);
    }

    #[test]
    fn test_nothing_to_update() {
        let result = UpdateArgs::update(&Account::new(1, "a", 1.0))
            .exclude(Account::OWNER)
            .exclude(Account::BALANCE)
            .to_sql();
        assert!(matches!(result, Err(CompileError::Schema { .. })));
    }
}
