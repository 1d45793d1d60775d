//! SELECT statement arguments.

use tracing::debug;

use super::where_clause::Where;
use crate::error::{CompileError, CompileResult};
use crate::expression::{Expression, Member};
use crate::options::CompileOptions;
use crate::schema::{Entity, EntityRef};
use crate::sql::dialect::Dialect;
use crate::sql::expr::{Expr, SortDir};
use crate::sql::query::{JoinType, OrderByExpr, Query};
use crate::translate::{Scope, Translator};

/// An explicit join on one key equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinArgs {
    pub kind: JoinType,
    pub left: Member,
    pub right: Member,
}

impl JoinArgs {
    /// The table the join brings in: the right side's entity, or the left
    /// side's when the right side is the primary table.
    fn joined(&self, primary: EntityRef) -> EntityRef {
        if self.right.entity == primary {
            self.left.entity
        } else {
            self.right.entity
        }
    }
}

/// Arguments of a SELECT over entity rows.
///
/// # Example
///
/// ```
/// use heron::expression::Field;
/// use heron::schema::{Entity, EntityDef, FieldDef, Row};
/// use heron::sql::ColumnType;
/// use heron::statement::SelectArgs;
///
/// struct Country;
/// impl Country {
///     const ID: Field<Country, i32> = Field::new("Id");
///     const NAME: Field<Country, String> = Field::new("Name");
/// }
/// impl Entity for Country {
///     fn describe() -> EntityDef {
///         EntityDef::new("Country")
///             .field(FieldDef::scalar("Id", ColumnType::Int32).column_name("ID").auto_increment())
///             .field(FieldDef::scalar("Name", ColumnType::String))
///     }
///     fn row(&self) -> Row {
///         Row::new()
///     }
/// }
///
/// let sql = SelectArgs::select::<Country>([Country::NAME.expr()])
///     .and_where(Country::ID.eq(1))
///     .to_sql()
///     .unwrap();
/// assert_eq!(sql, "SELECT `Name` FROM Country WHERE Country.`ID` = 1");
/// ```
#[derive(Debug, Clone, PartialEq)]
#[must_use = "statement arguments have no effect until rendered with to_sql()"]
pub struct SelectArgs {
    entity: EntityRef,
    columns: Vec<Expression>,
    excluded: Vec<Member>,
    distinct: bool,
    where_clause: Where,
    joins: Vec<JoinArgs>,
    order_by: Vec<(Expression, SortDir)>,
    index: u64,
    count: u64,
    options: CompileOptions,
}

impl SelectArgs {
    fn new(entity: EntityRef) -> Self {
        Self {
            entity,
            columns: Vec::new(),
            excluded: Vec::new(),
            distinct: false,
            where_clause: Where::new(),
            joins: Vec::new(),
            order_by: Vec::new(),
            index: 0,
            count: 0,
            options: CompileOptions::default(),
        }
    }

    /// Select the given projection from `E`.
    pub fn select<E: Entity>(columns: impl IntoIterator<Item = impl Into<Expression>>) -> Self {
        let mut args = Self::new(EntityRef::of::<E>());
        args.columns = columns.into_iter().map(Into::into).collect();
        args
    }

    /// Select every persisted column of `E`.
    pub fn select_all<E: Entity>() -> Self {
        Self::new(EntityRef::of::<E>())
    }

    pub fn column(mut self, column: impl Into<Expression>) -> Self {
        self.columns.push(column.into());
        self
    }

    /// Drop a field from the column list.
    pub fn exclude(mut self, field: impl Into<Member>) -> Self {
        self.excluded.push(field.into());
        self
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    pub fn and_where(mut self, predicate: Expression) -> Self {
        self.where_clause.and(predicate);
        self
    }

    pub fn or_where(mut self, predicate: Expression) -> Self {
        self.where_clause.or(predicate);
        self
    }

    fn join(mut self, kind: JoinType, left: Member, right: Member) -> Self {
        self.joins.push(JoinArgs { kind, left, right });
        self
    }

    pub fn inner_join(self, left: impl Into<Member>, right: impl Into<Member>) -> Self {
        self.join(JoinType::Inner, left.into(), right.into())
    }

    pub fn left_join(self, left: impl Into<Member>, right: impl Into<Member>) -> Self {
        self.join(JoinType::Left, left.into(), right.into())
    }

    pub fn right_join(self, left: impl Into<Member>, right: impl Into<Member>) -> Self {
        self.join(JoinType::Right, left.into(), right.into())
    }

    pub fn order_by(mut self, expr: impl Into<Expression>) -> Self {
        self.order_by.push((expr.into(), SortDir::Asc));
        self
    }

    pub fn order_by_desc(mut self, expr: impl Into<Expression>) -> Self {
        self.order_by.push((expr.into(), SortDir::Desc));
        self
    }

    /// First row to return (0-based).
    pub fn index(mut self, index: u64) -> Self {
        self.index = index;
        self
    }

    /// Most rows to return; 0 for no limit.
    pub fn count(mut self, count: u64) -> Self {
        self.count = count;
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

    pub fn entity(&self) -> EntityRef {
        self.entity
    }

    /// Explicit projection; empty means every column.
    pub fn columns(&self) -> &[Expression] {
        &self.columns
    }

    pub fn where_mut(&mut self) -> &mut Where {
        &mut self.where_clause
    }

    /// Render with the statement's own options.
    pub fn to_sql(&self) -> CompileResult<String> {
        let (query, _) = self.build(self.options, None)?;
        let sql = query.to_sql(self.options.dialect)?;
        debug!(entity = %self.entity, dialect = %self.options.dialect, "rendered select");
        Ok(sql)
    }

    /// Lower to a query plus the scope its columns were qualified against.
    /// `enclosing` is the scope of the statement this one is a subquery of;
    /// its tables are referenced, never re-added to FROM.
    pub(crate) fn build(
        &self,
        options: CompileOptions,
        enclosing: Option<&Scope>,
    ) -> CompileResult<(Query, Scope)> {
        let mut scope = match enclosing {
            Some(enclosing) => Scope::nested(self.entity, enclosing)?,
            None => Scope::new(self.entity)?,
        };

        let mut joined = Vec::with_capacity(self.joins.len());
        for join in &self.joins {
            let entity = join.joined(self.entity);
            if !scope.add(entity)? {
                return Err(CompileError::unsupported(
                    &join.right,
                    format!("{entity} is already part of the statement"),
                ));
            }
            joined.push(entity);
        }

        // Tables referenced but never joined become implicit FROM entries,
        // listed after the joins.
        let mut implicit = Vec::new();
        let referenced = self
            .columns
            .iter()
            .chain(self.where_clause.predicate())
            .chain(self.order_by.iter().map(|(e, _)| e))
            .flat_map(Expression::referenced_entities);
        for entity in referenced {
            if !scope.is_outer(entity) && scope.add(entity)? {
                implicit.push(entity);
            }
        }

        let translator = Translator::new(&scope, options);

        let select = if self.columns.is_empty() {
            let schema = scope.primary();
            schema
                .columns
                .iter()
                .filter(|c| !self.is_excluded(schema.entity, c.field))
                .map(|c| {
                    let member = Member {
                        entity: schema.entity,
                        field: c.field,
                    };
                    translator.projection(&member.into()).map(|t| t.fragment)
                })
                .collect::<CompileResult<Vec<_>>>()?
        } else {
            self.columns
                .iter()
                .filter(|c| match c {
                    Expression::Member(m) => !self.is_excluded(m.entity, m.field),
                    _ => true,
                })
                .map(|c| translator.projection(c).map(|t| t.fragment))
                .collect::<CompileResult<Vec<_>>>()?
        };
        if select.is_empty() {
            return Err(CompileError::schema(
                self.entity.to_string(),
                "every column is excluded from the select",
            ));
        }

        let mut query = Query::new()
            .select(select)
            .from(scope.table_ref(scope.primary()));
        if self.distinct {
            query = query.distinct();
        }
        for (join, entity) in self.joins.iter().zip(&joined) {
            let Some(schema) = scope.schema(*entity) else {
                continue;
            };
            query = query.join(
                join.kind,
                scope.table_ref(schema),
                translator.column(&join.left)?,
                translator.column(&join.right)?,
            );
        }
        for entity in &implicit {
            if let Some(schema) = scope.schema(*entity) {
                query = query.from(scope.table_ref(schema));
            }
        }
        if let Some(filter) = self.where_clause.translate(&translator)? {
            query = query.filter(filter);
        }
        if !self.order_by.is_empty() {
            let order_by = self
                .order_by
                .iter()
                .map(|(expr, dir)| {
                    let expr: Expr = translator.ordering(expr)?.fragment;
                    Ok(match dir {
                        SortDir::Asc => OrderByExpr::asc(expr),
                        SortDir::Desc => OrderByExpr::desc(expr),
                    })
                })
                .collect::<CompileResult<Vec<_>>>()?;
            query = query.order_by(order_by);
        }
        if self.index > 0 || self.count > 0 {
            query = query.page(self.index, self.count);
        }

        Ok((query, scope))
    }

    fn is_excluded(&self, entity: EntityRef, field: &str) -> bool {
        self.excluded
            .iter()
            .any(|m| m.entity == entity && m.field == field)
    }
}
