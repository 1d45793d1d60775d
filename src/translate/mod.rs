//! Expression translation.
//!
//! Lowers the typed [`Expression`] tree into the SQL fragment tree
//! ([`Expr`]), resolving members to table-qualified columns through the
//! statement's [`Scope`].
//!
//! The same expression lowers differently by position:
//!
//! - **predicate** (WHERE): comparisons, LIKE idioms, IN, EXISTS and bare
//!   boolean columns. Columns are always qualified.
//! - **projection** (SELECT list): values and aggregates. Columns are
//!   qualified only when the statement spans more than one table.
//! - **ordering** (ORDER BY): values, always qualified.
//!
//! Anything outside these rules fails with
//! [`CompileError::UnsupportedExpression`] carrying the expression's text.

mod scope;

pub use scope::Scope;

use tracing::trace;

use crate::error::{CompileError, CompileResult};
use crate::expression::{Aggregate, BinaryOp, ExistsQuery, Expression, Member, Method};
use crate::options::CompileOptions;
use crate::schema::EntityRef;
use crate::sql::expr::{BinaryOperator, Expr};
use crate::sql::types::{ColumnType, Value};

/// A lowered fragment and the entities it reads from.
#[derive(Debug, Clone, PartialEq)]
pub struct Translation {
    pub fragment: Expr,
    pub tables: Vec<EntityRef>,
}

#[derive(Debug, Clone, Copy)]
struct Position {
    qualify: bool,
    aggregates: bool,
}

/// Translates expressions against one statement scope.
pub struct Translator<'s> {
    scope: &'s Scope,
    options: CompileOptions,
}

impl<'s> Translator<'s> {
    pub fn new(scope: &'s Scope, options: CompileOptions) -> Self {
        Self { scope, options }
    }

    /// Lower a WHERE predicate.
    pub fn predicate(&self, expr: &Expression) -> CompileResult<Translation> {
        let fragment = self.lower_predicate(expr)?;
        trace!(expression = %expr, "translated predicate");
        Ok(Translation {
            fragment,
            tables: expr.referenced_entities(),
        })
    }

    /// Lower a SELECT list item.
    pub fn projection(&self, expr: &Expression) -> CompileResult<Translation> {
        let position = Position {
            qualify: self.scope.is_multi_table(),
            aggregates: true,
        };
        Ok(Translation {
            fragment: self.lower_value(expr, position)?,
            tables: expr.referenced_entities(),
        })
    }

    /// Lower an ORDER BY item.
    pub fn ordering(&self, expr: &Expression) -> CompileResult<Translation> {
        let position = Position {
            qualify: true,
            aggregates: false,
        };
        Ok(Translation {
            fragment: self.lower_value(expr, position)?,
            tables: expr.referenced_entities(),
        })
    }

    /// Table-qualified column for a member.
    pub fn column(&self, member: &Member) -> CompileResult<Expr> {
        self.member(member, true)
    }

    fn member(&self, member: &Member, qualify: bool) -> CompileResult<Expr> {
        let (qualifier, column) = self.scope.resolve(member)?;
        Ok(if qualify || self.scope.is_outer(member.entity) {
            Expr::qualified(qualifier, &column.name)
        } else {
            Expr::column(&column.name)
        })
    }

    fn constant(&self, value: &Value, expr: &Expression) -> CompileResult<Expr> {
        if let Value::List(_) = value {
            return Err(CompileError::unsupported(
                expr,
                "list constants are only valid in IN",
            ));
        }
        Ok(Expr::Literal(self.options.resolve_value(value.clone())))
    }

    // -------------------------------------------------------------------------
    // Predicates
    // -------------------------------------------------------------------------

    fn lower_predicate(&self, expr: &Expression) -> CompileResult<Expr> {
        match expr {
            Expression::Member(member) => self.boolean_column(expr, member, true),

            Expression::Constant(Value::Bool(b)) => Ok(tautology(*b)),
            Expression::Constant(_) => Err(CompileError::unsupported(
                expr,
                "constant is not a predicate",
            )),

            Expression::Binary { left, op, right } if op.is_logical() => Ok(Expr::binary(
                self.lower_predicate(left)?,
                operator(*op),
                self.lower_predicate(right)?,
            )),
            Expression::Binary { left, op, right } if op.is_comparison() => {
                self.comparison(expr, left, *op, right)
            }
            Expression::Binary { .. } => Err(CompileError::unsupported(
                expr,
                "arithmetic is not a predicate",
            )),

            Expression::Not(inner) => self.negation(inner),

            Expression::Method {
                method,
                target,
                args,
            } => self.method_predicate(expr, *method, target, args),

            Expression::In { target, values } => self.membership(target, values, false),

            Expression::Aggregate { .. } => Err(CompileError::unsupported(
                expr,
                "aggregates are only valid in projections",
            )),

            Expression::Exists(query) => self.exists(query, false),
        }
    }

    /// Lower `!inner`, pushing the negation into nodes that carry it.
    fn negation(&self, inner: &Expression) -> CompileResult<Expr> {
        match inner {
            Expression::Not(x) => self.lower_predicate(x),
            Expression::Member(member) => self.boolean_column(inner, member, false),
            Expression::Constant(Value::Bool(b)) => Ok(tautology(!b)),
            Expression::In { target, values } => self.membership(target, values, true),
            Expression::Exists(query) => self.exists(query, true),
            Expression::Method {
                method: Method::IsNullOrEmpty,
                target,
                ..
            } => self.null_or_empty(target, true),
            Expression::Binary {
                left,
                op: op @ (BinaryOp::Eq | BinaryOp::Ne),
                right,
            } if is_null(left) || is_null(right) => {
                let flipped = if *op == BinaryOp::Eq {
                    BinaryOp::Ne
                } else {
                    BinaryOp::Eq
                };
                self.comparison(inner, left, flipped, right)
            }
            _ => Ok(Expr::Not(Box::new(self.lower_predicate(inner)?))),
        }
    }

    /// A bare boolean column: `col = 1`, or `col = 0` when negated.
    fn boolean_column(
        &self,
        expr: &Expression,
        member: &Member,
        value: bool,
    ) -> CompileResult<Expr> {
        let (_, column) = self.scope.resolve(member)?;
        if column.column_type != ColumnType::Bool {
            return Err(CompileError::unsupported(
                expr,
                format!("{} column is not a predicate", column.column_type),
            ));
        }
        Ok(self.member(member, true)?.eq(Expr::literal(value)))
    }

    fn comparison(
        &self,
        expr: &Expression,
        left: &Expression,
        op: BinaryOp,
        right: &Expression,
    ) -> CompileResult<Expr> {
        let operand = match (is_null(left), is_null(right)) {
            (true, true) => {
                return Err(CompileError::unsupported(expr, "both operands are null"));
            }
            (false, true) => left,
            (true, false) => right,
            (false, false) => {
                let position = Position {
                    qualify: true,
                    aggregates: false,
                };
                return Ok(Expr::binary(
                    self.lower_value(left, position)?,
                    operator(op),
                    self.lower_value(right, position)?,
                ));
            }
        };

        let negated = match op {
            BinaryOp::Eq => false,
            BinaryOp::Ne => true,
            _ => {
                return Err(CompileError::unsupported(
                    expr,
                    "null only compares with == or !=",
                ))
            }
        };
        Ok(Expr::IsNull {
            expr: Box::new(self.lower_value(operand, predicate_operand())?),
            negated,
        })
    }

    fn method_predicate(
        &self,
        expr: &Expression,
        method: Method,
        target: &Expression,
        args: &[Expression],
    ) -> CompileResult<Expr> {
        let text = match args {
            [Expression::Constant(Value::String(s))] => Some(s.as_str()),
            _ => None,
        };
        let pattern = |text: Option<&str>, shape: fn(&str) -> String| {
            text.map(shape).ok_or_else(|| {
                CompileError::unsupported(
                    expr,
                    format!("{} takes one string constant", method.name()),
                )
            })
        };

        let (subject, pattern) = match method {
            Method::IsNullOrEmpty => return self.null_or_empty(target, false),
            Method::StartsWith => (
                self.lower_value(target, predicate_operand())?,
                pattern(text, |t| format!("{t}%"))?,
            ),
            Method::EndsWith => (
                self.lower_value(target, predicate_operand())?,
                pattern(text, |t| format!("%{t}"))?,
            ),
            Method::Contains => (
                self.lower_value(target, predicate_operand())?,
                pattern(text, |t| format!("%{t}%"))?,
            ),
            Method::EqualsIgnoreCase => (
                Expr::function("UPPER", vec![self.lower_value(target, predicate_operand())?]),
                pattern(text, str::to_uppercase)?,
            ),
            Method::ToUpper | Method::ToLower | Method::Trim | Method::Length => {
                return Err(CompileError::unsupported(
                    expr,
                    format!("{} is not a predicate", method.name()),
                ))
            }
        };
        Ok(Expr::Like {
            expr: Box::new(subject),
            pattern: Box::new(Expr::literal(pattern)),
        })
    }

    fn null_or_empty(&self, target: &Expression, negated: bool) -> CompileResult<Expr> {
        Ok(Expr::NullOrEmpty {
            expr: Box::new(self.lower_value(target, predicate_operand())?),
            negated,
        })
    }

    fn membership(
        &self,
        target: &Expression,
        values: &[Expression],
        negated: bool,
    ) -> CompileResult<Expr> {
        let values = values
            .iter()
            .map(|value| match value {
                Expression::Constant(v) => self.constant(v, value),
                other => Err(CompileError::unsupported(
                    other,
                    "IN lists hold constants only",
                )),
            })
            .collect::<CompileResult<Vec<_>>>()?;

        Ok(Expr::In {
            expr: Box::new(self.lower_value(target, predicate_operand())?),
            values,
            negated,
        })
    }

    /// `EXISTS (inner ... AND target = source)`. The inner select is built
    /// against this scope, so its references to our tables stay correlated.
    fn exists(&self, query: &ExistsQuery, negated: bool) -> CompileResult<Expr> {
        let (inner, inner_scope) = query.query.build(self.options, Some(self.scope))?;
        if !inner_scope.contains(query.source.entity) {
            return Err(CompileError::unsupported(
                &query.source,
                "correlation source is not part of the inner select",
            ));
        }

        let source = Translator::new(&inner_scope, self.options).column(&query.source)?;
        let target = self.column(&query.target)?;
        Ok(Expr::Exists {
            query: Box::new(inner),
            correlation: Box::new(target.eq(source)),
            negated,
        })
    }

    // -------------------------------------------------------------------------
    // Values
    // -------------------------------------------------------------------------

    fn lower_value(&self, expr: &Expression, position: Position) -> CompileResult<Expr> {
        match expr {
            Expression::Member(member) => self.member(member, position.qualify),

            Expression::Constant(value) => self.constant(value, expr),

            Expression::Binary { left, op, right } if op.is_arithmetic() => Ok(Expr::binary(
                self.lower_value(left, position)?,
                operator(*op),
                self.lower_value(right, position)?,
            )),
            Expression::Binary { .. } | Expression::Not(_) => Err(CompileError::unsupported(
                expr,
                "boolean expression used as a value",
            )),

            Expression::Method { method, target, .. } => {
                let name = match method {
                    Method::ToUpper => "UPPER",
                    Method::ToLower => "LOWER",
                    Method::Trim => "TRIM",
                    Method::Length => "LENGTH",
                    _ => {
                        return Err(CompileError::unsupported(
                            expr,
                            format!("{} is only valid in a predicate", method.name()),
                        ))
                    }
                };
                Ok(Expr::function(
                    name,
                    vec![self.lower_value(target, position)?],
                ))
            }

            Expression::In { .. } | Expression::Exists(_) => Err(CompileError::unsupported(
                expr,
                "predicates are only valid in WHERE",
            )),

            Expression::Aggregate { func, arg } => {
                if !position.aggregates {
                    return Err(CompileError::unsupported(
                        expr,
                        "aggregates are only valid in projections",
                    ));
                }
                let arg = match arg {
                    Some(arg) => self.lower_value(arg, position)?,
                    None if *func == Aggregate::Count => Expr::Star,
                    None => {
                        return Err(CompileError::unsupported(
                            expr,
                            "only COUNT takes no argument",
                        ))
                    }
                };
                Ok(Expr::function(func.sql_name(), vec![arg]))
            }
        }
    }
}

fn predicate_operand() -> Position {
    Position {
        qualify: true,
        aggregates: false,
    }
}

fn is_null(expr: &Expression) -> bool {
    matches!(expr, Expression::Constant(Value::Null))
}

/// `1 = 1` or `1 = 0`.
fn tautology(holds: bool) -> Expr {
    Expr::literal(1).eq(Expr::literal(if holds { 1 } else { 0 }))
}

fn operator(op: BinaryOp) -> BinaryOperator {
    match op {
        BinaryOp::Eq => BinaryOperator::Eq,
        BinaryOp::Ne => BinaryOperator::Ne,
        BinaryOp::Lt => BinaryOperator::Lt,
        BinaryOp::Le => BinaryOperator::Lte,
        BinaryOp::Gt => BinaryOperator::Gt,
        BinaryOp::Ge => BinaryOperator::Gte,
        BinaryOp::And => BinaryOperator::And,
        BinaryOp::Or => BinaryOperator::Or,
        BinaryOp::Add => BinaryOperator::Plus,
        BinaryOp::Sub => BinaryOperator::Minus,
        BinaryOp::Mul => BinaryOperator::Mul,
        BinaryOp::Div => BinaryOperator::Div,
        BinaryOp::Rem => BinaryOperator::Mod,
    }
}
