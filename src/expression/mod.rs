//! Typed input expressions over entity fields.
//!
//! This module defines the closed expression tree that predicates,
//! projections and orderings are written in. The translator lowers it into
//! the SQL fragment tree; anything it cannot render fails there with the
//! expression's [`Display`](std::fmt::Display) form.
//!
//! Expressions are usually built from [`Field`] constants:
//!
//! ```
//! use heron::expression::Field;
//! use heron::schema::{Entity, EntityDef, FieldDef, Row};
//! use heron::sql::ColumnType;
//!
//! struct Country;
//!
//! impl Country {
//!     const ID: Field<Country, i32> = Field::new("Id");
//!     const NAME: Field<Country, String> = Field::new("Name");
//! }
//!
//! impl Entity for Country {
//!     fn describe() -> EntityDef {
//!         EntityDef::new("Country")
//!             .field(FieldDef::scalar("Id", ColumnType::Int32).auto_increment())
//!             .field(FieldDef::scalar("Name", ColumnType::String))
//!     }
//!     fn row(&self) -> Row {
//!         Row::new()
//!     }
//! }
//!
//! let predicate = Country::ID.gt(3).and(Country::NAME.starts_with("Fr"));
//! assert_eq!(predicate.to_string(), "((Country.Id > 3) && Country.Name.starts_with(\"Fr\"))");
//! ```

mod field;

pub use field::{
    avg, count, count_all, exists, max, min, not_exists, sum, Field, IntoExpression, Text,
    ValueList,
};

use std::fmt;
use std::ops;

use crate::schema::EntityRef;
use crate::sql::types::Value;
use crate::statement::SelectArgs;

// =============================================================================
// Expression tree
// =============================================================================

/// A field of an entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Member {
    pub entity: EntityRef,
    pub field: &'static str,
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.entity, self.field)
    }
}

/// Typed expression over entity fields.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Field access.
    Member(Member),

    /// Constant value.
    Constant(Value),

    Binary {
        left: Box<Expression>,
        op: BinaryOp,
        right: Box<Expression>,
    },

    Not(Box<Expression>),

    /// Method-call idiom on a target expression.
    Method {
        method: Method,
        target: Box<Expression>,
        args: Vec<Expression>,
    },

    /// Membership in a list of constants, in list order.
    In {
        target: Box<Expression>,
        values: Vec<Expression>,
    },

    /// Aggregate; `arg` is `None` only for `COUNT(*)`.
    Aggregate {
        func: Aggregate,
        arg: Option<Box<Expression>>,
    },

    /// Correlated sub-query.
    Exists(Box<ExistsQuery>),
}

/// Binary operators on expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
        }
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge
        )
    }

    pub fn is_arithmetic(&self) -> bool {
        !self.is_logical() && !self.is_comparison()
    }
}

/// Method-call idioms the translator understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    StartsWith,
    EndsWith,
    Contains,
    EqualsIgnoreCase,
    IsNullOrEmpty,
    ToUpper,
    ToLower,
    Trim,
    Length,
}

impl Method {
    pub fn name(&self) -> &'static str {
        match self {
            Method::StartsWith => "starts_with",
            Method::EndsWith => "ends_with",
            Method::Contains => "contains",
            Method::EqualsIgnoreCase => "equals_ignore_case",
            Method::IsNullOrEmpty => "is_null_or_empty",
            Method::ToUpper => "to_upper",
            Method::ToLower => "to_lower",
            Method::Trim => "trim",
            Method::Length => "len",
        }
    }

    /// Whether the method yields a boolean.
    pub fn is_predicate(&self) -> bool {
        matches!(
            self,
            Method::StartsWith
                | Method::EndsWith
                | Method::Contains
                | Method::EqualsIgnoreCase
                | Method::IsNullOrEmpty
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Count,
    Sum,
    Min,
    Max,
    Avg,
}

impl Aggregate {
    pub fn sql_name(&self) -> &'static str {
        match self {
            Aggregate::Count => "COUNT",
            Aggregate::Sum => "SUM",
            Aggregate::Min => "MIN",
            Aggregate::Max => "MAX",
            Aggregate::Avg => "AVG",
        }
    }
}

/// `EXISTS` over an inner SELECT, correlated on
/// `target = source` where `source` belongs to the inner statement's entity
/// and `target` to the enclosing statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ExistsQuery {
    pub source: Member,
    pub target: Member,
    pub query: SelectArgs,
}

// =============================================================================
// Composition
// =============================================================================

impl Expression {
    pub fn constant(value: impl Into<Value>) -> Self {
        Expression::Constant(value.into())
    }

    pub fn binary(left: Expression, op: BinaryOp, right: Expression) -> Self {
        Expression::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    #[must_use]
    pub fn and(self, other: Expression) -> Self {
        Expression::binary(self, BinaryOp::And, other)
    }

    #[must_use]
    pub fn or(self, other: Expression) -> Self {
        Expression::binary(self, BinaryOp::Or, other)
    }

    /// Logical negation.
    #[allow(clippy::should_implement_trait)]
    #[must_use]
    pub fn not(self) -> Self {
        Expression::Not(Box::new(self))
    }

    /// Visit this node and every descendant, outer query only.
    ///
    /// Sub-queries of `Exists` are not entered; their correlation target is.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Expression)) {
        visit(self);
        match self {
            Expression::Member(_) | Expression::Constant(_) | Expression::Exists(_) => {}
            Expression::Binary { left, right, .. } => {
                left.walk(visit);
                right.walk(visit);
            }
            Expression::Not(inner) => inner.walk(visit),
            Expression::Method { target, args, .. } => {
                target.walk(visit);
                for arg in args {
                    arg.walk(visit);
                }
            }
            Expression::In { target, values } => {
                target.walk(visit);
                for value in values {
                    value.walk(visit);
                }
            }
            Expression::Aggregate { arg, .. } => {
                if let Some(arg) = arg {
                    arg.walk(visit);
                }
            }
        }
    }

    /// Entities this expression reads from, in first-use order.
    pub fn referenced_entities(&self) -> Vec<EntityRef> {
        let mut entities = Vec::new();
        self.walk(&mut |node| {
            let entity = match node {
                Expression::Member(m) => m.entity,
                Expression::Exists(q) => q.target.entity,
                _ => return,
            };
            if !entities.contains(&entity) {
                entities.push(entity);
            }
        });
        entities
    }
}

impl From<Member> for Expression {
    fn from(member: Member) -> Self {
        Expression::Member(member)
    }
}

impl From<Value> for Expression {
    fn from(value: Value) -> Self {
        Expression::Constant(value)
    }
}

impl ops::Not for Expression {
    type Output = Expression;

    fn not(self) -> Expression {
        Expression::Not(Box::new(self))
    }
}

macro_rules! arithmetic_ops {
    ($($trait:ident :: $method:ident => $op:ident),* $(,)?) => {
        $(
            impl ops::$trait for Expression {
                type Output = Expression;

                fn $method(self, rhs: Expression) -> Expression {
                    Expression::binary(self, BinaryOp::$op, rhs)
                }
            }
        )*
    };
}

arithmetic_ops! {
    Add::add => Add,
    Sub::sub => Sub,
    Mul::mul => Mul,
    Div::div => Div,
    Rem::rem => Rem,
}

// =============================================================================
// Display
// =============================================================================

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Member(m) => write!(f, "{m}"),
            Expression::Constant(v) => write!(f, "{v}"),
            Expression::Binary { left, op, right } => {
                write!(f, "({left} {} {right})", op.symbol())
            }
            Expression::Not(inner) => write!(f, "!{inner}"),
            Expression::Method {
                method,
                target,
                args,
            } => {
                write!(f, "{target}.{}(", method.name())?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
            Expression::In { target, values } => {
                write!(f, "{target}.is_in([")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str("])")
            }
            Expression::Aggregate { func, arg } => match arg {
                Some(arg) => write!(f, "{}({arg})", func.sql_name().to_lowercase()),
                None => write!(f, "{}(*)", func.sql_name().to_lowercase()),
            },
            Expression::Exists(q) => {
                write!(f, "exists({} = {})", q.target, q.source)
            }
        }
    }
}
