//! Typed field handles and the free expression constructors.

use std::fmt;
use std::marker::PhantomData;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::{Aggregate, BinaryOp, ExistsQuery, Expression, Member, Method};
use crate::schema::{Entity, EntityRef};
use crate::sql::types::{SqlEnum, Value};
use crate::statement::SelectArgs;

/// A field of entity `E` holding values of type `T`.
///
/// Declared as associated constants on the entity:
///
/// ```ignore
/// impl Company {
///     const NAME: Field<Company, String> = Field::new("Name");
/// }
/// ```
pub struct Field<E, T> {
    name: &'static str,
    _marker: PhantomData<fn() -> (E, T)>,
}

impl<E, T> Field<E, T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<E, T> Clone for Field<E, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E, T> Copy for Field<E, T> {}

impl<E, T> fmt::Debug for Field<E, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Field").field(&self.name).finish()
    }
}

impl<E: Entity, T> Field<E, T> {
    pub fn member(&self) -> Member {
        Member {
            entity: EntityRef::of::<E>(),
            field: self.name,
        }
    }

    /// The field as an untyped expression.
    pub fn expr(&self) -> Expression {
        Expression::Member(self.member())
    }

    fn compare(&self, op: BinaryOp, rhs: impl IntoExpression<T>) -> Expression {
        Expression::binary(self.expr(), op, rhs.into_expression())
    }

    pub fn eq(&self, rhs: impl IntoExpression<T>) -> Expression {
        self.compare(BinaryOp::Eq, rhs)
    }

    pub fn ne(&self, rhs: impl IntoExpression<T>) -> Expression {
        self.compare(BinaryOp::Ne, rhs)
    }

    pub fn gt(&self, rhs: impl IntoExpression<T>) -> Expression {
        self.compare(BinaryOp::Gt, rhs)
    }

    pub fn ge(&self, rhs: impl IntoExpression<T>) -> Expression {
        self.compare(BinaryOp::Ge, rhs)
    }

    pub fn lt(&self, rhs: impl IntoExpression<T>) -> Expression {
        self.compare(BinaryOp::Lt, rhs)
    }

    pub fn le(&self, rhs: impl IntoExpression<T>) -> Expression {
        self.compare(BinaryOp::Le, rhs)
    }

    pub fn is_null(&self) -> Expression {
        Expression::binary(self.expr(), BinaryOp::Eq, Expression::Constant(Value::Null))
    }

    pub fn is_not_null(&self) -> Expression {
        Expression::binary(self.expr(), BinaryOp::Ne, Expression::Constant(Value::Null))
    }

    /// `field IN (values...)`, preserving order.
    pub fn is_in<V: IntoExpression<T>>(&self, values: impl IntoIterator<Item = V>) -> Expression {
        Expression::In {
            target: Box::new(self.expr()),
            values: values.into_iter().map(IntoExpression::into_expression).collect(),
        }
    }

    pub fn not_in<V: IntoExpression<T>>(&self, values: impl IntoIterator<Item = V>) -> Expression {
        self.is_in(values).not()
    }
}

impl<E: Entity, T: Text> Field<E, T> {
    fn text_method(&self, method: Method, arg: &str) -> Expression {
        Expression::Method {
            method,
            target: Box::new(self.expr()),
            args: vec![Expression::constant(arg)],
        }
    }

    fn text_function(&self, method: Method) -> Expression {
        Expression::Method {
            method,
            target: Box::new(self.expr()),
            args: Vec::new(),
        }
    }

    pub fn starts_with(&self, prefix: &str) -> Expression {
        self.text_method(Method::StartsWith, prefix)
    }

    pub fn ends_with(&self, suffix: &str) -> Expression {
        self.text_method(Method::EndsWith, suffix)
    }

    pub fn contains(&self, needle: &str) -> Expression {
        self.text_method(Method::Contains, needle)
    }

    /// Case-insensitive equality.
    pub fn equals_ignore_case(&self, other: &str) -> Expression {
        self.text_method(Method::EqualsIgnoreCase, other)
    }

    pub fn is_null_or_empty(&self) -> Expression {
        self.text_function(Method::IsNullOrEmpty)
    }

    pub fn to_upper(&self) -> Expression {
        self.text_function(Method::ToUpper)
    }

    pub fn to_lower(&self) -> Expression {
        self.text_function(Method::ToLower)
    }

    pub fn trim(&self) -> Expression {
        self.text_function(Method::Trim)
    }

    pub fn len(&self) -> Expression {
        self.text_function(Method::Length)
    }
}

impl<E: Entity, T> From<Field<E, T>> for Expression {
    fn from(field: Field<E, T>) -> Self {
        field.expr()
    }
}

impl<E: Entity, T> From<Field<E, T>> for Member {
    fn from(field: Field<E, T>) -> Self {
        field.member()
    }
}

// =============================================================================
// Operand conversion
// =============================================================================

/// Something comparable with a field of type `T`.
pub trait IntoExpression<T> {
    fn into_expression(self) -> Expression;
}

/// Text-valued field types.
pub trait Text {}

impl Text for String {}
impl Text for Option<String> {}

impl<E: Entity, T> IntoExpression<T> for Field<E, T> {
    fn into_expression(self) -> Expression {
        self.expr()
    }
}

impl<T> IntoExpression<T> for Expression {
    fn into_expression(self) -> Expression {
        self
    }
}

impl<T: Into<Value>> IntoExpression<Option<T>> for Option<T> {
    fn into_expression(self) -> Expression {
        Expression::Constant(self.into())
    }
}

impl<T: SqlEnum> IntoExpression<T> for T {
    fn into_expression(self) -> Expression {
        Expression::Constant(Value::from_enum(&self))
    }
}

macro_rules! constant_operands {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoExpression<$ty> for $ty {
                fn into_expression(self) -> Expression {
                    Expression::Constant(self.into())
                }
            }

            impl IntoExpression<Option<$ty>> for $ty {
                fn into_expression(self) -> Expression {
                    Expression::Constant(self.into())
                }
            }
        )*
    };
}

constant_operands! {
    bool, i8, i16, i32, i64, u8, u16, u32, u64, f32, f64,
    Decimal, String, char, NaiveDateTime, NaiveDate, NaiveTime, Uuid, Vec<u8>,
}

impl IntoExpression<String> for &str {
    fn into_expression(self) -> Expression {
        Expression::constant(self)
    }
}

impl IntoExpression<Option<String>> for &str {
    fn into_expression(self) -> Expression {
        Expression::constant(self)
    }
}

// =============================================================================
// Free constructors
// =============================================================================

/// A constant list usable on the left of a membership test.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueList<T> {
    values: Vec<Expression>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ValueList<T> {
    pub fn new<V: IntoExpression<T>>(values: impl IntoIterator<Item = V>) -> Self {
        Self {
            values: values.into_iter().map(IntoExpression::into_expression).collect(),
            _marker: PhantomData,
        }
    }

    /// `field IN (list)`; same as [`Field::is_in`].
    pub fn contains<E: Entity>(&self, field: Field<E, T>) -> Expression {
        Expression::In {
            target: Box::new(field.expr()),
            values: self.values.clone(),
        }
    }
}

/// Correlated `EXISTS`: rows of `inner` (a select over `S`) whose `source`
/// matches the enclosing statement's `target`.
pub fn exists<S: Entity, T: Entity, A, B>(
    source: Field<S, A>,
    target: Field<T, B>,
    inner: SelectArgs,
) -> Expression {
    Expression::Exists(Box::new(ExistsQuery {
        source: source.member(),
        target: target.member(),
        query: inner,
    }))
}

pub fn not_exists<S: Entity, T: Entity, A, B>(
    source: Field<S, A>,
    target: Field<T, B>,
    inner: SelectArgs,
) -> Expression {
    exists(source, target, inner).not()
}

fn aggregate(func: Aggregate, arg: Expression) -> Expression {
    Expression::Aggregate {
        func,
        arg: Some(Box::new(arg)),
    }
}

/// `COUNT(*)`
pub fn count_all() -> Expression {
    Expression::Aggregate {
        func: Aggregate::Count,
        arg: None,
    }
}

pub fn count<E: Entity, T>(field: Field<E, T>) -> Expression {
    aggregate(Aggregate::Count, field.expr())
}

pub fn sum<E: Entity, T>(field: Field<E, T>) -> Expression {
    aggregate(Aggregate::Sum, field.expr())
}

pub fn min<E: Entity, T>(field: Field<E, T>) -> Expression {
    aggregate(Aggregate::Min, field.expr())
}

pub fn max<E: Entity, T>(field: Field<E, T>) -> Expression {
    aggregate(Aggregate::Max, field.expr())
}

pub fn avg<E: Entity, T>(field: Field<E, T>) -> Expression {
    aggregate(Aggregate::Avg, field.expr())
}
