//! Expression AST - the rendered shape of predicates and projections.
//!
//! The translator lowers entity expressions into this tree; the tree only
//! knows about tables and columns. Rendering is dialect-aware and fallible,
//! since some literals have no form in some dialects.

use super::dialect::{Dialect, SqlDialect};
use super::query::Query;
use super::token::{Token, TokenStream};
use super::types::Value;
use crate::error::CompileResult;

// =============================================================================
// Expression AST
// =============================================================================

/// A SQL expression.
///
/// Every variant must be handled in `to_tokens()` - the compiler enforces this.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Column reference: optional_table.column
    Column {
        table: Option<String>,
        column: String,
    },

    /// Literal value, formatted by the dialect.
    Literal(Value),

    /// Binary operation: left op right
    BinaryOp {
        left: Box<Expr>,
        op: BinaryOperator,
        right: Box<Expr>,
    },

    /// NOT (expr)
    Not(Box<Expr>),

    /// expr LIKE(pattern)
    Like { expr: Box<Expr>, pattern: Box<Expr> },

    /// IN: expr IN (values...)
    In {
        expr: Box<Expr>,
        values: Vec<Expr>,
        negated: bool,
    },

    /// IS NULL / IS NOT NULL
    IsNull { expr: Box<Expr>, negated: bool },

    /// (expr IS NULL OR expr = '') and its negation.
    NullOrEmpty { expr: Box<Expr>, negated: bool },

    /// EXISTS (subquery ... AND correlation)
    Exists {
        query: Box<Query>,
        correlation: Box<Expr>,
        negated: bool,
    },

    /// Function call: name(args...)
    Function { name: String, args: Vec<Expr> },

    /// Wildcard: *
    Star,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    // Comparison
    Eq,
    Ne,
    Lt,
    Gt,
    Lte,
    Gte,
    // Logical
    And,
    Or,
    // Arithmetic
    Plus,
    Minus,
    Mul,
    Div,
    Mod,
}

impl BinaryOperator {
    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOperator::And | BinaryOperator::Or)
    }

    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Plus
                | BinaryOperator::Minus
                | BinaryOperator::Mul
                | BinaryOperator::Div
                | BinaryOperator::Mod
        )
    }

    pub fn is_comparison(&self) -> bool {
        !self.is_logical() && !self.is_arithmetic()
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

// =============================================================================
// Constructors
// =============================================================================

impl Expr {
    /// Table-qualified column.
    pub fn qualified(table: impl Into<String>, column: impl Into<String>) -> Self {
        Expr::Column {
            table: Some(table.into()),
            column: column.into(),
        }
    }

    /// Bare column.
    pub fn column(column: impl Into<String>) -> Self {
        Expr::Column {
            table: None,
            column: column.into(),
        }
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        Expr::Literal(value.into())
    }

    pub fn binary(left: Expr, op: BinaryOperator, right: Expr) -> Self {
        Expr::BinaryOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    pub fn eq(self, other: Expr) -> Self {
        Expr::binary(self, BinaryOperator::Eq, other)
    }

    pub fn and(self, other: Expr) -> Self {
        Expr::binary(self, BinaryOperator::And, other)
    }

    pub fn or(self, other: Expr) -> Self {
        Expr::binary(self, BinaryOperator::Or, other)
    }

    pub fn function(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Function {
            name: name.into(),
            args,
        }
    }

    /// Whether the top node is an OR.
    pub fn is_or(&self) -> bool {
        matches!(
            self,
            Expr::BinaryOp {
                op: BinaryOperator::Or,
                ..
            }
        )
    }

    fn is_arithmetic(&self) -> bool {
        matches!(self, Expr::BinaryOp { op, .. } if op.is_arithmetic())
    }
}

// =============================================================================
// Expression to Tokens
// =============================================================================

impl Expr {
    /// Convert this expression to a token stream for a specific dialect.
    /// Name the value gets in a result set, for plain column references.
    pub fn output_name(&self) -> Option<&str> {
        match self {
            Expr::Column { column, .. } => Some(column.as_str()),
            _ => None,
        }
    }

    pub fn to_tokens(&self, dialect: Dialect) -> CompileResult<TokenStream> {
        let mut ts = TokenStream::new();

        match self {
            Expr::Column { table, column } => {
                if let Some(t) = table {
                    ts.qualified(t, column);
                } else {
                    ts.push(Token::Ident(column.clone()));
                }
            }

            Expr::Literal(value) => {
                ts.push(Token::Literal(dialect.format_literal(value)?));
            }

            Expr::BinaryOp { left, op, right } => {
                if op.is_logical() {
                    ts.lparen()
                        .append(&left.to_tokens(dialect)?)
                        .rparen()
                        .space()
                        .push(binary_op_to_token(*op))
                        .space()
                        .lparen()
                        .append(&right.to_tokens(dialect)?)
                        .rparen();
                } else if *op == BinaryOperator::Mod && dialect.modulo_as_function() {
                    ts.push(Token::FunctionName("MOD".into()))
                        .lparen()
                        .append(&left.to_tokens(dialect)?)
                        .comma()
                        .space()
                        .append(&right.to_tokens(dialect)?)
                        .rparen();
                } else if op.is_arithmetic() {
                    ts.append(&operand_tokens(left, dialect)?)
                        .space()
                        .push(binary_op_to_token(*op))
                        .space()
                        .append(&operand_tokens(right, dialect)?);
                } else {
                    ts.append(&left.to_tokens(dialect)?)
                        .space()
                        .push(binary_op_to_token(*op))
                        .space()
                        .append(&right.to_tokens(dialect)?);
                }
            }

            Expr::Not(inner) => {
                ts.push(Token::Not)
                    .space()
                    .lparen()
                    .append(&inner.to_tokens(dialect)?)
                    .rparen();
            }

            Expr::Like { expr, pattern } => {
                ts.append(&expr.to_tokens(dialect)?)
                    .space()
                    .push(Token::Like)
                    .lparen()
                    .append(&pattern.to_tokens(dialect)?)
                    .rparen();
            }

            Expr::In {
                expr,
                values,
                negated,
            } => {
                // "x IN ()" is invalid SQL; an empty list matches nothing.
                if values.is_empty() {
                    let rhs = if *negated { 1 } else { 0 };
                    ts.push(Token::Number(1))
                        .space()
                        .push(Token::Eq)
                        .space()
                        .push(Token::Number(rhs));
                } else {
                    ts.append(&expr.to_tokens(dialect)?);
                    if *negated {
                        ts.space().push(Token::Not);
                    }
                    ts.space().push(Token::In).space().lparen();
                    for (i, val) in values.iter().enumerate() {
                        if i > 0 {
                            ts.comma().space();
                        }
                        ts.append(&val.to_tokens(dialect)?);
                    }
                    ts.rparen();
                }
            }

            Expr::IsNull { expr, negated } => {
                ts.append(&expr.to_tokens(dialect)?).space();
                ts.push(if *negated {
                    Token::IsNotNull
                } else {
                    Token::IsNull
                });
            }

            Expr::NullOrEmpty { expr, negated } => {
                let column = expr.to_tokens(dialect)?;
                let empty = dialect.quote_string("");
                let (null_check, joiner, cmp) = if *negated {
                    (Token::IsNotNull, Token::And, Token::Ne)
                } else {
                    (Token::IsNull, Token::Or, Token::Eq)
                };
                ts.lparen()
                    .append(&column)
                    .space()
                    .push(null_check)
                    .space()
                    .push(joiner)
                    .space()
                    .append(&column)
                    .space()
                    .push(cmp)
                    .space()
                    .push(Token::Literal(empty))
                    .rparen();
            }

            Expr::Exists {
                query,
                correlation,
                negated,
            } => {
                if *negated {
                    ts.push(Token::Not).space();
                }
                ts.push(Token::Exists)
                    .space()
                    .lparen()
                    .append(&query.to_tokens_correlated(dialect, correlation)?)
                    .rparen();
            }

            Expr::Function { name, args } => {
                ts.push(Token::FunctionName(name.clone()));
                ts.lparen();
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        ts.comma().space();
                    }
                    ts.append(&arg.to_tokens(dialect)?);
                }
                ts.rparen();
            }

            Expr::Star => {
                ts.push(Token::Star);
            }
        }

        Ok(ts)
    }

    /// Render to a SQL string.
    pub fn to_sql(&self, dialect: Dialect) -> CompileResult<String> {
        Ok(self.to_tokens(dialect)?.serialize(dialect))
    }
}

/// Arithmetic operands that are themselves arithmetic get parentheses.
fn operand_tokens(expr: &Expr, dialect: Dialect) -> CompileResult<TokenStream> {
    let inner = expr.to_tokens(dialect)?;
    if expr.is_arithmetic() && !(dialect.modulo_as_function() && is_mod(expr)) {
        let mut ts = TokenStream::new();
        ts.lparen().append(&inner).rparen();
        Ok(ts)
    } else {
        Ok(inner)
    }
}

fn is_mod(expr: &Expr) -> bool {
    matches!(
        expr,
        Expr::BinaryOp {
            op: BinaryOperator::Mod,
            ..
        }
    )
}

fn binary_op_to_token(op: BinaryOperator) -> Token {
    match op {
        BinaryOperator::Eq => Token::Eq,
        BinaryOperator::Ne => Token::Ne,
        BinaryOperator::Lt => Token::Lt,
        BinaryOperator::Gt => Token::Gt,
        BinaryOperator::Lte => Token::Lte,
        BinaryOperator::Gte => Token::Gte,
        BinaryOperator::And => Token::And,
        BinaryOperator::Or => Token::Or,
        BinaryOperator::Plus => Token::Plus,
        BinaryOperator::Minus => Token::Minus,
        BinaryOperator::Mul => Token::Mul,
        BinaryOperator::Div => Token::Div,
        BinaryOperator::Mod => Token::Mod,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sql(expr: &Expr, dialect: Dialect) -> String {
        expr.to_sql(dialect).unwrap()
    }

    #[test]
    fn test_column() {
        let expr = Expr::column("Name");
        assert_eq!(sql(&expr, Dialect::MySql), "`Name`");
    }

    #[test]
    fn test_table_column() {
        let expr = Expr::qualified("TestClass", "ID");
        assert_eq!(sql(&expr, Dialect::MySql), "TestClass.`ID`");
        assert_eq!(sql(&expr, Dialect::Oracle), "\"TestClass\".\"ID\"");
    }

    #[test]
    fn test_comparison() {
        let expr = Expr::qualified("TestClass", "ID").eq(Expr::literal(1));
        assert_eq!(sql(&expr, Dialect::MySql), "TestClass.`ID` = 1");
    }

    #[test]
    fn test_logical_operands_parenthesized() {
        let a = Expr::qualified("T", "A").eq(Expr::literal(1));
        let b = Expr::qualified("T", "B").eq(Expr::literal(2));
        let c = Expr::qualified("T", "C").eq(Expr::literal(3));
        let expr = a.and(b).or(c);
        assert_eq!(
            sql(&expr, Dialect::MySql),
            "((T.`A` = 1) AND (T.`B` = 2)) OR (T.`C` = 3)"
        );
    }

    #[test]
    fn test_arithmetic_nesting() {
        let sum = Expr::binary(
            Expr::column("A"),
            BinaryOperator::Plus,
            Expr::column("B"),
        );
        let product = Expr::binary(sum, BinaryOperator::Mul, Expr::literal(2));
        assert_eq!(sql(&product, Dialect::MySql), "(`A` + `B`) * 2");
    }

    #[test]
    fn test_modulo_per_dialect() {
        let expr = Expr::binary(Expr::column("A"), BinaryOperator::Mod, Expr::literal(3));
        assert_eq!(sql(&expr, Dialect::MySql), "`A` % 3");
        assert_eq!(sql(&expr, Dialect::Access), "[A] MOD 3");
        assert_eq!(sql(&expr, Dialect::Oracle), "MOD(\"A\", 3)");
    }

    #[test]
    fn test_like() {
        let expr = Expr::Like {
            expr: Box::new(Expr::qualified("T", "Name")),
            pattern: Box::new(Expr::literal("ab%")),
        };
        assert_eq!(sql(&expr, Dialect::MySql), "T.`Name` LIKE('ab%')");
    }

    #[test]
    fn test_in_list() {
        let expr = Expr::In {
            expr: Box::new(Expr::column("ID")),
            values: vec![Expr::literal(1), Expr::literal(2)],
            negated: false,
        };
        assert_eq!(sql(&expr, Dialect::MySql), "`ID` IN (1, 2)");
    }

    #[test]
    fn test_in_list_empty() {
        let expr = Expr::In {
            expr: Box::new(Expr::column("ID")),
            values: vec![],
            negated: false,
        };
        assert_eq!(sql(&expr, Dialect::MySql), "1 = 0");

        let expr = Expr::In {
            expr: Box::new(Expr::column("ID")),
            values: vec![],
            negated: true,
        };
        assert_eq!(sql(&expr, Dialect::MySql), "1 = 1");
    }

    #[test]
    fn test_null_or_empty() {
        let expr = Expr::NullOrEmpty {
            expr: Box::new(Expr::qualified("T", "Name")),
            negated: false,
        };
        assert_eq!(
            sql(&expr, Dialect::MySql),
            "(T.`Name` IS NULL OR T.`Name` = '')"
        );

        let expr = Expr::NullOrEmpty {
            expr: Box::new(Expr::qualified("T", "Name")),
            negated: true,
        };
        assert_eq!(
            sql(&expr, Dialect::MySql),
            "(T.`Name` IS NOT NULL AND T.`Name` <> '')"
        );
    }

    #[test]
    fn test_not() {
        let expr = Expr::Not(Box::new(Expr::qualified("T", "A").eq(Expr::literal(1))));
        assert_eq!(sql(&expr, Dialect::MySql), "NOT (T.`A` = 1)");
    }

    #[test]
    fn test_function_remapped() {
        let expr = Expr::function("UPPER", vec![Expr::column("Name")]);
        assert_eq!(sql(&expr, Dialect::MySql), "UPPER(`Name`)");
        assert_eq!(sql(&expr, Dialect::Access), "UCASE([Name])");
    }

    #[test]
    fn test_unrenderable_literal_propagates() {
        let expr = Expr::literal(Value::Bytes(vec![1]));
        assert!(expr.to_sql(Dialect::Access).is_err());
    }
}
