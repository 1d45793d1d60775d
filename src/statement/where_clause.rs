//! Accumulated WHERE predicates.

use crate::error::CompileResult;
use crate::expression::Expression;
use crate::sql::expr::Expr;
use crate::translate::Translator;

/// A WHERE clause built up by repeated `and`/`or` calls.
///
/// Each call combines the whole accumulated predicate with the new one, so
/// `and(p1)` then `and(p2)` is the same tree as `and(p1 && p2)` on an empty
/// clause and renders `(p1) AND (p2)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Where {
    predicate: Option<Expression>,
}

impl Where {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn and(&mut self, predicate: Expression) -> &mut Self {
        self.predicate = Some(match self.predicate.take() {
            Some(existing) => existing.and(predicate),
            None => predicate,
        });
        self
    }

    pub fn or(&mut self, predicate: Expression) -> &mut Self {
        self.predicate = Some(match self.predicate.take() {
            Some(existing) => existing.or(predicate),
            None => predicate,
        });
        self
    }

    pub fn clear(&mut self) {
        self.predicate = None;
    }

    pub fn is_empty(&self) -> bool {
        self.predicate.is_none()
    }

    pub fn predicate(&self) -> Option<&Expression> {
        self.predicate.as_ref()
    }

    pub(crate) fn translate(&self, translator: &Translator<'_>) -> CompileResult<Option<Expr>> {
        self.predicate
            .as_ref()
            .map(|p| translator.predicate(p).map(|t| t.fragment))
            .transpose()
    }
}
