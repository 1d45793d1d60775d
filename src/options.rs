//! Per-statement compile options.

use crate::sql::dialect::{Dialect, SqlDialect};
use crate::sql::types::Value;

/// How enum values are rendered as literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumMode {
    /// Integer discriminant.
    #[default]
    Integer,
    /// Member name as a quoted string.
    Name,
}

/// Options threaded through every statement render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompileOptions {
    pub dialect: Dialect,
    pub enum_mode: EnumMode,
    /// Lower the per-statement row limit below the dialect's maximum.
    pub max_batch_rows: Option<usize>,
}

impl CompileOptions {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Render enums by member name instead of integer value.
    #[must_use]
    pub fn with_enums_as_strings(mut self) -> Self {
        self.enum_mode = EnumMode::Name;
        self
    }

    #[must_use]
    pub fn with_max_batch_rows(mut self, rows: usize) -> Self {
        self.max_batch_rows = Some(rows);
        self
    }

    /// Rows per INSERT/DELETE batch: the override, clamped to `1..=dialect max`.
    pub fn batch_rows(&self) -> usize {
        let max = self.dialect.max_batch_rows().max(1);
        match self.max_batch_rows {
            Some(rows) => rows.clamp(1, max),
            None => max,
        }
    }

    /// Replace enum values according to the enum mode, recursing into lists.
    pub fn resolve_value(&self, value: Value) -> Value {
        match value {
            Value::Enum { name, value } => match self.enum_mode {
                EnumMode::Integer => Value::Int(value),
                EnumMode::Name => Value::String(name.to_string()),
            },
            Value::List(values) => {
                Value::List(values.into_iter().map(|v| self.resolve_value(v)).collect())
            }
            other => other,
        }
    }
}

impl From<Dialect> for CompileOptions {
    fn from(dialect: Dialect) -> Self {
        Self::new(dialect)
    }
}
