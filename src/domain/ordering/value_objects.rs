use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::errors::{OrderingError, ScopeError};

// ============================================================================
// Ordering Value Objects
// ============================================================================

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// One-step move direction. `Up` means toward a lower order value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

impl FromStr for Direction {
    type Err = OrderingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            other => Err(OrderingError::MalformedCommand(format!(
                "unknown direction '{}'",
                other
            ))),
        }
    }
}

/// A record as currently persisted, resolved inside a store transaction.
#[derive(Clone, Debug, PartialEq)]
pub struct OrderedRecord {
    pub id: RecordId,
    pub order: i64,
    /// Value of the scope's group column, if the scope has one.
    pub group: Option<String>,
}

// ============================================================================
// Ordering Scope - explicit table/column configuration
// ============================================================================

/// Where the order column lives and what groups its values.
///
/// Identifiers end up inside SQL text, so they are validated once here and
/// never taken from request data.
#[derive(Clone, Debug, PartialEq)]
pub struct OrderingScope {
    table: String,
    id_column: String,
    order_column: String,
    group_column: Option<String>,
}

impl OrderingScope {
    pub fn new(
        table: impl Into<String>,
        id_column: impl Into<String>,
        order_column: impl Into<String>,
        group_column: Option<String>,
    ) -> Result<Self, ScopeError> {
        let scope = Self {
            table: table.into(),
            id_column: id_column.into(),
            order_column: order_column.into(),
            group_column,
        };

        validate_identifier(&scope.table)?;
        validate_identifier(&scope.id_column)?;
        validate_identifier(&scope.order_column)?;
        if let Some(group) = &scope.group_column {
            validate_identifier(group)?;
        }

        Ok(scope)
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn id_column(&self) -> &str {
        &self.id_column
    }

    pub fn order_column_name(&self) -> &str {
        &self.order_column
    }

    pub fn group_column(&self) -> Option<&str> {
        self.group_column.as_deref()
    }

    /// Key of the exclusive lock serialising order mutations on this table.
    pub fn lock_key(&self) -> String {
        format!("sortable:{}", self.table)
    }
}

const MAX_IDENTIFIER_LEN: usize = 63;

fn validate_identifier(ident: &str) -> Result<(), ScopeError> {
    let mut chars = ident.chars();
    let valid_start = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');
    let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if !valid_start || !valid_rest || ident.len() > MAX_IDENTIFIER_LEN {
        return Err(ScopeError::InvalidIdentifier(ident.to_string()));
    }
    Ok(())
}

/// A record type registered for sorting.
#[derive(Clone, Debug)]
pub struct SortableResource {
    /// Name used on the route, e.g. `articles`.
    pub name: String,
    /// Human-readable model name used in operator-facing messages.
    pub model: String,
    pub scope: OrderingScope,
    /// Whether the record type supports single-step up/down moves.
    pub step_moves: bool,
}

// ============================================================================
// Unit Tests
// ============================================================================
