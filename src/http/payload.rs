use serde::Deserialize;
use serde_json::Value;

use crate::domain::ordering::{Direction, OrderingError, RecordId, ReorderCommand};

// ============================================================================
// Inbound Reorder Payload
// ============================================================================
//
// The admin UI sends exactly one of three keys. Dispatch precedence is
// `direction`, then `setNewOrder`, then `swapModelId`; the first one that is
// not empty wins. Empty follows the admin UI's loose notion of truthiness:
// null, false, 0, "", "0", [] and {} all count as absent.
//
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ReorderPayload {
    #[serde(default)]
    pub direction: Option<Value>,

    #[serde(default, rename = "setNewOrder")]
    pub set_new_order: Option<Value>,

    #[serde(default, rename = "swapModelId")]
    pub swap_model_id: Option<Value>,
}

impl ReorderPayload {
    /// Decide the command variant once, at the boundary.
    pub fn into_command(self, record: RecordId) -> Result<ReorderCommand, OrderingError> {
        if let Some(direction) = present(self.direction) {
            let direction = direction
                .as_str()
                .ok_or_else(|| malformed("direction must be a string"))?
                .parse::<Direction>()?;
            return Ok(ReorderCommand::Direction { record, direction });
        }

        if let Some(new_order) = present(self.set_new_order) {
            return parse_new_order(record, &new_order);
        }

        if let Some(other) = present(self.swap_model_id) {
            let other = parse_integer(&other)
                .map(RecordId::from)
                .ok_or_else(|| malformed("swapModelId must be an integer"))?;
            return Ok(ReorderCommand::Swap { record, other });
        }

        Err(malformed("payload carries no reorder instruction"))
    }
}

fn malformed(reason: &str) -> OrderingError {
    OrderingError::MalformedCommand(reason.to_string())
}

fn present(value: Option<Value>) -> Option<Value> {
    value.filter(|v| !is_blank(v))
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}

/// Integers may arrive as JSON numbers or numeric strings.
fn parse_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// A `resourcesArray` entry: a bare id, `{"id": N}` or `{"id": {"value": N}}`.
fn parse_resource_id(item: &Value) -> Option<RecordId> {
    let id = match item {
        Value::Object(fields) => match fields.get("id")? {
            Value::Object(inner) => inner.get("value")?,
            other => other,
        },
        other => other,
    };
    parse_integer(id).map(RecordId::from)
}

fn parse_new_order(record: RecordId, new_order: &Value) -> Result<ReorderCommand, OrderingError> {
    let fields = new_order
        .as_object()
        .ok_or_else(|| malformed("setNewOrder must be an object"))?;

    let field = |name: &str| {
        fields
            .get(name)
            .ok_or_else(|| OrderingError::MalformedCommand(format!("setNewOrder is missing '{}'", name)))
    };

    let resources = field("resourcesArray")?;
    let old_position = field("oldPosition")?;
    let new_position = field("newPosition")?;

    let items = resources
        .as_array()
        .ok_or_else(|| malformed("resourcesArray must be an array"))?;

    let old_index = parse_position(old_position, "oldPosition", items.len())?;
    let new_index = parse_position(new_position, "newPosition", items.len())?;

    // Only the dragged window is read; entries outside it may be anything.
    let lo = old_index.min(new_index);
    let hi = old_index.max(new_index);
    let visible_ids = items[lo..=hi]
        .iter()
        .enumerate()
        .map(|(offset, item)| {
            parse_resource_id(item).ok_or_else(|| {
                OrderingError::MalformedCommand(format!("resourcesArray[{}] has no usable id", lo + offset))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ReorderCommand::RangeMove {
        record,
        visible_ids,
        old_index: old_index - lo,
        new_index: new_index - lo,
    })
}

fn parse_position(value: &Value, name: &str, len: usize) -> Result<usize, OrderingError> {
    let position = parse_integer(value)
        .ok_or_else(|| OrderingError::MalformedCommand(format!("{} must be an integer", name)))?;

    usize::try_from(position)
        .ok()
        .filter(|index| *index < len)
        .ok_or(OrderingError::IndexOutOfRange {
            index: position,
            len,
        })
}

// ============================================================================
// Unit Tests
// ============================================================================
