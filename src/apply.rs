use serde_json::Value;
use tracing::trace;

use crate::types::payload::{get_path, set_path};
use crate::types::value::{as_number, display, price_value, type_name};
use crate::{Action, ActionError, ActionKind, AppliedAction};

/// Apply `actions` in order to a copy of `payload`.
///
/// Each action sees the payload as left by the previous one. The input is
/// never modified; on error the partially updated copy is discarded, so the
/// caller only ever sees the input or the fully updated payload.
///
/// # Errors
///
/// Returns [`ActionError`] on an out-of-range amount, a numeric action whose
/// target is not a number, or a target path that cannot be written.
pub fn apply(
    actions: &[Action],
    payload: &Value,
) -> Result<(Value, Vec<AppliedAction>), ActionError> {
    let mut updated = payload.clone();
    let mut applied = Vec::with_capacity(actions.len());
    for action in actions {
        let record = apply_one(action, &mut updated)?;
        trace!(kind = %action.kind, effect = %record.effect, "action applied");
        applied.push(record);
    }
    Ok((updated, applied))
}

fn apply_one(action: &Action, payload: &mut Value) -> Result<AppliedAction, ActionError> {
    let field = action.resolved_target();
    let new_value = if action.kind.is_numeric() {
        numeric_result(action, &field, payload)?
    } else {
        action.amount_or_value.clone()
    };

    let old_value = set_path(payload, &field, new_value.clone())
        .map_err(|()| ActionError::InvalidTargetPath { path: field.clone() })?;

    let before = old_value.as_ref().map_or_else(|| "unset".to_owned(), display);
    let effect = format!("{field} {before} -> {}", display(&new_value));
    Ok(AppliedAction {
        action: action.clone(),
        field,
        old_value,
        new_value,
        effect,
    })
}

fn numeric_result(action: &Action, field: &str, payload: &Value) -> Result<Value, ActionError> {
    let kind = action.kind;
    let amount = amount_of(action)?;

    let current = get_path(payload, field);
    let old = current.and_then(as_number).ok_or_else(|| ActionError::NonNumericTarget {
        kind,
        field: field.to_owned(),
        found: current.map_or("missing", type_name),
    })?;
    let previous = current.unwrap_or(&Value::Null);

    let result = match kind {
        ActionKind::ApplyDiscountPercent => {
            if !(0.0..=100.0).contains(&amount) {
                return Err(invalid(kind, amount, "percentage must be within [0, 100]"));
            }
            old * (1.0 - amount / 100.0)
        }
        ActionKind::ApplyDiscountAmount => {
            if amount < 0.0 {
                return Err(invalid(kind, amount, "discount must not be negative"));
            }
            (old - amount).max(0.0)
        }
        ActionKind::OverridePrice => {
            if amount < 0.0 {
                return Err(invalid(kind, amount, "price must not be negative"));
            }
            amount
        }
        _ => return Err(invalid(kind, amount, "not a numeric action")),
    };
    Ok(price_value(result, previous))
}

fn amount_of(action: &Action) -> Result<f64, ActionError> {
    match as_number(&action.amount_or_value) {
        Some(amount) if amount.is_finite() => Ok(amount),
        _ => Err(invalid(action.kind, f64::NAN, "amount must be a number")),
    }
}

fn invalid(kind: ActionKind, amount: f64, reason: &'static str) -> ActionError {
    ActionError::InvalidAmount {
        kind,
        amount,
        reason,
    }
}
