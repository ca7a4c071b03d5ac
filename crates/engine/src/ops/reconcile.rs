//! Planner for the equity side-effects of a partial update.
//!
//! Inputs are the stored `(value, currency)` pair and the effective patch
//! fields (already filtered against the stored row). The caller applies the
//! plan with the sign of its own operation: costs decrease equity on apply,
//! incomes increase it.

/// Equity side-effect of a cost/income update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum EquityShift {
    /// Neither value nor currency changed.
    Unchanged,
    /// Same currency, new value: apply the signed difference once.
    Delta { currency_id: i32, delta: i64 },
    /// Currency changed: fully reverse the old booking, apply the new one.
    Rebook {
        reverse: (i32, i64),
        apply: (i32, i64),
    },
}

pub(super) fn plan_equity_shift(
    old_value: i64,
    old_currency_id: i32,
    new_value: Option<i64>,
    new_currency_id: Option<i32>,
) -> EquityShift {
    match (new_currency_id, new_value) {
        (Some(currency_id), value) => EquityShift::Rebook {
            reverse: (old_currency_id, old_value),
            apply: (currency_id, value.unwrap_or(old_value)),
        },
        (None, Some(value)) => EquityShift::Delta {
            currency_id: old_currency_id,
            delta: value - old_value,
        },
        (None, None) => EquityShift::Unchanged,
    }
}
