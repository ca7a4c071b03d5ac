//! Money codec.
//!
//! Monetary values are stored as `i64` minor units (cents). Clients send
//! amounts in major units as JSON strings, integers or floats; integers are
//! taken as already-converted cents, everything else is converted here.
//!
//! Two distinct rounding policies live at the presentation edge:
//! [`pretty_money`] renders cents as major units with 2 decimal places,
//! [`pretty_ratio`] renders percentages with 1 decimal place.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Utc};

use crate::{EngineError, ResultEngine};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Convert a major-unit amount into cents, rounding half away from zero.
pub fn as_cents(value: f64) -> ResultEngine<i64> {
    if !value.is_finite() {
        return Err(EngineError::InvalidAmount(
            "the value is not a finite number".to_string(),
        ));
    }
    let cents = (value * 100.0).round();
    if cents.abs() >= i64::MAX as f64 {
        return Err(EngineError::InvalidAmount(
            "the value is out of range".to_string(),
        ));
    }
    Ok(cents as i64)
}

/// Decode a raw request amount into cents.
///
/// Strings and floats are major units; integers are passed through as cents.
/// The result must be strictly positive.
pub fn cents_from_raw(value: &serde_json::Value) -> ResultEngine<i64> {
    let cents = match value {
        serde_json::Value::String(raw) => {
            let number: f64 = raw.trim().parse().map_err(|_| {
                EngineError::InvalidAmount(format!("'{raw}' is not a valid number"))
            })?;
            as_cents(number)?
        }
        serde_json::Value::Number(number) => {
            if let Some(cents) = number.as_i64() {
                cents
            } else {
                let number = number.as_f64().ok_or_else(|| {
                    EngineError::InvalidAmount(format!("'{number}' is not a valid number"))
                })?;
                as_cents(number)?
            }
        }
        other => {
            return Err(EngineError::InvalidAmount(format!(
                "'{other}' is not a valid money value"
            )));
        }
    };

    if cents <= 0 {
        return Err(EngineError::InvalidAmount(
            "the value must be greater than 0".to_string(),
        ));
    }
    Ok(cents)
}

/// Render cents as major units, 2 decimal places.
pub fn pretty_money(cents: i64) -> f64 {
    (cents as f64) / 100.0
}

/// Render a percentage with 1 decimal place.
pub fn pretty_ratio(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Parse an operation timestamp from its raw string form.
///
/// Accepts a plain date first, then a full datetime whose date part is kept.
pub fn timestamp_from_raw(value: &str) -> ResultEngine<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(value, DATE_FORMAT) {
        return Ok(date);
    }
    NaiveDateTime::parse_from_str(value, DATETIME_FORMAT)
        .map(|datetime| datetime.date())
        .map_err(|_| EngineError::InvalidTimestamp(format!("'{value}' is not a valid timestamp")))
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// First day of the month `today` falls in.
pub fn first_day_of_current_month() -> NaiveDate {
    let now = today();
    // day 1 always exists
    now.with_day(1).unwrap_or(now)
}

/// Inclusive `(first, last)` day pair of the previous month.
pub fn previous_month_range() -> (NaiveDate, NaiveDate) {
    let first_of_current = first_day_of_current_month();
    let last = first_of_current.pred_opt().unwrap_or(first_of_current);
    let first = last.with_day(1).unwrap_or(last);
    (first, last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn as_cents_rounds_half_away_from_zero() {
        assert_eq!(as_cents(12.5), Ok(1250));
        assert_eq!(as_cents(0.125), Ok(13));
        assert_eq!(as_cents(0.105), Ok(11));
        assert_eq!(as_cents(-0.125), Ok(-13));
    }

    #[test]
    fn as_cents_rejects_non_finite() {
        assert!(matches!(
            as_cents(f64::NAN),
            Err(EngineError::InvalidAmount(_))
        ));
        assert!(matches!(
            as_cents(f64::INFINITY),
            Err(EngineError::InvalidAmount(_))
        ));
    }

    #[test]
    fn cents_from_raw_parses_strings_as_major_units() {
        assert_eq!(cents_from_raw(&json!("12.5")), Ok(1250));
        assert_eq!(cents_from_raw(&json!(" 3 ")), Ok(300));
    }

    #[test]
    fn cents_from_raw_passes_integers_through() {
        assert_eq!(cents_from_raw(&json!(1250)), Ok(1250));
    }

    #[test]
    fn cents_from_raw_converts_floats() {
        assert_eq!(cents_from_raw(&json!(12.5)), Ok(1250));
    }

    #[test]
    fn cents_from_raw_rejects_garbage() {
        assert!(matches!(
            cents_from_raw(&json!("money")),
            Err(EngineError::InvalidAmount(_))
        ));
        assert!(matches!(
            cents_from_raw(&json!(null)),
            Err(EngineError::InvalidAmount(_))
        ));
        assert!(matches!(
            cents_from_raw(&json!(true)),
            Err(EngineError::InvalidAmount(_))
        ));
    }

    #[test]
    fn cents_from_raw_rejects_non_positive() {
        assert!(matches!(
            cents_from_raw(&json!(0)),
            Err(EngineError::InvalidAmount(_))
        ));
        assert!(matches!(
            cents_from_raw(&json!("-3.5")),
            Err(EngineError::InvalidAmount(_))
        ));
    }

    #[test]
    fn pretty_money_renders_major_units() {
        assert_eq!(pretty_money(1250), 12.5);
        assert_eq!(pretty_money(-35000), -350.0);
    }

    #[test]
    fn pretty_ratio_rounds_to_one_decimal() {
        assert_eq!(pretty_ratio(200.0 / 650.0 * 100.0), 30.8);
        assert_eq!(pretty_ratio(100.0), 100.0);
    }

    #[test]
    fn timestamp_from_raw_accepts_both_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(timestamp_from_raw("2024-03-01"), Ok(expected));
        assert_eq!(timestamp_from_raw("2024-03-01T10:20:30.000123"), Ok(expected));
    }

    #[test]
    fn timestamp_from_raw_rejects_other_shapes() {
        assert!(matches!(
            timestamp_from_raw("01/03/2024"),
            Err(EngineError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn previous_month_range_is_inclusive_and_dense() {
        let (first, last) = previous_month_range();
        assert_eq!(first.day(), 1);
        assert_eq!(last.succ_opt().unwrap().day(), 1);
        assert!(first <= last);
    }
}
