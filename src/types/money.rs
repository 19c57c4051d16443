//! Fixed-point money amounts: `NUMERIC(18, 2)` in the database and a
//! two-decimal string (`"100.00"`) on the wire.

use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use validator::ValidateError;

pub const MAX_DIGITS: u32 = 18;
pub const DECIMAL_PLACES: u32 = 2;
pub const MAX_WHOLE_DIGITS: u32 = MAX_DIGITS - DECIMAL_PLACES;

/// Smallest amount a single payment can carry.
pub const MIN_PAYMENT: Decimal = Decimal::ONE;

/// Rescales `value` to exactly two decimal places.
#[must_use]
pub fn to_money(mut value: Decimal) -> Decimal {
  value.rescale(DECIMAL_PLACES);
  value
}

/// Parses and checks a payment amount given either as a JSON number or
/// as a numeric string.
pub fn parse_payment_amount(value: &Value) -> Result<Decimal, ValidateError> {
  let amount = match value {
    Value::Null => return Err(ValidateError::message("This field may not be null.")),
    Value::Number(n) => parse_decimal(&n.to_string()),
    Value::String(s) => parse_decimal(s.trim()),
    _ => None,
  };
  let Some(amount) = amount else {
    return Err(ValidateError::message("A valid number is required."));
  };

  let mut messages = ValidateError::msg_builder();
  let normalized = amount.normalize();
  let decimals = normalized.scale();
  let whole_digits = whole_digits(normalized);

  if whole_digits + decimals > MAX_DIGITS {
    messages.insert(format!(
      "Ensure that there are no more than {MAX_DIGITS} digits in total."
    ));
  } else if decimals > DECIMAL_PLACES {
    messages.insert(format!(
      "Ensure that there are no more than {DECIMAL_PLACES} decimal places."
    ));
  } else if whole_digits > MAX_WHOLE_DIGITS {
    messages.insert(format!(
      "Ensure that there are no more than {MAX_WHOLE_DIGITS} digits before the decimal point."
    ));
  }

  if amount < MIN_PAYMENT {
    messages.insert("Ensure this value is greater than or equal to 1.00.");
  }

  messages.build().into_result()?;
  Ok(to_money(amount))
}

fn parse_decimal(value: &str) -> Option<Decimal> {
  if value.is_empty() {
    return None;
  }
  Decimal::from_str(value)
    .or_else(|_| Decimal::from_scientific(value))
    .ok()
}

fn whole_digits(value: Decimal) -> u32 {
  let whole = value.trunc().abs();
  if whole.is_zero() {
    0
  } else {
    u32::try_from(whole.to_string().len()).unwrap_or(u32::MAX)
  }
}
