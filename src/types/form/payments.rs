use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::ValidateError;

use super::customers::CustomerResponse;
use super::present;
use crate::schema::{NewPayment, Payment, PaymentRecord};
use crate::types::id::{CustomerId, PaymentRef};
use crate::types::money::{parse_payment_amount, to_money};
use crate::util::validation::{NULL_MSG, REQUIRED_MSG};

/// Body of `POST /dashboard/payment`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreatePayment {
  /// Public id of the customer to credit.
  #[serde(default, deserialize_with = "present")]
  #[schema(value_type = String, example = "CUS_7K2M9QX4ZP")]
  pub customer: Option<Value>,
  /// A number or a decimal string, at least 1.00 with up to 2 places.
  #[serde(default, deserialize_with = "present")]
  #[schema(value_type = String, example = "1000.00")]
  pub amount: Option<Value>,
}

impl CreatePayment {
  fn customer_field(&self) -> Result<CustomerId, ValidateError> {
    match self.customer.as_ref() {
      None => Err(ValidateError::message(REQUIRED_MSG)),
      Some(Value::Null) => Err(ValidateError::message(NULL_MSG)),
      Some(Value::String(id)) => Ok(CustomerId::new(id.trim())),
      // Looked up as given, which can never match a public id.
      Some(other) => Ok(CustomerId::new(other.to_string())),
    }
  }

  fn amount_field(&self) -> Result<Decimal, ValidateError> {
    match self.amount.as_ref() {
      None => Err(ValidateError::message(REQUIRED_MSG)),
      Some(value) => parse_payment_amount(value),
    }
  }

  /// Checks everything that does not need the store. Whether the
  /// customer exists is decided when the payment is written.
  pub fn into_new_payment(self) -> Result<NewPayment, ValidateError> {
    let customer = self.customer_field();
    let amount = self.amount_field();
    match (customer, amount) {
      (Ok(customer), Ok(amount)) => Ok(NewPayment { customer, amount }),
      (customer, amount) => {
        let mut fields = ValidateError::field_builder();
        fields.check("customer", customer.map(|_| ()));
        fields.check("amount", amount.map(|_| ()));
        Err(fields.build())
      },
    }
  }
}

#[must_use]
pub fn unknown_customer(customer: &CustomerId) -> ValidateError {
  ValidateError::field(
    "customer",
    format!("Object with customer_id={customer} does not exist."),
  )
}

/// A payment with its customer nested, as listed and retrieved.
#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentResponse {
  #[schema(value_type = String, format = Uuid)]
  pub payment_ref: PaymentRef,
  /// `null` once the customer has been deleted.
  pub customer: Option<CustomerResponse>,
  #[schema(value_type = String, example = "1000.00")]
  pub amount: Decimal,
  pub created: DateTime<Utc>,
}

impl From<PaymentRecord> for PaymentResponse {
  fn from(value: PaymentRecord) -> Self {
    Self {
      payment_ref: value.payment.payment_ref,
      customer: value.customer.map(CustomerResponse::from),
      amount: to_money(value.payment.amount),
      created: value.payment.created,
    }
  }
}

/// Response of `POST /dashboard/payment`. The customer is given by its
/// public id only.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedPaymentResponse {
  #[schema(value_type = String, format = Uuid)]
  pub payment_ref: PaymentRef,
  #[schema(value_type = String, example = "CUS_7K2M9QX4ZP")]
  pub customer: CustomerId,
  #[schema(value_type = String, example = "1000.00")]
  pub amount: Decimal,
  pub created: DateTime<Utc>,
}

impl CreatedPaymentResponse {
  #[must_use]
  pub fn new(payment: Payment, customer: CustomerId) -> Self {
    Self {
      payment_ref: payment.payment_ref,
      customer,
      amount: to_money(payment.amount),
      created: payment.created,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn parse(value: Value) -> Result<NewPayment, ValidateError> {
    serde_json::from_value::<CreatePayment>(value)
      .unwrap()
      .into_new_payment()
  }

  #[test]
  fn accepts_valid_payment() {
    let payment = parse(json!({ "customer": "CUS_0000000001", "amount": 1000 })).unwrap();
    assert_eq!(payment.customer.as_str(), "CUS_0000000001");
    assert_eq!(payment.amount.to_string(), "1000.00");
  }

  #[test]
  fn tells_missing_and_null_apart() {
    let error = parse(json!({ "customer": null })).unwrap_err();
    assert_eq!(
      error.get("customer").map(ValidateError::messages).unwrap(),
      [NULL_MSG]
    );
    assert_eq!(
      error.get("amount").map(ValidateError::messages).unwrap(),
      [REQUIRED_MSG]
    );
  }

  #[test]
  fn reports_amount_errors_under_amount() {
    let error = parse(json!({ "customer": "CUS_0000000001", "amount": 0.5 })).unwrap_err();
    assert!(error.get("customer").is_none());
    assert_eq!(
      error.get("amount").map(ValidateError::messages).unwrap(),
      ["Ensure this value is greater than or equal to 1.00."]
    );
  }

  #[test]
  fn unknown_customer_message() {
    let error = unknown_customer(&CustomerId::new("test_id123"));
    assert_eq!(
      error,
      ValidateError::field("customer", "Object with customer_id=test_id123 does not exist.")
    );
  }
}
