use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{postgres::PgRow, FromRow, Row};

use super::Customer;
use crate::types::id::{
  marker::{CustomerMarker, PaymentMarker},
  CustomerId, Id, PaymentRef,
};

#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct Payment {
  pub id: Id<PaymentMarker>,
  pub payment_ref: PaymentRef,
  /// `None` once the customer has been deleted.
  pub customer_id: Option<Id<CustomerMarker>>,
  pub amount: Decimal,
  pub created: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPayment {
  pub customer: CustomerId,
  /// Already validated (at least 1.00, two decimal places).
  pub amount: Decimal,
}

/// A payment together with the customer it is (still) attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRecord {
  pub payment: Payment,
  pub customer: Option<Customer>,
}

impl<'r> FromRow<'r, PgRow> for PaymentRecord {
  fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
    let payment = Payment::from_row(row)?;
    let customer = match row.try_get::<Option<CustomerId>, _>("customer_public_id")? {
      Some(customer_id) => Some(Customer {
        id: row.try_get("customer_pk")?,
        customer_id,
        name: row.try_get("customer_name")?,
        email: row.try_get("customer_email")?,
        address: row.try_get("customer_address")?,
        balance: row.try_get("customer_balance")?,
      }),
      None => None,
    };
    Ok(Self { payment, customer })
  }
}
