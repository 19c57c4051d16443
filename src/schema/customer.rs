use rust_decimal::Decimal;
use sqlx::FromRow;

use crate::types::id::{marker::CustomerMarker, CustomerId, Id};

#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct Customer {
  pub id: Id<CustomerMarker>,
  pub customer_id: CustomerId,
  pub name: String,
  pub email: String,
  pub address: String,
  pub balance: Decimal,
}

#[derive(Debug, Clone)]
pub struct NewCustomer {
  pub name: String,
  pub email: String,
  pub address: String,
}

/// Editable customer fields. The balance is not among them, it only
/// moves when a payment is recorded.
#[derive(Debug, Clone, Default)]
pub struct CustomerChanges {
  pub name: Option<String>,
  pub email: Option<String>,
  pub address: Option<String>,
}

impl CustomerChanges {
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.name.is_none() && self.email.is_none() && self.address.is_none()
  }
}

impl From<NewCustomer> for CustomerChanges {
  fn from(value: NewCustomer) -> Self {
    Self {
      name: Some(value.name),
      email: Some(value.email),
      address: Some(value.address),
    }
  }
}
