use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidateError};

use super::present;
use crate::schema::{Customer, CustomerChanges, NewCustomer};
use crate::types::id::CustomerId;
use crate::types::money::to_money;
use crate::util::validation::{self, non_null, NAME_MAX, REQUIRED_MSG};

/// Body of `POST /dashboard/customer` and `PUT /dashboard/customer/{id}`.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[allow(clippy::option_option)]
pub struct CustomerForm {
  #[serde(default, deserialize_with = "present")]
  #[schema(value_type = String, example = "test name")]
  pub name: Option<Option<String>>,
  #[serde(default, deserialize_with = "present")]
  #[schema(value_type = String, example = "test@test.com")]
  pub email: Option<Option<String>>,
  #[serde(default, deserialize_with = "present")]
  #[schema(value_type = String, example = "123 test address")]
  pub address: Option<Option<String>>,
}

impl Validate for CustomerForm {
  fn validate(&self) -> Result<(), ValidateError> {
    let text = |value: &Option<Option<String>>, max| {
      non_null(value).and_then(|value| validation::required_text(value.map(String::as_str), max))
    };
    let mut fields = ValidateError::field_builder();
    fields.check("name", text(&self.name, Some(NAME_MAX)));
    fields.check(
      "email",
      non_null(&self.email)
        .and_then(|value| validation::required_email(value.map(String::as_str))),
    );
    fields.check("address", text(&self.address, None));
    fields.build().into_result()
  }
}

impl CustomerForm {
  pub fn into_new_customer(self) -> Result<NewCustomer, ValidateError> {
    self.validate()?;
    match (self.name.flatten(), self.email.flatten(), self.address.flatten()) {
      (Some(name), Some(email), Some(address)) => Ok(NewCustomer {
        name: name.trim().to_string(),
        email: email.trim().to_string(),
        address: address.trim().to_string(),
      }),
      _ => Err(ValidateError::message(REQUIRED_MSG)),
    }
  }
}

/// Body of `PATCH /dashboard/customer/{id}`. Read-only fields such as
/// `balance` and `customer_id` are ignored if sent.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[allow(clippy::option_option)]
pub struct PatchCustomer {
  #[serde(default, deserialize_with = "present")]
  #[schema(value_type = Option<String>)]
  pub name: Option<Option<String>>,
  #[serde(default, deserialize_with = "present")]
  #[schema(value_type = Option<String>)]
  pub email: Option<Option<String>>,
  #[serde(default, deserialize_with = "present")]
  #[schema(value_type = Option<String>)]
  pub address: Option<Option<String>>,
}

impl Validate for PatchCustomer {
  fn validate(&self) -> Result<(), ValidateError> {
    let mut fields = ValidateError::field_builder();
    fields.check(
      "name",
      non_null(&self.name).and_then(|value| {
        value.map_or(Ok(()), |name| validation::present_text(name, Some(NAME_MAX)))
      }),
    );
    fields.check(
      "email",
      non_null(&self.email).and_then(|value| value.map_or(Ok(()), |email| validation::email(email))),
    );
    fields.check(
      "address",
      non_null(&self.address).and_then(|value| {
        value.map_or(Ok(()), |address| validation::present_text(address, None))
      }),
    );
    fields.build().into_result()
  }
}

impl PatchCustomer {
  pub fn into_changes(self) -> Result<CustomerChanges, ValidateError> {
    self.validate()?;
    let trimmed = |value: String| value.trim().to_string();
    Ok(CustomerChanges {
      name: self.name.flatten().map(trimmed),
      email: self.email.flatten().map(trimmed),
      address: self.address.flatten().map(trimmed),
    })
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CustomerResponse {
  #[schema(value_type = String, example = "CUS_7K2M9QX4ZP")]
  pub customer_id: CustomerId,
  pub name: String,
  pub email: String,
  pub address: String,
  #[schema(value_type = String, example = "1010.50")]
  pub balance: Decimal,
}

impl From<Customer> for CustomerResponse {
  fn from(value: Customer) -> Self {
    Self {
      customer_id: value.customer_id,
      name: value.name,
      email: value.email,
      address: value.address,
      balance: to_money(value.balance),
    }
  }
}
