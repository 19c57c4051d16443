use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use uuid::Uuid;

pub const CUSTOMER_ID_PREFIX: &str = "CUS_";
/// Digits and uppercase letters without `I` and `O`.
pub const CUSTOMER_ID_ALPHABET: &str = "0123456789ABCDEFGHJKLMNPQRSTUVWXYZ";

const CUSTOMER_ID_RANDOM_LEN: usize = 10;

/// Public identifier of a customer, e.g. `CUS_7XK2M9QH4A`.
///
/// Used in every customer route instead of the internal row key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct CustomerId(String);

impl CustomerId {
  /// Generates a fresh identifier. Uniqueness is enforced by the
  /// store, which regenerates on the (rare) collision.
  #[must_use]
  pub fn generate() -> Self {
    let random = random_string::generate(CUSTOMER_ID_RANDOM_LEN, CUSTOMER_ID_ALPHABET);
    Self(format!("{CUSTOMER_ID_PREFIX}{random}"))
  }

  /// Wraps a value received from a client. It is not required to be
  /// well formed, lookups of malformed ids simply find nothing.
  #[must_use]
  pub fn new(value: impl Into<String>) -> Self {
    Self(value.into())
  }

  #[must_use]
  pub fn as_str(&self) -> &str {
    &self.0
  }

  #[must_use]
  pub fn is_well_formed(&self) -> bool {
    self.0.strip_prefix(CUSTOMER_ID_PREFIX).is_some_and(|random| {
      random.chars().count() == CUSTOMER_ID_RANDOM_LEN
        && random.chars().all(|c| CUSTOMER_ID_ALPHABET.contains(c))
    })
  }
}

impl Display for CustomerId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.0)
  }
}

/// Public reference of a payment (a random UUID).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct PaymentRef(Uuid);

impl PaymentRef {
  #[must_use]
  pub fn generate() -> Self {
    Self(Uuid::new_v4())
  }

  #[must_use]
  pub const fn as_uuid(&self) -> &Uuid {
    &self.0
  }
}

impl FromStr for PaymentRef {
  type Err = uuid::Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Uuid::parse_str(s).map(Self)
  }
}

impl Display for PaymentRef {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    Display::fmt(&self.0.hyphenated(), f)
  }
}
