//! Request bodies and response representations, one pair per action.

use serde::{Deserialize, Deserializer};

pub mod customers;
pub mod payments;
pub mod users;

/// Lets a form tell a missing field (`None`) apart from an explicit
/// `null` (`Some(Value::Null)`). Use together with `#[serde(default)]`.
pub(crate) fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  T::deserialize(deserializer).map(Some)
}
