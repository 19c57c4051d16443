use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display};

/// Keeps secrets (passwords, tokens) in memory without leaking
/// them through the console or logs.
#[derive(Clone, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
  #[must_use]
  pub const fn new(value: T) -> Self {
    Self(value)
  }

  #[must_use]
  pub fn into_inner(self) -> T {
    self.0
  }
}

impl<T> Debug for Sensitive<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str("<hidden>")
  }
}

impl<T> Display for Sensitive<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str("<hidden>")
  }
}

impl<T> AsRef<T> for Sensitive<T> {
  fn as_ref(&self) -> &T {
    &self.0
  }
}

impl<T: AsRef<str>> Sensitive<T> {
  #[must_use]
  pub fn as_str(&self) -> &str {
    self.0.as_ref()
  }
}

impl<T> From<T> for Sensitive<T> {
  fn from(value: T) -> Self {
    Self(value)
  }
}

impl From<&str> for Sensitive<String> {
  fn from(value: &str) -> Self {
    Self(value.to_string())
  }
}

#[cfg(test)]
mod tests {
  use super::Sensitive;
  use serde_test::Token;

  #[test]
  fn test_fmt() {
    let value = Sensitive::new("hunter22");
    assert_eq!(value.to_string(), "<hidden>");
    assert_eq!(format!("{value:?}"), "<hidden>");
  }

  #[test]
  fn test_serde_impl() {
    let value = Sensitive::<String>::from("hunter22");
    serde_test::assert_tokens(&value, &[Token::Str("hunter22")]);
  }
}
