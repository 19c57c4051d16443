#![cfg_attr(test, allow(clippy::unwrap_used))]
//! Hand-written validation for request forms and configuration.
//!
//! Types implement [`Validate`] by collecting messages into a
//! [`ValidateError`] through its builders, which serializes into a
//! `{"field": {"_errors": [...]}}` tree.

mod error;

pub use error::*;
pub mod extras;

pub trait Validate {
  fn validate(&self) -> Result<(), ValidateError>;
}

impl<T: Validate> Validate for Option<T> {
  fn validate(&self) -> Result<(), ValidateError> {
    match self {
      Some(inner) => inner.validate(),
      None => Ok(()),
    }
  }
}

pub trait HasLength {
  fn length(&self) -> usize;
}

impl HasLength for str {
  fn length(&self) -> usize {
    self.chars().count()
  }
}

impl HasLength for String {
  fn length(&self) -> usize {
    self.as_str().length()
  }
}

impl<T> HasLength for [T] {
  fn length(&self) -> usize {
    self.len()
  }
}
