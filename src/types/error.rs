use serde::{ser::SerializeMap, Serialize};
use std::fmt::Display;
use validator::ValidateError;

/// Possible error outcomes of the ledger API.
///
/// Serialized as `{"code": .., "message": ..}` with an extra `data`
/// field for form errors.
#[derive(Debug, PartialEq, Eq)]
pub enum Error {
  Internal,
  ReadonlyMode,
  NotAuthenticated,
  InvalidCredentials,
  InvalidToken,
  InvalidFormBody(ValidateError),
  NotFound,
  MethodNotAllowed,
}

pub mod codes {
  pub const INTERNAL: u32 = 1;
  pub const READONLY_MODE: u32 = 2;
  pub const NOT_AUTHENTICATED: u32 = 3;
  pub const INVALID_CREDENTIALS: u32 = 4;
  pub const INVALID_TOKEN: u32 = 5;
  pub const INVALID_FORM_BODY: u32 = 6;
  pub const NOT_FOUND: u32 = 7;
  pub const METHOD_NOT_ALLOWED: u32 = 8;
}

impl Error {
  #[must_use]
  pub const fn code(&self) -> u32 {
    match self {
      Self::Internal => codes::INTERNAL,
      Self::ReadonlyMode => codes::READONLY_MODE,
      Self::NotAuthenticated => codes::NOT_AUTHENTICATED,
      Self::InvalidCredentials => codes::INVALID_CREDENTIALS,
      Self::InvalidToken => codes::INVALID_TOKEN,
      Self::InvalidFormBody(..) => codes::INVALID_FORM_BODY,
      Self::NotFound => codes::NOT_FOUND,
      Self::MethodNotAllowed => codes::METHOD_NOT_ALLOWED,
    }
  }

  #[must_use]
  pub const fn message(&self) -> &'static str {
    match self {
      Self::Internal => "Internal server error occurred. Please try again later.",
      Self::ReadonlyMode => "This service is currently in read-only mode. Please try again later.",
      Self::NotAuthenticated => "Authentication credentials were not provided or are invalid.",
      Self::InvalidCredentials => "No active account found with the given credentials.",
      Self::InvalidToken => "Token is invalid or expired.",
      Self::InvalidFormBody(..) => "Invalid form body",
      Self::NotFound => "Not found.",
      Self::MethodNotAllowed => "Method not allowed.",
    }
  }
}

impl Display for Error {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Internal => f.write_str("Failed to perform request"),
      Self::ReadonlyMode => f.write_str("Attempt to write to a read only database"),
      Self::NotAuthenticated => {
        f.write_str("Attempt to access resource while not authenticated")
      },
      Self::InvalidCredentials => f.write_str("User put invalid credentials"),
      Self::InvalidToken => f.write_str("User sent an invalid or expired token"),
      Self::InvalidFormBody(..) => f.write_str("Sent an invalid form body"),
      Self::NotFound => f.write_str("Requested resource does not exist"),
      Self::MethodNotAllowed => f.write_str("Method is not allowed on this resource"),
    }
  }
}

impl Serialize for Error {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    if let Error::InvalidFormBody(data) = self {
      let mut map = serializer.serialize_map(Some(3))?;
      map.serialize_entry("code", &self.code())?;
      map.serialize_entry("message", self.message())?;
      map.serialize_entry("data", data)?;
      map.end()
    } else {
      let mut map = serializer.serialize_map(Some(2))?;
      map.serialize_entry("code", &self.code())?;
      map.serialize_entry("message", self.message())?;
      map.end()
    }
  }
}
