use serde::Deserialize;
use std::num::NonZeroU64;
use std::time::Duration;
use validator::{extras::validate_length, Validate, ValidateError};

use crate::types::Sensitive;

#[derive(Debug, Deserialize)]
pub struct Auth {
  /// Secret used to sign and verify JSON web tokens (HS512).
  ///
  /// **Environment variables**:
  /// - `TALLY_AUTH_JWT_SECRET`
  pub jwt_secret: Sensitive<String>,
  /// **Environment variables**:
  /// - `TALLY_AUTH_ACCESS_TOKEN_LIFETIME_SECS`
  #[serde(default = "Auth::default_access_token_lifetime_secs")]
  pub access_token_lifetime_secs: NonZeroU64,
  /// **Environment variables**:
  /// - `TALLY_AUTH_REFRESH_TOKEN_LIFETIME_SECS`
  #[serde(default = "Auth::default_refresh_token_lifetime_secs")]
  pub refresh_token_lifetime_secs: NonZeroU64,
}

impl Auth {
  const JWT_SECRET_MIN: usize = 12;
  const JWT_SECRET_MAX: usize = 1024;

  // 5 minutes
  const DEFAULT_ACCESS_TOKEN_LIFETIME_SECS: u64 = 60 * 5;
  // 1 day
  const DEFAULT_REFRESH_TOKEN_LIFETIME_SECS: u64 = 60 * 60 * 24;

  const fn default_access_token_lifetime_secs() -> NonZeroU64 {
    match NonZeroU64::new(Self::DEFAULT_ACCESS_TOKEN_LIFETIME_SECS) {
      Some(n) => n,
      None => panic!("DEFAULT_ACCESS_TOKEN_LIFETIME_SECS is accidentally set to 0"),
    }
  }

  const fn default_refresh_token_lifetime_secs() -> NonZeroU64 {
    match NonZeroU64::new(Self::DEFAULT_REFRESH_TOKEN_LIFETIME_SECS) {
      Some(n) => n,
      None => panic!("DEFAULT_REFRESH_TOKEN_LIFETIME_SECS is accidentally set to 0"),
    }
  }

  #[must_use]
  pub fn access_token_lifetime(&self) -> Duration {
    Duration::from_secs(self.access_token_lifetime_secs.get())
  }

  #[must_use]
  pub fn refresh_token_lifetime(&self) -> Duration {
    Duration::from_secs(self.refresh_token_lifetime_secs.get())
  }

  #[cfg(test)]
  pub(crate) fn for_tests() -> Self {
    Self {
      jwt_secret: "tally-test-secret-key".into(),
      access_token_lifetime_secs: Self::default_access_token_lifetime_secs(),
      refresh_token_lifetime_secs: Self::default_refresh_token_lifetime_secs(),
    }
  }
}

impl Validate for Auth {
  fn validate(&self) -> Result<(), ValidateError> {
    let mut fields = ValidateError::field_builder();
    if !validate_length(
      self.jwt_secret.as_str(),
      Some(Self::JWT_SECRET_MIN),
      Some(Self::JWT_SECRET_MAX),
    ) {
      fields.insert_message("jwt_secret", "Invalid JWT secret key");
    }
    fields.build().into_result()
  }
}
