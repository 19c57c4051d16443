use serde::Deserialize;
use std::num::{NonZeroU32, NonZeroU64};
use validator::{Validate, ValidateError};

use crate::types::Sensitive;

#[derive(Debug, Deserialize)]
pub struct Database {
  /// Writable primary database.
  pub primary: DbPoolConfig,
  /// A read-only replica used for listing and retrieving data
  /// without putting load on the primary database.
  pub replica: Option<DbPoolConfig>,
  /// Forces all database connections to be encrypted with TLS.
  ///
  /// **Environment variables**:
  /// - `TALLY_DB_ENFORCE_TLS`
  #[serde(default = "Database::default_enforce_tls")]
  pub enforce_tls: bool,
  /// How long to wait for a connection to be acquired or
  /// established before giving up.
  ///
  /// **Environment variables**:
  /// - `TALLY_DB_TIMEOUT_SECS`
  #[serde(default = "Database::default_timeout_secs")]
  pub timeout_secs: NonZeroU64,
  /// Applies pending migrations from `migrations/` on startup.
  ///
  /// **Environment variables**:
  /// - `TALLY_DB_RUN_MIGRATIONS`
  #[serde(default = "Database::default_run_migrations")]
  pub run_migrations: bool,
}

impl Database {
  const DEFAULT_TIMEOUT_SECS: u64 = 5;

  const fn default_enforce_tls() -> bool {
    false
  }

  const fn default_run_migrations() -> bool {
    true
  }

  const fn default_timeout_secs() -> NonZeroU64 {
    match NonZeroU64::new(Self::DEFAULT_TIMEOUT_SECS) {
      Some(n) => n,
      None => panic!("DEFAULT_TIMEOUT_SECS is accidentally set to 0"),
    }
  }
}

impl Validate for Database {
  fn validate(&self) -> Result<(), ValidateError> {
    let mut fields = ValidateError::field_builder();
    fields.check("primary", self.primary.validate());
    fields.check("replica", self.replica.validate());
    fields.build().into_result()
  }
}

/// Configuration for connecting to a Postgres database.
#[derive(Debug, Deserialize)]
pub struct DbPoolConfig {
  /// Opens every session with `default_transaction_read_only`, so
  /// writes are refused and answered with `503` (read-only mode).
  ///
  /// **Environment variables**:
  /// - `TALLY_DB_PRIMARY_READONLY`
  /// - `TALLY_DB_REPLICA_READONLY`
  #[serde(default)]
  pub readonly: bool,
  /// **Environment variables**:
  /// - `TALLY_DB_PRIMARY_MIN_IDLE`
  /// - `TALLY_DB_REPLICA_MIN_IDLE`
  pub min_idle: Option<NonZeroU32>,
  /// **Environment variables**:
  /// - `TALLY_DB_PRIMARY_POOL_SIZE`
  /// - `TALLY_DB_REPLICA_POOL_SIZE`
  #[serde(default = "DbPoolConfig::default_pool_size")]
  pub pool_size: NonZeroU32,
  /// Connection URL of the Postgres database.
  ///
  /// **Environment variables**:
  /// - `TALLY_DB_PRIMARY_URL` or `DATABASE_URL`
  /// - `TALLY_DB_REPLICA_URL`
  pub url: Sensitive<String>,
}

impl DbPoolConfig {
  const DEFAULT_POOL_SIZE: u32 = 5;

  const fn default_pool_size() -> NonZeroU32 {
    match NonZeroU32::new(Self::DEFAULT_POOL_SIZE) {
      Some(n) => n,
      None => panic!("DEFAULT_POOL_SIZE is accidentally set to 0"),
    }
  }

  #[cfg(test)]
  pub(crate) fn for_tests(url: &str) -> Self {
    Self {
      readonly: false,
      min_idle: None,
      pool_size: Self::default_pool_size(),
      url: url.into(),
    }
  }
}

impl Validate for DbPoolConfig {
  fn validate(&self) -> Result<(), ValidateError> {
    let mut fields = ValidateError::field_builder();
    if !validator::extras::validate_url(self.url.as_str()) {
      fields.insert_message("url", "Invalid Postgres connection URL");
    }
    if let Some(min_idle) = self.min_idle {
      if min_idle > self.pool_size {
        fields.insert_message("min_idle", "Must not be greater than pool_size");
      }
    }
    fields.build().into_result()
  }
}
