use error_stack::Report;
use thiserror::Error;

/// Database related errors
#[derive(Debug, Error)]
pub enum Error {
  /// An error caused by an invalid Postgres connection
  /// url for either the primary or the replica pool.
  #[error("invalid connection url")]
  InvalidUrl,
  /// An error caused by an [`sqlx`] error.
  #[error("received a pool error: {0}")]
  Internal(sqlx::Error),
  /// The database pool (primary) is currently in read mode
  /// (most likely due to maintenance) and should not perform
  /// any writes.
  #[error("database is currently in read mode")]
  Readonly,
  /// Either the primary or replica database pools do not
  /// have reliable connection to transact to the database.
  #[error("unhealthy database pool")]
  UnhealthyPool,
  /// A unique constraint rejected the write. Holds the column
  /// the constraint covers.
  #[error("{0} is already taken")]
  UniqueViolation(&'static str),
  #[error("could not run database migrations")]
  Migration,
}

/// SQLSTATE of a write attempted in a read-only transaction.
const READ_ONLY_SQL_TRANSACTION: &str = "25006";

/// Unique constraints from `migrations/` and the column each one covers.
const UNIQUE_CONSTRAINTS: &[(&str, &str)] = &[
  ("users_username_key", "username"),
  ("users_email_key", "email"),
  ("customers_customer_id_key", "customer_id"),
  ("payments_payment_ref_key", "payment_ref"),
];

/// Converts from a generic [sqlx] result into a [database compatible error](Error).
pub trait ErrorExt<T> {
  fn into_db_error(self) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, sqlx::Error> {
  fn into_db_error(self) -> Result<T> {
    self.map_err(|e| match &e {
      sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(..) => {
        Report::new(e).change_context(Error::UnhealthyPool)
      },
      sqlx::Error::Database(err) if err.code().as_deref() == Some(READ_ONLY_SQL_TRANSACTION) => {
        Report::new(e).change_context(Error::Readonly)
      },
      sqlx::Error::Database(err) if err.is_unique_violation() => {
        let column = err.constraint().and_then(|name| {
          UNIQUE_CONSTRAINTS
            .iter()
            .find(|(constraint, _)| *constraint == name)
            .map(|(_, column)| *column)
        });
        match column {
          Some(column) => Report::new(e).change_context(Error::UniqueViolation(column)),
          None => Report::new(Error::Internal(e)),
        }
      },
      _ => Report::new(Error::Internal(e)),
    })
  }
}

/// Lazily typed [`std::result::Result`] but the error generic
/// is filled up with [a database error](Error).
pub type Result<T> = error_stack::Result<T, Error>;

/// Peeks into a `Report<Error>` without matching on the context by hand.
pub trait ErrorExt2 {
  fn is_unhealthy(&self) -> bool;
  fn is_readonly(&self) -> bool;
  /// Column of the violated unique constraint, if that is the cause.
  fn unique_violation(&self) -> Option<&'static str>;
}

impl ErrorExt2 for error_stack::Report<Error> {
  fn is_unhealthy(&self) -> bool {
    matches!(self.current_context(), Error::UnhealthyPool)
  }

  fn is_readonly(&self) -> bool {
    matches!(self.current_context(), Error::Readonly)
  }

  fn unique_violation(&self) -> Option<&'static str> {
    match self.current_context() {
      Error::UniqueViolation(column) => Some(*column),
      _ => None,
    }
  }
}
