//! Argon2id password hashing. Both operations are CPU bound and run on
//! tokio's blocking pool.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use error_stack::{Report, Result, ResultExt};
use thiserror::Error;
use tokio::sync::OnceCell;

use crate::types::Sensitive;

/// Stands in for the stored hash when the user does not exist.
pub(super) static DUMMY_HASH: OnceCell<String> = OnceCell::const_new();

#[derive(Debug, Error)]
#[error("Could not process password")]
pub struct PasswordError;

/// Hashes `password` into a salted PHC string.
#[tracing::instrument(skip_all, name = "password.hash")]
pub async fn hash(password: Sensitive<String>) -> Result<String, PasswordError> {
  tokio::task::spawn_blocking(move || {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
      .hash_password(password.as_str().as_bytes(), &salt)
      .map(|hash| hash.to_string())
      .map_err(|e| Report::new(PasswordError).attach_printable(e.to_string()))
  })
  .await
  .change_context(PasswordError)?
}

/// Checks `password` against a PHC string made by [`hash`].
///
/// Returns `Ok(false)` on mismatch and an error only if the stored
/// hash is malformed.
#[tracing::instrument(skip_all, name = "password.verify")]
pub async fn verify(password: Sensitive<String>, hash: String) -> Result<bool, PasswordError> {
  tokio::task::spawn_blocking(move || {
    let parsed = PasswordHash::new(&hash)
      .map_err(|e| Report::new(PasswordError).attach_printable(format!("invalid hash format: {e}")))?;

    match Argon2::default().verify_password(password.as_str().as_bytes(), &parsed) {
      Ok(()) => Ok(true),
      Err(argon2::password_hash::Error::Password) => Ok(false),
      Err(e) => Err(Report::new(PasswordError).attach_printable(format!("verify error: {e}"))),
    }
  })
  .await
  .change_context(PasswordError)?
}

/// Runs the same Argon2 work as [`verify`] against a throwaway hash, so
/// logins for unknown users take as long as wrong passwords.
#[tracing::instrument(skip_all, name = "password.verify_dummy")]
pub async fn verify_dummy(password: Sensitive<String>) -> Result<(), PasswordError> {
  let stored = DUMMY_HASH
    .get_or_try_init(|| hash(Sensitive::from("tally-dummy-password")))
    .await?;
  verify(password, stored.clone()).await.map(drop)
}
