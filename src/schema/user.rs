use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::types::id::{marker::UserMarker, Id};

#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct User {
  pub id: Id<UserMarker>,
  pub username: String,
  pub email: String,
  pub password_hash: String,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
  pub username: String,
  pub email: String,
  /// Already hashed, see [`crate::auth::password`].
  pub password_hash: String,
}

/// Profile changes. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
  pub username: Option<String>,
  pub email: Option<String>,
  pub password_hash: Option<String>,
}

impl UserChanges {
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.username.is_none() && self.email.is_none() && self.password_hash.is_none()
  }
}
