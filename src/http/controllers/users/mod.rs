use error_stack::Report;
use validator::ValidateError;

use crate::database::{self, ErrorExt2};
use crate::http::Error;

pub mod login;
pub mod profile;
pub mod refresh;
pub mod signup;

pub use self::login::login;
pub use self::profile::{delete_profile, profile, update_profile};
pub use self::refresh::refresh;
pub use self::signup::signup;

const USERNAME_TAKEN: &str = "A user with that username already exists.";
const EMAIL_TAKEN: &str = "user with this email already exists.";

/// Rejects a username or email used by a user other than `except`.
async fn check_unique(
  store: &dyn database::Store,
  username: Option<&str>,
  email: Option<&str>,
  except: Option<crate::types::id::Id<crate::types::id::marker::UserMarker>>,
) -> Result<(), Error> {
  let mut fields = ValidateError::field_builder();
  if let Some(username) = username {
    if store.username_taken(username, except).await? {
      fields.insert_message("username", USERNAME_TAKEN);
    }
  }
  if let Some(email) = email {
    if store.email_taken(email, except).await? {
      fields.insert_message("email", EMAIL_TAKEN);
    }
  }
  fields.build().into_result()?;
  Ok(())
}

/// A concurrent signup can still win the race to a username or email.
fn unique_conflict(report: Report<database::Error>) -> Error {
  match report.unique_violation() {
    Some("username") => ValidateError::field("username", USERNAME_TAKEN).into(),
    Some("email") => ValidateError::field("email", EMAIL_TAKEN).into(),
    _ => report.into(),
  }
}
