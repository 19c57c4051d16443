use actix_web::{
  web::{self, Json},
  HttpResponse,
};
use thiserror::Error as ThisError;
use validator::Validate;

use super::{check_unique, unique_conflict};
use crate::{
  auth::password,
  http::{doc::ErrorResponse, Error, Principal},
  schema::UserChanges,
  types::{
    self,
    form::users::{UpdateProfile, UserResponse},
  },
  App,
};

#[derive(Debug, ThisError)]
#[error("User vanished while handling the request")]
struct UserGone;

#[utoipa::path(
  get,
  path = "/user/profile",
  responses(
    (status = 200, body = UserResponse),
    (status = 403, description = "Not authenticated", body = ErrorResponse)
  ),
  tags = ["Profile"]
)]
#[tracing::instrument(skip_all, name = "http.users.profile")]
pub async fn profile(Principal(user): Principal) -> Result<HttpResponse, Error> {
  Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

#[utoipa::path(
  patch,
  path = "/user/profile",
  request_body = UpdateProfile,
  responses(
    (status = 200, body = UserResponse),
    (status = 400, description = "Invalid form body or taken username/email", body = ErrorResponse),
    (status = 403, description = "Not authenticated", body = ErrorResponse)
  ),
  tags = ["Profile"]
)]
#[tracing::instrument(skip_all, name = "http.users.update_profile")]
pub async fn update_profile(
  Principal(user): Principal,
  app: web::Data<App>,
  form: Json<UpdateProfile>,
) -> Result<HttpResponse, Error> {
  form.validate()?;

  let form = form.into_inner();
  let username = form.username.flatten().map(|v| v.trim().to_string());
  let email = form.email.flatten().map(|v| v.trim().to_string());
  check_unique(
    app.store.as_ref(),
    username.as_deref(),
    email.as_deref(),
    Some(user.id),
  )
  .await?;

  let password_hash = match form.password.flatten() {
    Some(password) => Some(password::hash(password).await?),
    None => None,
  };

  let changes = UserChanges {
    username,
    email,
    password_hash,
  };
  let user = if changes.is_empty() {
    user
  } else {
    app
      .store
      .update_user(user.id, changes)
      .await
      .map_err(unique_conflict)?
      .ok_or_else(|| Error::from_context(types::Error::NotFound, UserGone))?
  };

  Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

#[utoipa::path(
  delete,
  path = "/user/profile",
  responses(
    (status = 204, description = "Account deleted"),
    (status = 403, description = "Not authenticated", body = ErrorResponse)
  ),
  tags = ["Profile"]
)]
#[tracing::instrument(skip_all, name = "http.users.delete_profile")]
pub async fn delete_profile(
  Principal(user): Principal,
  app: web::Data<App>,
) -> Result<HttpResponse, Error> {
  if !app.store.delete_user(user.id).await? {
    return Err(Error::from_context(types::Error::NotFound, UserGone));
  }
  tracing::info!(user.id = %user.id, "user deleted their account");
  Ok(HttpResponse::NoContent().finish())
}
