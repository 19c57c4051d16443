use actix_web::{
  web::{self, Json},
  HttpResponse,
};
use validator::Validate;

use super::{check_unique, unique_conflict};
use crate::{
  auth::password,
  http::{doc::ErrorResponse, Error},
  schema::NewUser,
  types::form::users::{Signup, UserResponse},
  App,
};

#[utoipa::path(
  post,
  path = "/user/signup",
  request_body = Signup,
  responses(
    (status = 201, description = "User created", body = UserResponse),
    (status = 400, description = "Invalid form body or taken username/email", body = ErrorResponse)
  ),
  tags = ["User Authentication"],
  security([])
)]
#[tracing::instrument(skip_all, name = "http.users.signup")]
pub async fn signup(app: web::Data<App>, form: Json<Signup>) -> Result<HttpResponse, Error> {
  form.validate()?;

  let form = form.into_inner();
  let username = form.username.unwrap_or_default().trim().to_string();
  let email = form.email.unwrap_or_default().trim().to_string();

  check_unique(app.store.as_ref(), Some(&username), Some(&email), None).await?;

  let password_hash = password::hash(form.password.unwrap_or_default()).await?;
  let user = app
    .store
    .create_user(NewUser {
      username,
      email,
      password_hash,
    })
    .await
    .map_err(unique_conflict)?;

  tracing::info!(user.id = %user.id, "user signed up");
  Ok(HttpResponse::Created().json(UserResponse::from(user)))
}
