use actix_web::{
  web::{self, Json},
  HttpResponse,
};
use validator::Validate;

use crate::{
  http::{doc::ErrorResponse, Error},
  types::form::users::{Login, TokenPairResponse},
  App,
};

#[utoipa::path(
  post,
  path = "/user/login",
  request_body = Login,
  responses(
    (status = 200, description = "Access and refresh tokens", body = TokenPairResponse),
    (status = 400, description = "Invalid form body", body = ErrorResponse),
    (status = 401, description = "Invalid credentials", body = ErrorResponse)
  ),
  tags = ["User Authentication"],
  security([])
)]
#[tracing::instrument(skip_all, name = "http.users.login")]
pub async fn login(app: web::Data<App>, form: Json<Login>) -> Result<HttpResponse, Error> {
  form.validate()?;

  let form = form.into_inner();
  let username = form.username.unwrap_or_default();
  let pair = app
    .auth
    .issue(app.store.as_ref(), &username, form.password.unwrap_or_default())
    .await?;

  Ok(HttpResponse::Ok().json(TokenPairResponse {
    refresh: pair.refresh,
    access: pair.access,
  }))
}
