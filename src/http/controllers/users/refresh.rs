use actix_web::{
  web::{self, Json},
  HttpResponse,
};
use validator::Validate;

use crate::{
  http::{doc::ErrorResponse, Error},
  types::form::users::{AccessTokenResponse, RefreshToken},
  App,
};

#[utoipa::path(
  post,
  path = "/user/token/refresh",
  request_body = RefreshToken,
  responses(
    (status = 200, description = "A new access token", body = AccessTokenResponse),
    (status = 400, description = "Invalid form body", body = ErrorResponse),
    (status = 401, description = "Invalid or expired refresh token", body = ErrorResponse)
  ),
  tags = ["User Authentication"],
  security([])
)]
#[tracing::instrument(skip_all, name = "http.users.refresh")]
pub async fn refresh(app: web::Data<App>, form: Json<RefreshToken>) -> Result<HttpResponse, Error> {
  form.validate()?;

  let token = form.into_inner().refresh.unwrap_or_default();
  let access = app.auth.refresh(app.store.as_ref(), token.as_str()).await?;
  Ok(HttpResponse::Ok().json(AccessTokenResponse { access }))
}
