use actix_web::{http::header, web, FromRequest};
use futures::future::{ready, LocalBoxFuture};
use thiserror::Error;

use super::Error;
use crate::{auth::AuthError, schema::User, types, App};

/// The authenticated user making a request.
///
/// Extracting it fails with `403` when the `Authorization: Bearer`
/// header is missing or holds an unusable access token. Put it first
/// in a handler's arguments so it is checked before the body is read.
#[derive(Debug)]
pub struct Principal(pub User);

impl FromRequest for Principal {
  type Error = Error;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(
    req: &actix_web::HttpRequest,
    _payload: &mut actix_web::dev::Payload,
  ) -> Self::Future {
    #[derive(Debug, Error)]
    #[error("Attempt to access user-only route")]
    struct Unauthenticated;

    let token = req
      .headers()
      .get(header::AUTHORIZATION)
      .and_then(|v| v.to_str().ok())
      .and_then(|v| v.strip_prefix("Bearer "))
      .map(|v| v.trim().to_string());

    let Some(token) = token else {
      return Box::pin(ready(Err(Error::from_context(
        types::Error::NotAuthenticated,
        Unauthenticated,
      ))));
    };

    let Some(app) = req.app_data::<web::Data<App>>() else {
      #[derive(Debug, Error)]
      #[error("The web app has no available configuration")]
      struct NoConfig;
      return Box::pin(ready(Err(Error::from_context(
        types::Error::Internal,
        NoConfig,
      ))));
    };

    let app = app.clone();
    Box::pin(async move {
      match app.auth.authenticate(app.store.as_ref(), &token).await {
        Ok(user) => Ok(Principal(user)),
        Err(report) if matches!(report.current_context(), AuthError::Internal) => {
          Err(report.into())
        },
        Err(report) => Err(Error::from_report(types::Error::NotAuthenticated, report)),
      }
    })
  }
}
