use actix_web::{
  error::{JsonPayloadError, QueryPayloadError},
  HttpRequest,
};
use error_stack::Report;
use thiserror::Error as ThisError;
use validator::ValidateError;

use super::{Error, Principal};
use crate::types;

#[derive(Debug, ThisError)]
#[error("Could not parse JSON body")]
struct InvalidJson;

/// Turns body parsing failures into the usual `InvalidFormBody` error.
pub fn json_error_handler(error: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
  let message = match &error {
    JsonPayloadError::ContentType => "Unsupported media type, expected application/json.".into(),
    JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
      "Request body is too large.".into()
    },
    other => format!("JSON parse error - {other}"),
  };
  let report = Report::new(InvalidJson).attach_printable(error.to_string());
  Error::from_report(
    types::Error::InvalidFormBody(ValidateError::message(message)),
    report,
  )
  .into()
}

#[derive(Debug, ThisError)]
#[error("Could not parse query string")]
struct InvalidQuery;

/// Same as [`json_error_handler`] for the query string.
pub fn query_error_handler(error: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
  let message = format!("Invalid query string - {error}");
  let report = Report::new(InvalidQuery).attach_printable(error.to_string());
  Error::from_report(
    types::Error::InvalidFormBody(ValidateError::message(message)),
    report,
  )
  .into()
}

#[derive(Debug, ThisError)]
#[error("Method is not allowed on this resource")]
struct MethodNotAllowed;

pub async fn method_not_allowed() -> Result<&'static str, Error> {
  Err(Error::from_context(
    types::Error::MethodNotAllowed,
    MethodNotAllowed,
  ))
}

/// [`method_not_allowed`] for resources behind authentication, which
/// answer `403` first when the caller is not signed in.
pub async fn method_not_allowed_for(_principal: Principal) -> Result<&'static str, Error> {
  method_not_allowed().await
}

#[derive(Debug, ThisError)]
#[error("No route matched the request")]
struct NoRoute;

pub async fn not_found() -> Result<&'static str, Error> {
  Err(Error::from_context(types::Error::NotFound, NoRoute))
}
