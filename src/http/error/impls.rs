use actix_web::{body::BoxBody, http::StatusCode, HttpResponse};
use error_stack::Report;

use super::Error;
use crate::auth::{password::PasswordError, AuthError};
use crate::database::{self, ErrorExt2};
use crate::types::Error as ErrorType;

impl actix_web::ResponseError for Error {
  fn status_code(&self) -> StatusCode {
    match self.error_type {
      ErrorType::Internal => StatusCode::INTERNAL_SERVER_ERROR,
      ErrorType::ReadonlyMode => StatusCode::SERVICE_UNAVAILABLE,
      ErrorType::NotAuthenticated => StatusCode::FORBIDDEN,
      ErrorType::InvalidCredentials | ErrorType::InvalidToken => StatusCode::UNAUTHORIZED,
      ErrorType::InvalidFormBody(..) => StatusCode::BAD_REQUEST,
      ErrorType::NotFound => StatusCode::NOT_FOUND,
      ErrorType::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
    }
  }

  fn error_response(&self) -> HttpResponse<BoxBody> {
    let status = self.status_code();
    if status.is_server_error() {
      tracing::error!("{self}");
    }
    HttpResponse::build(status).json(&self.error_type)
  }
}

impl From<Report<database::Error>> for Error {
  fn from(value: Report<database::Error>) -> Self {
    if value.is_readonly() {
      Error::from_report(ErrorType::ReadonlyMode, value)
    } else {
      Error::from_report(ErrorType::Internal, value)
    }
  }
}

impl From<Report<AuthError>> for Error {
  fn from(value: Report<AuthError>) -> Self {
    let error_type = match value.current_context() {
      AuthError::InvalidCredentials => ErrorType::InvalidCredentials,
      AuthError::InvalidToken => ErrorType::InvalidToken,
      AuthError::Internal => ErrorType::Internal,
    };
    Error::from_report(error_type, value)
  }
}

impl From<Report<PasswordError>> for Error {
  fn from(value: Report<PasswordError>) -> Self {
    Error::from_report(ErrorType::Internal, value)
  }
}

impl From<validator::ValidateError> for Error {
  fn from(value: validator::ValidateError) -> Self {
    #[derive(Debug, thiserror::Error)]
    #[error("Validation error occurred")]
    struct ValidateError;
    Error::from_context(ErrorType::InvalidFormBody(value), ValidateError)
  }
}
