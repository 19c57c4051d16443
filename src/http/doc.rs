//! OpenAPI document of the ledger API, served at `/api-docs/openapi.json`
//! and browsable through Swagger UI under `/docs/`.

use serde_json::Value;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

use super::controllers::{customers, payments, users};
use crate::types::form::customers::CustomerResponse;
use crate::types::form::payments::PaymentResponse;

pub const BEARER_SCHEME: &str = "bearer";

/// Adds the JWT bearer scheme every `/dashboard` and `/user/profile`
/// route expects.
struct SecurityAddon;

impl Modify for SecurityAddon {
  fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
    let components = openapi
      .components
      .get_or_insert_with(utoipa::openapi::Components::default);

    let mut scheme = Http::new(HttpAuthScheme::Bearer);
    scheme.bearer_format = Some("JWT".into());
    scheme.description = Some("Access token issued by POST /user/login.".into());
    components.add_security_scheme(BEARER_SCHEME, SecurityScheme::Http(scheme));
  }
}

/// Error envelope of every failed request.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct ErrorResponse {
  /// 1 internal, 2 read-only, 3 not authenticated, 4 invalid credentials,
  /// 5 invalid token, 6 invalid form body, 7 not found, 8 method not allowed.
  #[schema(example = 6)]
  code: u32,
  #[schema(example = "Invalid form body")]
  message: String,
  /// Field errors of a form body, as `{"field": {"_errors": [..]}}`.
  #[schema(value_type = Option<Object>)]
  data: Option<Value>,
}

/// One page of customers.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct CustomerPage {
  count: u64,
  next: Option<String>,
  previous: Option<String>,
  results: Vec<CustomerResponse>,
}

/// One page of payments.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct PaymentPage {
  count: u64,
  next: Option<String>,
  previous: Option<String>,
  results: Vec<PaymentResponse>,
}

#[derive(OpenApi)]
#[openapi(
  modifiers(&SecurityAddon),
  info(
    title = "Tally API",
    description = "Customers, the payments recorded against them and their running balance."
  ),
  security(("bearer" = [])),
  paths(
    customers::list,
    customers::create,
    customers::retrieve,
    customers::replace,
    customers::update,
    customers::delete,
    customers::payments,
    payments::list,
    payments::create,
    payments::retrieve,
    users::signup::signup,
    users::login::login,
    users::refresh::refresh,
    users::profile::profile,
    users::profile::update_profile,
    users::profile::delete_profile
  ),
  components(schemas(ErrorResponse, CustomerPage, PaymentPage)),
  tags(
    (name = "Customer", description = "Customer records and their balance"),
    (name = "Payment", description = "Payments credited to customers"),
    (name = "Customer Payment", description = "Payments of one customer"),
    (name = "User Authentication", description = "Signup, login and token refresh"),
    (name = "Profile", description = "The signed-in user's account")
  )
)]
pub struct ApiDoc;
