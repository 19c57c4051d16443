use actix_web::{
  dev::{ServiceFactory, ServiceRequest, ServiceResponse},
  middleware::NormalizePath,
  web,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::App;

pub mod actor;
pub mod controllers;
pub mod doc;
pub mod error;
pub mod pagination;
pub mod util;

pub use actor::Principal;
pub use error::{Error, Result};

/// Assembles the HTTP application: every route of the API plus its
/// OpenAPI document, trailing slashes ignored and unknown paths
/// answered with a JSON `404`.
pub fn build(
  app: App,
) -> actix_web::App<
  impl ServiceFactory<
    ServiceRequest,
    Config = (),
    Response = ServiceResponse,
    Error = actix_web::Error,
    InitError = (),
  >,
> {
  actix_web::App::new()
    .app_data(web::Data::new(app))
    .wrap(NormalizePath::trim())
    .configure(controllers::configure)
    .service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", doc::ApiDoc::openapi()))
    .default_service(web::to(util::not_found))
}
