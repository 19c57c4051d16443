use actix_web::{
  web::{self, Json, Path, Query},
  HttpRequest, HttpResponse,
};
use thiserror::Error as ThisError;

use crate::{
  http::{
    doc::{CustomerPage, ErrorResponse, PaymentPage},
    pagination::{self, PageQuery},
    Error, Principal,
  },
  schema::CustomerChanges,
  types::{
    self,
    form::{
      customers::{CustomerForm, CustomerResponse, PatchCustomer},
      payments::PaymentResponse,
    },
    id::CustomerId,
  },
  App,
};

#[derive(Debug, ThisError)]
#[error("Customer does not exist")]
struct UnknownCustomer;

fn unknown_customer(id: &CustomerId) -> Error {
  Error::from_report(
    types::Error::NotFound,
    error_stack::Report::new(UnknownCustomer).attach_printable(format!("customer_id: {id}")),
  )
}

#[utoipa::path(
  get,
  path = "/dashboard/customer",
  params(("page" = Option<u64>, Query, description = "1-based page number")),
  responses(
    (status = 200, description = "One page of customers", body = CustomerPage),
    (status = 403, description = "Not authenticated", body = ErrorResponse),
    (status = 404, description = "No such page", body = ErrorResponse)
  ),
  tags = ["Customer"]
)]
#[tracing::instrument(skip_all, name = "http.customers.list")]
pub async fn list(
  _principal: Principal,
  app: web::Data<App>,
  req: HttpRequest,
  query: Query<PageQuery>,
) -> Result<HttpResponse, Error> {
  let page = query.resolve(app.config.pagination.page_size)?;
  let customers = app.store.list_customers(page.request()).await?;
  pagination::respond(&req, page, customers.map(CustomerResponse::from))
}

#[utoipa::path(
  post,
  path = "/dashboard/customer",
  request_body = CustomerForm,
  responses(
    (status = 201, description = "Customer created with a zero balance", body = CustomerResponse),
    (status = 400, description = "Invalid form body", body = ErrorResponse),
    (status = 403, description = "Not authenticated", body = ErrorResponse)
  ),
  tags = ["Customer"]
)]
#[tracing::instrument(skip_all, name = "http.customers.create")]
pub async fn create(
  _principal: Principal,
  app: web::Data<App>,
  form: Json<CustomerForm>,
) -> Result<HttpResponse, Error> {
  let customer = form.into_inner().into_new_customer()?;
  let customer = app.store.create_customer(customer).await?;

  tracing::info!(customer.id = %customer.customer_id, "created customer");
  Ok(HttpResponse::Created().json(CustomerResponse::from(customer)))
}

#[utoipa::path(
  get,
  path = "/dashboard/customer/{customer_id}",
  params(("customer_id" = String, Path, description = "Public customer id")),
  responses(
    (status = 200, body = CustomerResponse),
    (status = 403, description = "Not authenticated", body = ErrorResponse),
    (status = 404, description = "Unknown customer", body = ErrorResponse)
  ),
  tags = ["Customer"]
)]
#[tracing::instrument(skip_all, name = "http.customers.retrieve")]
pub async fn retrieve(
  _principal: Principal,
  app: web::Data<App>,
  path: Path<String>,
) -> Result<HttpResponse, Error> {
  let id = CustomerId::new(path.into_inner());
  let customer = app
    .store
    .find_customer(&id)
    .await?
    .ok_or_else(|| unknown_customer(&id))?;

  Ok(HttpResponse::Ok().json(CustomerResponse::from(customer)))
}

#[utoipa::path(
  put,
  path = "/dashboard/customer/{customer_id}",
  params(("customer_id" = String, Path, description = "Public customer id")),
  request_body = CustomerForm,
  responses(
    (status = 200, body = CustomerResponse),
    (status = 400, description = "Invalid form body", body = ErrorResponse),
    (status = 403, description = "Not authenticated", body = ErrorResponse),
    (status = 404, description = "Unknown customer", body = ErrorResponse)
  ),
  tags = ["Customer"]
)]
#[tracing::instrument(skip_all, name = "http.customers.replace")]
pub async fn replace(
  _principal: Principal,
  app: web::Data<App>,
  path: Path<String>,
  form: Json<CustomerForm>,
) -> Result<HttpResponse, Error> {
  let changes = CustomerChanges::from(form.into_inner().into_new_customer()?);
  update_with(&app, path.into_inner(), changes).await
}

#[utoipa::path(
  patch,
  path = "/dashboard/customer/{customer_id}",
  params(("customer_id" = String, Path, description = "Public customer id")),
  request_body = PatchCustomer,
  responses(
    (status = 200, body = CustomerResponse),
    (status = 400, description = "Invalid form body", body = ErrorResponse),
    (status = 403, description = "Not authenticated", body = ErrorResponse),
    (status = 404, description = "Unknown customer", body = ErrorResponse)
  ),
  tags = ["Customer"]
)]
#[tracing::instrument(skip_all, name = "http.customers.update")]
pub async fn update(
  _principal: Principal,
  app: web::Data<App>,
  path: Path<String>,
  form: Json<PatchCustomer>,
) -> Result<HttpResponse, Error> {
  let changes = form.into_inner().into_changes()?;
  update_with(&app, path.into_inner(), changes).await
}

async fn update_with(app: &App, id: String, changes: CustomerChanges) -> Result<HttpResponse, Error> {
  let id = CustomerId::new(id);
  let customer = if changes.is_empty() {
    app.store.find_customer(&id).await?
  } else {
    app.store.update_customer(&id, changes).await?
  };
  let customer = customer.ok_or_else(|| unknown_customer(&id))?;
  Ok(HttpResponse::Ok().json(CustomerResponse::from(customer)))
}

#[utoipa::path(
  delete,
  path = "/dashboard/customer/{customer_id}",
  params(("customer_id" = String, Path, description = "Public customer id")),
  responses(
    (status = 204, description = "Customer deleted, its payments are kept"),
    (status = 403, description = "Not authenticated", body = ErrorResponse),
    (status = 404, description = "Unknown customer", body = ErrorResponse)
  ),
  tags = ["Customer"]
)]
#[tracing::instrument(skip_all, name = "http.customers.delete")]
pub async fn delete(
  _principal: Principal,
  app: web::Data<App>,
  path: Path<String>,
) -> Result<HttpResponse, Error> {
  let id = CustomerId::new(path.into_inner());
  if !app.store.delete_customer(&id).await? {
    return Err(unknown_customer(&id));
  }

  tracing::info!(customer.id = %id, "deleted customer");
  Ok(HttpResponse::NoContent().finish())
}

/// Payments of one customer, newest first. Unknown customers simply
/// have no payments.
#[utoipa::path(
  get,
  path = "/dashboard/customer/{customer_id}/payment",
  params(
    ("customer_id" = String, Path, description = "Public customer id"),
    ("page" = Option<u64>, Query, description = "1-based page number")
  ),
  responses(
    (status = 200, description = "One page of the customer's payments", body = PaymentPage),
    (status = 403, description = "Not authenticated", body = ErrorResponse),
    (status = 404, description = "No such page", body = ErrorResponse)
  ),
  tags = ["Customer Payment"]
)]
#[tracing::instrument(skip_all, name = "http.customers.payments")]
pub async fn payments(
  _principal: Principal,
  app: web::Data<App>,
  req: HttpRequest,
  path: Path<String>,
  query: Query<PageQuery>,
) -> Result<HttpResponse, Error> {
  let id = CustomerId::new(path.into_inner());
  let page = query.resolve(app.config.pagination.page_size)?;
  let payments = app
    .store
    .list_customer_payments(&id, page.request())
    .await?;
  pagination::respond(&req, page, payments.map(PaymentResponse::from))
}
