use actix_web::{
  web::{self, Json, Path, Query},
  HttpRequest, HttpResponse,
};
use thiserror::Error as ThisError;

use crate::{
  http::{
    doc::{ErrorResponse, PaymentPage},
    pagination::{self, PageQuery},
    Error, Principal,
  },
  types::{
    self,
    form::payments::{unknown_customer, CreatePayment, CreatedPaymentResponse, PaymentResponse},
    id::PaymentRef,
  },
  App,
};

#[derive(Debug, ThisError)]
#[error("Payment does not exist")]
struct UnknownPayment;

#[utoipa::path(
  get,
  path = "/dashboard/payment",
  params(("page" = Option<u64>, Query, description = "1-based page number")),
  responses(
    (status = 200, description = "One page of payments, newest first", body = PaymentPage),
    (status = 403, description = "Not authenticated", body = ErrorResponse),
    (status = 404, description = "No such page", body = ErrorResponse)
  ),
  tags = ["Payment"]
)]
#[tracing::instrument(skip_all, name = "http.payments.list")]
pub async fn list(
  _principal: Principal,
  app: web::Data<App>,
  req: HttpRequest,
  query: Query<PageQuery>,
) -> Result<HttpResponse, Error> {
  let page = query.resolve(app.config.pagination.page_size)?;
  let payments = app.store.list_payments(page.request()).await?;
  pagination::respond(&req, page, payments.map(PaymentResponse::from))
}

/// Records a payment and credits it to the customer's balance.
#[utoipa::path(
  post,
  path = "/dashboard/payment",
  request_body = CreatePayment,
  responses(
    (status = 201, description = "Payment recorded", body = CreatedPaymentResponse),
    (status = 400, description = "Invalid form body or unknown customer", body = ErrorResponse),
    (status = 403, description = "Not authenticated", body = ErrorResponse)
  ),
  tags = ["Payment"]
)]
#[tracing::instrument(skip_all, name = "http.payments.create")]
pub async fn create(
  _principal: Principal,
  app: web::Data<App>,
  form: Json<CreatePayment>,
) -> Result<HttpResponse, Error> {
  let payment = form.into_inner().into_new_payment()?;
  let customer = payment.customer.clone();

  let Some(payment) = app.store.create_payment(payment).await? else {
    return Err(unknown_customer(&customer).into());
  };

  tracing::info!(
    payment_ref = %payment.payment_ref,
    customer.id = %customer,
    amount = %payment.amount,
    "recorded payment"
  );
  Ok(HttpResponse::Created().json(CreatedPaymentResponse::new(payment, customer)))
}

#[utoipa::path(
  get,
  path = "/dashboard/payment/{payment_ref}",
  params(("payment_ref" = String, Path, description = "Payment reference, a UUID")),
  responses(
    (status = 200, body = PaymentResponse),
    (status = 403, description = "Not authenticated", body = ErrorResponse),
    (status = 404, description = "Unknown payment", body = ErrorResponse)
  ),
  tags = ["Payment"]
)]
#[tracing::instrument(skip_all, name = "http.payments.retrieve")]
pub async fn retrieve(
  _principal: Principal,
  app: web::Data<App>,
  path: Path<String>,
) -> Result<HttpResponse, Error> {
  let not_found = || Error::from_context(types::Error::NotFound, UnknownPayment);

  let payment_ref = path
    .into_inner()
    .parse::<PaymentRef>()
    .map_err(|_| not_found())?;

  let payment = app
    .store
    .find_payment(payment_ref)
    .await?
    .ok_or_else(not_found)?;

  Ok(HttpResponse::Ok().json(PaymentResponse::from(payment)))
}
