use rust_decimal::Decimal;
use sqlx::PgConnection;

use super::{count, limit_offset};
use crate::database::{ErrorExt, PageRequest, Paginated, Result};
use crate::schema::{NewPayment, Payment, PaymentRecord};
use crate::types::id::{marker::CustomerMarker, CustomerId, Id, PaymentRef};

/// Selects payments joined with their (possibly deleted) customer,
/// in the column layout `PaymentRecord` reads.
macro_rules! select_payment_records {
  ($($tail:literal)*) => {
    concat!(
      "SELECT p.id, p.payment_ref, p.customer_id, p.amount, p.created, ",
      "c.id AS customer_pk, c.customer_id AS customer_public_id, c.name AS customer_name, ",
      "c.email AS customer_email, c.address AS customer_address, c.balance AS customer_balance ",
      "FROM payments p LEFT JOIN customers c ON c.id = p.customer_id ",
      $($tail),*
    )
  };
}

#[tracing::instrument(skip_all, name = "query.payments.list")]
pub(super) async fn list(
  conn: &mut PgConnection,
  customer: Option<&CustomerId>,
  page: PageRequest,
) -> Result<Paginated<PaymentRecord>> {
  let total = sqlx::query_scalar::<_, i64>(
    r"SELECT COUNT(*) FROM payments p LEFT JOIN customers c ON c.id = p.customer_id
      WHERE $1::VARCHAR IS NULL OR c.customer_id = $1",
  )
  .bind(customer)
  .fetch_one(&mut *conn)
  .await
  .into_db_error()?;

  let (limit, offset) = limit_offset(page);
  let items = sqlx::query_as::<_, PaymentRecord>(select_payment_records!(
    "WHERE $1::VARCHAR IS NULL OR c.customer_id = $1 "
    "ORDER BY p.created DESC, p.id DESC "
    "LIMIT $2 OFFSET $3"
  ))
  .bind(customer)
  .bind(limit)
  .bind(offset)
  .fetch_all(&mut *conn)
  .await
  .into_db_error()?;

  Ok(Paginated {
    count: count(total),
    items,
  })
}

#[tracing::instrument(skip_all, name = "query.payments.find")]
pub(super) async fn find(
  conn: &mut PgConnection,
  payment_ref: PaymentRef,
) -> Result<Option<PaymentRecord>> {
  sqlx::query_as::<_, PaymentRecord>(select_payment_records!("WHERE p.payment_ref = $1"))
    .bind(payment_ref)
    .fetch_optional(conn)
    .await
    .into_db_error()
}

/// Inserts the payment if its customer exists. The customer row gets
/// a `KEY SHARE` lock, so it cannot be deleted before the balance is
/// updated in the same transaction.
#[tracing::instrument(skip_all, name = "query.payments.insert")]
pub(super) async fn insert(conn: &mut PgConnection, payment: &NewPayment) -> Result<Option<Payment>> {
  sqlx::query_as::<_, Payment>(
    r"INSERT INTO payments (customer_id, amount)
      SELECT id, $2 FROM customers WHERE customer_id = $1
      RETURNING id, payment_ref, customer_id, amount, created",
  )
  .bind(&payment.customer)
  .bind(payment.amount)
  .fetch_optional(conn)
  .await
  .into_db_error()
}

/// Adds a recorded payment to its customer's balance. The increment
/// happens in SQL so concurrent payments serialise on the row lock
/// instead of overwriting each other.
#[tracing::instrument(skip_all, name = "query.customers.apply_payment")]
pub(super) async fn apply_to_balance(
  conn: &mut PgConnection,
  customer: Id<CustomerMarker>,
  amount: Decimal,
) -> Result<()> {
  sqlx::query("UPDATE customers SET balance = balance + $2 WHERE id = $1")
    .bind(customer)
    .bind(amount)
    .execute(conn)
    .await
    .into_db_error()?;
  Ok(())
}
