use sqlx::PgConnection;

use super::{count, limit_offset};
use crate::database::{ErrorExt, ErrorExt2, PageRequest, Paginated, Result};
use crate::schema::{Customer, CustomerChanges, NewCustomer};
use crate::types::id::CustomerId;

/// Public ids are random, a collision gets a new one this many times.
const MAX_ID_ATTEMPTS: u32 = 3;

#[tracing::instrument(skip_all, name = "query.customers.list")]
pub(super) async fn list(
  conn: &mut PgConnection,
  page: PageRequest,
) -> Result<Paginated<Customer>> {
  let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM customers")
    .fetch_one(&mut *conn)
    .await
    .into_db_error()?;

  let (limit, offset) = limit_offset(page);
  let items = sqlx::query_as::<_, Customer>(
    r"SELECT id, customer_id, name, email, address, balance FROM customers
      ORDER BY id
      LIMIT $1 OFFSET $2",
  )
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

#[tracing::instrument(skip_all, name = "query.customers.insert")]
pub(super) async fn insert(conn: &mut PgConnection, customer: &NewCustomer) -> Result<Customer> {
  let mut attempt = 1;
  loop {
    let customer_id = CustomerId::generate();
    let result = sqlx::query_as::<_, Customer>(
      r"INSERT INTO customers (customer_id, name, email, address)
        VALUES ($1, $2, $3, $4)
        RETURNING id, customer_id, name, email, address, balance",
    )
    .bind(&customer_id)
    .bind(&customer.name)
    .bind(&customer.email)
    .bind(&customer.address)
    .fetch_one(&mut *conn)
    .await
    .into_db_error();

    match result {
      Err(error) if error.unique_violation() == Some("customer_id") && attempt < MAX_ID_ATTEMPTS => {
        tracing::warn!(%customer_id, attempt, "generated customer id is taken, retrying");
        attempt += 1;
      },
      result => return result,
    }
  }
}

#[tracing::instrument(skip_all, name = "query.customers.find")]
pub(super) async fn find(conn: &mut PgConnection, id: &CustomerId) -> Result<Option<Customer>> {
  sqlx::query_as::<_, Customer>(
    "SELECT id, customer_id, name, email, address, balance FROM customers WHERE customer_id = $1",
  )
  .bind(id)
  .fetch_optional(conn)
  .await
  .into_db_error()
}

#[tracing::instrument(skip_all, name = "query.customers.update")]
pub(super) async fn update(
  conn: &mut PgConnection,
  id: &CustomerId,
  changes: &CustomerChanges,
) -> Result<Option<Customer>> {
  sqlx::query_as::<_, Customer>(
    r"UPDATE customers SET
        name = COALESCE($2, name),
        email = COALESCE($3, email),
        address = COALESCE($4, address)
      WHERE customer_id = $1
      RETURNING id, customer_id, name, email, address, balance",
  )
  .bind(id)
  .bind(changes.name.as_deref())
  .bind(changes.email.as_deref())
  .bind(changes.address.as_deref())
  .fetch_optional(conn)
  .await
  .into_db_error()
}

#[tracing::instrument(skip_all, name = "query.customers.delete")]
pub(super) async fn delete(conn: &mut PgConnection, id: &CustomerId) -> Result<bool> {
  let result = sqlx::query("DELETE FROM customers WHERE customer_id = $1")
    .bind(id)
    .execute(conn)
    .await
    .into_db_error()?;
  Ok(result.rows_affected() > 0)
}
