use async_trait::async_trait;
use error_stack::{Result, ResultExt};

use super::{Error, ErrorExt, ErrorExt2, PageRequest, Paginated, Pool, PoolConnection, Store};
use crate::config;
use crate::schema::{
  Customer, CustomerChanges, NewCustomer, NewPayment, NewUser, Payment, PaymentRecord, User,
  UserChanges,
};
use crate::types::id::{marker::UserMarker, CustomerId, Id, PaymentRef};

mod customers;
mod payments;
mod users;

/// [`Store`] backed by Postgres: a writable primary pool and an
/// optional read replica.
#[derive(Debug, Clone)]
pub struct PgStore {
  primary: Pool,
  replica: Option<Pool>,
}

impl PgStore {
  #[tracing::instrument(skip_all, name = "db.connect_store")]
  pub async fn connect(cfg: &config::Database) -> Result<Self, Error> {
    let primary = Pool::new(cfg, &cfg.primary).await?;
    let replica = match cfg.replica.as_ref() {
      Some(replica) => Some(
        Pool::new(cfg, replica)
          .await
          .attach_printable("while connecting to the replica database")?,
      ),
      None => None,
    };
    Ok(Self { primary, replica })
  }

  #[cfg(test)]
  pub(crate) fn from_pool(primary: Pool) -> Self {
    Self {
      primary,
      replica: None,
    }
  }

  pub async fn migrate(&self) -> Result<(), Error> {
    self.primary.migrate().await
  }

  #[tracing::instrument(skip_all)]
  async fn db_write(&self) -> Result<PoolConnection, Error> {
    self.primary.get().await
  }

  #[tracing::instrument(skip_all)]
  async fn db_read(&self) -> Result<PoolConnection, Error> {
    if let Some(replica) = self.replica.as_ref() {
      match replica.get().await {
        Ok(conn) => return Ok(conn),
        // fallback
        Err(err) if err.is_unhealthy() => {
          tracing::warn!("replica database is unhealthy, reading from primary");
        },
        Err(err) => return Err(err),
      }
    }
    self.primary.get().await
  }
}

#[async_trait]
impl Store for PgStore {
  async fn create_user(&self, user: NewUser) -> Result<User, Error> {
    users::insert(&mut *self.db_write().await?, &user).await
  }

  async fn find_user(&self, id: Id<UserMarker>) -> Result<Option<User>, Error> {
    users::find(&mut *self.db_read().await?, id).await
  }

  async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, Error> {
    users::find_by_username(&mut *self.db_read().await?, username).await
  }

  async fn username_taken(
    &self,
    username: &str,
    except: Option<Id<UserMarker>>,
  ) -> Result<bool, Error> {
    users::is_username_taken(&mut *self.db_read().await?, username, except).await
  }

  async fn email_taken(&self, email: &str, except: Option<Id<UserMarker>>) -> Result<bool, Error> {
    users::is_email_taken(&mut *self.db_read().await?, email, except).await
  }

  async fn update_user(
    &self,
    id: Id<UserMarker>,
    changes: UserChanges,
  ) -> Result<Option<User>, Error> {
    users::update(&mut *self.db_write().await?, id, &changes).await
  }

  async fn delete_user(&self, id: Id<UserMarker>) -> Result<bool, Error> {
    users::delete(&mut *self.db_write().await?, id).await
  }

  async fn list_customers(&self, page: PageRequest) -> Result<Paginated<Customer>, Error> {
    customers::list(&mut *self.db_read().await?, page).await
  }

  async fn create_customer(&self, customer: NewCustomer) -> Result<Customer, Error> {
    customers::insert(&mut *self.db_write().await?, &customer).await
  }

  async fn find_customer(&self, id: &CustomerId) -> Result<Option<Customer>, Error> {
    customers::find(&mut *self.db_read().await?, id).await
  }

  async fn update_customer(
    &self,
    id: &CustomerId,
    changes: CustomerChanges,
  ) -> Result<Option<Customer>, Error> {
    customers::update(&mut *self.db_write().await?, id, &changes).await
  }

  async fn delete_customer(&self, id: &CustomerId) -> Result<bool, Error> {
    customers::delete(&mut *self.db_write().await?, id).await
  }

  async fn list_payments(&self, page: PageRequest) -> Result<Paginated<PaymentRecord>, Error> {
    payments::list(&mut *self.db_read().await?, None, page).await
  }

  async fn list_customer_payments(
    &self,
    customer: &CustomerId,
    page: PageRequest,
  ) -> Result<Paginated<PaymentRecord>, Error> {
    payments::list(&mut *self.db_read().await?, Some(customer), page).await
  }

  async fn create_payment(&self, payment: NewPayment) -> Result<Option<Payment>, Error> {
    let mut tx = self.primary.begin().await?;
    let Some(created) = payments::insert(&mut *tx, &payment).await? else {
      return Ok(None);
    };
    if let Some(customer) = created.customer_id {
      payments::apply_to_balance(&mut *tx, customer, created.amount).await?;
    }
    tx.commit().await.into_db_error()?;
    Ok(Some(created))
  }

  async fn find_payment(&self, payment_ref: PaymentRef) -> Result<Option<PaymentRecord>, Error> {
    payments::find(&mut *self.db_read().await?, payment_ref).await
  }
}

/// Converts listing bounds into `LIMIT`/`OFFSET` parameters.
fn limit_offset(page: PageRequest) -> (i64, i64) {
  let limit = i64::try_from(page.limit).unwrap_or(i64::MAX);
  let offset = i64::try_from(page.offset).unwrap_or(i64::MAX);
  (limit, offset)
}

fn count(value: i64) -> u64 {
  u64::try_from(value).unwrap_or_default()
}
