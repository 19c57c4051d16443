//! In-memory [`Store`] for exercising the HTTP layer without Postgres.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Mutex, MutexGuard};

use super::{Error, PageRequest, Paginated, Result, Store};
use crate::schema::{
  Customer, CustomerChanges, NewCustomer, NewPayment, NewUser, Payment, PaymentRecord, User,
  UserChanges,
};
use crate::types::id::{marker::UserMarker, CustomerId, Id, PaymentRef};

#[derive(Debug, Default)]
pub struct MemoryStore {
  state: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
  next_id: i64,
  users: Vec<User>,
  customers: Vec<Customer>,
  payments: Vec<Payment>,
}

impl State {
  fn next_id(&mut self) -> i64 {
    self.next_id += 1;
    self.next_id
  }

  fn record(&self, payment: &Payment) -> PaymentRecord {
    let customer = payment
      .customer_id
      .and_then(|id| self.customers.iter().find(|c| c.id == id).cloned());
    PaymentRecord {
      payment: payment.clone(),
      customer,
    }
  }

  fn taken(&self, except: Option<Id<UserMarker>>, f: impl Fn(&User) -> bool) -> bool {
    self
      .users
      .iter()
      .any(|user| Some(user.id) != except && f(user))
  }
}

fn paginate<T: Clone>(items: &[T], page: PageRequest) -> Paginated<T> {
  let offset = usize::try_from(page.offset).unwrap_or(usize::MAX);
  let limit = usize::try_from(page.limit).unwrap_or(usize::MAX);
  Paginated {
    count: items.len() as u64,
    items: items.iter().skip(offset).take(limit).cloned().collect(),
  }
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  fn state(&self) -> MutexGuard<'_, State> {
    // a poisoned lock only means another test panicked
    self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
  }
}

#[async_trait]
impl Store for MemoryStore {
  async fn create_user(&self, user: NewUser) -> Result<User> {
    let mut state = self.state();
    if state.taken(None, |u| u.username == user.username) {
      return Err(Error::UniqueViolation("username").into());
    }
    if state.taken(None, |u| u.email == user.email) {
      return Err(Error::UniqueViolation("email").into());
    }
    let user = User {
      id: Id::new(state.next_id()),
      username: user.username,
      email: user.email,
      password_hash: user.password_hash,
      created_at: Utc::now(),
    };
    state.users.push(user.clone());
    Ok(user)
  }

  async fn find_user(&self, id: Id<UserMarker>) -> Result<Option<User>> {
    Ok(self.state().users.iter().find(|u| u.id == id).cloned())
  }

  async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
    Ok(
      self
        .state()
        .users
        .iter()
        .find(|u| u.username == username)
        .cloned(),
    )
  }

  async fn username_taken(&self, username: &str, except: Option<Id<UserMarker>>) -> Result<bool> {
    Ok(self.state().taken(except, |u| u.username == username))
  }

  async fn email_taken(&self, email: &str, except: Option<Id<UserMarker>>) -> Result<bool> {
    Ok(self.state().taken(except, |u| u.email == email))
  }

  async fn update_user(&self, id: Id<UserMarker>, changes: UserChanges) -> Result<Option<User>> {
    let mut state = self.state();
    let Some(user) = state.users.iter_mut().find(|u| u.id == id) else {
      return Ok(None);
    };
    if let Some(username) = changes.username {
      user.username = username;
    }
    if let Some(email) = changes.email {
      user.email = email;
    }
    if let Some(password_hash) = changes.password_hash {
      user.password_hash = password_hash;
    }
    Ok(Some(user.clone()))
  }

  async fn delete_user(&self, id: Id<UserMarker>) -> Result<bool> {
    let mut state = self.state();
    let before = state.users.len();
    state.users.retain(|u| u.id != id);
    Ok(state.users.len() != before)
  }

  async fn list_customers(&self, page: PageRequest) -> Result<Paginated<Customer>> {
    Ok(paginate(&self.state().customers, page))
  }

  async fn create_customer(&self, customer: NewCustomer) -> Result<Customer> {
    let mut state = self.state();
    let customer_id = loop {
      let id = CustomerId::generate();
      if !state.customers.iter().any(|c| c.customer_id == id) {
        break id;
      }
    };
    let customer = Customer {
      id: Id::new(state.next_id()),
      customer_id,
      name: customer.name,
      email: customer.email,
      address: customer.address,
      balance: rust_decimal::Decimal::ZERO,
    };
    state.customers.push(customer.clone());
    Ok(customer)
  }

  async fn find_customer(&self, id: &CustomerId) -> Result<Option<Customer>> {
    Ok(
      self
        .state()
        .customers
        .iter()
        .find(|c| &c.customer_id == id)
        .cloned(),
    )
  }

  async fn update_customer(
    &self,
    id: &CustomerId,
    changes: CustomerChanges,
  ) -> Result<Option<Customer>> {
    let mut state = self.state();
    let Some(customer) = state.customers.iter_mut().find(|c| &c.customer_id == id) else {
      return Ok(None);
    };
    if let Some(name) = changes.name {
      customer.name = name;
    }
    if let Some(email) = changes.email {
      customer.email = email;
    }
    if let Some(address) = changes.address {
      customer.address = address;
    }
    Ok(Some(customer.clone()))
  }

  async fn delete_customer(&self, id: &CustomerId) -> Result<bool> {
    let mut state = self.state();
    let Some(index) = state.customers.iter().position(|c| &c.customer_id == id) else {
      return Ok(false);
    };
    let removed = state.customers.remove(index);
    for payment in &mut state.payments {
      if payment.customer_id == Some(removed.id) {
        payment.customer_id = None;
      }
    }
    Ok(true)
  }

  async fn list_payments(&self, page: PageRequest) -> Result<Paginated<PaymentRecord>> {
    let state = self.state();
    let records = state
      .payments
      .iter()
      .rev()
      .map(|p| state.record(p))
      .collect::<Vec<_>>();
    Ok(paginate(&records, page))
  }

  async fn list_customer_payments(
    &self,
    customer: &CustomerId,
    page: PageRequest,
  ) -> Result<Paginated<PaymentRecord>> {
    let state = self.state();
    let records = state
      .payments
      .iter()
      .rev()
      .map(|p| state.record(p))
      .filter(|r| r.customer.as_ref().is_some_and(|c| &c.customer_id == customer))
      .collect::<Vec<_>>();
    Ok(paginate(&records, page))
  }

  async fn create_payment(&self, payment: NewPayment) -> Result<Option<Payment>> {
    let mut state = self.state();
    let id = Id::new(state.next_id());
    let Some(customer) = state
      .customers
      .iter_mut()
      .find(|c| c.customer_id == payment.customer)
    else {
      return Ok(None);
    };

    customer.balance += payment.amount;
    let payment = Payment {
      id,
      payment_ref: PaymentRef::generate(),
      customer_id: Some(customer.id),
      amount: payment.amount,
      created: Utc::now(),
    };
    state.payments.push(payment.clone());
    Ok(Some(payment))
  }

  async fn find_payment(&self, payment_ref: PaymentRef) -> Result<Option<PaymentRecord>> {
    let state = self.state();
    Ok(
      state
        .payments
        .iter()
        .find(|p| p.payment_ref == payment_ref)
        .map(|p| state.record(p)),
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal::Decimal;
  use std::sync::Arc;

  const FIRST_PAGE: PageRequest = PageRequest {
    offset: 0,
    limit: 10,
  };

  async fn customer(store: &MemoryStore) -> Customer {
    store
      .create_customer(NewCustomer {
        name: "test".into(),
        email: "test@test.com".into(),
        address: "123 test address".into(),
      })
      .await
      .unwrap()
  }

  #[tokio::test]
  async fn concurrent_payments_are_not_lost() {
    let store = Arc::new(MemoryStore::new());
    let customer = customer(&store).await;

    let tasks = (0..50).map(|_| {
      let store = store.clone();
      let customer = customer.customer_id.clone();
      tokio::spawn(async move {
        store
          .create_payment(NewPayment {
            customer,
            amount: Decimal::new(1050, 2),
          })
          .await
      })
    });
    for result in futures::future::join_all(tasks).await {
      result.unwrap().unwrap().unwrap();
    }

    let customer = store.find_customer(&customer.customer_id).await.unwrap().unwrap();
    assert_eq!(customer.balance, Decimal::new(52500, 2));
    assert_eq!(store.list_payments(FIRST_PAGE).await.unwrap().count, 50);
  }

  #[tokio::test]
  async fn lists_payments_newest_first() {
    let store = MemoryStore::new();
    let customer = customer(&store).await;
    for amount in [1, 2, 3] {
      store
        .create_payment(NewPayment {
          customer: customer.customer_id.clone(),
          amount: Decimal::from(amount),
        })
        .await
        .unwrap();
    }

    let page = store
      .list_payments(PageRequest {
        offset: 1,
        limit: 1,
      })
      .await
      .unwrap();
    assert_eq!(page.count, 3);
    assert_eq!(page.items[0].payment.amount, Decimal::from(2));
  }
}
