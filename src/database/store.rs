use async_trait::async_trait;

use super::Result;
use crate::schema::{
  Customer, CustomerChanges, NewCustomer, NewPayment, NewUser, Payment, PaymentRecord, User,
  UserChanges,
};
use crate::types::id::{marker::UserMarker, CustomerId, Id, PaymentRef};

/// Slice of a listing to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
  pub offset: u64,
  pub limit: u64,
}

/// One page of a listing plus the total amount of rows in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paginated<T> {
  pub count: u64,
  pub items: Vec<T>,
}

impl<T> Paginated<T> {
  pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
    Paginated {
      count: self.count,
      items: self.items.into_iter().map(f).collect(),
    }
  }
}

/// Persistence of users, customers and payments.
///
/// Listings are ordered the same way in every implementation:
/// users by username, customers by their internal key and payments
/// newest first.
#[async_trait]
pub trait Store: Send + Sync + 'static {
  async fn create_user(&self, user: NewUser) -> Result<User>;
  async fn find_user(&self, id: Id<UserMarker>) -> Result<Option<User>>;
  async fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;
  /// Whether a user other than `except` already uses `username`.
  async fn username_taken(&self, username: &str, except: Option<Id<UserMarker>>)
    -> Result<bool>;
  /// Whether a user other than `except` already uses `email`.
  async fn email_taken(&self, email: &str, except: Option<Id<UserMarker>>) -> Result<bool>;
  async fn update_user(&self, id: Id<UserMarker>, changes: UserChanges) -> Result<Option<User>>;
  async fn delete_user(&self, id: Id<UserMarker>) -> Result<bool>;

  async fn list_customers(&self, page: PageRequest) -> Result<Paginated<Customer>>;
  /// Creates a customer under a freshly generated public id.
  async fn create_customer(&self, customer: NewCustomer) -> Result<Customer>;
  async fn find_customer(&self, id: &CustomerId) -> Result<Option<Customer>>;
  async fn update_customer(
    &self,
    id: &CustomerId,
    changes: CustomerChanges,
  ) -> Result<Option<Customer>>;
  /// Deletes a customer. Its payments are kept and lose their customer.
  async fn delete_customer(&self, id: &CustomerId) -> Result<bool>;

  async fn list_payments(&self, page: PageRequest) -> Result<Paginated<PaymentRecord>>;
  /// Payments of one customer. An unknown customer has no payments.
  async fn list_customer_payments(
    &self,
    customer: &CustomerId,
    page: PageRequest,
  ) -> Result<Paginated<PaymentRecord>>;
  /// Records a payment and adds its amount to the customer's balance
  /// as one atomic step. Returns `None` if the customer does not exist.
  async fn create_payment(&self, payment: NewPayment) -> Result<Option<Payment>>;
  async fn find_payment(&self, payment_ref: PaymentRef) -> Result<Option<PaymentRecord>>;
}
