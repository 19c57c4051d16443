//! Rows stored by the ledger and the inputs used to write them.

mod customer;
mod payment;
mod user;

pub use self::customer::{Customer, CustomerChanges, NewCustomer};
pub use self::payment::{NewPayment, Payment, PaymentRecord};
pub use self::user::{NewUser, User, UserChanges};
