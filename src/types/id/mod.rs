use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgTypeInfo, Postgres};
use std::{
  fmt::{Debug, Display},
  hash::Hash,
  marker::PhantomData,
};

pub mod marker;
mod public;

pub use self::public::{CustomerId, PaymentRef, CUSTOMER_ID_ALPHABET, CUSTOMER_ID_PREFIX};

/// Internal (storage) key of a row, typed by the table it belongs to.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Id<T: marker::Marker> {
  value: i64,
  phantom: PhantomData<T>,
}

impl<T: marker::Marker> Id<T> {
  #[must_use]
  pub const fn new(value: i64) -> Self {
    Self {
      value,
      phantom: PhantomData,
    }
  }

  #[must_use]
  pub const fn get(self) -> i64 {
    self.value
  }
}

impl<T: marker::Marker> Debug for Id<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let type_name = std::any::type_name::<T>();
    let marker = type_name.rsplit("::").next().unwrap_or(type_name);
    write!(f, "Id::<{marker}>({})", self.value)
  }
}

impl<T: marker::Marker> Display for Id<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    Display::fmt(&self.value, f)
  }
}

impl<T: marker::Marker> Hash for Id<T> {
  fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
    self.value.hash(state);
  }
}

impl<T: marker::Marker> Serialize for Id<T> {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_i64(self.value)
  }
}

impl<'de, T: marker::Marker> Deserialize<'de> for Id<T> {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: serde::Deserializer<'de>,
  {
    i64::deserialize(deserializer).map(Self::new)
  }
}

impl<T: marker::Marker> sqlx::Type<Postgres> for Id<T> {
  fn type_info() -> PgTypeInfo {
    <i64 as sqlx::Type<Postgres>>::type_info()
  }

  fn compatible(ty: &PgTypeInfo) -> bool {
    <i64 as sqlx::Type<Postgres>>::compatible(ty)
  }
}

impl<'q, T: marker::Marker> sqlx::Encode<'q, Postgres> for Id<T> {
  fn encode_by_ref(
    &self,
    buf: &mut <Postgres as sqlx::database::HasArguments<'q>>::ArgumentBuffer,
  ) -> sqlx::encode::IsNull {
    <i64 as sqlx::Encode<'q, Postgres>>::encode_by_ref(&self.value, buf)
  }
}

impl<'r, T: marker::Marker> sqlx::Decode<'r, Postgres> for Id<T> {
  fn decode(
    value: <Postgres as sqlx::database::HasValueRef<'r>>::ValueRef,
  ) -> Result<Self, sqlx::error::BoxDynError> {
    <i64 as sqlx::Decode<'r, Postgres>>::decode(value).map(Self::new)
  }
}
