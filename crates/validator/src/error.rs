use indexmap::IndexMap;
use serde::{de::IgnoredAny, ser::SerializeMap, Serialize};
use std::borrow::Cow;

const MESSAGES_KEY: &str = "_errors";

pub struct MessageBuilder(Vec<Cow<'static, str>>);

impl MessageBuilder {
  #[must_use]
  pub const fn new() -> Self {
    Self(Vec::new())
  }

  pub fn insert(&mut self, message: impl Into<Cow<'static, str>>) -> &mut Self {
    self.0.push(message.into());
    self
  }

  #[must_use]
  pub fn build(self) -> ValidateError {
    ValidateError::Messages(self.0)
  }
}

pub struct FieldBuilder(IndexMap<Cow<'static, str>, ValidateError>);

#[allow(clippy::new_without_default)]
impl FieldBuilder {
  #[must_use]
  pub fn new() -> Self {
    Self(IndexMap::new())
  }

  /// Empty errors are skipped so callers can insert unconditionally.
  pub fn insert(
    &mut self,
    key: impl Into<Cow<'static, str>>,
    value: ValidateError,
  ) -> &mut Self {
    if !value.is_empty() {
      self.0.insert(key.into(), value);
    }
    self
  }

  pub fn insert_message(
    &mut self,
    key: impl Into<Cow<'static, str>>,
    message: impl Into<Cow<'static, str>>,
  ) -> &mut Self {
    let key = key.into();
    match self.0.get_mut(&key) {
      Some(ValidateError::Messages(messages)) => messages.push(message.into()),
      _ => {
        self.0.insert(key, ValidateError::message(message));
      },
    }
    self
  }

  /// Records the error of a field check when it failed.
  pub fn check(
    &mut self,
    key: impl Into<Cow<'static, str>>,
    result: Result<(), ValidateError>,
  ) -> &mut Self {
    if let Err(error) = result {
      self.insert(key, error);
    }
    self
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  #[must_use]
  pub fn build(self) -> ValidateError {
    ValidateError::Fields(self.0)
  }
}

// ---------------------------------------------------- //

#[derive(PartialEq, Eq)]
pub enum ValidateError {
  Fields(IndexMap<Cow<'static, str>, ValidateError>),
  Messages(Vec<Cow<'static, str>>),
}

impl std::fmt::Display for ValidateError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str("Invalid data occurred")
  }
}

impl std::error::Error for ValidateError {}

impl std::fmt::Debug for ValidateError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      ValidateError::Fields(n) => n.fmt(f),
      ValidateError::Messages(n) => f.debug_map().entry(&MESSAGES_KEY, &n).finish(),
    }
  }
}

impl ValidateError {
  #[must_use]
  pub fn field_builder() -> FieldBuilder {
    FieldBuilder::new()
  }

  #[must_use]
  pub fn msg_builder() -> MessageBuilder {
    MessageBuilder::new()
  }

  #[must_use]
  pub fn message(message: impl Into<Cow<'static, str>>) -> Self {
    Self::Messages(vec![message.into()])
  }

  /// Shorthand for an error with a single message on a single field.
  #[must_use]
  pub fn field(
    key: impl Into<Cow<'static, str>>,
    message: impl Into<Cow<'static, str>>,
  ) -> Self {
    let mut fields = FieldBuilder::new();
    fields.insert_message(key, message);
    fields.build()
  }
}

impl ValidateError {
  #[must_use]
  pub fn is_empty(&self) -> bool {
    match self {
      ValidateError::Fields(n) => n.is_empty(),
      ValidateError::Messages(n) => n.is_empty(),
    }
  }

  /// Looks up the error recorded for `key` if this is a field error.
  #[must_use]
  pub fn get(&self, key: &str) -> Option<&ValidateError> {
    match self {
      ValidateError::Fields(n) => n.get(key),
      ValidateError::Messages(..) => None,
    }
  }

  /// Messages attached directly to this error.
  #[must_use]
  pub fn messages(&self) -> &[Cow<'static, str>] {
    match self {
      ValidateError::Messages(n) => n,
      ValidateError::Fields(..) => &[],
    }
  }

  pub fn into_result(self) -> Result<(), Self> {
    if self.is_empty() {
      Ok(())
    } else {
      Err(self)
    }
  }
}

impl<'de> serde::Deserialize<'de> for ValidateError {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: serde::Deserializer<'de>,
  {
    struct Visitor;

    impl<'de> serde::de::Visitor<'de> for Visitor {
      type Value = ValidateError;

      fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ValidateError type")
      }

      fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
      where
        A: serde::de::MapAccess<'de>,
      {
        let mut fields = IndexMap::new();
        let mut messages = None;

        while let Some(key) = map.next_key::<String>()? {
          if key == MESSAGES_KEY {
            if messages.is_some() {
              return Err(serde::de::Error::duplicate_field(MESSAGES_KEY));
            }
            messages = Some(map.next_value::<Vec<Cow<'static, str>>>()?);
          } else if messages.is_none() {
            fields.insert(Cow::Owned(key), map.next_value()?);
          } else {
            map.next_value::<IgnoredAny>()?;
          }
        }

        if let Some(messages) = messages {
          Ok(ValidateError::Messages(messages))
        } else if !fields.is_empty() {
          Ok(ValidateError::Fields(fields))
        } else {
          Err(serde::de::Error::custom("error fields must not be empty"))
        }
      }
    }

    deserializer.deserialize_map(Visitor)
  }
}

impl Serialize for ValidateError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    match self {
      ValidateError::Fields(n) => {
        let mut map = serializer.serialize_map(Some(n.len()))?;
        for (key, value) in n {
          map.serialize_entry(key, value)?;
        }
        map.end()
      },
      ValidateError::Messages(n) => {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(MESSAGES_KEY, &n)?;
        map.end()
      },
    }
  }
}
