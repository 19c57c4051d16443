use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use crate::types::id::{marker::UserMarker, Id};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
  Access,
  Refresh,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Claims {
  pub sub: Id<UserMarker>,
  pub token_type: TokenType,
  pub iat: i64,
  pub exp: i64,
  /// Unique per token, two tokens issued within the same second
  /// still differ.
  pub jti: Uuid,
}

impl Claims {
  #[must_use]
  pub fn new(sub: Id<UserMarker>, token_type: TokenType, lifetime: Duration) -> Self {
    let iat = Utc::now().timestamp();
    let lifetime = i64::try_from(lifetime.as_secs()).unwrap_or(i64::MAX);
    Self {
      sub,
      token_type,
      iat,
      exp: iat.saturating_add(lifetime),
      jti: Uuid::new_v4(),
    }
  }
}

pub(super) fn encode(claims: &Claims, key: &EncodingKey) -> jsonwebtoken::errors::Result<String> {
  let header = Header::new(Algorithm::HS512);
  jsonwebtoken::encode(&header, claims, key)
}

pub(super) fn decode(token: &str, key: &DecodingKey) -> jsonwebtoken::errors::Result<Claims> {
  let mut validation = Validation::new(Algorithm::HS512);
  validation.leeway = 0;
  jsonwebtoken::decode::<Claims>(token, key, &validation).map(|data| data.claims)
}
