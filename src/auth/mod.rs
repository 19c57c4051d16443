//! Issues and checks the bearer tokens protecting the API.

use error_stack::{Report, Result, ResultExt};
use jsonwebtoken::{DecodingKey, EncodingKey};
use std::time::Duration;
use thiserror::Error;

use crate::config;
use crate::database::Store;
use crate::schema::User;
use crate::types::Sensitive;

pub mod password;
mod token;

pub use self::token::{Claims, TokenType};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
  #[error("No active account found with the given credentials")]
  InvalidCredentials,
  #[error("Token is invalid or expired")]
  InvalidToken,
  #[error("Could not process authentication")]
  Internal,
}

#[derive(Debug)]
pub struct TokenPair {
  pub access: Sensitive<String>,
  pub refresh: Sensitive<String>,
}

/// Signs and verifies access and refresh tokens (HS512).
#[derive(Clone)]
pub struct Authenticator {
  encoding: EncodingKey,
  decoding: DecodingKey,
  access_lifetime: Duration,
  refresh_lifetime: Duration,
}

impl std::fmt::Debug for Authenticator {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Authenticator")
      .field("access_lifetime", &self.access_lifetime)
      .field("refresh_lifetime", &self.refresh_lifetime)
      .finish_non_exhaustive()
  }
}

impl Authenticator {
  #[must_use]
  pub fn new(cfg: &config::Auth) -> Self {
    let secret = cfg.jwt_secret.as_str().as_bytes();
    Self {
      encoding: EncodingKey::from_secret(secret),
      decoding: DecodingKey::from_secret(secret),
      access_lifetime: cfg.access_token_lifetime(),
      refresh_lifetime: cfg.refresh_token_lifetime(),
    }
  }

  /// Logs a user in and hands out a fresh access and refresh token.
  #[tracing::instrument(skip_all, name = "auth.issue", fields(%username))]
  pub async fn issue(
    &self,
    store: &dyn Store,
    username: &str,
    password: Sensitive<String>,
  ) -> Result<TokenPair, AuthError> {
    let Some(user) = store
      .find_user_by_username(username)
      .await
      .change_context(AuthError::Internal)?
    else {
      password::verify_dummy(password)
        .await
        .change_context(AuthError::Internal)?;
      return Err(Report::new(AuthError::InvalidCredentials));
    };

    let matches = password::verify(password, user.password_hash.clone())
      .await
      .change_context(AuthError::Internal)?;

    if !matches {
      return Err(Report::new(AuthError::InvalidCredentials));
    }

    let access = self
      .sign(Claims::new(user.id, TokenType::Access, self.access_lifetime))
      .await?;
    let refresh = self
      .sign(Claims::new(user.id, TokenType::Refresh, self.refresh_lifetime))
      .await?;

    tracing::info!(user.id = %user.id, "issued token pair");
    Ok(TokenPair { access, refresh })
  }

  /// Exchanges a refresh token for a new access token.
  #[tracing::instrument(skip_all, name = "auth.refresh")]
  pub async fn refresh(
    &self,
    store: &dyn Store,
    refresh: &str,
  ) -> Result<Sensitive<String>, AuthError> {
    let user = self.verify(store, refresh, TokenType::Refresh).await?;
    self
      .sign(Claims::new(user.id, TokenType::Access, self.access_lifetime))
      .await
  }

  /// Resolves an access token into the user it was issued for.
  #[tracing::instrument(skip_all, name = "auth.authenticate")]
  pub async fn authenticate(&self, store: &dyn Store, access: &str) -> Result<User, AuthError> {
    self.verify(store, access, TokenType::Access).await
  }

  async fn verify(
    &self,
    store: &dyn Store,
    token: &str,
    expected: TokenType,
  ) -> Result<User, AuthError> {
    let claims = token::decode(token, &self.decoding).change_context(AuthError::InvalidToken)?;
    if claims.token_type != expected {
      return Err(
        Report::new(AuthError::InvalidToken)
          .attach_printable(format!("expected {expected:?} token, got {:?}", claims.token_type)),
      );
    }

    // tokens outlive deleted users
    store
      .find_user(claims.sub)
      .await
      .change_context(AuthError::Internal)?
      .ok_or_else(|| Report::new(AuthError::InvalidToken).attach_printable("user no longer exists"))
  }

  async fn sign(&self, claims: Claims) -> Result<Sensitive<String>, AuthError> {
    let key = self.encoding.clone();
    tokio::task::spawn_blocking(move || token::encode(&claims, &key))
      .await
      .change_context(AuthError::Internal)?
      .map(Sensitive::new)
      .change_context(AuthError::Internal)
  }
}
