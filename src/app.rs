use error_stack::{Result, ResultExt};
use std::sync::Arc;
use thiserror::Error;

use crate::{
  auth::Authenticator,
  config,
  database::{PgStore, Store},
};

/// Shared state of every request handler.
#[derive(Clone)]
pub struct App {
  pub config: Arc<config::Server>,
  pub store: Arc<dyn Store>,
  pub auth: Authenticator,
}

#[derive(Debug, Error)]
#[error("Failed to initialize App struct")]
pub struct AppError;

impl App {
  #[tracing::instrument(skip_all, name = "app.init")]
  pub async fn new(cfg: config::Server) -> Result<Self, AppError> {
    let store = PgStore::connect(&cfg.db).await.change_context(AppError)?;
    if cfg.db.run_migrations {
      store
        .migrate()
        .await
        .change_context(AppError)
        .attach_printable("could not run database migrations")?;
      tracing::info!("database migrations are up to date");
    }
    Ok(Self::with_store(cfg, Arc::new(store)))
  }

  #[must_use]
  pub fn with_store(cfg: config::Server, store: Arc<dyn Store>) -> Self {
    let auth = Authenticator::new(&cfg.auth);
    Self {
      config: Arc::new(cfg),
      store,
      auth,
    }
  }

  #[cfg(test)]
  pub(crate) fn for_tests() -> Self {
    Self::with_store(
      config::Server::for_tests(),
      Arc::new(crate::database::memory::MemoryStore::new()),
    )
  }
}

impl std::fmt::Debug for App {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("App")
      .field("config", &self.config)
      .field("auth", &self.auth)
      .finish_non_exhaustive()
  }
}
