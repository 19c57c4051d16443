use error_stack::ResultExt;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use std::{str::FromStr, time::Duration};

use crate::config;

mod error;
#[cfg(test)]
pub mod memory;
mod postgres;
mod store;

pub use self::error::*;
pub use self::postgres::PgStore;
pub use self::store::{PageRequest, Paginated, Store};

pub type Transaction<'a> = sqlx::Transaction<'a, sqlx::Postgres>;
pub type PoolConnection = sqlx::pool::PoolConnection<sqlx::Postgres>;

#[derive(Clone)]
pub struct Pool {
  pool: sqlx::PgPool,
}

impl Pool {
  pub async fn new(
    global_cfg: &config::Database,
    pool_cfg: &config::DbPoolConfig,
  ) -> Result<Self> {
    let mut pool_opts = PgPoolOptions::new()
      .acquire_timeout(Duration::from_secs(global_cfg.timeout_secs.get()))
      .max_connections(pool_cfg.pool_size.get());

    if let Some(min_idle) = pool_cfg.min_idle {
      pool_opts = pool_opts.min_connections(min_idle.get());
    }

    let pool = Self {
      pool: pool_opts.connect_lazy_with(connect_options(global_cfg, pool_cfg)?),
    };

    match pool.wait_until_healthy().await {
      Ok(..) => {},
      Err(err) if err.is_unhealthy() => {
        tracing::warn!("database pool is unhealthy, continuing anyway");
      },
      Err(err) => return Err(err),
    }

    Ok(pool)
  }

  #[cfg(test)]
  pub(crate) fn from_pg_pool(pool: sqlx::PgPool) -> Self {
    Self { pool }
  }
}

/// Sessions of a `readonly` pool start every transaction read-only, so
/// writes fail with [`Error::Readonly`].
fn connect_options(
  global_cfg: &config::Database,
  pool_cfg: &config::DbPoolConfig,
) -> Result<PgConnectOptions> {
  let mut opts =
    PgConnectOptions::from_str(pool_cfg.url.as_str()).change_context(Error::InvalidUrl)?;

  if global_cfg.enforce_tls {
    opts = opts.ssl_mode(PgSslMode::Require);
  }
  if pool_cfg.readonly {
    opts = opts.options([("default_transaction_read_only", "on")]);
  }
  Ok(opts)
}

impl std::fmt::Debug for Pool {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    self.pool.fmt(f)
  }
}

impl Pool {
  #[inline]
  pub fn connections(&self) -> u32 {
    self.pool.size()
  }

  /// Opens a connection when no idle one is left. Connections that
  /// cannot be made within `db.timeout_secs` give [`Error::UnhealthyPool`].
  #[tracing::instrument(name = "db.transaction", skip(self), fields(connections = self.connections()))]
  pub async fn begin(&self) -> Result<Transaction<'static>> {
    self.pool.begin().await.into_db_error()
  }

  #[tracing::instrument(name = "db.connect", skip(self), fields(connections = self.connections()))]
  pub async fn get(&self) -> Result<PoolConnection> {
    self.pool.acquire().await.into_db_error()
  }

  #[tracing::instrument(skip(self))]
  pub async fn wait_until_healthy(&self) -> Result<()> {
    self.get().await.map(drop)
  }

  /// Applies the migrations embedded from `migrations/`.
  #[tracing::instrument(name = "db.migrate", skip(self))]
  pub async fn migrate(&self) -> Result<()> {
    sqlx::migrate!()
      .run(&self.pool)
      .await
      .change_context(Error::Migration)
  }
}
