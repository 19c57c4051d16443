use error_stack::{Report, ResultExt};
use serde::Deserialize;
use validator::{Validate, ValidateError};

use super::{Auth, Database, Http, Logging, Pagination, ParseError};
use crate::util::{figment::FigmentErrorAttachable, validator::IntoValidatorReport};

#[derive(Debug, Deserialize)]
pub struct Server {
  pub db: Database,
  pub auth: Auth,
  #[serde(default)]
  pub http: Http,
  #[serde(default)]
  pub pagination: Pagination,
  #[serde(default)]
  pub logging: Logging,
}

impl Server {
  pub fn load() -> error_stack::Result<Self, ParseError> {
    dotenvy::dotenv().ok();

    let config = Self::figment()
      .extract::<Self>()
      .map_err(|e| Report::new(ParseError).attach_figment_error(e))?;

    config
      .validate()
      .into_validator_report()
      .change_context(ParseError)?;

    Ok(config)
  }

  #[cfg(test)]
  pub(crate) fn for_tests() -> Self {
    Self {
      db: Database {
        primary: super::DbPoolConfig::for_tests("postgres://localhost/tally"),
        replica: None,
        enforce_tls: false,
        timeout_secs: std::num::NonZeroU64::MIN,
        run_migrations: false,
      },
      auth: Auth::for_tests(),
      http: Http::default(),
      pagination: Pagination::default(),
      logging: Logging::default(),
    }
  }
}

impl Validate for Server {
  fn validate(&self) -> Result<(), ValidateError> {
    let mut fields = ValidateError::field_builder();
    fields.check("db", self.db.validate());
    fields.check("auth", self.auth.validate());
    fields.build().into_result()
  }
}

impl Server {
  const DEFAULT_CONFIG_FILE: &'static str = "tally.toml";

  /// Creates the [`Figment`](figment::Figment) used to load the server
  /// configuration: `tally.toml`, then `DATABASE_URL`, then `TALLY_*`
  /// environment variables.
  pub(crate) fn figment() -> figment::Figment {
    use figment::{
      providers::{Env, Format, Toml},
      Figment,
    };

    Figment::new()
      .merge(Toml::file(Self::DEFAULT_CONFIG_FILE))
      .merge(
        Env::raw()
          .only(&["DATABASE_URL"])
          .map(|_| "db.primary.url".into()),
      )
      .merge(Env::prefixed("TALLY_").map(|v| env_key(v.as_str()).into()))
  }
}

/// Maps a `TALLY_` variable (prefix already stripped) to its config
/// key. Field names contain underscores so only the section parts are
/// split off: `DB_PRIMARY_POOL_SIZE` becomes `db.primary.pool_size`.
fn env_key(key: &str) -> String {
  let key = key.to_ascii_lowercase();
  for pool in ["primary", "replica"] {
    if let Some(field) = key.strip_prefix(&format!("db_{pool}_")) {
      return format!("db.{pool}.{field}");
    }
  }
  match key.split_once('_') {
    Some((section, field)) => format!("{section}.{field}"),
    None => key,
  }
}
