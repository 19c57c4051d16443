use serde::Deserialize;
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Deserialize)]
pub struct Logging {
  /// **Environment variables**:
  /// - `TALLY_LOGGING_STYLE`
  ///
  /// There are three styles to choose:
  /// - `compact` - compacts logs but it is readable enough
  /// - `pretty` - makes logs pretty
  /// - `json` - serializes logs into JSON data
  #[serde(default)]
  pub style: LoggingStyle,
  /// Filters logging events with the use of directives, see
  /// [`tracing_subscriber::EnvFilter`]. `RUST_LOG` takes precedence
  /// when it is set.
  ///
  /// **Environment variables**:
  /// - `TALLY_LOGGING_FILTER`
  #[serde(default = "Logging::default_filter")]
  pub filter: String,
}

impl Logging {
  fn default_filter() -> String {
    "info".into()
  }
}

impl Default for Logging {
  fn default() -> Self {
    Self {
      style: LoggingStyle::default(),
      filter: Self::default_filter(),
    }
  }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoggingStyle {
  #[default]
  Compact,
  Pretty,
  JSON,
}

impl Display for LoggingStyle {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Compact => f.write_str("compact"),
      Self::Pretty => f.write_str("pretty"),
      Self::JSON => f.write_str("json"),
    }
  }
}

impl<'de> Deserialize<'de> for LoggingStyle {
  fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
  where
    D: serde::Deserializer<'de>,
  {
    struct Visitor;

    impl serde::de::Visitor<'_> for Visitor {
      type Value = LoggingStyle;

      fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("logging style")
      }

      fn visit_str<E>(self, v: &str) -> std::result::Result<Self::Value, E>
      where
        E: serde::de::Error,
      {
        LoggingStyle::from_str(v).map_err(serde::de::Error::custom)
      }
    }

    deserializer.deserialize_str(Visitor)
  }
}

#[derive(Debug, Error)]
#[error("unknown {0:?} logging style")]
pub struct InvalidLoggingStyle(String);

impl FromStr for LoggingStyle {
  type Err = InvalidLoggingStyle;

  fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
    let s = s.to_lowercase();
    match s.as_str() {
      "compact" => Ok(Self::Compact),
      "pretty" => Ok(Self::Pretty),
      "json" => Ok(Self::JSON),
      _ => Err(InvalidLoggingStyle(s)),
    }
  }
}
