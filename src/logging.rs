use error_stack::{Result, ResultExt};
use thiserror::Error;
use tracing::Subscriber;
use tracing_error::ErrorLayer;
use tracing_subscriber::{layer::SubscriberExt, registry::LookupSpan, EnvFilter, Layer};

use crate::config::{self, LoggingStyle};

#[derive(Debug, Error)]
#[error("Failed to initialize logging")]
pub struct LoggingInitError;

/// Installs the global subscriber. `RUST_LOG` wins over the configured
/// filter when set.
pub fn init(cfg: &config::Logging) -> Result<(), LoggingInitError> {
  let targets = std::env::var("RUST_LOG").unwrap_or_else(|_| cfg.filter.clone());
  let registry = tracing_subscriber::Registry::default()
    .with(console_layer(&cfg.style, &targets))
    .with(ErrorLayer::default());

  tracing::subscriber::set_global_default(registry)
    .change_context(LoggingInitError)
    .attach_printable("already initialized logging")
}

fn console_layer<S>(style: &LoggingStyle, targets: &str) -> Box<dyn Layer<S> + Send + Sync>
where
  S: Subscriber + for<'a> LookupSpan<'a>,
{
  let layer = tracing_subscriber::fmt::layer();
  match style {
    LoggingStyle::Compact => layer.compact().with_filter(make_env_filter(targets)).boxed(),
    LoggingStyle::Pretty => layer.pretty().with_filter(make_env_filter(targets)).boxed(),
    LoggingStyle::JSON => layer
      .json()
      .flatten_event(true)
      .with_filter(make_env_filter(targets))
      .boxed(),
  }
}

fn make_env_filter(targets: &str) -> EnvFilter {
  EnvFilter::builder()
    .with_default_directive(tracing::level_filters::LevelFilter::INFO.into())
    .parse_lossy(targets)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn filter_falls_back_to_info() {
    use tracing::level_filters::LevelFilter;

    assert_eq!(make_env_filter("").max_level_hint(), Some(LevelFilter::INFO));
    assert_eq!(
      make_env_filter("tally=debug").max_level_hint(),
      Some(LevelFilter::DEBUG)
    );
  }
}
