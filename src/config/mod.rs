use thiserror::Error;

mod auth;
mod database;
mod http;
mod logging;
mod server;

pub use self::auth::Auth;
pub use self::database::{Database, DbPoolConfig};
pub use self::http::{Http, Pagination};
pub use self::logging::{Logging, LoggingStyle};
pub use self::server::Server;

#[derive(Debug, Error)]
#[error("Failed to load configuration")]
pub struct ParseError;
