use actix_web::HttpServer;
use error_stack::{Result, ResultExt};
use tally::{config, App};
use thiserror::Error;
use tracing_actix_web::TracingLogger;

#[derive(Debug, Error)]
#[error("Failed to run the server")]
struct ServerError;

#[tokio::main]
async fn main() -> Result<(), ServerError> {
  let config = config::Server::load().change_context(ServerError)?;
  tally::logging::init(&config.logging).change_context(ServerError)?;

  let http = config.http.clone();
  let app = App::new(config).await.change_context(ServerError)?;

  let mut server = HttpServer::new(move || {
    tally::http::build(app.clone()).wrap(TracingLogger::default())
  });
  if let Some(workers) = http.workers {
    server = server.workers(workers.get());
  }

  tracing::info!(ip = %http.ip, port = http.port, "starting HTTP server");
  server
    .bind((http.ip, http.port))
    .change_context(ServerError)
    .attach_printable_lazy(|| format!("could not bind to {}:{}", http.ip, http.port))?
    .run()
    .await
    .change_context(ServerError)
}
