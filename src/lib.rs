pub mod config;
pub mod error;
pub mod proto;
pub mod registry;
pub mod server;
pub mod state;
pub mod store;

pub use error::Error;

pub type Result<T> = std::result::Result<T, Error>;

use config::Config;
use server::Server;

/// Build the server from the environment and serve until ctrl-c.
pub async fn run() -> Result<()> {
    // Config: collect ENV
    let config = Config::new();
    // Server: registry + store behind the shared lock, plus the listener
    let server = Server::new(config);
    // Shutdown: ctrl-c cancels the accept loop and every worker
    let shutdown = server.shutdown_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            shutdown.cancel();
        }
    });
    // Serve
    server.serve().await
}
