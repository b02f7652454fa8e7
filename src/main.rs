use log::error;
use std::process::exit;

#[tokio::main]
async fn main() {
    env_logger::init();
    if let Err(err) = stash::run().await {
        error!("server exited: {}", err);
        exit(1);
    }
}
