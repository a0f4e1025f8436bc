pub mod page;
pub mod watch;

use std::sync::Arc;

use log::info;

use crate::config::Config;
use crate::db::Database;
use crate::handlers;

pub use page::run_page;
pub use watch::run_watch;

/// Opens the store and serves the listing endpoint until shutdown.
pub async fn run_serve(config: &Config) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    info!("Opening voter store at {}", config.database_url);
    let database = Arc::new(Database::connect(&config.database_url).await?);
    handlers::serve(database, config.port).await
}
