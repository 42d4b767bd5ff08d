//! Binary entry point.

use backend::logging;
use backend::server::{self, AppConfig};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load();
    logging::init(&config.log_dir, &config.log_filter, config.debug)?;
    server::run(config).await?;
    Ok(())
}
