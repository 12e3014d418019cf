use log::{error, info, warn};

use expense_bot::bot;
use expense_bot::config::{self, BotConfig};
use expense_bot::storage;

#[tokio::main]
async fn main() {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    let config = match BotConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            // Logging is not up yet.
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    config::init_logging(&config.log_level);

    if dotenv_loaded {
        info!(".env file loaded");
    } else {
        warn!("no .env file found, using the process environment");
    }

    info!("initializing storage...");
    let store = match storage::connect(config.database_url.as_deref(), &config.sqlite_path).await {
        Ok(store) => store,
        Err(e) => {
            error!("storage initialization failed: {e}");
            std::process::exit(1);
        }
    };
    info!("storage backend selected: {}", store.backend_name());

    bot::run_bot(config, store).await;
}
