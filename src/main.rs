use domain::{MemoryStore, OAuthManager};
use log::*;
use service::{config::Config, consumers, logging::Logger};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let config = Config::new();
    Logger::init_logger(&config);

    info!("Starting up OAuth manager [{}]", config.redirect_uri());

    let manager = match OAuthManager::from_config(&config, Arc::new(MemoryStore::new())) {
        Ok(manager) => manager,
        Err(e) => {
            error!("Failed to build the OAuth manager: {e}");
            std::process::exit(1);
        }
    };

    if let Some(path) = config.consumers_file() {
        let seeded = match consumers::load(path) {
            Ok(credentials) => manager.seed_consumers(credentials).await,
            Err(e) => {
                error!("Failed to read consumers file {}: {e}", path.display());
                std::process::exit(1);
            }
        };

        match seeded {
            Ok(count) => info!("Loaded credentials for {count} providers"),
            Err(e) => {
                error!("Failed to store consumer credentials: {e}");
                std::process::exit(1);
            }
        }
    }

    if !manager.check_redirect_uri() {
        warn!("Redirect URI must use https and must not point at localhost");
    }

    let app_state = web::AppState::new(config, manager);
    web::init_server(app_state)
        .await
        .expect("Failed to start the HTTP server");
}
