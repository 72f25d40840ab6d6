use domain::OAuthManager;
use log::*;
use service::config::Config;
use tokio::net::TcpListener;

mod controller;
mod error;
mod extractors;
pub mod router;

pub use error::{Error, Result, WebErrorKind};

// Needs to implement Clone to be able to be passed into Router as State
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub manager: OAuthManager,
}

impl AppState {
    pub fn new(config: Config, manager: OAuthManager) -> Self {
        Self { config, manager }
    }
}

pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let interface = app_state
        .config
        .interface
        .clone()
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let listen_addr = format!("{}:{}", interface, app_state.config.port);

    info!("Server starting... listening for connections on http://{listen_addr}");

    let listener = TcpListener::bind(listen_addr).await?;
    axum::serve(listener, router::define_routes(app_state)).await
}
