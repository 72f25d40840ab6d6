use crate::controller::{health_check_controller, oauth_controller};
use crate::AppState;
use axum::{routing::get, Router};
use time::Duration;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

pub fn define_routes(app_state: AppState) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(app_state.manager.redirect_uri().starts_with("https://"))
        .with_expiry(Expiry::OnInactivity(Duration::seconds(
            app_state.config.session_expiry_seconds as i64,
        )));

    Router::new()
        .merge(oauth_routes(app_state.clone()))
        .route("/health", get(health_check_controller::health_check))
        .layer(session_layer)
}

fn oauth_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/oauth2", get(oauth_controller::action))
        .route("/oauth2/providers", get(oauth_controller::providers))
        .with_state(app_state)
}
