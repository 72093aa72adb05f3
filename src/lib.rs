use std::sync::Arc;

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

pub mod api;
pub mod config;
pub mod db;
pub mod errors;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;
#[cfg(test)]
mod tests;

use crate::config::Config;
use crate::db::SqliteStore;
use crate::middleware::metrics::HitCounter;
use crate::services::auth_service::AuthService;
use crate::services::chirp_service::ChirpService;
use crate::utils::clock::{Clock, SystemClock};

#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub chirps: ChirpService,
    pub config: Arc<Config>,
    pub hits: HitCounter,
}

impl AppState {
    pub fn new(store: SqliteStore, config: Config) -> Self {
        Self::with_clock(store, config, Arc::new(SystemClock))
    }

    pub fn with_clock(store: SqliteStore, config: Config, clock: Arc<dyn Clock>) -> Self {
        let store = Arc::new(store);
        let chirps = ChirpService::new(store.clone(), clock.clone());
        let auth = AuthService::new(
            store.clone(),
            store,
            &config.jwt_secret,
            config.access_token_ttl_secs,
            clock,
        );

        Self {
            auth,
            chirps,
            config: Arc::new(config),
            hits: HitCounter::default(),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    // Create a CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // build our application with routes
    Router::new()
        .route(
            "/api/healthz",
            get(api::admin::readiness).route_layer(from_fn_with_state(
                state.clone(),
                middleware::metrics::count_hits,
            )),
        )
        .route(
            "/api/users",
            post(api::user::create_user).merge(put(api::user::update_user).route_layer(
                from_fn_with_state(state.clone(), middleware::auth::auth_middleware),
            )),
        )
        .route(
            "/api/chirps",
            get(api::chirps::list_chirps).merge(post(api::chirps::create_chirp).route_layer(
                from_fn_with_state(state.clone(), middleware::auth::auth_middleware),
            )),
        )
        .route(
            "/api/chirps/:chirp_id",
            get(api::chirps::get_chirp).merge(delete(api::chirps::delete_chirp).route_layer(
                from_fn_with_state(state.clone(), middleware::auth::auth_middleware),
            )),
        )
        .route("/api/login", post(api::auth::login))
        .route("/api/refresh", post(api::auth::refresh))
        .route("/api/revoke", post(api::auth::revoke))
        .route("/api/polka/webhooks", post(api::webhooks::polka_webhook))
        .route("/admin/metrics", get(api::admin::metrics))
        .route(
            "/admin/reset",
            post(api::admin::reset).route_layer(from_fn_with_state(
                state.clone(),
                middleware::platform::require_dev_platform,
            )),
        )
        .layer(from_fn(middleware::log_responses::log_non_ok_responses))
        .layer(cors)
        .with_state(state)
}
