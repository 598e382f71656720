use axum::{http::Method, Router};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use services::{
    profile_cache::ProfileCache,
    store::{MemoryStore, RecordStore},
};

// Application state
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn RecordStore>,
    pub profiles: ProfileCache,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self::with_store(config, Arc::new(MemoryStore::new()))
    }

    pub fn with_store(config: Config, store: Arc<dyn RecordStore>) -> Self {
        let profiles = ProfileCache::new(config.profile_cache_capacity);
        Self {
            config,
            store,
            profiles,
        }
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    Router::new()
        .merge(routes::routes())
        .merge(routes::files::routes(&state.config))
        .merge(routes::charts::routes())
        .merge(routes::insights::routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
