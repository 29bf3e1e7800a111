pub mod config;
pub mod crud;
pub mod db;
pub mod entities;
pub mod error;
pub mod models;
pub mod routes;

use std::sync::Arc;

use axum::{Router, routing::get};
use sea_orm::DatabaseConnection;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: DatabaseConnection,
}

impl AppState {
    /// Opens the configured database and makes sure its schema exists.
    pub async fn connect(config: Config) -> error::AppResult<Arc<Self>> {
        let db = db::connect_and_migrate(&config.database_url, config.db_max_connections).await?;
        Ok(Arc::new(Self { config: Arc::new(config), db }))
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/movies", get(routes::list_movies).post(routes::create_movie))
        .route("/movie/{movie_id}", get(routes::read_movie).delete(routes::delete_movie))
        .with_state(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any).allow_methods(Any))
        .layer(TraceLayer::new_for_http())
}
