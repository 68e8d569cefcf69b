pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::auth::handlers as auth;
use crate::recommendations::handlers as recommendations;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/register", post(auth::handle_register))
        .route("/api/login", post(auth::handle_login))
        .route(
            "/api/recommendations",
            post(recommendations::handle_recommendations),
        )
        .route("/api/colleges", get(recommendations::handle_list_colleges))
        .with_state(state)
}
