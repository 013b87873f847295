use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod error;
pub mod handlers;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/search_articles", post(handlers::search_articles))
        .route("/analyze_article", post(handlers::analyze_article))
        .route("/generate_final_analysis", post(handlers::generate_final_analysis))
        .route("/stock_suggestions", get(handlers::stock_suggestions))
        .route("/status", get(handlers::status))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::new(state))
}

pub mod prelude {
    pub use sl_core::{AnalyzedArticle, Article, Error, Result};
    pub use crate::{create_app, ApiError, AppState};
}
