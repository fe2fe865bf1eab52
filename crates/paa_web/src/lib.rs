use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use paa_core::{Error, Result};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod error;
pub mod handlers;
pub mod state;

pub use state::AppState;

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/state", get(handlers::get_state))
        .route("/api/articles/current", get(handlers::get_current_article))
        .route("/api/articles/generate", post(handlers::generate_article))
        .route("/api/articles/improve", post(handlers::improve_article))
        .route("/api/articles/export", post(handlers::export_article))
        .route("/api/articles/export/pdf", post(handlers::export_article_pdf))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::new(state))
}

pub async fn serve(state: AppState, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("🚀 Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, create_app(state))
        .await
        .map_err(Error::Io)
}

pub mod prelude {
    pub use paa_core::{Error, Result};
    pub use crate::AppState;
}
