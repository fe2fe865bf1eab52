use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use paa_core::Error;
use serde_json::json;
use tracing::error;

pub const NO_ARTICLE: &str = "no article has been generated yet";

pub enum ApiError {
    Core(Error),
    NoArticle,
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError::Core(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NoArticle => StatusCode::NOT_FOUND,
            ApiError::Core(Error::Validation(_)) => StatusCode::BAD_REQUEST,
            ApiError::Core(Error::NothingToImprove | Error::Busy) => StatusCode::CONFLICT,
            ApiError::Core(e) if e.is_upstream() => StatusCode::BAD_GATEWAY,
            ApiError::Core(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ApiError::NoArticle => NO_ARTICLE.to_string(),
            ApiError::Core(e) => e.user_message(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();
        if status.is_server_error() {
            error!("{} {}", status, message);
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}
