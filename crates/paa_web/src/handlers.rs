use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use paa_core::{check_source_count, parse_questions, ArticleResult, ArticleVariant, Credential, Error, GenerationRequest};
use paa_generation::GenerationState;
use serde::Deserialize;
use serde_json::json;
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateBody {
    #[serde(default)]
    pub api_key: Option<Credential>,
    #[serde(default)]
    pub keyword: String,
    #[serde(default)]
    pub questions: Vec<String>,
    /// Raw textarea content, one question per line.
    #[serde(default)]
    pub questions_text: Option<String>,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub variant: ArticleVariant,
}

#[derive(Debug, Deserialize)]
pub struct ImproveBody {
    #[serde(default)]
    pub api_key: Option<Credential>,
    #[serde(default)]
    pub keyword: String,
}

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<GenerationState> {
    Json(state.generator.state().await)
}

pub async fn get_current_article(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ArticleResult>, ApiError> {
    state
        .generator
        .current_article()
        .await
        .map(Json)
        .ok_or(ApiError::NoArticle)
}

pub async fn generate_article(
    State(state): State<Arc<AppState>>,
    Json(body): Json<GenerateBody>,
) -> Result<Json<ArticleResult>, ApiError> {
    let mut questions = body.questions;
    if let Some(text) = body.questions_text.as_deref() {
        questions.extend(parse_questions(text));
    }
    let request = GenerationRequest {
        keyword: body.keyword,
        questions,
        sources: body.sources,
        variant: body.variant,
    };
    check_source_count(request.non_empty_sources().len())?;

    let credential = state.credential_for(body.api_key);
    let article = state.generator.generate(&credential, request).await?;
    Ok(Json(article))
}

pub async fn improve_article(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ImproveBody>,
) -> Result<Json<ArticleResult>, ApiError> {
    let credential = state.credential_for(body.api_key);
    let article = state.generator.improve(&credential, &body.keyword).await?;
    Ok(Json(article))
}

#[derive(Debug, Clone, Copy)]
enum ExportFormat {
    Html,
    Pdf,
}

pub async fn export_article(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    export_current(&state, ExportFormat::Html).await
}

pub async fn export_article_pdf(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    export_current(&state, ExportFormat::Pdf).await
}

async fn export_current(state: &AppState, format: ExportFormat) -> Result<impl IntoResponse, ApiError> {
    let exporter = state
        .exporter
        .as_ref()
        .ok_or_else(|| ApiError::Core(Error::Storage("Export is not configured".to_string())))?;
    let article = state
        .generator
        .current_article()
        .await
        .ok_or(ApiError::NoArticle)?;

    let path = match format {
        ExportFormat::Html => exporter.export_html(&article.html).await?,
        ExportFormat::Pdf => exporter.export_pdf(&article.html).await?,
    };
    Ok((StatusCode::CREATED, Json(json!({ "path": path.display().to_string() }))))
}
