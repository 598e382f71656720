use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use super::Owner;
use crate::{
    error::AppError,
    models::{CreateInsightRequest, InsightView, MessageResponse},
    services::{excel::summarize, store::InsightEntry},
    AppState,
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/insights", post(create_insight).get(list_insights))
        .route("/insights/:id", delete(delete_insight))
}

#[derive(Debug, Serialize)]
pub struct InsightResponse {
    message: String,
    insight: InsightView,
}

#[derive(Debug, Serialize)]
pub struct InsightListResponse {
    insights: Vec<InsightView>,
}

async fn create_insight(
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
    Json(request): Json<CreateInsightRequest>,
) -> Result<(StatusCode, Json<InsightResponse>), AppError> {
    let start = std::time::Instant::now();
    let file = state.store.get_file(&owner, request.file_id)?;

    let dataset = Arc::clone(&file.dataset);
    let record = tokio::task::spawn_blocking(move || summarize(&dataset)).await?;

    let entry = InsightEntry::new(&owner, file.id, record);
    state.store.save_insight(entry.clone())?;
    tracing::info!("Generated insight {} for file {} in {:?}", entry.id, file.id, start.elapsed());

    Ok((
        StatusCode::CREATED,
        Json(InsightResponse {
            message: "AI insight created successfully".to_string(),
            insight: entry.into(),
        }),
    ))
}

async fn list_insights(
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
) -> Result<Json<InsightListResponse>, AppError> {
    let insights = state
        .store
        .list_insights(&owner)?
        .into_iter()
        .map(InsightView::from)
        .collect();

    Ok(Json(InsightListResponse { insights }))
}

async fn delete_insight(
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    state.store.delete_insight(&owner, id)?;
    Ok(Json(MessageResponse::new("Insight deleted successfully")))
}
