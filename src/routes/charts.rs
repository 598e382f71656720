use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use super::Owner;
use crate::{
    error::AppError,
    models::{ChartPreview, ChartPreviewRequest, ChartView, CreateChartRequest, MessageResponse},
    services::{
        excel::{build_chart_spec, chart_builder::chart_options},
        store::ChartRecord,
    },
    AppState,
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/charts/preview", post(preview_chart))
        .route("/charts", post(create_chart).get(list_charts))
        .route("/charts/:id", get(get_chart).delete(delete_chart))
}

#[derive(Debug, Serialize)]
pub struct ChartPreviewResponse {
    chart: ChartPreview,
}

#[derive(Debug, Serialize)]
pub struct ChartResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    chart: ChartView,
}

#[derive(Debug, Serialize)]
pub struct ChartListResponse {
    charts: Vec<ChartView>,
}

async fn preview_chart(
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
    Json(request): Json<ChartPreviewRequest>,
) -> Result<Json<ChartPreviewResponse>, AppError> {
    let file = state.store.get_file(&owner, request.file_id)?;
    let spec = build_chart_spec(
        &file.dataset,
        &request.x_axis,
        &request.y_axis,
        request.chart_type,
        request.config,
    )?;
    let options = chart_options(
        spec.chart_type,
        request.title.as_deref().unwrap_or_default(),
        Some(spec.x_column.as_str()),
        Some(spec.y_column.as_str()),
    );

    Ok(Json(ChartPreviewResponse {
        chart: ChartPreview { spec, options },
    }))
}

async fn create_chart(
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
    Json(request): Json<CreateChartRequest>,
) -> Result<(StatusCode, Json<ChartResponse>), AppError> {
    let title = request.title.trim();
    if title.is_empty() {
        return Err(AppError::InvalidInput("Chart title is required".to_string()));
    }

    // Payload is rebuilt from the stored dataset, never taken from the client
    let file = state.store.get_file(&owner, request.file_id)?;
    let spec = build_chart_spec(
        &file.dataset,
        &request.x_axis,
        &request.y_axis,
        request.chart_type,
        request.config,
    )?;

    let is_3d = request.is_3d || spec.chart_type.is_3d();
    let record = ChartRecord::new(&owner, file.id, title, spec, is_3d);
    state.store.save_chart(record.clone())?;
    tracing::info!("Saved {} chart {} for file {}", record.spec.chart_type, record.id, file.id);

    Ok((
        StatusCode::CREATED,
        Json(ChartResponse {
            message: Some("Chart created successfully".to_string()),
            chart: record.into(),
        }),
    ))
}

async fn list_charts(
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
) -> Result<Json<ChartListResponse>, AppError> {
    let charts = state
        .store
        .list_charts(&owner)?
        .into_iter()
        .map(ChartView::from)
        .collect();

    Ok(Json(ChartListResponse { charts }))
}

async fn get_chart(
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
    Path(id): Path<Uuid>,
) -> Result<Json<ChartResponse>, AppError> {
    let record = state.store.get_chart(&owner, id)?;
    Ok(Json(ChartResponse {
        message: None,
        chart: record.into(),
    }))
}

async fn delete_chart(
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    state.store.delete_chart(&owner, id)?;
    Ok(Json(MessageResponse::new("Chart deleted successfully")))
}
