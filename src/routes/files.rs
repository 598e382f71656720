use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use super::Owner;
use crate::{
    config::Config,
    error::AppError,
    models::{ColumnAnalysis, FileDetail, FileSummary, MessageResponse},
    services::{
        excel::{
            chart_builder::{scene_points, ScenePoint},
            read_first_sheet,
            suggestions::suggest_from_profiles,
            utils::has_allowed_extension,
            ChartStyle, ChartSuggestion,
        },
        store::FileRecord,
    },
    AppState,
};

// Room for multipart boundaries and part headers around the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn routes(config: &Config) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/files/upload",
            post(upload_file).layer(DefaultBodyLimit::max(config.max_file_size + MULTIPART_OVERHEAD)),
        )
        .route("/files", get(list_files))
        .route("/files/:id", get(get_file).delete(delete_file))
        .route("/files/:id/columns", get(get_columns))
        .route("/files/:id/suggestions", get(get_suggestions))
        .route("/files/:id/scene", get(get_scene))
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    message: String,
    file: FileSummary,
}

#[derive(Debug, Serialize)]
pub struct FileListResponse {
    files: Vec<FileSummary>,
}

#[derive(Debug, Serialize)]
pub struct FileResponse {
    file: FileDetail,
}

#[derive(Debug, Serialize)]
pub struct ColumnsResponse {
    columns: Vec<ColumnAnalysis>,
}

#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    suggestions: Vec<ChartSuggestion>,
}

#[derive(Debug, Serialize)]
pub struct SceneResponse {
    points: Vec<ScenePoint>,
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::FileTooLarge(err.body_text())
    } else {
        AppError::InvalidInput(format!("Malformed upload: {}", err.body_text()))
    }
}

async fn read_file_field(multipart: &mut Multipart) -> Result<(String, Bytes), AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::InvalidInput("Uploaded file has no name".to_string()))?;
        let data = field.bytes().await.map_err(multipart_error)?;
        return Ok((file_name, data));
    }

    Err(AppError::InvalidInput("No file uploaded".to_string()))
}

async fn upload_file(
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    let start = std::time::Instant::now();

    let (file_name, file_data) = read_file_field(&mut multipart).await?;
    tracing::info!(
        "Upload from {}: {}, size: {}KB",
        owner,
        file_name,
        file_data.len() / 1024
    );

    if !has_allowed_extension(&file_name) {
        tracing::warn!("Rejected upload with unsupported type: {}", file_name);
        return Err(AppError::UnsupportedFileType(
            "Only Excel files (.xls, .xlsx) are allowed".to_string(),
        ));
    }

    if file_data.len() > state.config.max_file_size {
        tracing::warn!("Rejected upload of {} bytes", file_data.len());
        return Err(AppError::FileTooLarge(format!(
            "File size must be less than {}MB",
            state.config.max_file_size / (1024 * 1024)
        )));
    }

    let size = file_data.len();
    let dataset = tokio::task::spawn_blocking(move || read_first_sheet(file_data)).await??;

    let record = FileRecord::new(&owner, &file_name, size, dataset);
    state.store.save_file(record.clone())?;

    let profiles = state.profiles.get_or_profile(record.id, &record.dataset);
    let mut summary = FileSummary::from(&record);
    summary.columns = Some(profiles.iter().map(ColumnAnalysis::from).collect());

    tracing::info!("Upload {} processed in {:?}", record.id, start.elapsed());

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            message: "File uploaded and parsed successfully".to_string(),
            file: summary,
        }),
    ))
}

async fn list_files(
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
) -> Result<Json<FileListResponse>, AppError> {
    let files = state
        .store
        .list_files(&owner)?
        .iter()
        .map(FileSummary::from)
        .collect();

    Ok(Json(FileListResponse { files }))
}

async fn get_file(
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
    Path(id): Path<Uuid>,
) -> Result<Json<FileResponse>, AppError> {
    let record = state.store.get_file(&owner, id)?;
    Ok(Json(FileResponse {
        file: FileDetail::from(&record),
    }))
}

async fn delete_file(
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    state.store.delete_file(&owner, id)?;
    state.profiles.invalidate(&id);
    Ok(Json(MessageResponse::new("File deleted successfully")))
}

async fn get_columns(
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
    Path(id): Path<Uuid>,
) -> Result<Json<ColumnsResponse>, AppError> {
    let record = state.store.get_file(&owner, id)?;
    let profiles = state.profiles.get_or_profile(id, &record.dataset);

    Ok(Json(ColumnsResponse {
        columns: profiles.iter().map(ColumnAnalysis::from).collect(),
    }))
}

async fn get_suggestions(
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
    Path(id): Path<Uuid>,
) -> Result<Json<SuggestionsResponse>, AppError> {
    let record = state.store.get_file(&owner, id)?;
    let profiles = state.profiles.get_or_profile(id, &record.dataset);

    Ok(Json(SuggestionsResponse {
        suggestions: suggest_from_profiles(&profiles),
    }))
}

async fn get_scene(
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
    Path(id): Path<Uuid>,
) -> Result<Json<SceneResponse>, AppError> {
    let record = state.store.get_file(&owner, id)?;
    let points = scene_points(
        &record.dataset,
        state.config.scene_point_limit,
        &ChartStyle::default(),
    );

    Ok(Json(SceneResponse { points }))
}
