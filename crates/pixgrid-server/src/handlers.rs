//! Route handlers.
//!
//! Decoding, converting and encoding are CPU-bound, so they run on the
//! blocking pool. The session lock is never held across them: `get`
//! hands back a shared reference to the immutable source image and
//! releases the lock immediately.

use std::sync::Arc;

use axum::Json;
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use pixgrid_export::OutputFormat;
use pixgrid_pipeline::{ConvertParams, Dimensions, RgbaImage};
use serde::Serialize;
use serde_json::{Value, json};

use crate::error::ApiError;
use crate::params::ConvertRequest;
use crate::state::AppState;

/// Multipart field carrying the uploaded image.
pub const IMAGE_FIELD: &str = "image";

/// `Content-Disposition` of `/api/download` responses.
pub const DOWNLOAD_DISPOSITION: &str = "attachment; filename=pixelart.png";

/// Response to `/api/upload`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Id to pass to later convert/download requests.
    pub session_id: String,
    /// Source width in pixels.
    pub width: u32,
    /// Source height in pixels.
    pub height: u32,
    /// The decoded source as a PNG data URL, for previewing.
    pub original: String,
}

/// Response to `/api/convert`.
#[derive(Debug, Serialize)]
pub struct ConvertResponse {
    /// The converted image as a PNG data URL.
    pub image: String,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
}

/// POST /api/upload – Decode an image and open a session for it
pub async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut multipart = multipart.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let mut bytes = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(IMAGE_FIELD) {
            bytes = Some(field.bytes().await?);
            break;
        }
    }
    let bytes = bytes.ok_or_else(|| {
        ApiError::BadRequest(format!("missing multipart field \"{IMAGE_FIELD}\""))
    })?;

    let (image, original) = tokio::task::spawn_blocking(move || {
        let image = pixgrid_pipeline::decode(&bytes)?;
        let original = pixgrid_export::png_data_url(&image)?;
        Ok::<_, ApiError>((image, original))
    })
    .await??;

    let Dimensions { width, height } = Dimensions::of(&image);
    let id = state.store().create(image).await?;
    tracing::info!(session_id = %id, width, height, "session created");

    Ok(Json(UploadResponse {
        session_id: id.into(),
        width,
        height,
        original,
    }))
}

/// POST /api/convert – Convert a session's image and return it inline
pub async fn convert(
    State(state): State<AppState>,
    payload: Result<Json<ConvertRequest>, JsonRejection>,
) -> Result<Json<ConvertResponse>, ApiError> {
    let (image, params) = resolve(&state, payload).await?;

    let (data_url, width, height) = tokio::task::spawn_blocking(move || {
        let output = pixgrid_pipeline::convert(&image, &params)?;
        let data_url = pixgrid_export::png_data_url(&output)?;
        Ok::<_, ApiError>((data_url, output.width(), output.height()))
    })
    .await??;

    Ok(Json(ConvertResponse {
        image: data_url,
        width,
        height,
    }))
}

/// POST /api/download – Convert a session's image and return it as a PNG file
pub async fn download(
    State(state): State<AppState>,
    payload: Result<Json<ConvertRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let (image, params) = resolve(&state, payload).await?;

    let png = tokio::task::spawn_blocking(move || {
        let output = pixgrid_pipeline::convert(&image, &params)?;
        Ok::<_, ApiError>(pixgrid_export::encode_png(&output)?)
    })
    .await??;

    Ok((
        [
            (header::CONTENT_TYPE, OutputFormat::Png.mime_type()),
            (header::CONTENT_DISPOSITION, DOWNLOAD_DISPOSITION),
        ],
        png,
    )
        .into_response())
}

/// GET /health – Liveness and live session count
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "status": "ok", "sessions": state.store().len().await }))
}

/// Look up the session named in a convert/download body and resolve
/// its parameters against the stored image.
async fn resolve(
    state: &AppState,
    payload: Result<Json<ConvertRequest>, JsonRejection>,
) -> Result<(Arc<RgbaImage>, ConvertParams), ApiError> {
    let Json(request) = payload
        .map_err(|e| ApiError::BadRequest(format!("invalid request body: {}", e.body_text())))?;

    let image = state
        .store()
        .get(&request.session_id)
        .await
        .ok_or(ApiError::SessionNotFound)?;
    let params = request.resolve(Dimensions::of(&image), state.limits())?;

    tracing::debug!(
        session_id = %request.session_id,
        size = params.pixel_size,
        scale = params.scale_factor,
        colors = params.color_count,
        "converting"
    );
    Ok((image, params))
}
