use axum::{
    body::Body,
    extract::{Multipart, Request, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tower::ServiceExt;
use tower_http::services::ServeFile;

use super::extract::AppPath;
use crate::{
    error::{AppError, AppResult},
    state::AppState,
    types::UploadResponse,
};

struct UploadedPart {
    file_name: Option<String>,
    content_type: Option<String>,
    data: axum::body::Bytes,
}

/// `POST /uploads/image`, multipart form with a required `file` part.
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    let mut upload: Option<UploadedPart> = None;

    // Only the first `file` part is read; later parts are never buffered.
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue; // ignore unknown fields
        }
        let file_name = field.file_name().map(str::to_owned);
        let content_type = field.content_type().map(str::to_owned);
        let data = field.bytes().await?;
        upload = Some(UploadedPart { file_name, content_type, data });
        break;
    }

    let Some(part) = upload else {
        state.metrics.inc_upload_rejected();
        return Err(AppError::invalid_field("file", "Missing required 'file' field"));
    };

    let stored = state
        .assets
        .save(part.file_name.as_deref(), part.content_type.as_deref(), &part.data)
        .await
        .inspect_err(|e| {
            if matches!(e, AppError::Validation { .. }) {
                state.metrics.inc_upload_rejected();
            }
        })?;
    state.metrics.record_upload(stored.size);

    Ok(Json(UploadResponse {
        url: stored.url,
        filename: stored.filename,
        message: "Upload completed successfully".to_string(),
    }))
}

/// `GET /uploads/image/{filename}`: streams the file with a guessed content type.
pub async fn get_image(
    State(state): State<AppState>,
    AppPath(filename): AppPath<String>,
    req: Request,
) -> AppResult<Response> {
    let path = state.assets.locate(&filename).await?;

    // ServeFile infers the content type from the extension, falling back to
    // application/octet-stream.
    let res = match ServeFile::new(path).oneshot(req).await {
        Ok(res) => res.map(Body::new),
        Err(never) => match never {},
    };
    let mut res = res.into_response();
    if let Ok(value) = HeaderValue::from_str(&format!("inline; filename=\"{}\"", filename)) {
        res.headers_mut().insert(header::CONTENT_DISPOSITION, value);
    }
    Ok(res)
}

/// `DELETE /uploads/image/{filename}`
pub async fn delete_image(
    State(state): State<AppState>,
    AppPath(filename): AppPath<String>,
) -> AppResult<Json<serde_json::Value>> {
    state.assets.delete(&filename).await?;
    state.metrics.inc_upload_deleted();
    Ok(Json(json!({ "message": "Image deleted successfully" })))
}
