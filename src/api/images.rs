//! Image endpoints
//!
//! The binary payload may live inline in the row or on disk under the
//! configured image directory; either way it is served base64-encoded
//! alongside the image metadata.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::Serialize;

use crate::models::Image;
use crate::{db, AppState, Error, Result};

/// Image metadata with its base64-encoded payload
#[derive(Debug, Serialize)]
pub struct ImageResponse {
    #[serde(flatten)]
    pub image: Image,
    pub data: Option<String>,
}

/// Base64-encode the image payload: the inline blob when present,
/// otherwise the file under the configured image directory.
pub(crate) async fn resolve_payload(state: &AppState, image: &Image) -> Result<Option<String>> {
    match &image.bin_image {
        Some(bytes) => Ok(Some(BASE64.encode(bytes))),
        None => match &image.file_name {
            Some(file_name) => {
                let path = std::path::Path::new(&state.config.image_dir).join(file_name);
                match tokio::fs::read(&path).await {
                    Ok(bytes) => Ok(Some(BASE64.encode(bytes))),
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                    Err(e) => Err(e.into()),
                }
            }
            None => Ok(None),
        },
    }
}

/// GET /images/:id
pub async fn get_image(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ImageResponse>> {
    let image = db::images::get(&state.db, id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Image {} not found", id)))?;
    let data = resolve_payload(&state, &image).await?;
    Ok(Json(ImageResponse { image, data }))
}

/// Build image routes
pub fn image_routes() -> Router<AppState> {
    Router::new().route("/images/:id", get(get_image))
}
