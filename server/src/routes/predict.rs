//! Leaf disease prediction

use axum::extract::{Multipart, State};
use axum::response::Html;
use tracing::info;

use crate::error::ApiError;
use crate::state::SharedState;
use crate::templates::{render_disease_result, DiseaseResultContext};

/// Multipart field carrying the uploaded photo
pub const IMAGE_FIELD: &str = "image";

/// POST /predict - classify the uploaded `image` file part
pub async fn predict(
    State(state): State<SharedState>,
    mut multipart: Multipart,
) -> Result<Html<String>, ApiError> {
    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        // A part without a filename is a plain form value, not a file.
        if field.name() == Some(IMAGE_FIELD) && field.file_name().is_some() {
            upload = Some(field.bytes().await?);
            break;
        }
    }
    let bytes = upload.ok_or(ApiError::NoFile)?;

    let classifier = state.classifier();
    let prediction =
        tokio::task::spawn_blocking(move || classifier.predict_bytes(&bytes)).await??;

    info!(
        "Prediction: {} ({:.1} ms)",
        prediction.label, prediction.inference_time_ms
    );

    let html = render_disease_result(&DiseaseResultContext {
        prediction: prediction.label.to_string(),
        plant: prediction.label.plant_name(),
        healthy: prediction.label.is_healthy(),
    })?;
    Ok(Html(html))
}
