//! Crop and fertilizer recommendation forms

use axum::response::Html;
use axum::Form;
use serde::Deserialize;

use agri_assist::advisor::{recommend_crop, recommend_fertilizer};

use crate::error::ApiError;
use crate::templates::{
    render_crop_result, render_fertilizer_result, CropResultContext, FertilizerResultContext,
};

#[derive(Debug, Deserialize)]
pub struct SoilForm {
    pub soil: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CropForm {
    pub crop: Option<String>,
}

/// POST /crop-result
pub async fn crop_result(Form(form): Form<SoilForm>) -> Result<Html<String>, ApiError> {
    let soil = form.soil.ok_or(ApiError::MissingField("soil"))?;
    let html = render_crop_result(&CropResultContext {
        crop: recommend_crop(&soil),
    })?;
    Ok(Html(html))
}

/// POST /fertilizer-result
pub async fn fertilizer_result(Form(form): Form<CropForm>) -> Result<Html<String>, ApiError> {
    let crop = form.crop.ok_or(ApiError::MissingField("crop"))?;
    let html = render_fertilizer_result(&FertilizerResultContext {
        fertilizer: recommend_fertilizer(&crop),
    })?;
    Ok(Html(html))
}
