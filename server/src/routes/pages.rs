//! Static pages

use axum::response::Html;

use crate::error::ApiError;
use crate::templates::{render_page, Page};

/// GET /
pub async fn index() -> Result<Html<String>, ApiError> {
    Ok(Html(render_page(Page::Index)?))
}

/// GET /crop
pub async fn crop() -> Result<Html<String>, ApiError> {
    Ok(Html(render_page(Page::Crop)?))
}

/// GET /fertilizer
pub async fn fertilizer() -> Result<Html<String>, ApiError> {
    Ok(Html(render_page(Page::Fertilizer)?))
}

/// GET /block-index
pub async fn block_index() -> Result<Html<String>, ApiError> {
    Ok(Html(render_page(Page::BlockIndex)?))
}

/// GET /register
pub async fn register() -> Result<Html<String>, ApiError> {
    Ok(Html(render_page(Page::Register)?))
}
