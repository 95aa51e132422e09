//! Farmer registration

use axum::extract::State;
use axum::response::Html;
use axum::Form;

use agri_assist::FarmerForm;

use crate::error::ApiError;
use crate::state::SharedState;
use crate::templates::{render_success, MessageContext};

pub const REGISTERED_MESSAGE: &str = "Farmer registered successfully!";

/// POST /register-farmer - validate all seven fields, then insert one row
pub async fn register_farmer(
    State(state): State<SharedState>,
    Form(form): Form<FarmerForm>,
) -> Result<Html<String>, ApiError> {
    let new_farmer = form.into_new_farmer()?;

    let store = state.store.clone();
    tokio::task::spawn_blocking(move || store.register(&new_farmer)).await??;

    let html = render_success(&MessageContext {
        message: REGISTERED_MESSAGE,
    })?;
    Ok(Html(html))
}
