use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::instrument;

use crate::{
    accounts::{
        dto::{RegisterRequest, RegisterResponse},
        services,
    },
    error::RegisterError,
    state::AppState,
};

pub fn register_routes() -> Router<AppState> {
    Router::new().route("/register", post(register))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>), RegisterError> {
    let Json(payload) = payload.map_err(|e| RegisterError::Validation(e.body_text()))?;

    let account = services::register(state.accounts.as_ref(), payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "account registered successfully".into(),
            user_id: account.username,
        }),
    ))
}
