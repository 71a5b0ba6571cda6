// src/web/auth_handlers.rs
use crate::{
    error::AppResult,
    services::auth_service::{self, LoginPayload},
    state::AppState,
};
use axum::{extract::State, response::IntoResponse, Json};

/// POST /auth/login - autentica professor ou coordenador por e-mail/senha.
pub async fn handle_login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> AppResult<impl IntoResponse> {
    let resposta = auth_service::login(&state.db_pool, &state.config, payload).await?;
    Ok(Json(resposta))
}
