// src/web/reposicao_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::solicitacao::AssinaturaPayload,
    services::reposicao_service,
    state::AppState,
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};

pub async fn handle_buscar(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let solicitacao = reposicao_service::buscar_por_id(&state.db_pool, id)
        .await?
        .ok_or_else(|| {
            AppError::NaoEncontrado("Solicitação de reposição não encontrada.".to_string())
        })?;
    Ok(Json(solicitacao))
}

/// POST /reposicao/{id}/assinar - aluno registra concordância/discordância.
pub async fn handle_assinar(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<AssinaturaPayload>,
) -> AppResult<impl IntoResponse> {
    let assinatura = reposicao_service::registrar_assinatura(
        &state.db_pool,
        id,
        payload.matricula_aluno,
        payload.concorda,
    )
    .await?;
    Ok(Json(assinatura))
}

pub async fn handle_listar_assinaturas(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let assinaturas = reposicao_service::listar_assinaturas(&state.db_pool, id).await?;
    Ok(Json(assinaturas))
}

/// POST /reposicao/{id}/enviar-aprovacao - encerra a coleta de assinaturas
/// e coloca a solicitação na fila do coordenador.
pub async fn handle_enviar_aprovacao(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let solicitacao = reposicao_service::enviar_para_aprovacao(&state.db_pool, id).await?;
    Ok(Json(solicitacao))
}
