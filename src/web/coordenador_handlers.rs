// src/web/coordenador_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::{
        coordenador::{AtualizaCoordenador, NovoCoordenador},
        solicitacao::StatusSolicitacao,
    },
    services::coordenador_service,
    state::AppState,
    web::mw_auth::IdentidadeOpcional,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde_json::{json, Value};

pub async fn handle_cadastrar(
    State(state): State<AppState>,
    Extension(identidade): Extension<IdentidadeOpcional>,
    Json(dados): Json<NovoCoordenador>,
) -> AppResult<impl IntoResponse> {
    let criado_por_admin = identidade.0.is_some();
    let coordenador = coordenador_service::cadastrar_coordenador(
        &state.db_pool,
        &state.config,
        dados,
        criado_por_admin,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(coordenador)))
}

pub async fn handle_listar_todos(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let coordenadores = coordenador_service::buscar_todos(&state.db_pool).await?;
    Ok(Json(coordenadores))
}

pub async fn handle_buscar(
    State(state): State<AppState>,
    Path(matricula): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let coordenador = coordenador_service::buscar_por_matricula(&state.db_pool, matricula)
        .await?
        .ok_or_else(|| AppError::NaoEncontrado("Coordenador não encontrado.".to_string()))?;
    Ok(Json(coordenador))
}

pub async fn handle_atualizar(
    State(state): State<AppState>,
    Path(matricula): Path<i64>,
    Json(dados): Json<AtualizaCoordenador>,
) -> AppResult<impl IntoResponse> {
    let coordenador = coordenador_service::atualizar_coordenador(&state.db_pool, matricula, dados)
        .await?
        .ok_or_else(|| AppError::NaoEncontrado("Coordenador não encontrado.".to_string()))?;
    Ok(Json(coordenador))
}

pub async fn handle_deletar(
    State(state): State<AppState>,
    Path(matricula): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let removido = coordenador_service::deletar_coordenador(&state.db_pool, matricula).await?;
    if !removido {
        return Err(AppError::NaoEncontrado("Coordenador não encontrado.".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /coordenador/solicitacoes/{id}/avaliar - decisão terminal sobre a
/// solicitação. O corpo chega como Value para validar a decisão com a
/// mensagem de negócio do contrato, não com a rejeição do extrator.
pub async fn handle_avaliar_solicitacao(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(corpo): Json<Value>,
) -> AppResult<impl IntoResponse> {
    let decisao = match corpo.get("decisao").and_then(Value::as_str) {
        Some("AUTORIZADA") => StatusSolicitacao::Autorizada,
        Some("NEGADA") => StatusSolicitacao::Negada,
        outra => {
            return Err(AppError::RegraDeNegocio(format!(
                "Decisão inválida: '{}'. Use AUTORIZADA ou NEGADA.",
                outra.unwrap_or("")
            )));
        }
    };
    let comentario = corpo
        .get("comentario")
        .and_then(Value::as_str)
        .map(str::to_string);

    let solicitacao = coordenador_service::avaliar_solicitacao(
        &state.db_pool,
        state.notificador.as_ref(),
        id,
        decisao,
        comentario,
    )
    .await?;

    Ok(Json(solicitacao))
}

/// POST /coordenador/notificar-falta/{matricula}
pub async fn handle_notificar_falta(
    State(state): State<AppState>,
    Path(matricula): Path<i64>,
) -> AppResult<impl IntoResponse> {
    coordenador_service::notificar_falta(
        &state.db_pool,
        state.notificador.as_ref(),
        &state.config,
        matricula,
    )
    .await?;
    Ok(Json(json!({ "message": "Notificação de ausência enviada." })))
}
