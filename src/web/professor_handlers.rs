// src/web/professor_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::{
        professor::{AtualizaProfessor, NovoProfessor},
        solicitacao::NovaSolicitacao,
    },
    services::{professor_service, reposicao_service},
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

/// POST /professor/cadastrar - autocadastro (com token) ou cadastro por
/// chamador já autenticado (token dispensado).
pub async fn handle_cadastrar(
    State(state): State<AppState>,
    Extension(identidade): Extension<IdentidadeOpcional>,
    Json(dados): Json<NovoProfessor>,
) -> AppResult<impl IntoResponse> {
    let criado_por_admin = identidade.0.is_some();
    let professor =
        professor_service::cadastrar_professor(&state.db_pool, &state.config, dados, criado_por_admin)
            .await?;
    Ok((StatusCode::CREATED, Json(professor)))
}

pub async fn handle_listar_todos(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let professores = professor_service::buscar_todos(&state.db_pool).await?;
    Ok(Json(professores))
}

pub async fn handle_buscar(
    State(state): State<AppState>,
    Path(matricula): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let professor = professor_service::buscar_por_matricula(&state.db_pool, matricula)
        .await?
        .ok_or_else(|| AppError::NaoEncontrado("Professor não encontrado.".to_string()))?;
    Ok(Json(professor))
}

pub async fn handle_atualizar(
    State(state): State<AppState>,
    Path(matricula): Path<i64>,
    Json(dados): Json<AtualizaProfessor>,
) -> AppResult<impl IntoResponse> {
    let professor = professor_service::atualizar_professor(&state.db_pool, matricula, dados)
        .await?
        .ok_or_else(|| AppError::NaoEncontrado("Professor não encontrado.".to_string()))?;
    Ok(Json(professor))
}

pub async fn handle_deletar(
    State(state): State<AppState>,
    Path(matricula): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let removido = professor_service::deletar_professor(&state.db_pool, matricula).await?;
    if !removido {
        return Err(AppError::NaoEncontrado("Professor não encontrado.".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn handle_listar_reposicoes(
    State(state): State<AppState>,
    Path(matricula): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let solicitacoes = reposicao_service::listar_por_professor(&state.db_pool, matricula).await?;
    Ok(Json(solicitacoes))
}

/// POST /professor/solicitar-reposicao
///
/// Recebe o corpo como Value para devolver o 400 do contrato existente
/// quando idProfessor falta, em vez da rejeição genérica do extrator.
pub async fn handle_solicitar_reposicao(
    State(state): State<AppState>,
    Json(corpo): Json<Value>,
) -> AppResult<impl IntoResponse> {
    if corpo.get("idProfessor").and_then(Value::as_i64).is_none() {
        return Err(AppError::RegraDeNegocio(
            "O campo idProfessor é obrigatório no corpo da requisição.".to_string(),
        ));
    }

    let dados: NovaSolicitacao = serde_json::from_value(corpo)
        .map_err(|e| AppError::RegraDeNegocio(format!("Corpo da requisição inválido: {e}")))?;

    let solicitacao = professor_service::iniciar_solicitacao_reposicao(
        &state.db_pool,
        state.notificador.as_ref(),
        &state.config,
        dados,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(solicitacao)))
}

/// POST /professor/{matricula}/disciplinas
pub async fn handle_associar_disciplinas(
    State(state): State<AppState>,
    Path(matricula): Path<i64>,
    Json(corpo): Json<Value>,
) -> AppResult<impl IntoResponse> {
    let Some(ids_brutos) = corpo.get("disciplinaIds").and_then(Value::as_array) else {
        return Err(AppError::RegraDeNegocio(
            "O campo \"disciplinaIds\" é obrigatório e deve ser um array.".to_string(),
        ));
    };

    let disciplina_ids: Vec<i64> = ids_brutos
        .iter()
        .map(|valor| {
            valor.as_i64().ok_or_else(|| {
                AppError::RegraDeNegocio(
                    "Uma ou mais disciplinas informadas são inválidas ou não existem.".to_string(),
                )
            })
        })
        .collect::<Result<_, _>>()?;

    professor_service::associar_disciplinas(&state.db_pool, matricula, &disciplina_ids).await?;
    Ok(Json(json!({
        "message": "Disciplinas associadas ao professor com sucesso."
    })))
}
