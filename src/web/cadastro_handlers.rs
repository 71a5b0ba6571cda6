// src/web/cadastro_handlers.rs
//
// CRUD das entidades de apoio: alunos, turmas, disciplinas e
// nutricionistas (equipe de merenda).
use crate::{
    error::{AppError, AppResult},
    models::{
        aluno::NovoAluno, disciplina::NovaDisciplina, nutricionista::NovoNutricionista,
        turma::NovaTurma,
    },
    services::{aluno_service, disciplina_service, nutricionista_service, turma_service},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

// --- Alunos ---

pub async fn handle_cadastrar_aluno(
    State(state): State<AppState>,
    Json(dados): Json<NovoAluno>,
) -> AppResult<impl IntoResponse> {
    let aluno = aluno_service::cadastrar_aluno(&state.db_pool, dados).await?;
    Ok((StatusCode::CREATED, Json(aluno)))
}

pub async fn handle_listar_alunos(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let alunos = aluno_service::buscar_todos(&state.db_pool).await?;
    Ok(Json(alunos))
}

pub async fn handle_buscar_aluno(
    State(state): State<AppState>,
    Path(matricula): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let aluno = aluno_service::buscar_por_matricula(&state.db_pool, matricula)
        .await?
        .ok_or_else(|| AppError::NaoEncontrado("Aluno não encontrado.".to_string()))?;
    Ok(Json(aluno))
}

pub async fn handle_deletar_aluno(
    State(state): State<AppState>,
    Path(matricula): Path<i64>,
) -> AppResult<impl IntoResponse> {
    if !aluno_service::deletar_aluno(&state.db_pool, matricula).await? {
        return Err(AppError::NaoEncontrado("Aluno não encontrado.".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

// --- Turmas ---

pub async fn handle_criar_turma(
    State(state): State<AppState>,
    Json(dados): Json<NovaTurma>,
) -> AppResult<impl IntoResponse> {
    let turma = turma_service::criar_turma(&state.db_pool, dados).await?;
    Ok((StatusCode::CREATED, Json(turma)))
}

pub async fn handle_listar_turmas(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let turmas = turma_service::buscar_todas(&state.db_pool).await?;
    Ok(Json(turmas))
}

pub async fn handle_buscar_turma(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let turma = turma_service::buscar_por_id(&state.db_pool, id)
        .await?
        .ok_or_else(|| AppError::NaoEncontrado("Turma não encontrada.".to_string()))?;
    Ok(Json(turma))
}

pub async fn handle_listar_alunos_da_turma(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    if turma_service::buscar_por_id(&state.db_pool, id).await?.is_none() {
        return Err(AppError::NaoEncontrado("Turma não encontrada.".to_string()));
    }
    let alunos = turma_service::buscar_alunos_por_turma(&state.db_pool, id).await?;
    Ok(Json(alunos))
}

pub async fn handle_deletar_turma(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    if !turma_service::deletar_turma(&state.db_pool, id).await? {
        return Err(AppError::NaoEncontrado("Turma não encontrada.".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

// --- Disciplinas ---

pub async fn handle_criar_disciplina(
    State(state): State<AppState>,
    Json(dados): Json<NovaDisciplina>,
) -> AppResult<impl IntoResponse> {
    let disciplina = disciplina_service::criar_disciplina(&state.db_pool, dados).await?;
    Ok((StatusCode::CREATED, Json(disciplina)))
}

pub async fn handle_listar_disciplinas(
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let disciplinas = disciplina_service::buscar_todas(&state.db_pool).await?;
    Ok(Json(disciplinas))
}

pub async fn handle_buscar_disciplina(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let disciplina = disciplina_service::buscar_por_id(&state.db_pool, id)
        .await?
        .ok_or_else(|| AppError::NaoEncontrado("Disciplina não encontrada.".to_string()))?;
    Ok(Json(disciplina))
}

pub async fn handle_deletar_disciplina(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    if !disciplina_service::deletar_disciplina(&state.db_pool, id).await? {
        return Err(AppError::NaoEncontrado("Disciplina não encontrada.".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

// --- Nutricionistas ---

pub async fn handle_cadastrar_nutricionista(
    State(state): State<AppState>,
    Json(dados): Json<NovoNutricionista>,
) -> AppResult<impl IntoResponse> {
    let nutricionista =
        nutricionista_service::cadastrar_nutricionista(&state.db_pool, dados).await?;
    Ok((StatusCode::CREATED, Json(nutricionista)))
}

pub async fn handle_listar_nutricionistas(
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let nutricionistas = nutricionista_service::buscar_todos(&state.db_pool).await?;
    Ok(Json(nutricionistas))
}

pub async fn handle_deletar_nutricionista(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    if !nutricionista_service::deletar_nutricionista(&state.db_pool, id).await? {
        return Err(AppError::NaoEncontrado("Nutricionista não encontrado.".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}
