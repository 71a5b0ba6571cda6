// src/services/aluno_service.rs
use crate::{
    error::{e_violacao_de_unicidade, AppError, AppResult},
    models::aluno::{Aluno, NovoAluno},
    services::{auth_service, turma_service},
};
use sqlx::SqlitePool;

pub async fn cadastrar_aluno(db_pool: &SqlitePool, dados: NovoAluno) -> AppResult<Aluno> {
    if auth_service::email_em_uso(db_pool, &dados.email).await? {
        return Err(AppError::RegraDeNegocio(
            "O e-mail informado já está em uso.".to_string(),
        ));
    }
    if turma_service::buscar_por_id(db_pool, dados.turma_id).await?.is_none() {
        return Err(AppError::RegraDeNegocio(
            "A turma informada não existe.".to_string(),
        ));
    }

    let resultado = sqlx::query(
        "INSERT INTO alunos (matricula, nome, email, turma_id) VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(dados.matricula)
    .bind(&dados.nome)
    .bind(&dados.email)
    .bind(dados.turma_id)
    .execute(db_pool)
    .await;

    if let Err(erro) = &resultado {
        if e_violacao_de_unicidade(erro) {
            return Err(AppError::RegraDeNegocio(
                "A matrícula informada já está em uso.".to_string(),
            ));
        }
    }
    resultado?;

    buscar_por_matricula(db_pool, dados.matricula)
        .await?
        .ok_or(AppError::InternalServerError)
}

pub async fn buscar_por_matricula(db_pool: &SqlitePool, matricula: i64) -> AppResult<Option<Aluno>> {
    let aluno = sqlx::query_as::<_, Aluno>(
        "SELECT matricula, nome, email, turma_id FROM alunos WHERE matricula = ?1",
    )
    .bind(matricula)
    .fetch_optional(db_pool)
    .await?;
    Ok(aluno)
}

pub async fn buscar_todos(db_pool: &SqlitePool) -> AppResult<Vec<Aluno>> {
    let alunos = sqlx::query_as::<_, Aluno>(
        "SELECT matricula, nome, email, turma_id FROM alunos ORDER BY matricula ASC",
    )
    .fetch_all(db_pool)
    .await?;
    Ok(alunos)
}

pub async fn deletar_aluno(db_pool: &SqlitePool, matricula: i64) -> AppResult<bool> {
    let afetadas = sqlx::query("DELETE FROM alunos WHERE matricula = ?1")
        .bind(matricula)
        .execute(db_pool)
        .await?
        .rows_affected();
    Ok(afetadas > 0)
}
