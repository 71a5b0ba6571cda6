// src/services/turma_service.rs
use crate::{
    error::{AppError, AppResult},
    models::{
        aluno::Aluno,
        turma::{NovaTurma, Turma},
    },
};
use sqlx::SqlitePool;

pub async fn criar_turma(db_pool: &SqlitePool, dados: NovaTurma) -> AppResult<Turma> {
    if let Some(disciplina_id) = dados.disciplina_id {
        let existe: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM disciplinas WHERE id = ?1")
            .bind(disciplina_id)
            .fetch_one(db_pool)
            .await?;
        if existe == 0 {
            return Err(AppError::RegraDeNegocio(
                "A disciplina informada não existe.".to_string(),
            ));
        }
    }

    let resultado = sqlx::query("INSERT INTO turmas (nome, disciplina_id) VALUES (?1, ?2)")
        .bind(&dados.nome)
        .bind(dados.disciplina_id)
        .execute(db_pool)
        .await?;

    buscar_por_id(db_pool, resultado.last_insert_rowid())
        .await?
        .ok_or(AppError::InternalServerError)
}

pub async fn buscar_por_id(db_pool: &SqlitePool, id: i64) -> AppResult<Option<Turma>> {
    let turma =
        sqlx::query_as::<_, Turma>("SELECT id, nome, disciplina_id FROM turmas WHERE id = ?1")
            .bind(id)
            .fetch_optional(db_pool)
            .await?;
    Ok(turma)
}

pub async fn buscar_todas(db_pool: &SqlitePool) -> AppResult<Vec<Turma>> {
    let turmas =
        sqlx::query_as::<_, Turma>("SELECT id, nome, disciplina_id FROM turmas ORDER BY id ASC")
            .fetch_all(db_pool)
            .await?;
    Ok(turmas)
}

/// Roster da turma: a convocação e o fan-out de decisão partem daqui.
pub async fn buscar_alunos_por_turma(db_pool: &SqlitePool, turma_id: i64) -> AppResult<Vec<Aluno>> {
    let alunos = sqlx::query_as::<_, Aluno>(
        "SELECT matricula, nome, email, turma_id FROM alunos WHERE turma_id = ?1 ORDER BY matricula ASC",
    )
    .bind(turma_id)
    .fetch_all(db_pool)
    .await?;
    Ok(alunos)
}

pub async fn deletar_turma(db_pool: &SqlitePool, id: i64) -> AppResult<bool> {
    let afetadas = sqlx::query("DELETE FROM turmas WHERE id = ?1")
        .bind(id)
        .execute(db_pool)
        .await?
        .rows_affected();
    Ok(afetadas > 0)
}
