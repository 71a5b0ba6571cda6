// src/services/disciplina_service.rs
use crate::{
    error::{AppError, AppResult},
    models::disciplina::{Disciplina, NovaDisciplina},
};
use sqlx::SqlitePool;

pub async fn criar_disciplina(db_pool: &SqlitePool, dados: NovaDisciplina) -> AppResult<Disciplina> {
    let resultado = sqlx::query("INSERT INTO disciplinas (nome) VALUES (?1)")
        .bind(&dados.nome)
        .execute(db_pool)
        .await?;

    buscar_por_id(db_pool, resultado.last_insert_rowid())
        .await?
        .ok_or(AppError::InternalServerError)
}

pub async fn buscar_por_id(db_pool: &SqlitePool, id: i64) -> AppResult<Option<Disciplina>> {
    let disciplina =
        sqlx::query_as::<_, Disciplina>("SELECT id, nome FROM disciplinas WHERE id = ?1")
            .bind(id)
            .fetch_optional(db_pool)
            .await?;
    Ok(disciplina)
}

pub async fn buscar_todas(db_pool: &SqlitePool) -> AppResult<Vec<Disciplina>> {
    let disciplinas =
        sqlx::query_as::<_, Disciplina>("SELECT id, nome FROM disciplinas ORDER BY id ASC")
            .fetch_all(db_pool)
            .await?;
    Ok(disciplinas)
}

pub async fn deletar_disciplina(db_pool: &SqlitePool, id: i64) -> AppResult<bool> {
    let afetadas = sqlx::query("DELETE FROM disciplinas WHERE id = ?1")
        .bind(id)
        .execute(db_pool)
        .await?
        .rows_affected();
    Ok(afetadas > 0)
}
