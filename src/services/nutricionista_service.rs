// src/services/nutricionista_service.rs
use crate::{
    error::{e_violacao_de_unicidade, AppError, AppResult},
    models::nutricionista::{NovoNutricionista, Nutricionista},
};
use sqlx::SqlitePool;

pub async fn cadastrar_nutricionista(
    db_pool: &SqlitePool,
    dados: NovoNutricionista,
) -> AppResult<Nutricionista> {
    let resultado = sqlx::query("INSERT INTO nutricionistas (nome, email) VALUES (?1, ?2)")
        .bind(&dados.nome)
        .bind(&dados.email)
        .execute(db_pool)
        .await;

    if let Err(erro) = &resultado {
        if e_violacao_de_unicidade(erro) {
            return Err(AppError::RegraDeNegocio(
                "O e-mail informado já está em uso.".to_string(),
            ));
        }
    }
    let resultado = resultado?;

    buscar_por_id(db_pool, resultado.last_insert_rowid())
        .await?
        .ok_or(AppError::InternalServerError)
}

pub async fn buscar_por_id(db_pool: &SqlitePool, id: i64) -> AppResult<Option<Nutricionista>> {
    let nutricionista = sqlx::query_as::<_, Nutricionista>(
        "SELECT id, nome, email FROM nutricionistas WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(db_pool)
    .await?;
    Ok(nutricionista)
}

pub async fn buscar_todos(db_pool: &SqlitePool) -> AppResult<Vec<Nutricionista>> {
    let nutricionistas = sqlx::query_as::<_, Nutricionista>(
        "SELECT id, nome, email FROM nutricionistas ORDER BY id ASC",
    )
    .fetch_all(db_pool)
    .await?;
    Ok(nutricionistas)
}

pub async fn deletar_nutricionista(db_pool: &SqlitePool, id: i64) -> AppResult<bool> {
    let afetadas = sqlx::query("DELETE FROM nutricionistas WHERE id = ?1")
        .bind(id)
        .execute(db_pool)
        .await?
        .rows_affected();
    Ok(afetadas > 0)
}
