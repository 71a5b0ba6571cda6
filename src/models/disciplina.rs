// src/models/disciplina.rs
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Disciplina {
    pub id: i64,
    pub nome: String,
}

#[derive(Debug, Deserialize)]
pub struct NovaDisciplina {
    pub nome: String,
}
