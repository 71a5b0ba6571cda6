// src/models/turma.rs
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Turma {
    pub id: i64,
    pub nome: String,
    pub disciplina_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct NovaTurma {
    pub nome: String,
    pub disciplina_id: Option<i64>,
}
