// src/models/nutricionista.rs
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// Equipe de merenda: notificada quando uma reposição é autorizada
// para providenciar a alimentação da turma.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Nutricionista {
    pub id: i64,
    pub nome: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct NovoNutricionista {
    pub nome: String,
    pub email: String,
}
