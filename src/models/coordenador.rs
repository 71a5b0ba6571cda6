// src/models/coordenador.rs
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Coordenador {
    pub matricula: i64,
    pub nome: String,
    pub email: String,
    pub departamento: String,
    #[serde(skip_serializing)]
    pub senha_hash: String,
}

#[derive(Debug, Deserialize)]
pub struct NovoCoordenador {
    pub matricula: i64,
    pub nome: String,
    pub email: String,
    pub senha: String,
    pub departamento: String,
    pub token_seguro: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AtualizaCoordenador {
    pub nome: String,
    pub email: String,
    pub departamento: String,
}
