// src/models/professor.rs
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// Representa um professor lido da tabela 'professores'.
// O hash da senha nunca sai na serialização: toda leitura/atualização
// devolve o registro já "limpo" para o chamador.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Professor {
    pub matricula: i64,
    pub nome: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub senha_hash: String,
}

// Dados do cadastro de professor (senha ainda em claro; será hasheada)
#[derive(Debug, Deserialize)]
pub struct NovoProfessor {
    pub matricula: i64,
    pub nome: String,
    pub email: String,
    pub senha: String,
    // Token partilhado exigido no autocadastro (dispensado se o criador
    // já estiver autenticado, ex.: admin cadastrando em nome de alguém)
    pub token_seguro: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AtualizaProfessor {
    pub nome: String,
    pub email: String,
}
