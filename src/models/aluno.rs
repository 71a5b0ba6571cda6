// src/models/aluno.rs
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// Aluno matriculado numa turma. Alunos não possuem credencial de acesso;
// assinam via link individual enviado por e-mail.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Aluno {
    pub matricula: i64,
    pub nome: String,
    pub email: String,
    pub turma_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct NovoAluno {
    pub matricula: i64,
    pub nome: String,
    pub email: String,
    pub turma_id: i64,
}
