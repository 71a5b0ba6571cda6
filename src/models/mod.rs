// src/models/mod.rs
pub mod aluno;
pub mod coordenador;
pub mod disciplina;
pub mod nutricionista;
pub mod professor;
pub mod solicitacao;
pub mod turma;
