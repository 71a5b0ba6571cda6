// src/models/solicitacao.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Status do ciclo de vida de uma solicitação de reposição.
///
/// PENDENTE -> AGUARDANDO_APROVACAO -> AUTORIZADA | NEGADA
///
/// A transição para AGUARDANDO_APROVACAO é uma operação explícita do
/// professor (não há quórum automático de assinaturas). NEGADA é terminal:
/// para tentar de novo cria-se uma nova solicitação.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum StatusSolicitacao {
    #[sqlx(rename = "PENDENTE")]
    #[serde(rename = "PENDENTE")]
    Pendente,
    #[sqlx(rename = "AGUARDANDO_APROVACAO")]
    #[serde(rename = "AGUARDANDO_APROVACAO")]
    AguardandoAprovacao,
    #[sqlx(rename = "AUTORIZADA")]
    #[serde(rename = "AUTORIZADA")]
    Autorizada,
    #[sqlx(rename = "NEGADA")]
    #[serde(rename = "NEGADA")]
    Negada,
}

impl StatusSolicitacao {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusSolicitacao::Pendente => "PENDENTE",
            StatusSolicitacao::AguardandoAprovacao => "AGUARDANDO_APROVACAO",
            StatusSolicitacao::Autorizada => "AUTORIZADA",
            StatusSolicitacao::Negada => "NEGADA",
        }
    }

    /// Uma solicitação terminal não aceita mais assinaturas nem decisões.
    pub fn terminal(&self) -> bool {
        matches!(
            self,
            StatusSolicitacao::Autorizada | StatusSolicitacao::Negada
        )
    }
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SolicitacaoReposicao {
    pub id: i64,
    pub motivo: String,
    pub data: NaiveDate,
    pub horario: String,
    pub sala: String,
    pub qt_alunos: i64,
    pub status: StatusSolicitacao,
    pub comentario: Option<String>,
    pub turma_id: i64,
    pub professor_matricula: i64,
}

// Assinatura digital de um aluno sobre uma solicitação.
// Chave composta (solicitacao_id, aluno_matricula); reenvio sobrescreve.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Assinatura {
    pub solicitacao_id: i64,
    pub aluno_matricula: i64,
    pub concorda: bool,
}

// Corpo de POST /professor/solicitar-reposicao (nomes do contrato existente)
#[derive(Debug, Deserialize)]
pub struct NovaSolicitacao {
    pub motivo: String,
    pub data: NaiveDate,
    pub horario: String,
    pub sala: String,
    #[serde(rename = "idTurma")]
    pub id_turma: i64,
    #[serde(rename = "idProfessor")]
    pub id_professor: i64,
}

// Corpo de POST /reposicao/{id}/assinar
#[derive(Debug, Deserialize)]
pub struct AssinaturaPayload {
    pub matricula_aluno: i64,
    pub concorda: bool,
}
