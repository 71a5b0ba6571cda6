// src/error.rs
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // Violação de regra de negócio (token inválido, e-mail duplicado,
    // status incompatível com a avaliação, etc.). Sempre 400.
    #[error("{0}")]
    RegraDeNegocio(String),

    // Entidade inexistente numa busca/atualização/remoção. Sempre 404.
    #[error("{0}")]
    NaoEncontrado(String),

    #[error("Erro na base de dados: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Erro de migração da base de dados: {0}")]
    SqlxMigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Erro de variável de ambiente: {0}")]
    EnvVarError(#[from] std::env::VarError),

    #[error("Erro ao processar senha")]
    PasswordHashingError,

    #[error("Credenciais inválidas")]
    CredenciaisInvalidas,

    #[error("Erro ao enviar e-mail: {0}")]
    EmailError(String),

    #[error("Erro interno inesperado")]
    InternalServerError,
}

// Converte AppError numa resposta JSON { "message": ... }.
// Erros de negócio e de busca são fluxo esperado e devolvem a mensagem real;
// o resto vira 500 opaco com o detalhe apenas no log do servidor.
impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            AppError::RegraDeNegocio(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NaoEncontrado(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::CredenciaisInvalidas => {
                // Mensagem genérica de propósito
                (StatusCode::UNAUTHORIZED, "E-mail ou senha inválidos.".to_string())
            }
            _ => {
                tracing::error!("Erro inesperado processado: {:?}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocorreu um erro inesperado no servidor.".to_string(),
                )
            }
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

// Tipo Result padrão para a aplicação
pub type AppResult<T = ()> = Result<T, AppError>;

// Códigos do SQLite para violação de constraint: 19 (genérico),
// 2067 (UNIQUE) e 1555 (PRIMARY KEY).
pub fn e_violacao_de_unicidade(erro: &sqlx::Error) -> bool {
    match erro {
        sqlx::Error::Database(db_err) => db_err
            .code()
            .map_or(false, |codigo| codigo == "19" || codigo == "2067" || codigo == "1555"),
        _ => false,
    }
}
