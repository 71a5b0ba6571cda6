// src/config.rs
use crate::error::AppResult;
use std::env;

/// Configuração lida uma única vez no arranque do processo.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Segredo partilhado que libera o autocadastro (professor/coordenador).
    pub registration_token_secret: String,
    /// Segredo de assinatura dos tokens de identidade (Bearer).
    pub jwt_secret: String,
    /// Base dos links enviados por e-mail (formulário de assinatura, etc.).
    pub frontend_url: String,
    /// Remetente dos e-mails do sistema.
    pub email_remetente: String,
    /// Servidor SMTP; se ausente, os e-mails são apenas logados.
    pub smtp_host: Option<String>,
    pub smtp_usuario: Option<String>,
    pub smtp_senha: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        Ok(Self {
            registration_token_secret: env::var("REGISTRATION_TOKEN_SECRET")?,
            jwt_secret: env::var("JWT_SECRET")?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            email_remetente: env::var("EMAIL_REMETENTE")
                .unwrap_or_else(|_| "nao-responda@reposicao.edu.br".to_string()),
            smtp_host: env::var("SMTP_HOST").ok(),
            smtp_usuario: env::var("SMTP_USUARIO").ok(),
            smtp_senha: env::var("SMTP_SENHA").ok(),
        })
    }
}
