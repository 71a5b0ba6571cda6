// src/state.rs
use crate::{config::AppConfig, services::email_service::Notificador};
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub config: Arc<AppConfig>,
    // Gateway de notificação injetado (SMTP em produção, spy nos testes)
    pub notificador: Arc<dyn Notificador>,
}

// Permite extrair o pool da DB diretamente
impl axum::extract::FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> SqlitePool {
        state.db_pool.clone()
    }
}
