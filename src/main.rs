// src/main.rs
use axum::serve;
use reposicao_aulas::{
    config::AppConfig,
    db,
    services::email_service::{Notificador, NotificadorLog, NotificadorSmtp},
    state::AppState,
    web,
};
use std::{env, net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Configuração do Logging (Tracing) ---
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                env::var("RUST_LOG")
                    .unwrap_or_else(|_| "reposicao_aulas=debug,tower_http=info,sqlx=warn".into())
                    .into()
            }),
        )
        .with(fmt::layer())
        .init();

    tracing::info!("🚀 Iniciando Sistema de Reposição de Aulas...");

    let config = AppConfig::from_env()
        .map_err(|e| anyhow::anyhow!("Configuração de ambiente incompleta: {}", e))?;

    // --- Configuração da Base de Dados ---
    let db_pool = match db::create_db_pool().await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("❌ Falha crítica ao inicializar a base de dados: {}", e);
            return Err(anyhow::anyhow!("Falha ao conectar/migrar DB: {}", e));
        }
    };

    // --- Gateway de Notificação ---
    let notificador: Arc<dyn Notificador> = match NotificadorSmtp::from_config(&config) {
        Ok(Some(smtp)) => {
            tracing::info!("📧 Transporte SMTP configurado.");
            Arc::new(smtp)
        }
        Ok(None) => {
            tracing::warn!("⚠️ SMTP_HOST não definido; e-mails serão apenas logados.");
            Arc::new(NotificadorLog)
        }
        Err(e) => {
            tracing::error!("❌ Configuração SMTP inválida: {}", e);
            return Err(anyhow::anyhow!("Falha ao configurar SMTP: {}", e));
        }
    };

    // --- Criação do Estado da Aplicação ---
    let app_state = AppState {
        db_pool,
        config: Arc::new(config),
        notificador,
    };

    // --- Configuração do Endereço e Listener ---
    let addr = SocketAddr::from(([0, 0, 0, 0], 3000));
    tracing::info!("📡 Servidor escutando em http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("❌ Falha ao iniciar listener na porta 3000: {}", e);
            return Err(e.into());
        }
    };

    // --- Criação do Router e Aplicação das Camadas ---
    let app = web::routes::create_router(app_state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

    tracing::info!("👂 Servidor pronto para aceitar conexões...");
    if let Err(e) = serve(listener, app.into_make_service()).await {
        tracing::error!("❌ Erro fatal no servidor: {}", e);
        return Err(e.into());
    }

    Ok(())
}
