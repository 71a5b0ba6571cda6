// src/services/email_service.rs
use crate::{
    config::AppConfig,
    error::{AppError, AppResult},
};
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::sync::Mutex;

/// Um e-mail a enviar: um ou mais destinatários, assunto, corpo HTML e
/// opcionalmente uma versão em texto simples.
#[derive(Debug, Clone)]
pub struct Email {
    pub to: Vec<String>,
    pub subject: String,
    pub text: Option<String>,
    pub html: String,
}

/// Gateway de notificação. A implementação real fala SMTP; os testes
/// injetam um spy em memória.
#[async_trait]
pub trait Notificador: Send + Sync {
    async fn enviar(&self, email: Email) -> AppResult<()>;
}

/// Envia um e-mail engolindo a falha (apenas loga). As notificações são
/// best-effort: a mudança de estado que as disparou já foi persistida e
/// nunca é desfeita por causa de um envio que falhou.
pub async fn enviar_seguro(notificador: &dyn Notificador, email: Email) {
    if email.to.is_empty() {
        tracing::debug!("E-mail '{}' sem destinatários; nada a enviar.", email.subject);
        return;
    }
    let assunto = email.subject.clone();
    if let Err(e) = notificador.enviar(email).await {
        tracing::warn!("Falha ao enviar e-mail '{}': {}. Operação segue.", assunto, e);
    }
}

// --- Implementação SMTP (lettre) ---

pub struct NotificadorSmtp {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    remetente: Mailbox,
}

impl NotificadorSmtp {
    /// Monta o transporte a partir da configuração. Retorna None quando
    /// SMTP_HOST não está definido (ambiente de desenvolvimento).
    pub fn from_config(config: &AppConfig) -> AppResult<Option<Self>> {
        let Some(host) = config.smtp_host.as_deref() else {
            return Ok(None);
        };

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(host)
            .map_err(|e| AppError::EmailError(format!("Relay SMTP inválido: {e}")))?;

        if let (Some(usuario), Some(senha)) = (&config.smtp_usuario, &config.smtp_senha) {
            builder = builder.credentials(Credentials::new(usuario.clone(), senha.clone()));
        }

        let remetente: Mailbox = config
            .email_remetente
            .parse()
            .map_err(|e| AppError::EmailError(format!("Remetente inválido: {e}")))?;

        Ok(Some(Self {
            transport: builder.build(),
            remetente,
        }))
    }
}

#[async_trait]
impl Notificador for NotificadorSmtp {
    async fn enviar(&self, email: Email) -> AppResult<()> {
        let mut builder = Message::builder()
            .from(self.remetente.clone())
            .subject(email.subject.clone());

        for destinatario in &email.to {
            let mailbox: Mailbox = destinatario
                .parse()
                .map_err(|e| AppError::EmailError(format!("Destinatário inválido: {e}")))?;
            builder = builder.to(mailbox);
        }

        let mensagem = match email.text {
            Some(texto) => builder
                .multipart(MultiPart::alternative_plain_html(texto, email.html))
                .map_err(|e| AppError::EmailError(format!("Erro ao montar e-mail: {e}")))?,
            None => builder
                .header(ContentType::TEXT_HTML)
                .body(email.html)
                .map_err(|e| AppError::EmailError(format!("Erro ao montar e-mail: {e}")))?,
        };

        self.transport
            .send(mensagem)
            .await
            .map_err(|e| AppError::EmailError(format!("Falha no envio SMTP: {e}")))?;

        tracing::debug!("E-mail '{}' enviado para {:?}.", email.subject, email.to);
        Ok(())
    }
}

// --- Implementações auxiliares ---

/// Fallback de desenvolvimento: apenas loga o que seria enviado.
pub struct NotificadorLog;

#[async_trait]
impl Notificador for NotificadorLog {
    async fn enviar(&self, email: Email) -> AppResult<()> {
        tracing::info!(
            "📧 [simulado] Para: {:?} | Assunto: {}",
            email.to,
            email.subject
        );
        Ok(())
    }
}

/// Spy em memória para os testes verificarem o fan-out de notificações.
#[derive(Default)]
pub struct NotificadorMemoria {
    enviados: Mutex<Vec<Email>>,
    pub falhar: bool,
}

impl NotificadorMemoria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Variante que falha todo envio, para exercitar o caminho best-effort.
    pub fn sempre_falha() -> Self {
        Self {
            enviados: Mutex::new(Vec::new()),
            falhar: true,
        }
    }

    pub fn enviados(&self) -> Vec<Email> {
        self.enviados.lock().expect("lock do spy de e-mails").clone()
    }
}

#[async_trait]
impl Notificador for NotificadorMemoria {
    async fn enviar(&self, email: Email) -> AppResult<()> {
        if self.falhar {
            return Err(AppError::EmailError("falha simulada".to_string()));
        }
        self.enviados
            .lock()
            .expect("lock do spy de e-mails")
            .push(email);
        Ok(())
    }
}
