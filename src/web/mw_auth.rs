// src/web/mw_auth.rs
use crate::{services::auth_service, state::AppState};
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

// Identidade verificada do chamador, quando presente.
#[derive(Clone, Debug)]
pub struct UsuarioAutenticado {
    pub matricula: i64,
    pub nome: String,
    pub perfil: String,
}

// Sempre anexada às requisições; handlers extraem Extension<IdentidadeOpcional>.
#[derive(Clone, Debug, Default)]
pub struct IdentidadeOpcional(pub Option<UsuarioAutenticado>);

// Middleware de identidade OPCIONAL: se houver um Bearer token válido,
// anexa o usuário às extensões da requisição. Token ausente ou inválido
// não é erro; a chamada segue anônima.
pub async fn auth_opcional(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|valor| valor.to_str().ok())
        .and_then(|valor| valor.strip_prefix("Bearer "))
        .map(str::to_string);

    let usuario = token.and_then(|token| {
        match auth_service::verificar_token(&state.config, &token) {
            Some(claims) => {
                tracing::debug!(
                    "Identidade opcional: {} ({}) autenticado.",
                    claims.sub,
                    claims.perfil
                );
                Some(UsuarioAutenticado {
                    matricula: claims.sub,
                    nome: claims.nome,
                    perfil: claims.perfil,
                })
            }
            None => {
                tracing::debug!("Bearer token inválido ignorado; chamada segue anônima.");
                None
            }
        }
    });

    request.extensions_mut().insert(IdentidadeOpcional(usuario));
    next.run(request).await
}
