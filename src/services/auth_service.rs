// src/services/auth_service.rs
use crate::{
    config::AppConfig,
    error::{AppError, AppResult},
    models::{coordenador::Coordenador, professor::Professor},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// Payload do token de identidade (Bearer).
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub nome: String,
    pub perfil: String, // "professor" | "coordenador"
    pub exp: i64,
}

#[derive(Debug, Serialize)]
pub struct RespostaLogin {
    pub token: String,
    pub matricula: i64,
    pub nome: String,
    pub perfil: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub email: String,
    pub senha: String,
}

/// Verifica se a senha fornecida corresponde ao hash guardado.
pub async fn verificar_senha(senha: &str, hash_guardado: &str) -> AppResult<bool> {
    let senha = senha.to_string();
    let hash_guardado = hash_guardado.to_string();
    tokio::task::spawn_blocking(move || {
        tracing::debug!("Verificando hash bcrypt...");
        bcrypt::verify(&senha, &hash_guardado)
    })
    .await
    .map_err(|e| {
        tracing::error!("Erro na task spawn_blocking (verificar_senha): {:?}", e);
        AppError::InternalServerError
    })?
    .map_err(|e| {
        tracing::error!("Erro bcrypt ao verificar senha: {:?}", e);
        AppError::PasswordHashingError
    })
}

/// Gera um hash bcrypt para uma senha.
pub async fn hash_senha(senha: &str) -> AppResult<String> {
    let senha = senha.to_string();
    tokio::task::spawn_blocking(move || {
        tracing::debug!("Gerando hash bcrypt...");
        bcrypt::hash(&senha, bcrypt::DEFAULT_COST)
    })
    .await
    .map_err(|e| {
        tracing::error!("Erro na task spawn_blocking (hash_senha): {:?}", e);
        AppError::InternalServerError
    })?
    .map_err(|e| {
        tracing::error!("Erro bcrypt ao gerar hash: {:?}", e);
        AppError::PasswordHashingError
    })
}

/// Porteiro do autocadastro: compara o token recebido com o segredo único
/// do processo. Quando `criado_por_admin` é true (chamador já autenticado
/// via middleware de identidade opcional), a verificação é dispensada.
pub fn validar_token_cadastro(
    config: &AppConfig,
    token_recebido: Option<&str>,
    criado_por_admin: bool,
) -> AppResult<()> {
    if criado_por_admin {
        tracing::debug!("Cadastro feito por chamador autenticado; token dispensado.");
        return Ok(());
    }
    match token_recebido {
        Some(token) if token == config.registration_token_secret => Ok(()),
        _ => Err(AppError::RegraDeNegocio(
            "Acesso negado: Token de cadastro inválido ou ausente.".to_string(),
        )),
    }
}

/// E-mail é único entre todas as entidades com conta (professores,
/// coordenadores e alunos).
pub async fn email_em_uso(db_pool: &SqlitePool, email: &str) -> AppResult<bool> {
    let encontrados: i64 = sqlx::query_scalar(
        r#"
        SELECT
            (SELECT COUNT(*) FROM professores WHERE email = ?1)
          + (SELECT COUNT(*) FROM coordenadores WHERE email = ?1)
          + (SELECT COUNT(*) FROM alunos WHERE email = ?1)
        "#,
    )
    .bind(email)
    .fetch_one(db_pool)
    .await?;
    Ok(encontrados > 0)
}

pub fn gerar_token(config: &AppConfig, matricula: i64, nome: &str, perfil: &str) -> AppResult<String> {
    let claims = Claims {
        sub: matricula,
        nome: nome.to_string(),
        perfil: perfil.to_string(),
        exp: (Utc::now() + Duration::hours(8)).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| {
        tracing::error!("Erro ao assinar token JWT: {:?}", e);
        AppError::InternalServerError
    })
}

/// Valida um token Bearer. Retorna None para token inválido/expirado:
/// no middleware opcional isso não é erro, a chamada segue anônima.
pub fn verificar_token(config: &AppConfig, token: &str) -> Option<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map(|dados| dados.claims)
    .ok()
}

/// Autentica por e-mail/senha contra professores e coordenadores.
pub async fn login(
    db_pool: &SqlitePool,
    config: &AppConfig,
    payload: LoginPayload,
) -> AppResult<RespostaLogin> {
    let professor = sqlx::query_as::<_, Professor>(
        "SELECT matricula, nome, email, senha_hash FROM professores WHERE email = ?1",
    )
    .bind(&payload.email)
    .fetch_optional(db_pool)
    .await?;

    if let Some(professor) = professor {
        if verificar_senha(&payload.senha, &professor.senha_hash).await? {
            let token = gerar_token(config, professor.matricula, &professor.nome, "professor")?;
            return Ok(RespostaLogin {
                token,
                matricula: professor.matricula,
                nome: professor.nome,
                perfil: "professor".to_string(),
            });
        }
        return Err(AppError::CredenciaisInvalidas);
    }

    let coordenador = sqlx::query_as::<_, Coordenador>(
        "SELECT matricula, nome, email, departamento, senha_hash FROM coordenadores WHERE email = ?1",
    )
    .bind(&payload.email)
    .fetch_optional(db_pool)
    .await?;

    if let Some(coordenador) = coordenador {
        if verificar_senha(&payload.senha, &coordenador.senha_hash).await? {
            let token = gerar_token(config, coordenador.matricula, &coordenador.nome, "coordenador")?;
            return Ok(RespostaLogin {
                token,
                matricula: coordenador.matricula,
                nome: coordenador.nome,
                perfil: "coordenador".to_string(),
            });
        }
    }

    Err(AppError::CredenciaisInvalidas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::teste_util::{self, TOKEN_CADASTRO};

    #[test]
    fn token_correto_libera_autocadastro() {
        let config = teste_util::config_teste();
        assert!(validar_token_cadastro(&config, Some(TOKEN_CADASTRO), false).is_ok());
    }

    #[test]
    fn token_errado_ou_ausente_bloqueia_autocadastro() {
        let config = teste_util::config_teste();
        let errado = validar_token_cadastro(&config, Some("palpite"), false);
        assert!(matches!(errado, Err(AppError::RegraDeNegocio(_))));

        let ausente = validar_token_cadastro(&config, None, false);
        assert!(matches!(ausente, Err(AppError::RegraDeNegocio(_))));
    }

    #[test]
    fn chamador_autenticado_dispensa_token() {
        let config = teste_util::config_teste();
        assert!(validar_token_cadastro(&config, None, true).is_ok());
    }

    #[test]
    fn token_jwt_gerado_e_verificado() {
        let config = teste_util::config_teste();
        let token = gerar_token(&config, 42, "Maria", "coordenador").expect("token");
        let claims = verificar_token(&config, &token).expect("claims válidas");
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.perfil, "coordenador");

        assert!(verificar_token(&config, "token.invalido.mesmo").is_none());
    }

    #[tokio::test]
    async fn email_unico_entre_todas_as_entidades() {
        let pool = teste_util::pool_em_memoria().await;
        let turma_id = teste_util::criar_turma(&pool, "INF-3A").await;
        teste_util::criar_professor(&pool, 100, "prof@escola.br").await;
        teste_util::criar_aluno(&pool, 200, turma_id, "aluno@escola.br").await;

        assert!(email_em_uso(&pool, "prof@escola.br").await.unwrap());
        assert!(email_em_uso(&pool, "aluno@escola.br").await.unwrap());
        assert!(!email_em_uso(&pool, "livre@escola.br").await.unwrap());
    }

    #[tokio::test]
    async fn hash_e_verificacao_de_senha() {
        let hash = hash_senha("s3nh4-f0rte").await.expect("hash");
        assert_ne!(hash, "s3nh4-f0rte");
        assert!(verificar_senha("s3nh4-f0rte", &hash).await.unwrap());
        assert!(!verificar_senha("outra", &hash).await.unwrap());
    }
}
