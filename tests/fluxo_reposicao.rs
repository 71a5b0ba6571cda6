// tests/fluxo_reposicao.rs
//
// Fluxo completo da reposição: convocação, assinaturas, envio para
// aprovação e decisão do coordenador, mais o envelope de erro da API.
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
};
use chrono::NaiveDate;
use reposicao_aulas::{
    config::AppConfig,
    models::{
        solicitacao::{NovaSolicitacao, StatusSolicitacao},
        turma::NovaTurma,
    },
    services::{
        coordenador_service,
        email_service::{Notificador, NotificadorMemoria},
        professor_service, reposicao_service, turma_service,
    },
    state::AppState,
    web::routes,
};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::sync::Arc;
use tower::ServiceExt;

const TOKEN_CADASTRO: &str = "segredo-de-cadastro";

fn config_teste() -> AppConfig {
    AppConfig {
        registration_token_secret: TOKEN_CADASTRO.to_string(),
        jwt_secret: "segredo-jwt-de-teste".to_string(),
        frontend_url: "http://localhost:5173".to_string(),
        email_remetente: "nao-responda@reposicao.edu.br".to_string(),
        smtp_host: None,
        smtp_usuario: None,
        smtp_senha: None,
    }
}

async fn pool_em_memoria() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("pool sqlite em memória");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrações de teste");
    pool
}

async fn seed_professor(pool: &SqlitePool, matricula: i64, email: &str) {
    sqlx::query(
        "INSERT INTO professores (matricula, nome, email, senha_hash) VALUES (?1, 'Prof', ?2, 'hash')",
    )
    .bind(matricula)
    .bind(email)
    .execute(pool)
    .await
    .expect("insert professor");
}

async fn seed_aluno(pool: &SqlitePool, matricula: i64, turma_id: i64, email: &str) {
    sqlx::query("INSERT INTO alunos (matricula, nome, email, turma_id) VALUES (?1, 'Aluno', ?2, ?3)")
        .bind(matricula)
        .bind(email)
        .bind(turma_id)
        .execute(pool)
        .await
        .expect("insert aluno");
}

#[tokio::test]
async fn fluxo_completo_de_aprovacao() {
    let pool = pool_em_memoria().await;
    let config = config_teste();
    let spy = NotificadorMemoria::new();

    let turma = turma_service::criar_turma(
        &pool,
        NovaTurma {
            nome: "INF-3A".to_string(),
            disciplina_id: None,
        },
    )
    .await
    .unwrap();
    seed_professor(&pool, 100, "prof@escola.br").await;
    seed_aluno(&pool, 201, turma.id, "a201@escola.br").await;
    seed_aluno(&pool, 202, turma.id, "a202@escola.br").await;
    seed_aluno(&pool, 203, turma.id, "a203@escola.br").await;
    sqlx::query("INSERT INTO nutricionistas (nome, email) VALUES ('Nutri', 'nutri@escola.br')")
        .execute(&pool)
        .await
        .unwrap();

    // Professor inicia a solicitação: 3 convocações, uma por aluno
    let solicitacao = professor_service::iniciar_solicitacao_reposicao(
        &pool,
        &spy,
        &config,
        NovaSolicitacao {
            motivo: "Congresso".to_string(),
            data: NaiveDate::from_ymd_opt(2026, 9, 10).unwrap(),
            horario: "19:00-21:00".to_string(),
            sala: "B-102".to_string(),
            id_turma: turma.id,
            id_professor: 100,
        },
    )
    .await
    .unwrap();

    let convites = spy.enviados();
    assert_eq!(convites.len(), 3);
    for (convite, matricula) in convites.iter().zip([201, 202, 203]) {
        assert!(convite.html.contains(&format!("/assinar/{}/{}", solicitacao.id, matricula)));
    }

    // Alunos assinam (dois concordam, um não); professor encerra a coleta
    reposicao_service::registrar_assinatura(&pool, solicitacao.id, 201, true)
        .await
        .unwrap();
    reposicao_service::registrar_assinatura(&pool, solicitacao.id, 202, true)
        .await
        .unwrap();
    reposicao_service::registrar_assinatura(&pool, solicitacao.id, 203, false)
        .await
        .unwrap();

    let enviada = reposicao_service::enviar_para_aprovacao(&pool, solicitacao.id)
        .await
        .unwrap();
    assert_eq!(enviada.status, StatusSolicitacao::AguardandoAprovacao);
    assert_eq!(enviada.qt_alunos, 2);

    // Coordenador aprova: um e-mail para professor+turma, outro para a merenda
    let aprovada = coordenador_service::avaliar_solicitacao(
        &pool,
        &spy,
        solicitacao.id,
        StatusSolicitacao::Autorizada,
        None,
    )
    .await
    .unwrap();
    assert_eq!(aprovada.status, StatusSolicitacao::Autorizada);

    let enviados = spy.enviados();
    assert_eq!(enviados.len(), 5, "3 convites + aprovação + merenda");

    let aprovacao = &enviados[3];
    assert_eq!(
        aprovacao.to,
        vec![
            "prof@escola.br",
            "a201@escola.br",
            "a202@escola.br",
            "a203@escola.br"
        ]
    );

    let merenda = &enviados[4];
    assert_eq!(merenda.to, vec!["nutri@escola.br"]);
    assert!(merenda.html.contains("Quantidade de Alunos: 2"));

    // A decisão é única: segunda avaliação observa o erro de negócio
    let repetida = coordenador_service::avaliar_solicitacao(
        &pool,
        &spy,
        solicitacao.id,
        StatusSolicitacao::Negada,
        Some("tarde demais".to_string()),
    )
    .await;
    assert!(repetida.is_err());
}

// --- Superfície HTTP ---

fn app_de_teste(pool: SqlitePool) -> (axum::Router, Arc<NotificadorMemoria>) {
    let spy = Arc::new(NotificadorMemoria::new());
    let notificador: Arc<dyn Notificador> = spy.clone();
    let state = AppState {
        db_pool: pool,
        config: Arc::new(config_teste()),
        notificador,
    };
    (routes::create_router(state), spy)
}

async fn corpo_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).expect("resposta JSON")
}

fn requisicao_json(method: Method, uri: &str, corpo: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(corpo.to_string()))
        .unwrap()
}

#[tokio::test]
async fn solicitacao_sem_id_professor_devolve_400_com_mensagem() {
    let pool = pool_em_memoria().await;
    let (app, _spy) = app_de_teste(pool);

    let response = app
        .oneshot(requisicao_json(
            Method::POST,
            "/professor/solicitar-reposicao",
            serde_json::json!({
                "motivo": "Congresso",
                "data": "2026-09-10",
                "horario": "19:00-21:00",
                "sala": "B-102",
                "idTurma": 1
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let corpo = corpo_json(response).await;
    assert_eq!(
        corpo["message"],
        "O campo idProfessor é obrigatório no corpo da requisição."
    );
}

#[tokio::test]
async fn professor_inexistente_devolve_404_com_envelope() {
    let pool = pool_em_memoria().await;
    let (app, _spy) = app_de_teste(pool);

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/professor/999")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let corpo = corpo_json(response).await;
    assert_eq!(corpo["message"], "Professor não encontrado.");
}

#[tokio::test]
async fn autocadastro_via_api_respeita_o_porteiro() {
    let pool = pool_em_memoria().await;
    let (app, _spy) = app_de_teste(pool);

    // Token errado: barrado com a mensagem de negócio
    let negado = app
        .clone()
        .oneshot(requisicao_json(
            Method::POST,
            "/professor/cadastrar",
            serde_json::json!({
                "matricula": 100,
                "nome": "Carlos",
                "email": "carlos@escola.br",
                "senha": "senha123",
                "token_seguro": "palpite"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(negado.status(), StatusCode::BAD_REQUEST);

    // Token correto: 201 e resposta sem credencial
    let criado = app
        .oneshot(requisicao_json(
            Method::POST,
            "/professor/cadastrar",
            serde_json::json!({
                "matricula": 100,
                "nome": "Carlos",
                "email": "carlos@escola.br",
                "senha": "senha123",
                "token_seguro": TOKEN_CADASTRO
            }),
        ))
        .await
        .unwrap();
    assert_eq!(criado.status(), StatusCode::CREATED);
    let corpo = corpo_json(criado).await;
    assert_eq!(corpo["matricula"], 100);
    assert!(corpo.get("senha_hash").is_none());
    assert!(corpo.get("senha").is_none());
}
