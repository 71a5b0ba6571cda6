// src/web/routes.rs
use crate::{
    state::AppState,
    web::{
        auth_handlers, cadastro_handlers, coordenador_handlers, mw_auth, professor_handlers,
        reposicao_handlers,
    },
};
use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

pub fn create_router(app_state: AppState) -> Router {
    // --- Rotas de Professor ---
    let professor_routes = Router::new()
        .route("/cadastrar", post(professor_handlers::handle_cadastrar))
        .route("/", get(professor_handlers::handle_listar_todos))
        .route("/solicitar-reposicao", post(professor_handlers::handle_solicitar_reposicao))
        .route(
            "/{matricula}",
            get(professor_handlers::handle_buscar)
                .put(professor_handlers::handle_atualizar)
                .delete(professor_handlers::handle_deletar),
        )
        .route("/{matricula}/reposicoes", get(professor_handlers::handle_listar_reposicoes))
        .route("/{matricula}/disciplinas", post(professor_handlers::handle_associar_disciplinas));

    // --- Rotas de Coordenador ---
    let coordenador_routes = Router::new()
        .route("/cadastrar", post(coordenador_handlers::handle_cadastrar))
        .route("/", get(coordenador_handlers::handle_listar_todos))
        .route(
            "/{matricula}",
            get(coordenador_handlers::handle_buscar)
                .put(coordenador_handlers::handle_atualizar)
                .delete(coordenador_handlers::handle_deletar),
        )
        .route(
            "/solicitacoes/{id}/avaliar",
            post(coordenador_handlers::handle_avaliar_solicitacao),
        )
        .route(
            "/notificar-falta/{matricula}",
            post(coordenador_handlers::handle_notificar_falta),
        );

    // --- Rotas de Reposição (assinatura e transições) ---
    let reposicao_routes = Router::new()
        .route("/{id}", get(reposicao_handlers::handle_buscar))
        .route("/{id}/assinar", post(reposicao_handlers::handle_assinar))
        .route("/{id}/assinaturas", get(reposicao_handlers::handle_listar_assinaturas))
        .route(
            "/{id}/enviar-aprovacao",
            post(reposicao_handlers::handle_enviar_aprovacao),
        );

    // --- CRUD das entidades de apoio ---
    let aluno_routes = Router::new()
        .route(
            "/",
            post(cadastro_handlers::handle_cadastrar_aluno)
                .get(cadastro_handlers::handle_listar_alunos),
        )
        .route(
            "/{matricula}",
            get(cadastro_handlers::handle_buscar_aluno)
                .delete(cadastro_handlers::handle_deletar_aluno),
        );

    let turma_routes = Router::new()
        .route(
            "/",
            post(cadastro_handlers::handle_criar_turma)
                .get(cadastro_handlers::handle_listar_turmas),
        )
        .route(
            "/{id}",
            get(cadastro_handlers::handle_buscar_turma)
                .delete(cadastro_handlers::handle_deletar_turma),
        )
        .route("/{id}/alunos", get(cadastro_handlers::handle_listar_alunos_da_turma));

    let disciplina_routes = Router::new()
        .route(
            "/",
            post(cadastro_handlers::handle_criar_disciplina)
                .get(cadastro_handlers::handle_listar_disciplinas),
        )
        .route(
            "/{id}",
            get(cadastro_handlers::handle_buscar_disciplina)
                .delete(cadastro_handlers::handle_deletar_disciplina),
        );

    let nutricionista_routes = Router::new()
        .route(
            "/",
            post(cadastro_handlers::handle_cadastrar_nutricionista)
                .get(cadastro_handlers::handle_listar_nutricionistas),
        )
        .route("/{id}", delete(cadastro_handlers::handle_deletar_nutricionista));

    // --- Router Final ---
    // A identidade opcional vale para toda a superfície: rotas de cadastro
    // a usam para dispensar o token, as demais simplesmente a ignoram.
    Router::new()
        .route("/auth/login", post(auth_handlers::handle_login))
        .nest("/professor", professor_routes)
        .nest("/coordenador", coordenador_routes)
        .nest("/reposicao", reposicao_routes)
        .nest("/aluno", aluno_routes)
        .nest("/turma", turma_routes)
        .nest("/disciplina", disciplina_routes)
        .nest("/nutricionista", nutricionista_routes)
        .layer(middleware::from_fn_with_state(
            app_state.clone(),
            mw_auth::auth_opcional,
        ))
        .with_state(app_state)
}
