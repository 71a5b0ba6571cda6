// src/services/mod.rs
pub mod aluno_service;
pub mod auth_service;
pub mod coordenador_service;
pub mod disciplina_service;
pub mod email_service;
pub mod nutricionista_service;
pub mod professor_service;
pub mod reposicao_service;
pub mod turma_service;

#[cfg(test)]
pub(crate) mod teste_util {
    use crate::config::AppConfig;
    use crate::models::solicitacao::StatusSolicitacao;
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::SqlitePool;

    pub const TOKEN_CADASTRO: &str = "segredo-de-cadastro";

    pub async fn pool_em_memoria() -> SqlitePool {
        // Uma única conexão: cada conexão ':memory:' teria um banco próprio
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

    pub fn config_teste() -> AppConfig {
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

    pub async fn criar_turma(pool: &SqlitePool, nome: &str) -> i64 {
        sqlx::query("INSERT INTO turmas (nome) VALUES (?1)")
            .bind(nome)
            .execute(pool)
            .await
            .expect("insert turma")
            .last_insert_rowid()
    }

    pub async fn criar_disciplina(pool: &SqlitePool, nome: &str) -> i64 {
        sqlx::query("INSERT INTO disciplinas (nome) VALUES (?1)")
            .bind(nome)
            .execute(pool)
            .await
            .expect("insert disciplina")
            .last_insert_rowid()
    }

    pub async fn criar_professor(pool: &SqlitePool, matricula: i64, email: &str) {
        sqlx::query(
            "INSERT INTO professores (matricula, nome, email, senha_hash) VALUES (?1, ?2, ?3, 'hash')",
        )
        .bind(matricula)
        .bind(format!("Professor {matricula}"))
        .bind(email)
        .execute(pool)
        .await
        .expect("insert professor");
    }

    pub async fn criar_coordenador(pool: &SqlitePool, matricula: i64, email: &str) {
        sqlx::query(
            "INSERT INTO coordenadores (matricula, nome, email, departamento, senha_hash) VALUES (?1, ?2, ?3, 'Informática', 'hash')",
        )
        .bind(matricula)
        .bind(format!("Coordenador {matricula}"))
        .bind(email)
        .execute(pool)
        .await
        .expect("insert coordenador");
    }

    pub async fn criar_aluno(pool: &SqlitePool, matricula: i64, turma_id: i64, email: &str) {
        sqlx::query("INSERT INTO alunos (matricula, nome, email, turma_id) VALUES (?1, ?2, ?3, ?4)")
            .bind(matricula)
            .bind(format!("Aluno {matricula}"))
            .bind(email)
            .bind(turma_id)
            .execute(pool)
            .await
            .expect("insert aluno");
    }

    pub async fn criar_nutricionista(pool: &SqlitePool, email: &str) {
        sqlx::query("INSERT INTO nutricionistas (nome, email) VALUES ('Nutri', ?1)")
            .bind(email)
            .execute(pool)
            .await
            .expect("insert nutricionista");
    }

    pub async fn criar_solicitacao(
        pool: &SqlitePool,
        professor_matricula: i64,
        turma_id: i64,
        status: StatusSolicitacao,
    ) -> i64 {
        sqlx::query(
            r#"
            INSERT INTO solicitacoes_reposicao
                (motivo, data, horario, sala, qt_alunos, status, turma_id, professor_matricula)
            VALUES ('Falta justificada', '2026-09-10', '19:00-21:00', 'B-102', 0, ?1, ?2, ?3)
            "#,
        )
        .bind(status)
        .bind(turma_id)
        .bind(professor_matricula)
        .execute(pool)
        .await
        .expect("insert solicitação")
        .last_insert_rowid()
    }
}
