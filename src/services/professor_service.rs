// src/services/professor_service.rs
use crate::{
    config::AppConfig,
    error::{e_violacao_de_unicidade, AppError, AppResult},
    models::{
        professor::{AtualizaProfessor, NovoProfessor, Professor},
        solicitacao::{NovaSolicitacao, SolicitacaoReposicao, StatusSolicitacao},
    },
    services::{
        auth_service,
        email_service::{self, Email, Notificador},
        reposicao_service, turma_service,
    },
};
use sqlx::SqlitePool;
use std::collections::BTreeSet;

/// Cadastra um novo professor aplicando o porteiro de autocadastro e a
/// unicidade global de e-mail. O registro retornado nunca serializa o hash.
pub async fn cadastrar_professor(
    db_pool: &SqlitePool,
    config: &AppConfig,
    dados: NovoProfessor,
    criado_por_admin: bool,
) -> AppResult<Professor> {
    auth_service::validar_token_cadastro(config, dados.token_seguro.as_deref(), criado_por_admin)?;

    if auth_service::email_em_uso(db_pool, &dados.email).await? {
        return Err(AppError::RegraDeNegocio(
            "O e-mail informado já está em uso.".to_string(),
        ));
    }

    let senha_hash = auth_service::hash_senha(&dados.senha).await?;

    let resultado = sqlx::query(
        "INSERT INTO professores (matricula, nome, email, senha_hash) VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(dados.matricula)
    .bind(&dados.nome)
    .bind(&dados.email)
    .bind(&senha_hash)
    .execute(db_pool)
    .await;

    if let Err(erro) = &resultado {
        if e_violacao_de_unicidade(erro) {
            tracing::warn!("Falha ao cadastrar professor: matrícula {} já existe.", dados.matricula);
            return Err(AppError::RegraDeNegocio(
                "A matrícula informada já está em uso.".to_string(),
            ));
        }
    }
    resultado?;

    tracing::info!("✅ Professor {} cadastrado com sucesso.", dados.matricula);
    buscar_por_matricula(db_pool, dados.matricula)
        .await?
        .ok_or(AppError::InternalServerError)
}

pub async fn buscar_por_matricula(
    db_pool: &SqlitePool,
    matricula: i64,
) -> AppResult<Option<Professor>> {
    let professor = sqlx::query_as::<_, Professor>(
        "SELECT matricula, nome, email, senha_hash FROM professores WHERE matricula = ?1",
    )
    .bind(matricula)
    .fetch_optional(db_pool)
    .await?;
    Ok(professor)
}

pub async fn buscar_todos(db_pool: &SqlitePool) -> AppResult<Vec<Professor>> {
    let professores = sqlx::query_as::<_, Professor>(
        "SELECT matricula, nome, email, senha_hash FROM professores ORDER BY matricula ASC",
    )
    .fetch_all(db_pool)
    .await?;
    Ok(professores)
}

pub async fn atualizar_professor(
    db_pool: &SqlitePool,
    matricula: i64,
    dados: AtualizaProfessor,
) -> AppResult<Option<Professor>> {
    let Some(atual) = buscar_por_matricula(db_pool, matricula).await? else {
        return Ok(None);
    };

    // A unicidade global de e-mail também vale na atualização; só o
    // próprio registro pode manter o e-mail que já possui.
    if !atual.email.eq_ignore_ascii_case(&dados.email)
        && auth_service::email_em_uso(db_pool, &dados.email).await?
    {
        return Err(AppError::RegraDeNegocio(
            "O e-mail informado já está em uso.".to_string(),
        ));
    }

    sqlx::query("UPDATE professores SET nome = ?1, email = ?2 WHERE matricula = ?3")
        .bind(&dados.nome)
        .bind(&dados.email)
        .bind(matricula)
        .execute(db_pool)
        .await?;

    buscar_por_matricula(db_pool, matricula).await
}

pub async fn deletar_professor(db_pool: &SqlitePool, matricula: i64) -> AppResult<bool> {
    let afetadas = sqlx::query("DELETE FROM professores WHERE matricula = ?1")
        .bind(matricula)
        .execute(db_pool)
        .await?
        .rows_affected();
    Ok(afetadas > 0)
}

/// Inicia o processo de solicitação de reposição: persiste o registro com
/// status PENDENTE e dispara o e-mail de convocação para cada aluno da
/// turma, com o link individual do formulário de assinatura. Turma sem
/// alunos é caso válido: nenhum e-mail é enviado e a solicitação retorna.
pub async fn iniciar_solicitacao_reposicao(
    db_pool: &SqlitePool,
    notificador: &dyn Notificador,
    config: &AppConfig,
    dados: NovaSolicitacao,
) -> AppResult<SolicitacaoReposicao> {
    // Integridade referencial validada pelo engine, não só pelo banco
    let professor = buscar_por_matricula(db_pool, dados.id_professor)
        .await?
        .ok_or_else(|| AppError::NaoEncontrado("Professor não encontrado.".to_string()))?;

    if turma_service::buscar_por_id(db_pool, dados.id_turma).await?.is_none() {
        return Err(AppError::NaoEncontrado("Turma não encontrada.".to_string()));
    }

    let resultado = sqlx::query(
        r#"
        INSERT INTO solicitacoes_reposicao
            (motivo, data, horario, sala, qt_alunos, status, turma_id, professor_matricula)
        VALUES (?1, ?2, ?3, ?4, 0, ?5, ?6, ?7)
        "#,
    )
    .bind(&dados.motivo)
    .bind(dados.data)
    .bind(&dados.horario)
    .bind(&dados.sala)
    .bind(StatusSolicitacao::Pendente)
    .bind(dados.id_turma)
    .bind(dados.id_professor)
    .execute(db_pool)
    .await?;

    let id_solicitacao = resultado.last_insert_rowid();
    let solicitacao = reposicao_service::buscar_por_id(db_pool, id_solicitacao)
        .await?
        .ok_or(AppError::InternalServerError)?;

    tracing::info!(
        "Solicitação de reposição {} criada pelo professor {} ({}).",
        id_solicitacao,
        dados.id_professor,
        professor.nome
    );

    let alunos = turma_service::buscar_alunos_por_turma(db_pool, dados.id_turma).await?;
    if alunos.is_empty() {
        tracing::info!(
            "Nenhum aluno encontrado para a turma {}. Nenhum e-mail enviado.",
            dados.id_turma
        );
        return Ok(solicitacao);
    }

    for aluno in &alunos {
        let link_formulario = format!(
            "{}/assinar/{}/{}",
            config.frontend_url, solicitacao.id, aluno.matricula
        );
        let html = format!(
            r#"<p>Olá, {nome},</p>
<p>Uma aula de reposição foi proposta para sua turma com os seguintes detalhes:</p>
<ul>
  <li><strong>Data:</strong> {data}</li>
  <li><strong>Horário:</strong> {horario}</li>
  <li><strong>Sala:</strong> {sala}</li>
</ul>
<p>Por favor, confirme sua presença ou ausência através do formulário abaixo. Sua resposta é muito importante!</p>
<p><a href="{link}">Responder Formulário</a></p>"#,
            nome = aluno.nome,
            data = solicitacao.data.format("%d/%m/%Y"),
            horario = solicitacao.horario,
            sala = solicitacao.sala,
            link = link_formulario
        );

        email_service::enviar_seguro(
            notificador,
            Email {
                to: vec![aluno.email.clone()],
                subject: "Convite para Aula de Reposição".to_string(),
                text: None,
                html,
            },
        )
        .await;
    }

    Ok(solicitacao)
}

/// Substitui a associação professor↔disciplinas de forma atômica: ou o
/// lote inteiro é aceito, ou nada é gravado.
pub async fn associar_disciplinas(
    db_pool: &SqlitePool,
    matricula: i64,
    disciplina_ids: &[i64],
) -> AppResult<()> {
    if buscar_por_matricula(db_pool, matricula).await?.is_none() {
        return Err(AppError::RegraDeNegocio(
            "Professor não encontrado para a matrícula informada.".to_string(),
        ));
    }

    // Dedup: a associação é um conjunto de ids
    let ids: BTreeSet<i64> = disciplina_ids.iter().copied().collect();

    if !ids.is_empty() {
        let ids_json = serde_json::to_string(&ids).map_err(|e| {
            tracing::error!("Erro ao serializar ids de disciplinas: {:?}", e);
            AppError::InternalServerError
        })?;

        let existentes: i64 = sqlx::query_scalar(
            "SELECT COUNT(DISTINCT id) FROM disciplinas WHERE id IN (SELECT value FROM json_each(?1))",
        )
        .bind(&ids_json)
        .fetch_one(db_pool)
        .await?;

        if existentes != ids.len() as i64 {
            return Err(AppError::RegraDeNegocio(
                "Uma ou mais disciplinas informadas são inválidas ou não existem.".to_string(),
            ));
        }
    }

    let mut tx = db_pool.begin().await?;

    sqlx::query("DELETE FROM professor_disciplinas WHERE professor_matricula = ?1")
        .bind(matricula)
        .execute(&mut *tx)
        .await?;

    for disciplina_id in &ids {
        sqlx::query(
            "INSERT INTO professor_disciplinas (professor_matricula, disciplina_id) VALUES (?1, ?2)",
        )
        .bind(matricula)
        .bind(disciplina_id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    tracing::info!("✅ Disciplinas associadas ao professor {}: {:?}", matricula, ids);
    Ok(())
}

/// Ids das disciplinas associadas a um professor.
pub async fn disciplinas_do_professor(
    db_pool: &SqlitePool,
    matricula: i64,
) -> AppResult<Vec<i64>> {
    let ids = sqlx::query_scalar(
        "SELECT disciplina_id FROM professor_disciplinas WHERE professor_matricula = ?1 ORDER BY disciplina_id ASC",
    )
    .bind(matricula)
    .fetch_all(db_pool)
    .await?;
    Ok(ids)
}
