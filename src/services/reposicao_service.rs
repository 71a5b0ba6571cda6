// src/services/reposicao_service.rs
use crate::{
    error::{AppError, AppResult},
    models::solicitacao::{Assinatura, SolicitacaoReposicao, StatusSolicitacao},
};
use sqlx::SqlitePool;

const COLUNAS: &str = "id, motivo, data, horario, sala, qt_alunos, status, comentario, turma_id, professor_matricula";

pub async fn buscar_por_id(
    db_pool: &SqlitePool,
    id: i64,
) -> AppResult<Option<SolicitacaoReposicao>> {
    let solicitacao = sqlx::query_as::<_, SolicitacaoReposicao>(&format!(
        "SELECT {COLUNAS} FROM solicitacoes_reposicao WHERE id = ?1"
    ))
    .bind(id)
    .fetch_optional(db_pool)
    .await?;
    Ok(solicitacao)
}

pub async fn listar_por_professor(
    db_pool: &SqlitePool,
    matricula: i64,
) -> AppResult<Vec<SolicitacaoReposicao>> {
    let solicitacoes = sqlx::query_as::<_, SolicitacaoReposicao>(&format!(
        "SELECT {COLUNAS} FROM solicitacoes_reposicao WHERE professor_matricula = ?1 ORDER BY id DESC"
    ))
    .bind(matricula)
    .fetch_all(db_pool)
    .await?;
    Ok(solicitacoes)
}

/// Registra (ou sobrescreve) a assinatura de um aluno sobre uma solicitação.
/// Nenhuma transição de status acontece aqui: a assinatura é insumo para a
/// decisão humana do coordenador.
pub async fn registrar_assinatura(
    db_pool: &SqlitePool,
    solicitacao_id: i64,
    aluno_matricula: i64,
    concorda: bool,
) -> AppResult<Assinatura> {
    let solicitacao = buscar_por_id(db_pool, solicitacao_id)
        .await?
        .ok_or_else(|| {
            AppError::NaoEncontrado("Solicitação de reposição não encontrada.".to_string())
        })?;

    if solicitacao.status.terminal() {
        return Err(AppError::RegraDeNegocio(format!(
            "Esta solicitação não aceita mais assinaturas, pois seu status atual é '{}'.",
            solicitacao.status.as_str()
        )));
    }

    let aluno_existe: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM alunos WHERE matricula = ?1")
        .bind(aluno_matricula)
        .fetch_one(db_pool)
        .await?;
    if aluno_existe == 0 {
        return Err(AppError::NaoEncontrado("Aluno não encontrado.".to_string()));
    }

    // Upsert na chave composta: reenvio sobrescreve, nunca duplica
    sqlx::query(
        r#"
        INSERT INTO assinaturas (solicitacao_id, aluno_matricula, concorda)
        VALUES (?1, ?2, ?3)
        ON CONFLICT (solicitacao_id, aluno_matricula)
        DO UPDATE SET concorda = excluded.concorda
        "#,
    )
    .bind(solicitacao_id)
    .bind(aluno_matricula)
    .bind(concorda)
    .execute(db_pool)
    .await?;

    tracing::debug!(
        "Assinatura registrada: solicitação {}, aluno {}, concorda={}.",
        solicitacao_id,
        aluno_matricula,
        concorda
    );

    Ok(Assinatura {
        solicitacao_id,
        aluno_matricula,
        concorda,
    })
}

pub async fn listar_assinaturas(
    db_pool: &SqlitePool,
    solicitacao_id: i64,
) -> AppResult<Vec<Assinatura>> {
    let assinaturas = sqlx::query_as::<_, Assinatura>(
        "SELECT solicitacao_id, aluno_matricula, concorda FROM assinaturas WHERE solicitacao_id = ?1 ORDER BY aluno_matricula ASC",
    )
    .bind(solicitacao_id)
    .fetch_all(db_pool)
    .await?;
    Ok(assinaturas)
}

/// Transição explícita PENDENTE -> AGUARDANDO_APROVACAO, invocada pelo
/// professor quando encerra a coleta de assinaturas. O headcount para a
/// merenda (qt_alunos) é congelado aqui: total de assinaturas com concordância.
pub async fn enviar_para_aprovacao(
    db_pool: &SqlitePool,
    solicitacao_id: i64,
) -> AppResult<SolicitacaoReposicao> {
    let confirmados: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM assinaturas WHERE solicitacao_id = ?1 AND concorda = 1",
    )
    .bind(solicitacao_id)
    .fetch_one(db_pool)
    .await?;

    // Update condicional: só sai de PENDENTE
    let afetadas = sqlx::query(
        "UPDATE solicitacoes_reposicao SET status = ?1, qt_alunos = ?2 WHERE id = ?3 AND status = ?4",
    )
    .bind(StatusSolicitacao::AguardandoAprovacao)
    .bind(confirmados)
    .bind(solicitacao_id)
    .bind(StatusSolicitacao::Pendente)
    .execute(db_pool)
    .await?
    .rows_affected();

    if afetadas == 0 {
        let atual = buscar_por_id(db_pool, solicitacao_id).await?.ok_or_else(|| {
            AppError::NaoEncontrado("Solicitação de reposição não encontrada.".to_string())
        })?;
        return Err(AppError::RegraDeNegocio(format!(
            "Esta solicitação não pode ser enviada para aprovação, pois seu status atual é '{}'.",
            atual.status.as_str()
        )));
    }

    tracing::info!(
        "Solicitação {} enviada para aprovação com {} aluno(s) confirmado(s).",
        solicitacao_id,
        confirmados
    );

    buscar_por_id(db_pool, solicitacao_id)
        .await?
        .ok_or(AppError::InternalServerError)
}
