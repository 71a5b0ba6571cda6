// src/services/coordenador_service.rs
use crate::{
    config::AppConfig,
    error::{e_violacao_de_unicidade, AppError, AppResult},
    models::{
        coordenador::{AtualizaCoordenador, Coordenador, NovoCoordenador},
        solicitacao::{SolicitacaoReposicao, StatusSolicitacao},
    },
    services::{
        auth_service,
        email_service::{self, Email, Notificador},
        nutricionista_service, professor_service, reposicao_service, turma_service,
    },
};
use sqlx::SqlitePool;

pub async fn cadastrar_coordenador(
    db_pool: &SqlitePool,
    config: &AppConfig,
    dados: NovoCoordenador,
    criado_por_admin: bool,
) -> AppResult<Coordenador> {
    auth_service::validar_token_cadastro(config, dados.token_seguro.as_deref(), criado_por_admin)?;

    if auth_service::email_em_uso(db_pool, &dados.email).await? {
        return Err(AppError::RegraDeNegocio(
            "O e-mail informado já está em uso.".to_string(),
        ));
    }

    let senha_hash = auth_service::hash_senha(&dados.senha).await?;

    let resultado = sqlx::query(
        "INSERT INTO coordenadores (matricula, nome, email, departamento, senha_hash) VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(dados.matricula)
    .bind(&dados.nome)
    .bind(&dados.email)
    .bind(&dados.departamento)
    .bind(&senha_hash)
    .execute(db_pool)
    .await;

    if let Err(erro) = &resultado {
        if e_violacao_de_unicidade(erro) {
            return Err(AppError::RegraDeNegocio(
                "A matrícula informada já está em uso.".to_string(),
            ));
        }
    }
    resultado?;

    tracing::info!("✅ Coordenador {} cadastrado com sucesso.", dados.matricula);
    buscar_por_matricula(db_pool, dados.matricula)
        .await?
        .ok_or(AppError::InternalServerError)
}

pub async fn buscar_por_matricula(
    db_pool: &SqlitePool,
    matricula: i64,
) -> AppResult<Option<Coordenador>> {
    let coordenador = sqlx::query_as::<_, Coordenador>(
        "SELECT matricula, nome, email, departamento, senha_hash FROM coordenadores WHERE matricula = ?1",
    )
    .bind(matricula)
    .fetch_optional(db_pool)
    .await?;
    Ok(coordenador)
}

pub async fn buscar_todos(db_pool: &SqlitePool) -> AppResult<Vec<Coordenador>> {
    let coordenadores = sqlx::query_as::<_, Coordenador>(
        "SELECT matricula, nome, email, departamento, senha_hash FROM coordenadores ORDER BY matricula ASC",
    )
    .fetch_all(db_pool)
    .await?;
    Ok(coordenadores)
}

pub async fn atualizar_coordenador(
    db_pool: &SqlitePool,
    matricula: i64,
    dados: AtualizaCoordenador,
) -> AppResult<Option<Coordenador>> {
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

    sqlx::query(
        "UPDATE coordenadores SET nome = ?1, email = ?2, departamento = ?3 WHERE matricula = ?4",
    )
    .bind(&dados.nome)
    .bind(&dados.email)
    .bind(&dados.departamento)
    .bind(matricula)
    .execute(db_pool)
    .await?;

    buscar_por_matricula(db_pool, matricula).await
}

pub async fn deletar_coordenador(db_pool: &SqlitePool, matricula: i64) -> AppResult<bool> {
    let afetadas = sqlx::query("DELETE FROM coordenadores WHERE matricula = ?1")
        .bind(matricula)
        .execute(db_pool)
        .await?
        .rows_affected();
    Ok(afetadas > 0)
}

/// Notifica um professor sobre uma ausência constatada e envia o link do
/// formulário de solicitação de reposição.
pub async fn notificar_falta(
    db_pool: &SqlitePool,
    notificador: &dyn Notificador,
    config: &AppConfig,
    matricula_professor: i64,
) -> AppResult<()> {
    let professor = professor_service::buscar_por_matricula(db_pool, matricula_professor)
        .await?
        .ok_or_else(|| AppError::NaoEncontrado("Professor não encontrado.".to_string()))?;

    let texto = format!(
        "Olá, Prof(a). {nome},\n\n\
         Constatamos sua ausência na data de hoje.\n\
         Por favor, acesse o link abaixo e faça uma solicitação de reposição da aula:\n\
         {link}\n\n\
         Atenciosamente,\n\
         Coordenação - Sistema de Reposição de Aulas.",
        nome = professor.nome,
        link = config.frontend_url
    );
    let html = format!(
        r#"<p>Olá, Prof(a). <strong>{nome}</strong>,</p>
<p>Constatamos sua ausência na data de hoje.</p>
<p>Por favor, acesse o link abaixo e faça uma solicitação de reposição da aula:</p>
<p><a href="{link}">Sistema de reposição de aulas</a></p>
<br>
<p>Atenciosamente,</p>
<p><strong>Coordenação - Sistema de Reposição de Aulas.</strong></p>"#,
        nome = professor.nome,
        link = config.frontend_url
    );

    email_service::enviar_seguro(
        notificador,
        Email {
            to: vec![professor.email],
            subject: "Notificação de Ausência e Solicitação de Reposição".to_string(),
            text: Some(texto),
            html,
        },
    )
    .await;

    Ok(())
}

/// Decisão do coordenador sobre uma solicitação em AGUARDANDO_APROVACAO.
///
/// A transição é serializada por um update condicional no status: de duas
/// avaliações concorrentes só uma grava; a perdedora relê o registro e
/// recebe o erro de negócio com o status atual. O fan-out de e-mails vem
/// depois da persistência e é best-effort: falha de envio não desfaz a
/// decisão já gravada.
pub async fn avaliar_solicitacao(
    db_pool: &SqlitePool,
    notificador: &dyn Notificador,
    id_solicitacao: i64,
    decisao: StatusSolicitacao,
    comentario: Option<String>,
) -> AppResult<SolicitacaoReposicao> {
    if !matches!(
        decisao,
        StatusSolicitacao::Autorizada | StatusSolicitacao::Negada
    ) {
        return Err(AppError::RegraDeNegocio(format!(
            "Decisão inválida: '{}'. Use AUTORIZADA ou NEGADA.",
            decisao.as_str()
        )));
    }

    if reposicao_service::buscar_por_id(db_pool, id_solicitacao).await?.is_none() {
        return Err(AppError::NaoEncontrado(
            "Solicitação de reposição não encontrada.".to_string(),
        ));
    }

    let afetadas = sqlx::query(
        "UPDATE solicitacoes_reposicao SET status = ?1, comentario = ?2 WHERE id = ?3 AND status = ?4",
    )
    .bind(decisao)
    .bind(comentario.as_deref())
    .bind(id_solicitacao)
    .bind(StatusSolicitacao::AguardandoAprovacao)
    .execute(db_pool)
    .await?
    .rows_affected();

    if afetadas == 0 {
        let atual = reposicao_service::buscar_por_id(db_pool, id_solicitacao)
            .await?
            .ok_or_else(|| {
                AppError::NaoEncontrado("Solicitação de reposição não encontrada.".to_string())
            })?;
        return Err(AppError::RegraDeNegocio(format!(
            "Esta solicitação não pode ser avaliada, pois seu status atual é '{}'.",
            atual.status.as_str()
        )));
    }

    let solicitacao = reposicao_service::buscar_por_id(db_pool, id_solicitacao)
        .await?
        .ok_or(AppError::InternalServerError)?;

    tracing::info!(
        "Solicitação {} avaliada: {}.",
        id_solicitacao,
        decisao.as_str()
    );

    // Todos os envios são tentados antes de retornar; erros só são logados
    if let Err(e) = disparar_notificacoes_decisao(db_pool, notificador, &solicitacao, comentario).await {
        tracing::warn!(
            "Falha ao notificar a decisão da solicitação {}: {:?}. Decisão já persistida.",
            id_solicitacao,
            e
        );
    }

    Ok(solicitacao)
}

async fn disparar_notificacoes_decisao(
    db_pool: &SqlitePool,
    notificador: &dyn Notificador,
    solicitacao: &SolicitacaoReposicao,
    comentario: Option<String>,
) -> AppResult<()> {
    let professor =
        professor_service::buscar_por_matricula(db_pool, solicitacao.professor_matricula)
            .await?
            .ok_or(AppError::InternalServerError)?;
    let alunos = turma_service::buscar_alunos_por_turma(db_pool, solicitacao.turma_id).await?;
    let nutricionistas = nutricionista_service::buscar_todos(db_pool).await?;

    let mut destinatarios = vec![professor.email];
    destinatarios.extend(alunos.into_iter().map(|aluno| aluno.email));

    let data_formatada = solicitacao.data.format("%d/%m/%Y").to_string();

    if solicitacao.status == StatusSolicitacao::Autorizada {
        let html_confirmacao = format!(
            r#"<p>A aula de reposição solicitada foi <strong>APROVADA</strong>.</p>
<p><strong>Detalhes:</strong></p>
<ul>
  <li>Data: {data}</li>
  <li>Horário: {horario}</li>
  <li>Sala: {sala}</li>
</ul>"#,
            data = data_formatada,
            horario = solicitacao.horario,
            sala = solicitacao.sala
        );

        email_service::enviar_seguro(
            notificador,
            Email {
                to: destinatarios,
                subject: format!("Reposição Aprovada: Aula do dia {data_formatada}"),
                text: None,
                html: html_confirmacao,
            },
        )
        .await;

        // Pedido de merenda para o headcount congelado na submissão
        let emails_nutricionistas: Vec<String> =
            nutricionistas.into_iter().map(|n| n.email).collect();
        email_service::enviar_seguro(
            notificador,
            Email {
                to: emails_nutricionistas,
                subject: "Solicitação de Merenda para Reposição".to_string(),
                text: None,
                html: format!(
                    r#"<p>Solicitação de merenda para uma aula de reposição aprovada.</p>
<p><strong>Detalhes:</strong></p>
<ul>
  <li>Data: {data}</li>
  <li>Horário: {horario}</li>
  <li>Quantidade de Alunos: {qt}</li>
</ul>"#,
                    data = data_formatada,
                    horario = solicitacao.horario,
                    qt = solicitacao.qt_alunos
                ),
            },
        )
        .await;
    } else {
        let motivo = comentario
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| "Não especificado.".to_string());
        let html_negacao = format!(
            r#"<p>A aula de reposição solicitada para o dia {data} foi <strong>NÃO AUTORIZADA</strong>.</p>
<p><strong>Motivo (Coordenador):</strong> {motivo}</p>
<p>Por favor, professor, inicie uma nova solicitação com data/horário alternativos.</p>"#,
            data = data_formatada,
            motivo = motivo
        );

        email_service::enviar_seguro(
            notificador,
            Email {
                to: destinatarios,
                subject: "Reposição Não Autorizada".to_string(),
                text: None,
                html: html_negacao,
            },
        )
        .await;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{
        email_service::NotificadorMemoria,
        teste_util::{self, TOKEN_CADASTRO},
    };

    async fn cenario_aguardando(pool: &SqlitePool) -> i64 {
        let turma_id = teste_util::criar_turma(pool, "INF-3A").await;
        teste_util::criar_professor(pool, 100, "prof@escola.br").await;
        teste_util::criar_aluno(pool, 201, turma_id, "a201@escola.br").await;
        teste_util::criar_aluno(pool, 202, turma_id, "a202@escola.br").await;
        teste_util::criar_nutricionista(pool, "nutri@escola.br").await;
        teste_util::criar_solicitacao(
            pool,
            100,
            turma_id,
            StatusSolicitacao::AguardandoAprovacao,
        )
        .await
    }

    #[tokio::test]
    async fn aprovacao_notifica_turma_e_equipe_de_merenda() {
        let pool = teste_util::pool_em_memoria().await;
        let spy = NotificadorMemoria::new();
        let id = cenario_aguardando(&pool).await;

        let solicitacao = avaliar_solicitacao(&pool, &spy, id, StatusSolicitacao::Autorizada, None)
            .await
            .unwrap();
        assert_eq!(solicitacao.status, StatusSolicitacao::Autorizada);

        let enviados = spy.enviados();
        assert_eq!(enviados.len(), 2);

        // Primeiro e-mail: professor + alunos da turma
        assert_eq!(
            enviados[0].to,
            vec!["prof@escola.br", "a201@escola.br", "a202@escola.br"]
        );
        assert!(enviados[0].subject.starts_with("Reposição Aprovada"));

        // Segundo e-mail: equipe de merenda, com o headcount congelado
        assert_eq!(enviados[1].to, vec!["nutri@escola.br"]);
        assert_eq!(enviados[1].subject, "Solicitação de Merenda para Reposição");
        assert!(enviados[1].html.contains("Quantidade de Alunos: 0"));
    }

    #[tokio::test]
    async fn negacao_ecoa_comentario_ou_texto_padrao() {
        let pool = teste_util::pool_em_memoria().await;
        let spy = NotificadorMemoria::new();
        let id = cenario_aguardando(&pool).await;

        avaliar_solicitacao(&pool, &spy, id, StatusSolicitacao::Negada, None)
            .await
            .unwrap();

        let enviados = spy.enviados();
        assert_eq!(enviados.len(), 1, "negação não aciona a merenda");
        assert_eq!(enviados[0].subject, "Reposição Não Autorizada");
        assert!(enviados[0].html.contains("Não especificado."));
    }

    #[tokio::test]
    async fn segunda_avaliacao_observa_erro_com_status_atual() {
        let pool = teste_util::pool_em_memoria().await;
        let spy = NotificadorMemoria::new();
        let id = cenario_aguardando(&pool).await;

        avaliar_solicitacao(&pool, &spy, id, StatusSolicitacao::Autorizada, None)
            .await
            .unwrap();
        let repetida =
            avaliar_solicitacao(&pool, &spy, id, StatusSolicitacao::Negada, None).await;

        match repetida {
            Err(AppError::RegraDeNegocio(msg)) => assert!(msg.contains("AUTORIZADA")),
            outro => panic!("esperava erro de negócio, obteve {outro:?}"),
        }

        // A decisão original permanece
        let atual = reposicao_service::buscar_por_id(&pool, id).await.unwrap().unwrap();
        assert_eq!(atual.status, StatusSolicitacao::Autorizada);
    }

    #[tokio::test]
    async fn avaliacao_fora_de_aguardando_aprovacao_e_rejeitada() {
        let pool = teste_util::pool_em_memoria().await;
        let spy = NotificadorMemoria::new();
        let turma_id = teste_util::criar_turma(&pool, "INF-3A").await;
        teste_util::criar_professor(&pool, 100, "prof@escola.br").await;
        let id =
            teste_util::criar_solicitacao(&pool, 100, turma_id, StatusSolicitacao::Pendente).await;

        let resultado =
            avaliar_solicitacao(&pool, &spy, id, StatusSolicitacao::Autorizada, None).await;

        assert!(matches!(resultado, Err(AppError::RegraDeNegocio(_))));
        assert!(spy.enviados().is_empty());
    }

    #[tokio::test]
    async fn falha_de_email_nao_desfaz_a_decisao() {
        let pool = teste_util::pool_em_memoria().await;
        let spy = NotificadorMemoria::sempre_falha();
        let id = cenario_aguardando(&pool).await;

        let solicitacao = avaliar_solicitacao(&pool, &spy, id, StatusSolicitacao::Autorizada, None)
            .await
            .expect("decisão persiste mesmo com envio falhando");
        assert_eq!(solicitacao.status, StatusSolicitacao::Autorizada);
    }

    #[tokio::test]
    async fn atualizacao_nao_rouba_email_de_outra_conta() {
        let pool = teste_util::pool_em_memoria().await;
        teste_util::criar_professor(&pool, 100, "prof@escola.br").await;
        teste_util::criar_coordenador(&pool, 300, "coord@escola.br").await;

        let resultado = atualizar_coordenador(
            &pool,
            300,
            AtualizaCoordenador {
                nome: "Ana".to_string(),
                email: "prof@escola.br".to_string(),
                departamento: "Informática".to_string(),
            },
        )
        .await;
        assert!(matches!(resultado, Err(AppError::RegraDeNegocio(_))));

        // O e-mail original permanece
        let atual = buscar_por_matricula(&pool, 300).await.unwrap().unwrap();
        assert_eq!(atual.email, "coord@escola.br");
    }

    #[tokio::test]
    async fn cadastro_de_coordenador_exige_token_e_sai_sem_credencial() {
        let pool = teste_util::pool_em_memoria().await;
        let config = teste_util::config_teste();

        let sem_token = cadastrar_coordenador(
            &pool,
            &config,
            NovoCoordenador {
                matricula: 300,
                nome: "Ana".to_string(),
                email: "ana@escola.br".to_string(),
                senha: "senha123".to_string(),
                departamento: "Informática".to_string(),
                token_seguro: None,
            },
            false,
        )
        .await;
        assert!(matches!(sem_token, Err(AppError::RegraDeNegocio(_))));

        let coordenador = cadastrar_coordenador(
            &pool,
            &config,
            NovoCoordenador {
                matricula: 300,
                nome: "Ana".to_string(),
                email: "ana@escola.br".to_string(),
                senha: "senha123".to_string(),
                departamento: "Informática".to_string(),
                token_seguro: Some(TOKEN_CADASTRO.to_string()),
            },
            false,
        )
        .await
        .unwrap();

        let json = serde_json::to_value(&coordenador).unwrap();
        assert_eq!(json["departamento"], "Informática");
        assert!(json.get("senha_hash").is_none());
    }
}
