// src/web/mod.rs
pub mod auth_handlers;
pub mod cadastro_handlers;
pub mod coordenador_handlers;
pub mod mw_auth;
pub mod professor_handlers;
pub mod reposicao_handlers;
pub mod routes;
