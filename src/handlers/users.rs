//! User handlers backed by the document store.

use crate::error::{AppError, StoreError};
use crate::handlers::json_body;
use crate::model::UserInput;
use crate::response::{created, message, ok};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::Value;

pub const USER_NOT_FOUND: &str = "Usuário não encontrado";
pub const USER_DELETED: &str = "Usuário deletado com sucesso";
pub const PROBE_WITH_DATA: &str = "Conexão com o MongoDB bem-sucedida! Dados encontrados.";
pub const PROBE_EMPTY: &str = "Conexão com o MongoDB bem-sucedida! Nenhum dado encontrado.";

/// GET /mongodb/testar-conexao
pub async fn probe(State(state): State<AppState>) -> Result<&'static str, AppError> {
    let has_data = state
        .users
        .probe()
        .await
        .map_err(state.fail("Erro ao conectar ao MongoDB"))?;
    Ok(if has_data { PROBE_WITH_DATA } else { PROBE_EMPTY })
}

pub async fn create_user(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let body = json_body(&state, body, "Erro ao criar usuário")?;
    let input = UserInput::from_value(body)
        .map_err(StoreError::Rejected)
        .map_err(state.fail("Erro ao criar usuário"))?;
    let user = state
        .users
        .create(input)
        .await
        .map_err(state.fail("Erro ao criar usuário"))?;
    Ok(created(user))
}

pub async fn list_users(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let users = state
        .users
        .list()
        .await
        .map_err(state.fail("Erro ao buscar usuários"))?;
    Ok(ok(users))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user = state
        .users
        .get(&id)
        .await
        .map_err(state.fail("Erro ao buscar usuário"))?
        .ok_or_else(|| AppError::NotFound(USER_NOT_FOUND.into()))?;
    Ok(ok(user))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let body = json_body(&state, body, "Erro ao atualizar usuário")?;
    let input = UserInput::from_value(body)
        .map_err(StoreError::Rejected)
        .map_err(state.fail("Erro ao atualizar usuário"))?;
    let user = state
        .users
        .update(&id, input)
        .await
        .map_err(state.fail("Erro ao atualizar usuário"))?
        .ok_or_else(|| AppError::NotFound(USER_NOT_FOUND.into()))?;
    Ok(ok(user))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = state
        .users
        .delete(&id)
        .await
        .map_err(state.fail("Erro ao deletar usuário"))?;
    if !deleted {
        return Err(AppError::NotFound(USER_NOT_FOUND.into()));
    }
    Ok(message(USER_DELETED))
}
