//! Product handlers backed by the relational store.

use crate::error::AppError;
use crate::handlers::json_body;
use crate::model::{CreatedId, ProductInput};
use crate::response::{created, message, ok};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::IntoResponse,
    Json,
};

pub const PRODUCT_NOT_FOUND: &str = "Produto não encontrado";
pub const PRODUCT_UPDATED: &str = "Produto atualizado com sucesso";
pub const PRODUCT_DELETED: &str = "Produto deletado com sucesso";
pub const SCHEMA_CREATED: &str = "Banco de dados e tabela criados com sucesso!";

/// Ids that are not integers cannot match a row, so they are answered as not found.
fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.parse()
        .map_err(|_| AppError::NotFound(PRODUCT_NOT_FOUND.into()))
}

/// POST /init-db
pub async fn init_db(State(state): State<AppState>) -> Result<&'static str, AppError> {
    state
        .products
        .init_schema()
        .await
        .map_err(state.fail("Erro ao criar banco de dados e tabela"))?;
    Ok(SCHEMA_CREATED)
}

pub async fn list_products(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let products = state
        .products
        .list()
        .await
        .map_err(state.fail("Erro ao buscar produtos"))?;
    Ok(ok(products))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id)?;
    let product = state
        .products
        .get(id)
        .await
        .map_err(state.fail("Erro ao buscar produto"))?
        .ok_or_else(|| AppError::NotFound(PRODUCT_NOT_FOUND.into()))?;
    Ok(ok(product))
}

pub async fn create_product(
    State(state): State<AppState>,
    body: Result<Json<ProductInput>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let input = json_body(&state, body, "Erro ao criar produto")?;
    let id = state
        .products
        .create(input)
        .await
        .map_err(state.fail("Erro ao criar produto"))?;
    Ok(created(CreatedId { id }))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<ProductInput>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id)?;
    let input = json_body(&state, body, "Erro ao atualizar produto")?;
    let updated = state
        .products
        .update(id, input)
        .await
        .map_err(state.fail("Erro ao atualizar produto"))?;
    if !updated {
        return Err(AppError::NotFound(PRODUCT_NOT_FOUND.into()));
    }
    Ok(message(PRODUCT_UPDATED))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id)?;
    let deleted = state
        .products
        .delete(id)
        .await
        .map_err(state.fail("Erro ao deletar produto"))?;
    if !deleted {
        return Err(AppError::NotFound(PRODUCT_NOT_FOUND.into()));
    }
    Ok(message(PRODUCT_DELETED))
}
