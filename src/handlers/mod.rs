//! HTTP handlers, one module per backing store.

use crate::error::{AppError, StoreError};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::Json;

pub mod buckets;
pub mod products;
pub mod users;

/// Unwrap a JSON request body. A body axum could not parse fails the route like any other
/// refused input: a 500 with `message` and the parse error as details.
pub(crate) fn json_body<T>(
    state: &AppState,
    body: Result<Json<T>, JsonRejection>,
    message: &str,
) -> Result<T, AppError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| StoreError::Rejected(rejection.body_text()))
        .map_err(state.fail(message))
}
