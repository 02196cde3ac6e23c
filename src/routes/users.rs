//! Document-store routes: connectivity probe and user CRUD.

use crate::handlers::users::{create_user, delete_user, get_user, list_users, probe, update_user};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn user_routes(state: AppState) -> Router {
    Router::new()
        .route("/mongodb/testar-conexao", get(probe))
        .route("/usuarios", get(list_users).post(create_user))
        .route(
            "/usuarios/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .with_state(state)
}
