//! Relational-store routes: schema initialization and product CRUD.

use crate::handlers::products::{
    create_product, delete_product, get_product, init_db, list_products, update_product,
};
use crate::state::AppState;
use axum::{routing::get, routing::post, Router};

pub fn product_routes(state: AppState) -> Router {
    Router::new()
        .route("/init-db", post(init_db))
        .route("/produtos", get(list_products).post(create_product))
        .route(
            "/produtos/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .with_state(state)
}
