//! Object-storage routes: buckets, object listing, upload and delete.

use crate::handlers::buckets::{delete_object, list_buckets, list_objects, upload_file};
use crate::state::AppState;
use axum::{routing::delete, routing::get, routing::post, Router};

pub fn bucket_routes(state: AppState) -> Router {
    Router::new()
        .route("/buckets", get(list_buckets))
        .route("/buckets/:bucket_name", get(list_objects))
        .route("/buckets/:bucket_name/upload", post(upload_file))
        .route("/buckets/:bucket_name/file/:file_name", delete(delete_object))
        .with_state(state)
}
