//! Router assembly: every route group plus the request-id, tracing and body-limit layers.

use crate::routes::{bucket_routes, common_routes, product_routes, user_routes};
use crate::state::AppState;
use axum::body::Body;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, Request};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Build the full gateway. `body_limit` bounds every request body, multipart uploads included.
pub fn build_app(state: AppState, body_limit: usize) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);
    let layers = ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("-");
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id
                )
            }),
        )
        .layer(PropagateRequestIdLayer::new(request_id));

    Router::new()
        .merge(common_routes())
        .merge(user_routes(state.clone()))
        .merge(product_routes(state.clone()))
        .merge(bucket_routes(state))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(layers)
}
