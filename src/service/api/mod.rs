use axum::routing::{get, post};
use axum::Router;
use hyper::{Body, Request};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::services::AppServices;

mod error;
mod extract;
mod health;
mod host;
mod remote;
mod tag;

pub use error::{ApiError, ApiResult};

pub fn router(services: AppServices) -> Router {
    let api = Router::new()
        .route("/hosts", get(host::list).post(host::create))
        .route("/hosts/assign", post(host::assign))
        .route(
            "/hosts/environment/:environment",
            get(host::list_by_environment),
        )
        .route(
            "/hosts/:id",
            get(host::get_by_id).put(host::update).delete(host::delete),
        )
        .route("/hosts/:id/remotes", get(host::list_remotes))
        .route("/hosts/:id/attach", post(host::attach))
        .route("/hosts/:id/detach", post(host::detach))
        .route("/remotes", get(remote::list).post(remote::create))
        .route("/remotes/module-counts", get(remote::module_counts))
        .route("/remotes/sub-remote-counts", get(remote::sub_remote_counts))
        .route(
            "/remotes/:id",
            get(remote::get_by_id)
                .put(remote::update)
                .delete(remote::delete),
        )
        .route("/remotes/:id/tags", get(remote::list_tags))
        .route("/remotes/:id/tags/attach", post(remote::attach_tag))
        .route("/remotes/:id/tags/detach", post(remote::detach_tag))
        .route("/tags", get(tag::list).post(tag::create))
        .route(
            "/tags/:id",
            get(tag::get_by_id).put(tag::update).delete(tag::delete),
        );

    let tracing_layer = ServiceBuilder::new().layer(TraceLayer::new_for_http().make_span_with(
        |request: &Request<Body>| {
            tracing::info_span!(
                "http",
                http.method = %request.method(),
                http.url = %request.uri(),
                otel.name = %format!("{} {}", request.method(), request.uri().path()),
                otel.kind = "server",
            )
        },
    ));

    Router::new()
        .route("/health", get(health::health))
        .nest("/api", api)
        .layer(tracing_layer)
        .with_state(services)
}
