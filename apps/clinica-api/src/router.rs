//! Rotas HTTP e camadas tower

use axum::{
    routing::{get, patch, post},
    Router,
};
use tower::limit::ConcurrencyLimitLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{self, TraceLayer};
use tracing::Level;

use crate::handlers::{appointments, auth, doctors, patients, reports};
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let max_concurrent = state.config.max_concurrent_requests.max(1);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(auth::health))
        .route("/login", post(auth::login))
        .route("/permissions", get(auth::permissions))
        .route("/pacientes", get(patients::list).post(patients::create))
        .route(
            "/pacientes/:id",
            get(patients::get).put(patients::update).delete(patients::remove),
        )
        .route("/medicos", get(doctors::list).post(doctors::create))
        .route(
            "/medicos/:id",
            get(doctors::get).put(doctors::update).delete(doctors::remove),
        )
        .route("/consultas", get(appointments::list).post(appointments::create))
        .route(
            "/consultas/:id",
            get(appointments::get)
                .put(appointments::update)
                .delete(appointments::remove),
        )
        .route("/consultas/:id/status", patch(appointments::change_status))
        .route("/relatorios", post(reports::generate))
        .with_state(state)
        .layer(ConcurrencyLimitLayer::new(max_concurrent))
        .layer(CompressionLayer::new())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
}
