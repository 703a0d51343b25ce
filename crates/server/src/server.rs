use axum::{
    Router, middleware,
    routing::{get, put},
};

use std::sync::Arc;

use crate::{
    contributions,
    cors::{CorsOrigin, cors},
    guests, health, statistics,
};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

/// Every route under `/api`, bound to `engine`, open to `origin`.
pub fn router(engine: Engine, origin: CorsOrigin) -> Router {
    let state = ServerState {
        engine: Arc::new(engine),
    };

    Router::new()
        .route("/api/health", get(health::get))
        .route("/api/guests", get(guests::list).post(guests::create))
        .route(
            "/api/guests/{id}",
            put(guests::update).delete(guests::remove),
        )
        .route(
            "/api/contributions",
            get(contributions::list).post(contributions::create),
        )
        .route(
            "/api/contributions/{id}",
            put(contributions::update).delete(contributions::remove),
        )
        .route("/api/stats", get(statistics::get_stats))
        .with_state(state)
        .layer(middleware::from_fn_with_state(origin, cors))
}

pub async fn run_with_listener(
    engine: Engine,
    origin: CorsOrigin,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}, allowing {:?}", addr, origin);

    axum::serve(listener, router(engine, origin)).await
}
