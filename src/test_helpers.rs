use std::sync::Arc;

use axum::{Router, middleware::from_fn};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};

use crate::{middleware::error_envelope_middleware, routes::router, state::AppState};

pub fn mock_db() -> MockDatabase {
    MockDatabase::new(DatabaseBackend::Postgres)
}

/// Full application router over an arbitrary (usually mocked) connection,
/// with the error envelope applied the same way `main` does.
pub fn test_router(db: DatabaseConnection) -> Router {
    let state = AppState::new(db);
    Router::new()
        .merge(router(Arc::clone(&state)))
        .layer(from_fn(error_envelope_middleware))
}
