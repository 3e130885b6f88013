use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

pub mod items;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new().merge(items::router(state))
}
