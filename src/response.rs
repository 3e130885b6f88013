use std::collections::BTreeMap;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::ServiceError;

/// JSON error payload shared by every failing response:
/// `{timestamp, status, error, message, path, details?}`.
///
/// `path` is blank when a handler renders the error; the envelope middleware
/// fills it in from the request URI.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub timestamp: DateTime<Utc>,
    pub status: u16,
    pub error: String,
    pub message: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<BTreeMap<String, String>>,
}

impl ErrorBody {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            status: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message: message.into(),
            path: String::new(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: BTreeMap<String, String>) -> Self {
        self.details = Some(details);
        self
    }
}

fn status_for(err: &ServiceError) -> StatusCode {
    match err {
        ServiceError::InvalidArgument { .. } => StatusCode::BAD_REQUEST,
        ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        ServiceError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        let body = match &self {
            ServiceError::InvalidArgument { field, message } => {
                ErrorBody::new(status, message.clone())
                    .with_details(BTreeMap::from([(field.to_string(), message.clone())]))
            }
            ServiceError::NotFound(message) => ErrorBody::new(status, message.clone()),
            ServiceError::Db(err) => {
                tracing::error!("store failure: {err}");
                ErrorBody::new(status, "Unexpected error")
            }
        };
        (status, Json(body)).into_response()
    }
}
