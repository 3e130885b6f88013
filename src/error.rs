use sea_orm::DbErr;
use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Typed failures raised by the service layer. The HTTP translation lives in
/// `response` / `middleware`; nothing here knows about status codes.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{message}")]
    InvalidArgument { field: &'static str, message: String },

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Db(#[from] DbErr),
}

impl ServiceError {
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }
}
