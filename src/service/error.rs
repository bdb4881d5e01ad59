/// Failure of a service operation. Persistence failures are carried as
/// `Storage` and never swallowed.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{model} {id} not found")]
    NotFound { model: &'static str, id: i64 },

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl ServiceError {
    pub fn not_found(model: &'static str, id: i64) -> Self {
        Self::NotFound { model, id }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
