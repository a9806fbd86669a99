use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("column `{column}` has an invalid means path `{path}`")]
    InvalidPath { column: String, path: String },

    #[error("relation `{segment}` is not set while resolving `{path}`")]
    MissingRelation { path: String, segment: String },

    #[error("attribute `{segment}` does not exist while resolving `{path}`")]
    MissingAttribute { path: String, segment: String },
}

#[derive(Debug, Error)]
pub enum AuditError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error("audit store error: {0}")]
    Persistence(#[from] sqlx::Error),

    #[error("malformed audit payload: {0}")]
    Payload(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AuditError>;
