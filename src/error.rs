use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContactsError {
    #[error("contact identifier is missing")]
    MissingIdentifier,

    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: String, id: String },

    #[error("invalid argument {name}: {reason}")]
    InvalidArgument { name: String, reason: String },

    #[error("batch operation {index} failed: {source}")]
    Batch {
        index: usize,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

pub type ContactsResult<T> = Result<T, ContactsError>;
