#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Malformed asset encoding: {0}")]
    Codec(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
