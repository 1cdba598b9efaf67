#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{entity} '{name}' not found")]
    NotFound { entity: &'static str, name: String },
}

impl CoreError {
    /// The message to show a user, without the variant prefix.
    pub fn user_message(&self) -> String {
        match self {
            CoreError::Validation(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}
