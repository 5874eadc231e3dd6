use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("validation error: {0}")]
    Validation(String),
    /// A single input field failed its check; rendered keyed by field name.
    #[error("{field}: {message}")]
    Field { field: &'static str, message: String },
}

impl ModelError {
    pub fn field(field: &'static str, message: impl Into<String>) -> Self {
        ModelError::Field { field, message: message.into() }
    }
}
