use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaymentPlanError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Validation failed: {}", .errors.join("; "))]
    ValidationFailed { errors: Vec<String> },

    #[error("Unknown plan template: {0}")]
    UnknownTemplate(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Amount out of range in {context}")]
    Overflow { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for PaymentPlanError {
    fn from(e: serde_json::Error) -> Self {
        PaymentPlanError::SerializationError(e.to_string())
    }
}
