use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum LndApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Invalid REST response: {0}")]
    RestResponseError(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("Query failed. Error {status}. {message}")]
    QueryError { status: u16, message: String },
    #[error("Invalid payment hash: {0}")]
    InvalidPaymentHash(String),
}

impl LndApiError {
    /// LND reports an unknown invoice as a 404, or on older versions, as an error containing this message.
    pub fn is_invoice_not_found(&self) -> bool {
        match self {
            LndApiError::QueryError { status, message } => {
                *status == 404 || message.to_ascii_lowercase().contains("unable to locate invoice")
            },
            _ => false,
        }
    }
}
