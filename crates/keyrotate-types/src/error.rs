use thiserror::Error;

/// Failure reported by a network collaborator (primary network proxy or mirror).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The resource does not exist (yet). Mirror indexing lag surfaces here.
    #[error("Not found (HTTP {status}): {message}")]
    NotFound { status: u16, message: String },

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Decode error: {0}")]
    Decode(String),
}

impl ClientError {
    pub fn not_found(message: impl Into<String>) -> Self {
        ClientError::NotFound {
            status: 404,
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound { status: 404, .. })
    }
}

/// Errors surfaced by the rotation workflow.
#[derive(Error, Debug)]
pub enum RotationError {
    #[error("Invalid account id: {0}")]
    InvalidAccount(String),

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),

    #[error("Transaction {transaction_id} not visible on the mirror after {attempts} attempts")]
    MirrorNotFoundTimeout {
        transaction_id: String,
        attempts: u32,
    },

    #[error("Transport error: {0}")]
    Transport(#[from] ClientError),

    #[error("Environment unsupported: {0}")]
    EnvironmentUnsupported(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Insufficient signatures: {0}")]
    Unauthorized(String),

    #[error("Cancelled while {0}")]
    Cancelled(String),
}

pub type RotationResult<T> = Result<T, RotationError>;
