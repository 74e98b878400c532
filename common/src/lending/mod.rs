use serde_json::Value;
use strum::{AsRefStr, Display};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LendingError {
    #[error("RPC error: {0}")]
    RpcError(String),

    #[error("RPC request {method} failed with code {code}: {message}")]
    RpcResponseError { method: String, code: i64, message: String },

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("Filesystem error at {path}: {source}")]
    Filesystem {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Coarse classification used to pick user-facing messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
pub enum ErrorKind {
    NetworkFailure,
    SchemaMismatch,
    FilesystemFailure,
    Configuration,
}

impl LendingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LendingError::RpcError(_)
            | LendingError::RpcResponseError { .. }
            | LendingError::AccountNotFound(_) => ErrorKind::NetworkFailure,
            LendingError::SchemaMismatch(_) | LendingError::Serialization(_) => {
                ErrorKind::SchemaMismatch
            }
            LendingError::Filesystem { .. } => ErrorKind::FilesystemFailure,
            LendingError::Configuration(_) => ErrorKind::Configuration,
        }
    }

    pub fn filesystem(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        LendingError::Filesystem { path: path.as_ref().display().to_string(), source }
    }
}

/// Read access to one lending market on chain.
///
/// Records are handed out as raw JSON; their shape is owned by the chain and
/// interpreted by the normalizer, not by the client.
#[allow(async_fn_in_trait)]
pub trait LendingClient {
    /// Reserve records of the market, loaded when the client was initialized
    fn reserves(&self) -> &[Value];

    /// Capability objects proving ownership of obligations held by `owner`
    async fn get_obligation_owner_caps(&self, owner: &str) -> Result<Vec<Value>, LendingError>;

    async fn get_obligation(&self, obligation_id: &str) -> Result<Value, LendingError>;

    fn market_id(&self) -> &str;

    fn protocol_name(&self) -> &'static str;
}
