use common::lending::LendingError;
use common_rpc::{RpcError, RpcErrorConverter, SuiRpcClient};
use std::time::Duration;

pub use common_rpc::DEFAULT_TIMEOUT as DEFAULT_RPC_TIMEOUT;

/// Centralized error converter for Lending clients
pub struct LendingErrorConverter;

impl RpcErrorConverter<LendingError> for LendingErrorConverter {
    fn convert_error(error: RpcError) -> LendingError {
        match error {
            RpcError::RpcError(e) => LendingError::RpcError(e.to_string()),
            RpcError::ResponseError { method, code, message } => {
                LendingError::RpcResponseError { method, code, message }
            }
            RpcError::DeserializationError(e) => LendingError::SchemaMismatch(e),
            RpcError::ObjectNotFound(e) => LendingError::AccountNotFound(e),
        }
    }
}

/// Helper function to create an RPC client with the given URL and timeout
/// Uses the connection pool for better performance
pub fn create_rpc_client(rpc_url: &str, timeout: Duration) -> Result<SuiRpcClient, LendingError> {
    SuiRpcClient::new_with_timeout(rpc_url, timeout).map_err(LendingErrorConverter::convert_error)
}
