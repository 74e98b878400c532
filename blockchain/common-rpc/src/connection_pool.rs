use crate::RpcError;
use lazy_static::lazy_static;
use log::debug;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Default per-request timeout for RPC clients
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A thread-safe pool of HTTP clients for reuse
///
/// `reqwest::Client` already keeps its own connection pool, so one client per
/// endpoint and timeout is enough. Handing out clones lets every caller share
/// the same keep-alive connections.
#[derive(Default)]
pub struct RpcConnectionPool {
    clients: Mutex<HashMap<(String, Duration), reqwest::Client>>,
}

impl RpcConnectionPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a client for the specified endpoint and timeout, creating it on first use
    pub fn get_client_with_timeout(
        &self,
        endpoint: &str,
        timeout: Duration,
    ) -> Result<reqwest::Client, RpcError> {
        let key = (endpoint.to_string(), timeout);
        let mut clients = self.clients.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(client) = clients.get(&key) {
            return Ok(client.clone());
        }

        debug!("Creating HTTP client for {} with timeout {:?}", endpoint, timeout);
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        clients.insert(key, client.clone());
        Ok(client)
    }

    /// Number of distinct endpoint/timeout pairs with a live client
    pub fn len(&self) -> usize {
        self.clients.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// Global singleton instance
lazy_static! {
    pub static ref CONNECTION_POOL: RpcConnectionPool = RpcConnectionPool::new();
}
