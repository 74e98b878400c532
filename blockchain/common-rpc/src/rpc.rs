use crate::CONNECTION_POOL;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;

/// Largest page a Sui full node returns for owned-object queries
pub const MAX_PAGE_SIZE: usize = 50;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("RPC error: {0}")]
    RpcError(#[from] reqwest::Error),

    #[error("RPC request {method} failed with code {code}: {message}")]
    ResponseError { method: String, code: i64, message: String },

    #[error("Response deserialization error: {0}")]
    DeserializationError(String),

    #[error("Object not found: {0}")]
    ObjectNotFound(String),
}

/// Trait for converting RpcError to other error types
pub trait RpcErrorConverter<E> {
    /// Convert an RpcError to another error type
    fn convert_error(error: RpcError) -> E;
}

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<JsonRpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcErrorBody {
    code: i64,
    message: String,
}

/// Extract `result` from a JSON-RPC 2.0 response body
pub fn parse_response(method: &str, body: Value) -> Result<Value, RpcError> {
    let response: JsonRpcResponse = serde_json::from_value(body)
        .map_err(|e| RpcError::DeserializationError(format!("{}: {}", method, e)))?;

    if let Some(error) = response.error {
        return Err(RpcError::ResponseError {
            method: method.to_string(),
            code: error.code,
            message: error.message,
        });
    }

    response
        .result
        .ok_or_else(|| RpcError::DeserializationError(format!("{}: missing result", method)))
}

/// Minimal JSON-RPC client for a Sui full node
pub struct SuiRpcClient {
    http: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl SuiRpcClient {
    /// Create a client for the given endpoint and per-request timeout,
    /// sharing the pooled HTTP client
    pub fn new_with_timeout(url: &str, timeout: Duration) -> Result<Self, RpcError> {
        let http = CONNECTION_POOL.get_client_with_timeout(url, timeout)?;
        Ok(Self { http, url: url.to_string(), next_id: AtomicU64::new(1) })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send one JSON-RPC request and return its `result`
    pub async fn call(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        debug!("Calling {} on {}", method, self.url);
        let body: Value = self
            .http
            .post(&self.url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        parse_response(method, body)
    }
}

/// Builder for Sui object queries to simplify common patterns
pub struct SuiRpcBuilder<'a> {
    rpc_client: &'a SuiRpcClient,
    struct_type: Option<String>,
    show_type: bool,
}

impl<'a> SuiRpcBuilder<'a> {
    /// Create a new query builder; Move content is always requested
    pub fn new(rpc_client: &'a SuiRpcClient) -> Self {
        Self { rpc_client, struct_type: None, show_type: false }
    }

    /// Only return objects of this exact Move struct type
    pub fn with_struct_type(mut self, struct_type: impl Into<String>) -> Self {
        self.struct_type = Some(struct_type.into());
        self
    }

    pub fn with_type(mut self, show_type: bool) -> Self {
        self.show_type = show_type;
        self
    }

    fn options(&self) -> Value {
        json!({
            "showType": self.show_type,
            "showContent": true,
            "showOwner": false,
        })
    }

    /// Params for `suix_getOwnedObjects`: a single page starting at the first object
    pub fn owned_objects_params(&self, owner: &str) -> Value {
        let mut query = Map::new();
        if let Some(struct_type) = &self.struct_type {
            query.insert("filter".to_string(), json!({ "StructType": struct_type }));
        }
        query.insert("options".to_string(), self.options());

        json!([owner, Value::Object(query), Value::Null, MAX_PAGE_SIZE])
    }

    /// Params for `sui_getObject`
    pub fn object_params(&self, object_id: &str) -> Value {
        json!([object_id, self.options()])
    }

    /// Objects owned by `owner`, each as the `data` member of the node's response
    pub async fn get_owned_objects(self, owner: &str) -> Result<Vec<Value>, RpcError> {
        let result =
            self.rpc_client.call("suix_getOwnedObjects", self.owned_objects_params(owner)).await?;
        owned_objects_from_result(result)
    }

    /// A single object by id, as the `data` member of the node's response
    pub async fn get_object(self, object_id: &str) -> Result<Value, RpcError> {
        let result = self.rpc_client.call("sui_getObject", self.object_params(object_id)).await?;
        object_from_result(object_id, result)
    }

    /// Get a single object with automatic error conversion
    pub async fn get_object_with_conversion<E, C: RpcErrorConverter<E>>(
        self,
        object_id: &str,
    ) -> Result<Value, E> {
        self.get_object(object_id).await.map_err(C::convert_error)
    }

    /// Get owned objects with automatic error conversion
    pub async fn get_owned_objects_with_conversion<E, C: RpcErrorConverter<E>>(
        self,
        owner: &str,
    ) -> Result<Vec<Value>, E> {
        self.get_owned_objects(owner).await.map_err(C::convert_error)
    }
}

/// Unwrap a `sui_getObject` result into its `data` member
pub fn object_from_result(object_id: &str, mut result: Value) -> Result<Value, RpcError> {
    if let Some(error) = result.get("error").filter(|e| !e.is_null()) {
        debug!("Object {} lookup returned {}", object_id, error);
        return Err(RpcError::ObjectNotFound(object_id.to_string()));
    }

    match result.get_mut("data").map(Value::take) {
        Some(data) if data.is_object() => Ok(data),
        _ => Err(RpcError::ObjectNotFound(object_id.to_string())),
    }
}

/// Unwrap a `suix_getOwnedObjects` page into the `data` member of each entry
pub fn owned_objects_from_result(mut result: Value) -> Result<Vec<Value>, RpcError> {
    let page = match result.get_mut("data").map(Value::take) {
        Some(Value::Array(page)) => page,
        _ => {
            return Err(RpcError::DeserializationError(
                "suix_getOwnedObjects: missing data page".to_string(),
            ))
        }
    };

    if result.get("hasNextPage").and_then(Value::as_bool).unwrap_or(false) {
        debug!("Owned objects span more than one page, only the first page is used");
    }

    Ok(page
        .into_iter()
        .filter_map(|mut entry| entry.get_mut("data").map(Value::take))
        .filter(Value::is_object)
        .collect())
}
