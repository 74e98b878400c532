use crate::common::rpc_utils::LendingErrorConverter;
use common::{
    lending::{LendingClient, LendingError},
    MarketConfig,
};
use common_rpc::{SuiRpcBuilder, SuiRpcClient};
use log::{debug, info, warn};
use serde_json::Value;

/// Suilend lending market read through a Sui full node
pub struct SuilendClient {
    rpc: SuiRpcClient,
    market: MarketConfig,
    reserves: Vec<Value>,
}

impl SuilendClient {
    /// Load the lending market object and keep its reserves
    pub async fn initialize(market: MarketConfig, rpc: SuiRpcClient) -> Result<Self, LendingError> {
        info!("Loading Suilend market {} from {}", market.market_id, rpc.url());
        let market_object = SuiRpcBuilder::new(&rpc)
            .with_type(true)
            .get_object_with_conversion::<LendingError, LendingErrorConverter>(&market.market_id)
            .await?;

        let fields = move_fields(&market_object).ok_or_else(|| {
            LendingError::SchemaMismatch(format!(
                "lending market {} has no Move content",
                market.market_id
            ))
        })?;
        let reserves = reserves_from_market(fields);
        info!("Loaded {} reserves for market {}", reserves.len(), market.market_id);

        Ok(Self { rpc, market, reserves })
    }
}

impl LendingClient for SuilendClient {
    fn reserves(&self) -> &[Value] {
        &self.reserves
    }

    async fn get_obligation_owner_caps(&self, owner: &str) -> Result<Vec<Value>, LendingError> {
        let cap_type = self.market.obligation_owner_cap_type();
        debug!("Looking up {} owned by {}", cap_type, owner);

        let objects = SuiRpcBuilder::new(&self.rpc)
            .with_struct_type(cap_type)
            .with_type(true)
            .get_owned_objects_with_conversion::<LendingError, LendingErrorConverter>(owner)
            .await?;

        Ok(objects.into_iter().map(into_move_fields).collect())
    }

    async fn get_obligation(&self, obligation_id: &str) -> Result<Value, LendingError> {
        let object = SuiRpcBuilder::new(&self.rpc)
            .with_type(true)
            .get_object_with_conversion::<LendingError, LendingErrorConverter>(obligation_id)
            .await?;

        move_fields(&object).cloned().ok_or_else(|| {
            LendingError::SchemaMismatch(format!("obligation {} has no Move content", obligation_id))
        })
    }

    fn market_id(&self) -> &str {
        &self.market.market_id
    }

    fn protocol_name(&self) -> &'static str {
        "Suilend"
    }
}

/// The `content.fields` member of an object's `data`
pub fn move_fields(object: &Value) -> Option<&Value> {
    object.get("content")?.get("fields").filter(|fields| fields.is_object())
}

/// Replace an object's `data` with its Move fields when it has any
pub fn into_move_fields(object: Value) -> Value {
    if let Some(fields) = move_fields(&object) {
        return fields.clone();
    }
    object
}

/// Reserve records listed by the lending market, each as returned by the node
pub fn reserves_from_market(market_fields: &Value) -> Vec<Value> {
    match market_fields.get("reserves") {
        Some(Value::Array(reserves)) => reserves.clone(),
        _ => {
            warn!("Lending market has no reserves list");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(fields: Value) -> Value {
        json!({
            "objectId": "0xobj",
            "version": "1",
            "digest": "abc",
            "type": "0xf95b::obligation::Obligation<0xf95b::suilend::MAIN_POOL>",
            "content": {
                "dataType": "moveObject",
                "type": "0xf95b::obligation::Obligation<0xf95b::suilend::MAIN_POOL>",
                "hasPublicTransfer": false,
                "fields": fields
            }
        })
    }

    #[test]
    fn test_move_fields() {
        let data = object(json!({ "id": { "id": "0xobj" }, "deposits": [] }));
        assert_eq!(move_fields(&data), Some(&json!({ "id": { "id": "0xobj" }, "deposits": [] })));

        assert_eq!(move_fields(&json!({ "objectId": "0x1" })), None);
        assert_eq!(move_fields(&json!({ "content": { "dataType": "package" } })), None);
    }

    #[test]
    fn test_into_move_fields_keeps_objects_without_content() {
        let cap = object(json!({ "id": { "id": "0xcap" }, "obligation_id": "0xob" }));
        assert_eq!(into_move_fields(cap)["obligation_id"], "0xob");

        let bare = json!({ "objectId": "0xcap" });
        assert_eq!(into_move_fields(bare.clone()), bare);
    }

    #[test]
    fn test_reserves_from_market() {
        let fields = json!({
            "id": { "id": "0x8403" },
            "reserves": [
                { "type": "0xf95b::reserve::Reserve<0xf95b::suilend::MAIN_POOL>", "fields": { "id": { "id": "0xr1" } } }
            ]
        });
        assert_eq!(reserves_from_market(&fields).len(), 1);
        assert!(reserves_from_market(&json!({ "id": { "id": "0x8403" } })).is_empty());
    }
}
