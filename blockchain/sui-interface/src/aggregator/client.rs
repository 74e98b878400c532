use crate::aggregator::normalize::ReserveIndex;
use common::{lending::LendingClient, NormalizedReserve};
use log::info;

/// A lending client together with the reserve index built from its market
pub struct LendingMarketAggregator<C> {
    pub client: C,
    pub reserves: ReserveIndex,
    /// Fail on records that match no known layout instead of skipping them
    pub strict_schema: bool,
}

impl<C: LendingClient> LendingMarketAggregator<C> {
    pub fn new(client: C, strict_schema: bool) -> Self {
        let reserves = ReserveIndex::build(client.reserves());
        info!(
            "Indexed {} of {} {} reserves",
            reserves.len(),
            client.reserves().len(),
            client.protocol_name()
        );

        Self { client, reserves, strict_schema }
    }

    pub fn market_id(&self) -> &str {
        self.client.market_id()
    }

    pub fn reserve_listing(&self) -> Vec<NormalizedReserve> {
        self.reserves.reserves().to_vec()
    }
}
