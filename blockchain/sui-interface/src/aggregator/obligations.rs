use crate::aggregator::{
    client::LendingMarketAggregator,
    normalize::{
        normalize_obligation,
        probe::{first_truthy, identifier, FieldPath},
        ObligationShape,
    },
};
use common::{
    asset_utils::{address_prefix, display_symbol, format_large_number},
    lending::{LendingClient, LendingError},
    NormalizedEntry, ObligationRecord, ObligationType,
};
use log::{debug, info, warn};
use serde_json::Value;

// Type alias for results
type ArrayResult<T> = Result<T, LendingError>;

const CAP_OBLIGATION_ID_PATHS: &[FieldPath] = &[
    &["obligationId"],
    &["obligation_id"],
    &["id"],
    &["objectId"],
    &["fields", "obligation", "id", "id"],
];

/// Everything fetched for one owner: the raw capabilities and the obligations they unlock
#[derive(Debug, Clone, Default)]
pub struct UserObligations {
    pub caps: Vec<Value>,
    pub obligations: Vec<ObligationRecord>,
}

/// Obligation id referenced by an ownership capability
pub fn obligation_id_from_cap(cap: &Value) -> Option<String> {
    first_truthy(cap, CAP_OBLIGATION_ID_PATHS).and_then(identifier)
}

impl<C: LendingClient> LendingMarketAggregator<C> {
    /// Fetch and normalize every obligation owned by `owner`, one request at a time
    pub async fn get_user_obligations(&self, owner: &str) -> ArrayResult<UserObligations> {
        info!("Fetching {} obligations for {}", self.client.protocol_name(), owner);
        let caps = self.client.get_obligation_owner_caps(owner).await?;
        debug!("Found {} obligation owner caps for {}", caps.len(), owner);

        let mut obligations = Vec::with_capacity(caps.len());
        for cap in &caps {
            let Some(obligation_id) = obligation_id_from_cap(cap) else {
                if self.strict_schema {
                    return Err(LendingError::SchemaMismatch(format!(
                        "obligation owner cap without an obligation id: {}",
                        cap
                    )));
                }
                warn!("Skipping obligation owner cap without an obligation id");
                continue;
            };

            let raw = self.client.get_obligation(&obligation_id).await?;
            if self.strict_schema && !ObligationShape::detect(&raw).is_recognized() {
                return Err(LendingError::SchemaMismatch(format!(
                    "obligation {} has no recognized deposit or borrow list",
                    obligation_id
                )));
            }

            let obligation = normalize_obligation(&raw, &self.reserves);
            debug!(
                "Obligation {}: {} deposits, {} borrows",
                obligation_id,
                obligation.deposits.len(),
                obligation.borrows.len()
            );
            obligations.push(ObligationRecord { obligation_id, obligation });
        }

        info!("Found {} {} obligations for {}", obligations.len(), self.client.protocol_name(), owner);
        Ok(UserObligations { caps, obligations })
    }

    pub fn print_obligations(&self, owner: &str, obligations: &[ObligationRecord]) {
        use prettytable::{row, Table};

        if obligations.iter().all(|o| o.obligation.deposits.is_empty() && o.obligation.borrows.is_empty())
        {
            info!("No {} positions found for {}", self.client.protocol_name(), owner);
            return;
        }

        let mut table = Table::new();
        table.add_row(row!["Obligation", "Type", "Token", "Amount", "Coin type"]);

        for record in obligations {
            let lines = record
                .obligation
                .deposits
                .iter()
                .map(|entry| (ObligationType::Asset, entry))
                .chain(record.obligation.borrows.iter().map(|entry| (ObligationType::Liability, entry)));

            for (obligation_type, entry) in lines {
                // Determine obligation type string
                let obligation_type = match obligation_type {
                    ObligationType::Asset => "Supply",
                    ObligationType::Liability => "Borrow",
                };

                table.add_row(row![
                    short_id(&record.obligation_id),
                    obligation_type,
                    entry_symbol(entry),
                    format_large_number(entry.amount_human),
                    entry.coin_type
                ]);
            }
        }

        info!("{} positions for {}", self.client.protocol_name(), owner);
        table.printstd();
    }
}

fn entry_symbol(entry: &NormalizedEntry) -> String {
    display_symbol(&entry.symbol, &entry.coin_type)
}

fn short_id(id: &str) -> String {
    if id.chars().count() > 12 {
        format!("{}…", address_prefix(id, 12))
    } else {
        id.to_string()
    }
}
