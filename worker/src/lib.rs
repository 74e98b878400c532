use anyhow::Result;
use chrono::Utc;
use common::{
    asset_utils::address_prefix,
    lending::{ErrorKind, LendingClient, LendingError},
    snapshot_timestamp, ErrorSnapshot, ObligationSnapshot,
};
use log::{debug, error, info};
use std::path::{Path, PathBuf};
use sui_interface::{
    aggregator::LendingMarketAggregator, common::rpc_utils::create_rpc_client,
    suilend::SuilendClient,
};
use tokio::fs;
use tokio_cron_scheduler::{Job, JobScheduler};

pub mod config;
pub use config::SnapshotConfig;

/// Characters of the address used in snapshot file names
pub const ADDRESS_PREFIX_LEN: usize = 10;

pub const ERROR_SNAPSHOT_FILE: &str = "suilend_error.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// No addresses were configured, nothing was fetched or written
    Skipped,
    Completed { files: Vec<PathBuf> },
}

#[derive(Clone)]
pub struct Worker {
    config: SnapshotConfig,
}

impl Worker {
    pub fn new(config: SnapshotConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SnapshotConfig {
        &self.config
    }

    /// One full pass over the configured addresses against the live chain
    pub async fn run(&self) -> Result<RunOutcome, LendingError> {
        if self.config.addresses.is_empty() {
            info!("No addresses in SUI_ADDRESSES/SUI_ADDRESS, skipping Suilend.");
            return Ok(RunOutcome::Skipped);
        }

        let rpc = create_rpc_client(&self.config.rpc_url, self.config.rpc_timeout)?;
        let client = SuilendClient::initialize(self.config.market.clone(), rpc).await?;
        self.run_with_client(client).await
    }

    /// One full pass using an already initialized client.
    ///
    /// Addresses are processed in order and the first failure aborts the pass;
    /// snapshots written before the failure are left in place.
    pub async fn run_with_client<C: LendingClient>(
        &self,
        client: C,
    ) -> Result<RunOutcome, LendingError> {
        if self.config.addresses.is_empty() {
            info!("No addresses in SUI_ADDRESSES/SUI_ADDRESS, skipping Suilend.");
            return Ok(RunOutcome::Skipped);
        }

        let aggregator = LendingMarketAggregator::new(client, self.config.strict_schema);
        create_out_dir(&self.config.out_dir).await?;

        let mut files = Vec::with_capacity(self.config.addresses.len());
        for address in &self.config.addresses {
            let user = aggregator.get_user_obligations(address).await?;

            let snapshot = ObligationSnapshot {
                date_iso: snapshot_timestamp(Utc::now()),
                address: address.clone(),
                market_id: aggregator.market_id().to_string(),
                obligations: user.obligations,
                reserves: aggregator.reserve_listing(),
                caps: self.config.include_caps.then_some(user.caps),
            };

            let path = write_snapshot(&self.config.out_dir, &snapshot).await?;
            info!("wrote {}", path.display());
            aggregator.print_obligations(address, &snapshot.obligations);
            files.push(path);
        }

        Ok(RunOutcome::Completed { files })
    }

    /// Run once, turning any failure into a log line and an error snapshot
    pub async fn run_and_report(&self) -> Option<RunOutcome> {
        match self.run().await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                self.report_failure(&e).await;
                None
            }
        }
    }

    pub async fn report_failure(&self, err: &LendingError) {
        match err.kind() {
            ErrorKind::NetworkFailure => {
                error!("Suilend fetch failed talking to {}: {}", self.config.rpc_url, err)
            }
            ErrorKind::SchemaMismatch => {
                error!("Suilend fetch failed on an unexpected response shape: {}", err)
            }
            ErrorKind::FilesystemFailure => error!(
                "Suilend fetch failed writing under {}: {}",
                self.config.out_dir.display(),
                err
            ),
            ErrorKind::Configuration => error!("Suilend fetch failed: {}", err),
        }

        if let Err(write_err) = write_error_snapshot(&self.config.out_dir, err).await {
            debug!("Could not write error snapshot: {}", write_err);
        }
    }

    pub async fn start_snapshot_schedule(&self, schedule: &str) -> Result<()> {
        let scheduler = JobScheduler::new().await?;

        let worker = self.clone();
        let job = Job::new_async(schedule, move |_, _| {
            let worker = worker.clone();

            Box::pin(async move {
                debug!("Starting scheduled Suilend snapshot run...");
                match worker.run_and_report().await {
                    Some(RunOutcome::Completed { files }) => {
                        info!("Scheduled run wrote {} snapshots", files.len())
                    }
                    Some(RunOutcome::Skipped) => debug!("Scheduled run skipped"),
                    None => debug!("Scheduled run failed"),
                }
            })
        })?;

        scheduler.add(job).await?;
        info!("Starting snapshot scheduler with schedule: {}", schedule);
        scheduler.start().await?;

        // Keep the scheduler running
        loop {
            tokio::time::sleep(tokio::time::Duration::from_secs(1)).await;
        }
    }
}

/// `<out_dir>/suilend_<first 10 characters of address>.json`
pub fn snapshot_path(out_dir: &Path, address: &str) -> PathBuf {
    out_dir.join(format!("suilend_{}.json", address_prefix(address, ADDRESS_PREFIX_LEN)))
}

async fn create_out_dir(out_dir: &Path) -> Result<(), LendingError> {
    fs::create_dir_all(out_dir).await.map_err(|e| LendingError::filesystem(out_dir, e))
}

async fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), LendingError> {
    let body = serde_json::to_string_pretty(value)?;
    fs::write(path, body).await.map_err(|e| LendingError::filesystem(path, e))
}

/// Write a snapshot, replacing any file of the same name
pub async fn write_snapshot(
    out_dir: &Path,
    snapshot: &ObligationSnapshot,
) -> Result<PathBuf, LendingError> {
    let path = snapshot_path(out_dir, &snapshot.address);
    write_json(&path, snapshot).await?;
    Ok(path)
}

pub async fn write_error_snapshot(
    out_dir: &Path,
    err: &LendingError,
) -> Result<PathBuf, LendingError> {
    create_out_dir(out_dir).await?;
    let path = out_dir.join(ERROR_SNAPSHOT_FILE);
    write_json(&path, &ErrorSnapshot { error: err.to_string() }).await?;
    Ok(path)
}
