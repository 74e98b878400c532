use anyhow::Result;
use env_logger::Env;
use log::info;
use worker::{SnapshotConfig, Worker};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = SnapshotConfig::from_env()?;
    info!(
        "Starting Suilend snapshot worker for {} addresses, writing to '{}'",
        config.addresses.len(),
        config.out_dir.display()
    );

    let schedule = config.schedule.clone();
    let worker = Worker::new(config);

    match schedule {
        Some(schedule) => worker.start_snapshot_schedule(&schedule).await?,
        // A failed run is reported and written to disk, the process still exits cleanly
        None => {
            worker.run_and_report().await;
        }
    }

    Ok(())
}
