use anyhow::{anyhow, Result};
use tracing_subscriber::fmt::time::OffsetTime;

/// Initialises `tracing` output to the given log file. Call once, before the
/// first frame; repeated initialisation is an error.
pub fn setup(logfile_path: &str) -> Result<()> {
    let logfile = std::fs::OpenOptions::new()
        .write(true)
        .truncate(true)
        .create(true)
        .open(logfile_path)?;
    let timer = OffsetTime::new(
        time::UtcOffset::UTC,
        time::macros::format_description!("[hour]:[minute]:[second].[subsecond digits:6]"),
    );
    tracing_subscriber::fmt()
        .event_format(
            tracing_subscriber::fmt::format()
                .with_target(false)
                .with_timer(timer),
        )
        .with_writer(logfile)
        .try_init()
        .map_err(|e| anyhow!("failed to initialise logging: {e}"))?;
    Ok(())
}
