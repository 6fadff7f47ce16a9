//! wext-scan - wireless access point scanner
//!
//! Scans every configured interface and prints one JSON object per access
//! point on stdout. Logs go to stderr.

use std::io::Write;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use tracing::{debug, error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use wext_scan::{scan_interface, Config, ScanError, ScanOutcome};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();

    let config = Config::from_env();

    info!("Configuration:");
    info!("  Interfaces: {}", config.interfaces.join(", "));
    info!("  Scan timeout: {:?}", config.scan.timeout);
    info!("  Buffer: {} bytes (max {})", config.scan.initial_buffer_size, config.scan.max_buffer_size);

    // One blocking scan per interface, each with its own channel
    let mut handles = Vec::with_capacity(config.interfaces.len());
    for interface in &config.interfaces {
        let interface = interface.clone();
        let scan_config = config.scan.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            let started = Instant::now();
            info!(
                "Scanning {} at {}",
                interface,
                chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ")
            );
            let result = scan_interface(&interface, &scan_config);
            (interface, started.elapsed(), result)
        }));
    }

    let mut succeeded = 0usize;
    let mut failed = Vec::new();
    let stdout = std::io::stdout();

    for handle in handles {
        let (interface, elapsed, result) = handle.await.context("Scan task panicked")?;
        match result {
            Ok(outcome) => {
                info!(
                    "{}: {} access points in {}ms",
                    interface,
                    outcome.records.len(),
                    elapsed.as_millis()
                );
                print_outcome(&mut stdout.lock(), &outcome)
                    .with_context(|| format!("Failed to write results for {}", interface))?;
                succeeded += 1;
            }
            Err(e) => {
                error!("{}: scan failed after {}ms: {}", interface, elapsed.as_millis(), e);
                if matches!(e, ScanError::PermissionDenied) {
                    error!("Triggering a scan needs CAP_NET_ADMIN, try running with sudo");
                }
                failed.push((interface, e.reason()));
            }
        }
    }

    if succeeded == 0 {
        let summary: Vec<String> = failed
            .iter()
            .map(|(interface, reason)| format!("{} ({})", interface, reason))
            .collect();
        bail!("Every interface failed to scan: {}", summary.join(", "));
    }

    Ok(())
}

fn print_outcome(out: &mut impl Write, outcome: &ScanOutcome) -> Result<()> {
    for record in &outcome.records {
        debug!(
            "{} {:?} {} dBm (quality {}) channel {} {}",
            record.mac_address,
            record.essid.as_deref().unwrap_or(""),
            record.signal_dbm,
            record.quality(),
            record.channel,
            record.encryption
        );
        writeln!(out, "{}", record.to_json())?;
    }

    debug!("Scan stats: {}", serde_json::to_string(&outcome.stats)?);
    out.flush()?;
    Ok(())
}
