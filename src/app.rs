//! Core application runner.
//!
//! Decoupled from CLI parsing, stdin and process exit codes so the loop can
//! be tested with an injected scanner and output buffer.

use crate::advertisement::AdvertisementRecord;
use crate::config::{DEFAULT_ROUNDING, DeviceRegistry};
use crate::decoder::dispatch::decode_advertisement;
use crate::output::OutputFormatter;
use crate::output::signalk::SignalKFormatter;
use crate::scanner::{DEFAULT_SCAN_WINDOW, ScanError, ScanOptions};
use clap::Parser;
use log::{debug, error, trace};
use std::future::Future;
use std::io;
use std::io::Write;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, watch};

/// Command line options.
#[derive(Parser, Debug, Clone)]
#[command(author, about, version)]
pub struct Options {
    /// Bluetooth adapter to scan on, e.g. hci1. Defaults to the system default adapter.
    #[arg(long)]
    pub adapter: Option<String>,

    /// Length of one scan cycle before the scanner is restarted.
    /// Accepts duration with suffix: 30s, 1m, 500ms, 2h.
    #[arg(long, value_parser = crate::config::parse_duration, default_value = "30s")]
    pub scan_window: Duration,

    /// Report every supported device, not just those in the configuration.
    #[arg(long)]
    pub no_whitelist: bool,

    /// Decimal places for floating point values until configured otherwise.
    #[arg(long, default_value_t = DEFAULT_ROUNDING)]
    pub rounding: u32,

    /// Verbose logging (debug level) unless RUST_LOG is set
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            adapter: None,
            scan_window: DEFAULT_SCAN_WINDOW,
            no_whitelist: false,
            rounding: DEFAULT_ROUNDING,
            verbose: false,
        }
    }
}

impl Options {
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            adapter: self.adapter.clone(),
            scan_window: self.scan_window,
        }
    }

    /// Registry used until the first configuration message arrives.
    pub fn initial_registry(&self) -> DeviceRegistry {
        DeviceRegistry::new(!self.no_whitelist, self.rounding)
    }
}

/// Errors returned by the core run loop.
#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Future returned by [`Scanner::start_scan`].
pub type ScanFuture<'a> = Pin<
    Box<dyn Future<Output = Result<mpsc::Receiver<AdvertisementRecord>, ScanError>> + Send + 'a>,
>;

/// Scanner abstraction to enable deterministic unit tests without Bluetooth hardware.
pub trait Scanner: Send + Sync {
    fn start_scan(&self, options: ScanOptions) -> ScanFuture<'_>;
}

/// Real scanner implementation that delegates to the compiled-in backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealScanner;

impl Scanner for RealScanner {
    fn start_scan(&self, options: ScanOptions) -> ScanFuture<'_> {
        Box::pin(async move { crate::scanner::start_scan(options).await })
    }
}

/// Decode one record and write a line per reading. Decode failures are logged.
fn process_record(
    formatter: &dyn OutputFormatter,
    record: &AdvertisementRecord,
    registry: &DeviceRegistry,
    out: &mut dyn Write,
) -> io::Result<usize> {
    let mut written = 0;
    for result in decode_advertisement(record) {
        match result {
            Ok(reading) => {
                debug!("{} rssi={:?}: {reading:?}", record.address, record.rssi);
                writeln!(out, "{}", formatter.format(record, &reading, registry))?;
                written += 1;
            }
            Err(e) => error!("{}: {e}", record.address),
        }
    }
    if written > 0 {
        out.flush()?;
    }
    Ok(written)
}

/// Run the scan loop, writing one SignalK delta per reading to `out`.
///
/// The current device configuration is read from `registry` for every
/// record, so updates take effect immediately. Returns when the scanner
/// stops delivering records.
pub async fn run_with_io(
    options: Options,
    scanner: &dyn Scanner,
    registry: watch::Receiver<Arc<DeviceRegistry>>,
    out: &mut dyn Write,
) -> Result<(), RunError> {
    let formatter = SignalKFormatter::new();
    let mut records = scanner.start_scan(options.scan_options()).await?;

    while let Some(record) = records.recv().await {
        let current = Arc::clone(&registry.borrow());
        if !current.accepts(&record.address) {
            trace!("skipping {}: not in whitelist", record.address);
            continue;
        }
        process_record(&formatter, &record, &current, out)?;
    }

    Ok(())
}
