use clap::Parser;
use log::{error, info};
use signalk_blescanner::app::{Options, RealScanner, run_with_io};
use signalk_blescanner::config::watch_config;
use std::panic::{self, PanicHookInfo};
use std::sync::Arc;
use tokio::io::BufReader;
use tokio::sync::watch;

/// Exit codes for the application
const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;
const EXIT_PANIC: i32 = 2;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .target(env_logger::Target::Stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Set up panic hook to ensure clean exit codes for the SignalK server
    // that supervises this process
    panic::set_hook(Box::new(move |info: &PanicHookInfo| {
        eprintln!("Panic! {}", info);
        std::process::exit(EXIT_PANIC);
    }));

    let options = Options::parse();
    init_logging(options.verbose);
    info!("startup");

    let (registry_tx, registry_rx) = watch::channel(Arc::new(options.initial_registry()));
    tokio::spawn(async move {
        if let Err(e) = watch_config(BufReader::new(tokio::io::stdin()), registry_tx).await {
            error!("reading configuration from stdin: {e}");
        }
    });

    let mut stdout = std::io::stdout();
    match run_with_io(options, &RealScanner, registry_rx, &mut stdout).await {
        Ok(()) => std::process::exit(EXIT_SUCCESS),
        Err(why) => {
            error!("{why}");
            std::process::exit(EXIT_ERROR);
        }
    }
}
