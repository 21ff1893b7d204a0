/*!
 * sigrelay - Main Entry Point
 *
 * Relay daemon: subscribes to the configured signals through the
 * process-wide queue and logs every signal it receives until an exit
 * signal arrives.
 */

use futures::StreamExt;
use miette::IntoDiagnostic;
use sigrelay::signals::{global, Signal, SignalStream};
use sigrelay::{init_tracing, RelayConfig};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> miette::Result<()> {
    let config = RelayConfig::from_env()?;
    init_tracing(config.trace_json);

    info!("sigrelay starting...");
    info!(
        signals = ?config.signals,
        exit_signals = ?config.exit_signals,
        channel_capacity = config.channel_capacity,
        "Configuration loaded"
    );

    global::initialize();
    for &signal in &config.signals {
        if Signal::from_number(signal).is_some_and(|named| !named.can_catch()) {
            warn!(signal, "Signal cannot be caught, skipping");
            continue;
        }
        global::enable(signal);
    }

    let mut stream = SignalStream::spawn(global::queue(), config.channel_capacity)?;
    info!(pid = std::process::id(), "Relay ready, waiting for signals");

    while let Some(signal) = stream.next().await {
        match Signal::from_number(signal) {
            Some(named) => info!(
                signal = %named,
                description = named.description(),
                "Signal received"
            ),
            None => info!(signal, "Signal received"),
        }

        if config.is_exit_signal(signal) {
            info!(signal, "Exit signal received, shutting down");
            break;
        }
    }

    for &signal in &config.signals {
        global::disable(signal);
    }

    let stats = global::queue().stats();
    info!(stats = %serde_json::to_string(&stats).into_diagnostic()?, "sigrelay stopped");
    Ok(())
}
