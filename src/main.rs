use clap::Parser;
use sercat::config::{Config, ConfigLoader, LogFormat};
use sercat::{complete, AppError, AppResult, Forwarder, PortConfiguration, SerialPortHandle};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::EnvFilter;

// Command-line arguments
#[derive(Parser, Debug)]
#[command(
    version,
    about = "Open a serial port and link TX / RX to stdin / stdout",
    long_about = "Open a serial port and link TX / RX to stdin / stdout. Everything received on the port is written to stdout; everything read from stdin is sent to the port. Press Ctrl+C to close the port and exit."
)]
struct Args {
    /// Name of the port to open
    #[arg(required_unless_present = "complete")]
    port: Option<String>,

    /// Baudrate to use for communication [default: 115200]
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    baudrate: Option<u32>,

    /// Communication format: <data bits><parity><stop bits>, e.g. 8N1 or 7E1.5 [default: 8N1]
    format: Option<String>,

    /// Print completion candidates for the given positional argument and exit
    #[arg(long, value_name = "POSITION", hide = true)]
    complete: Option<usize>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Some(position) = args.complete {
        for candidate in complete::candidates(position) {
            println!("{candidate}");
        }
        return ExitCode::SUCCESS;
    }

    let config = match ConfigLoader::load() {
        Ok(loader) => loader.into_config(),
        Err(e) => {
            eprintln!("error: {}", AppError::from(e));
            return ExitCode::FAILURE;
        }
    };
    init_logging(&config);

    match run(args, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "sercat failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args, config: &Config) -> AppResult<()> {
    let baud_rate = args.baudrate.unwrap_or(config.serial.default_baud);
    let format = args
        .format
        .unwrap_or_else(|| config.serial.default_format.clone());
    let port_config = PortConfiguration::from_args(baud_rate, &format)?;

    // clap guarantees the port is present when --complete is absent.
    let port_name = args.port.unwrap_or_default();
    let port = SerialPortHandle::open(&port_name, &port_config)?;
    tracing::info!(port = %port_name, config = %port_config, "port open");

    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(Forwarder::new(Arc::new(port)).run(shutdown_signal()));
    // The input thread may still be parked on stdin; do not wait for it.
    runtime.shutdown_background();
    result
}

/// Initialise structured logging on stderr; stdout carries the port data.
fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match config.logging.format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Compact => builder.compact().init(),
    }
}

// --- Interrupt source ---
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
