use std::process::ExitCode;

use clap::Parser;
use thrustrx::{
    ConsoleSink, Ingester, LineReader, Shutdown,
    config::{self, Args},
};
use tokio::{signal, sync::watch};
use tracing::{error, info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_file(false)
        .init();

    let args = Args::parse();

    if args.list_ports {
        return list_ports();
    }

    let port_config = args.port_config();
    let port = match config::open_port(&port_config) {
        Ok(p) => p,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    info!(
        "Serial port open on {} at {} baud, {:?} timeout",
        port_config.path, port_config.baud, port_config.timeout
    );

    let (cancel_send, cancel_recv) = watch::channel(false);
    tokio::spawn(interrupt_loop(cancel_send));

    let ingest = tokio::task::spawn_blocking(move || {
        let ingester = Ingester::new(cancel_recv);
        ingester.run(LineReader::device(port), &mut ConsoleSink::stdio())
    });

    match ingest.await {
        Ok(Ok(summary)) if summary.shutdown == Shutdown::Cancelled => ExitCode::SUCCESS,
        Ok(Ok(summary)) => {
            error!("Ingest stopped without cancellation: {}", summary.shutdown);
            ExitCode::FAILURE
        }
        Ok(Err(e)) => {
            error!("{e}");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("Ingest task failed: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Wait for Ctrl-C, then tell the ingester to stop.
#[instrument(skip_all)]
async fn interrupt_loop(cancel: watch::Sender<bool>) {
    if let Err(e) = signal::ctrl_c().await {
        error!("Unable to listen for Ctrl-C: {e}");
        return;
    }

    println!("Exiting...");
    let _ = cancel.send(true);
}

fn list_ports() -> ExitCode {
    match serialport::available_ports() {
        Ok(ports) if ports.is_empty() => {
            eprintln!("No serial ports detected");
            ExitCode::SUCCESS
        }
        Ok(ports) => {
            for p in ports {
                println!("{}", p.port_name);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Could not list serial ports: {e}");
            ExitCode::FAILURE
        }
    }
}
