//! `rulwatch-monitor` -- terminal dashboard for predicted machine RUL.
//!
//! Polls the batch prediction service with the fleet's sensor readings and
//! redraws one card per machine whenever new predictions arrive. Press
//! Enter to poll immediately; Ctrl-C stops the dashboard.
//!
//! # Environment variables
//!
//! | Variable               | Required | Default                               | Description                     |
//! |------------------------|----------|---------------------------------------|---------------------------------|
//! | `PREDICT_URL`          | no       | `http://127.0.0.1:8000/predict_batch` | Batch prediction endpoint       |
//! | `POLL_INTERVAL_MS`     | no       | `5000`                                | Milliseconds between polls      |
//! | `REQUEST_TIMEOUT_SECS` | no       | `10`                                  | HTTP transport timeout          |
//! | `MACHINES_FILE`        | no       | --                                    | JSON seed fleet                 |

use std::io::Write;
use std::sync::Arc;

use chrono::Utc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rulwatch_monitor::client::PredictionApi;
use rulwatch_monitor::config::MonitorConfig;
use rulwatch_monitor::store::{Fleet, MachineStore};
use rulwatch_monitor::{input, poller, render};

/// Clear screen and move the cursor home.
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Logs go to stderr so they do not interleave with the dashboard.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rulwatch_monitor=info,rulwatch_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = MonitorConfig::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        std::process::exit(1);
    });

    let machines = config.load_machines().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to load machines");
        std::process::exit(1);
    });

    let store = MachineStore::new(machines).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid fleet");
        std::process::exit(1);
    });
    let store = Arc::new(store);

    let api = PredictionApi::new(config.predict_url.clone(), config.request_timeout)
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to build HTTP client");
            std::process::exit(1);
        });

    tracing::info!(
        url = %config.predict_url,
        interval_ms = config.poll_interval.as_millis() as u64,
        machine_count = store.snapshot().machines.len(),
        "Starting rulwatch-monitor",
    );

    let mut fleet_rx = store.subscribe();
    let poller = poller::spawn(api, Arc::clone(&store), config.poll_interval);

    let initial = fleet_rx.borrow_and_update().clone();
    draw(&initial);

    let mut stdin_lines = input::spawn_line_reader(std::io::BufReader::new(std::io::stdin()));
    let mut stdin_open = true;

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("Shutdown signal received");
                break;
            }
            changed = fleet_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let fleet = fleet_rx.borrow_and_update().clone();
                draw(&fleet);
            }
            line = stdin_lines.recv(), if stdin_open => {
                match line {
                    Some(_) => poller.refresh(),
                    None => stdin_open = false,
                }
            }
        }
    }

    poller.shutdown().await;
    tracing::info!("Dashboard stopped");
}

fn draw(fleet: &Fleet) {
    let mut stdout = std::io::stdout().lock();
    let frame = render::render_dashboard(fleet, Utc::now());
    if let Err(e) = write!(stdout, "{CLEAR_SCREEN}{frame}").and_then(|_| stdout.flush()) {
        tracing::warn!(error = %e, "Failed to draw dashboard");
    }
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
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
