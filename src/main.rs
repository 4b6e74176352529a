use tokio::io::BufReader;
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hand_cricket::cli::Session;
use hand_cricket::infrastructure::app_state::{AppConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Logs go to stderr so they never interleave with the game screen
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hand_cricket=info,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = AppConfig::from_env()?;
    let state = AppState::new(config).await?;

    tracing::info!(turn_delay_ms = state.config.turn_delay.as_millis() as u64, "Starting hand cricket");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        tracing::info!("Interrupt received, shutting down");
        let _ = shutdown_tx.send(true);
    });

    let stdin = BufReader::new(tokio::io::stdin());
    let mut session = Session::new(&state.config, state.stats_repo.clone(), stdin, std::io::stdout())
        .with_shutdown(shutdown_rx.clone());
    session.run().await?;

    state.db.close().await;

    // A blocked stdin read holds the runtime open until the next newline
    if *shutdown_rx.borrow() {
        std::process::exit(130);
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
