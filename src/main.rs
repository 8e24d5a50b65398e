//! speech-intent: local service classifying utterances heard over agent speech
//!
//! A turn-taking controller sends each recognized utterance together with
//! whether the agent is speaking, and gets back whether to interrupt.

use anyhow::Result;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use speech_intent::config::Config;
use speech_intent::intent::IntentEvaluator;
use speech_intent::ipc::Server;
use speech_intent::lifecycle::ShutdownSignal;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "speech-intent starting");

    // Load configuration
    let config = Config::load()?;
    info!(
        ?config.socket_path,
        acknowledgement_override = config.acknowledgements.is_some(),
        command_override = config.commands.is_some(),
        "configuration loaded"
    );

    let evaluator = IntentEvaluator::with_lexicon(config.lexicon());
    info!(
        acknowledgements = evaluator.lexicon().acknowledgements().len(),
        commands = evaluator.lexicon().commands().len(),
        "lexicon ready"
    );

    let shutdown = ShutdownSignal::new();
    let server = Server::new(&config.socket_path, evaluator)?;
    let mut decision_rx = server.subscribe();

    info!("service initialized, entering main loop");

    tokio::select! {
        // Run the IPC server (accepts client connections)
        result = server.run() => {
            if let Err(e) = result {
                error!(?e, "IPC server error");
            }
        }

        // Log decisions for analytics
        _ = async {
            loop {
                match decision_rx.recv().await {
                    Ok(event) => debug!(%event, "decision event"),
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!(skipped = n, "decision event receiver lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        } => {
            info!("decision event handler exited");
        }

        // Wait for shutdown signal
        result = shutdown.wait() => {
            match result {
                Ok(()) => info!("shutdown signal received"),
                Err(e) => error!(?e, "failed to register signal handlers"),
            }
        }
    }

    info!("shutting down...");
    server.shutdown().await;
    info!("speech-intent stopped");

    Ok(())
}
