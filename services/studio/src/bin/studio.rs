//! services/studio/src/bin/studio.rs

use design_review_core::{credentials::CredentialStore, evaluator::Evaluator};
use std::sync::Arc;
use studio_lib::{
    adapters::{FileKvStore, GeminiEvaluationAdapter},
    app::App,
    config::Config,
    console,
    error::AppError,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    info!("Configuration loaded. Starting studio...");

    // --- 2. Open Durable Storage ---
    let kv = Arc::new(FileKvStore::open(&config.storage_path)?);
    info!("Using storage at {}", kv.path().display());
    let credentials = CredentialStore::new(kv);

    // --- 3. Initialize the Evaluation Adapter ---
    let generator = GeminiEvaluationAdapter::new(
        config.gemini_api_key.as_deref(),
        &config.gemini_api_base,
        config.evaluation_model.clone(),
    );
    if !generator.has_credential() {
        warn!("GEMINI_API_KEY is not set. AI evaluations will fail until it is configured.");
    }
    let evaluator = Evaluator::new(Arc::new(generator));

    // --- 4. Restore Any Previous Session & Run ---
    let mut app = App::new(credentials, evaluator);
    if app.restore() {
        info!("Resumed previous session.");
    }
    console::run(&mut app).await?;

    info!("Studio exited.");
    Ok(())
}
