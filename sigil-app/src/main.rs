//! Sigil command-line front end
//!
//! Builds a canvas (the configured layout, or one fragment per argument),
//! casts it once through the configured backend and prints what came back.

mod config;
mod constants;

use std::process::ExitCode;
use std::sync::Arc;

use config::{AppConfig, ConfigError};
use constants::layout;
use inference::{GatewayError, InferenceGateway, SharedGateway};
use sigil_canvas::{CanvasEvent, CanvasSession, EventError, EventSink, Position, SeedFragment};

/// Errors that stop the binary before a cast is attempted
#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to start backend: {0}")]
    Gateway(#[from] GatewayError),
}

/// Event sink that writes canvas events to the log
struct LogEventSink;

impl EventSink for LogEventSink {
    fn send(&self, event: CanvasEvent) -> Result<(), EventError> {
        match &event {
            CanvasEvent::CastStarted { cast_id, prompt } => {
                log::debug!("Cast {} prompt: {}", cast_id, prompt);
            }
            other => log::trace!("{:?}", other),
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    log::info!("Sigil starting...");

    match run(std::env::args().skip(1).collect()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Vec<String>) -> Result<(), AppError> {
    let dir = AppConfig::default_dir();
    let first_run = !dir.join(constants::paths::CONFIG_FILE).exists();
    let mut config = match AppConfig::load(&dir).await {
        Ok(config) => {
            log::info!("Loaded app configuration from {:?}", dir);
            config
        }
        Err(e @ ConfigError::Parse(_)) => return Err(e.into()),
        Err(e) => {
            log::warn!("Failed to load config, using defaults: {}", e);
            AppConfig::default()
        }
    };
    if first_run {
        // Leave an editable file behind; env overrides are not persisted
        if let Err(e) = config.save(&dir).await {
            log::warn!("Could not write default config: {}", e);
        }
    }
    config.apply_env();

    let backend_config = config.backend_config()?;

    let wanted = config.backend_name();
    let gateway: SharedGateway = Arc::new(InferenceGateway::for_backend(wanted)?);
    if let Some(info) = gateway
        .available_backends()
        .into_iter()
        .find(|info| info.name == wanted)
    {
        if let Some(reason) = info.unavailable_reason {
            log::warn!("{} may not work: {}", wanted, reason);
        }
    }
    gateway.start(&backend_config).await?;

    let session = build_session(&config, args);
    log::info!("Canvas holds {} fragments", session.fragments().len());

    let Some(pending) = session.submit() else {
        log::warn!("A cast is already in flight");
        return Ok(());
    };
    log::info!("Composed prompt: {}", pending.composed());

    let result = pending.cast(&gateway).await;
    println!("{}", result.text);

    gateway.stop().await;
    Ok(())
}

/// Arguments become fragments stacked top to bottom; otherwise the
/// configured or built-in layout is used
fn build_session(config: &AppConfig, args: Vec<String>) -> CanvasSession {
    let events: Arc<dyn EventSink> = Arc::new(LogEventSink);

    if !args.is_empty() {
        let seed = args.into_iter().enumerate().map(|(i, content)| {
            let y = layout::ARG_TOP + layout::ARG_SPACING * i as f64;
            SeedFragment {
                content,
                position: Position::new(layout::ARG_X, y),
            }
        });
        return CanvasSession::with_seed(seed, events);
    }

    match &config.seed {
        Some(seed) => CanvasSession::with_seed(seed.clone(), events),
        None => CanvasSession::seeded(events),
    }
}
