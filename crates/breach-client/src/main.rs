//! Static Breach terminal client.

use breach_core::{GameRng, Session};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tokio::runtime::Handle;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod app;
mod input;
mod settings;
mod submit;
mod ui;

use settings::ClientSettings;
use submit::{HttpScoreSink, ScoreSubmitter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = ClientSettings::from_env()?;

    // The terminal belongs to the game, so logs go to a file
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&settings.log_file)?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(log_file)),
        )
        .init();

    let config = settings.load_game_config()?;
    let seed = settings.seed.unwrap_or_else(|| GameRng::from_entropy().seed());

    let sink = if settings.submit_scores {
        ScoreSubmitter::Http(HttpScoreSink::new(
            settings.score_url.clone(),
            settings.score_timeout,
            Handle::current(),
        )?)
    } else {
        ScoreSubmitter::Disabled
    };

    info!(seed, score_url = %settings.score_url, "Starting Static Breach...");

    let mut session = Session::new(config, seed, sink)?;
    app::run(&mut session).await
}
