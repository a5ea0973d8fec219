mod cli;

use crate::cli::{GeneratorArg, LogFormatArg, StorageBackendArg, CLI};
use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use stubby_core::{Repository, Shortener};
use stubby_gateway::{App, AppState};
use stubby_generator::{RandomGenerator, SeqGenerator};
use stubby_shortener::{ShortenerService, ShortenerSettings};
use stubby_storage::{InMemoryRepository, MySqlRepository};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();
    init_tracing(&config.log_level, config.log_format);

    info!(
        listen_addr = %config.listen_addr,
        public_base_url = %config.public_base_url,
        storage_backend = %config.storage,
        generator = %config.generator,
        max_retries = config.max_retries,
        "starting gateway server"
    );

    let settings = ShortenerSettings::builder()
        .max_retries(config.max_retries)
        .build();

    let shortener = match config.storage {
        StorageBackendArg::InMemory => {
            build_shortener(InMemoryRepository::new(), config.generator, settings)
        }
        StorageBackendArg::Mysql => {
            let mysql_dsn = config
                .mysql_dsn
                .as_deref()
                .context("mysql dsn is required when storage backend is mysql")?;
            let repository = MySqlRepository::connect(mysql_dsn, config.mysql_max_connections)
                .await
                .context("failed to connect to mysql")?;
            repository
                .ensure_schema()
                .await
                .context("failed to create mysql schema")?;
            build_shortener(repository, config.generator, settings)
        }
    };

    let app = App::router(AppState::new(shortener, config.public_base_url));

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    info!(listen_addr = %listener.local_addr()?, "gateway listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("gateway server failed")?;

    info!("gateway stopped");
    Ok(())
}

fn init_tracing(log_level: &str, format: LogFormatArg) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormatArg::Pretty => builder.init(),
        LogFormatArg::Json => builder.json().init(),
    }
}

fn build_shortener<R: Repository>(
    repository: R,
    generator: GeneratorArg,
    settings: ShortenerSettings,
) -> Arc<dyn Shortener> {
    match generator {
        GeneratorArg::Random => Arc::new(ShortenerService::with_settings(
            repository,
            RandomGenerator::new(),
            settings,
        )),
        GeneratorArg::Seq => Arc::new(ShortenerService::with_settings(
            repository,
            SeqGenerator::new(),
            settings,
        )),
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        // Without a signal handler, run until the process is killed.
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
