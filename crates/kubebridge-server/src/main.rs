//! kubebridge - expose Kubernetes operations to language models
//!
//! `kubebridge serve` runs the protocol over HTTP; `kubebridge chat` talks to
//! the configured model from the terminal.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kubebridge_core::config::ConfigFile;
use kubebridge_core::{
    create_provider, kubernetes_registry, AppConfig, Assistant, Backend, ConsoleLogger,
    DryRunBackend, EnvSecretStore, KubectlBackend, Logger, ResourceCatalog, Router, ToolRegistry,
    Translator, TracingLogger,
};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod chat;
mod http;

/// kubebridge - Kubernetes tools for language models
#[derive(Parser, Debug)]
#[command(name = "kubebridge")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration file (default: ~/.config/kubebridge/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the protocol over HTTP (default)
    Serve {
        /// Address to listen on, overrides the config file
        #[arg(long)]
        listen: Option<String>,

        /// Render commands instead of running kubectl
        #[arg(long)]
        dry_run: bool,
    },

    /// Chat with the model; tool calls are printed, not executed
    Chat {
        /// Print debug lines from the assistant and provider
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let file = cli.config.clone().map(ConfigFile::new).unwrap_or_else(ConfigFile::user);
    let mut config = file
        .load()
        .with_context(|| format!("loading {}", file.path().display()))?;
    config.apply_env();

    match cli.command.unwrap_or(Commands::Serve {
        listen: None,
        dry_run: false,
    }) {
        Commands::Serve { listen, dry_run } => {
            if let Some(listen) = listen {
                config.server.listen = listen;
            }
            config.server.dry_run |= dry_run;
            config.validate()?;
            serve(config).await
        }
        Commands::Chat { verbose } => {
            config.validate()?;
            let logger: Arc<dyn Logger> = Arc::new(ConsoleLogger::new().with_debug(verbose));
            let registry = Arc::new(kubernetes_registry()?);
            let assistant = Arc::new(build_assistant(&config, Arc::clone(&registry), logger)?);
            chat::run(assistant, Translator::new(registry)).await
        }
    }
}

fn build_assistant(
    config: &AppConfig,
    registry: Arc<ToolRegistry>,
    logger: Arc<dyn Logger>,
) -> Result<Assistant> {
    let provider = create_provider(&config.provider, &EnvSecretStore, Arc::clone(&logger))?;
    Ok(Assistant::new(provider, registry, logger)
        .with_timeout(config.assistant.timeout())
        .with_max_pairs(config.session.max_pairs)
        .with_context_tags(config.assistant.context.clone()))
}

async fn serve(config: AppConfig) -> Result<()> {
    let logger: Arc<dyn Logger> = Arc::new(TracingLogger::new());
    let registry = Arc::new(kubernetes_registry()?);

    let backend: Arc<dyn Backend> = if config.server.dry_run {
        Arc::new(DryRunBackend)
    } else {
        Arc::new(KubectlBackend::default())
    };

    let mut router = Router::new(
        Arc::clone(&registry),
        ResourceCatalog::kubernetes(),
        backend,
        Arc::clone(&logger),
    );

    // The server still answers tool calls without a model; only the query tool needs one
    match build_assistant(&config, registry, Arc::clone(&logger)) {
        Ok(assistant) => router = router.with_assistant(Arc::new(assistant)),
        Err(err) => tracing::warn!("assistant disabled: {:#}", err),
    }

    let addr = config.listen_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    tracing::info!(
        "kubebridge listening on {} ({} backend)",
        addr,
        if config.server.dry_run { "dry-run" } else { "kubectl" }
    );

    axum::serve(listener, http::app(Arc::new(router)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
