//! Safety registry daemon: entry point for running the assessment service.

use anyhow::Context;
use clap::Parser;
use safereg_assessor::{init_logging, Assessor, AssessorConfig, AssessorMetrics, LogFormat, TtlCache};
use safereg_intel::FlagAggregator;
use safereg_privacy::PrivacyEngine;
use safereg_registry::{connect_provider, EthChainObserver, EthRegistry};
use safereg_rpc::RpcServer;
use safereg_types::SystemClock;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;

#[derive(Parser)]
#[command(name = "safereg-daemon", about = "Address trust and privacy assessment service")]
struct Cli {
    /// Chain JSON-RPC endpoint hosting the registry contract.
    #[arg(long, env = "SAFEREG_RPC_URL")]
    rpc_url: Option<String>,

    /// Registry contract address.
    #[arg(long, env = "SAFEREG_REGISTRY_ADDRESS")]
    registry_address: Option<String>,

    /// HTTP API port.
    #[arg(long, env = "SAFEREG_PORT")]
    port: Option<u16>,

    /// Assessment cache lifetime in seconds.
    #[arg(long, env = "SAFEREG_CACHE_TTL_SECS")]
    cache_ttl_secs: Option<u64>,

    /// Collapse concurrent cache misses for the same address.
    #[arg(long, env = "SAFEREG_SINGLE_FLIGHT")]
    single_flight: bool,

    /// Log format: "human" or "json".
    #[arg(long, env = "SAFEREG_LOG_FORMAT")]
    log_format: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "SAFEREG_LOG_LEVEL")]
    log_level: Option<String>,

    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "SAFEREG_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Run the HTTP API.
    Serve,
    /// Assess one address and print the result as JSON.
    Check { address: String },
}

impl Cli {
    /// File settings (or defaults) with CLI flags and env vars applied on top.
    fn resolve_config(&self) -> anyhow::Result<AssessorConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let path = path.to_str().context("config path is not valid UTF-8")?;
                AssessorConfig::from_toml_file(path)
                    .with_context(|| format!("loading config from {path}"))?
            }
            None => AssessorConfig::default(),
        };

        if let Some(url) = &self.rpc_url {
            config.rpc_url = url.clone();
        }
        if let Some(address) = &self.registry_address {
            config.registry_address = address.clone();
        }
        if let Some(port) = self.port {
            config.listen_port = port;
        }
        if let Some(ttl) = self.cache_ttl_secs {
            config.cache_ttl_secs = ttl;
        }
        config.single_flight |= self.single_flight;
        if let Some(format) = &self.log_format {
            config.log_format = format.clone();
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        Ok(config)
    }
}

/// Wire the real registry, chain observer, and intel sources.
fn build_assessor(config: &AssessorConfig) -> anyhow::Result<Assessor> {
    let registry_address = config.registry_address()?;
    let provider = connect_provider(&config.rpc_url)?;

    let registry = EthRegistry::new(provider.clone(), &registry_address)?;
    let privacy = PrivacyEngine::new(Arc::new(EthChainObserver::new(provider)))
        .with_timeout(config.registry_timeout());
    let intel = FlagAggregator::from_config(&config.sources, config.source_timeout())?;
    let clock = Arc::new(SystemClock);
    let cache = Arc::new(TtlCache::new(config.cache_ttl(), clock.clone()));

    tracing::info!(
        registry = %registry_address,
        sources = intel.len(),
        cache_ttl_secs = config.cache_ttl_secs,
        single_flight = config.single_flight,
        "assessor configured"
    );

    Ok(Assessor::new(Arc::new(registry), privacy, intel, cache)
        .with_clock(clock)
        .with_single_flight(config.single_flight)
        .with_registry_timeout(config.registry_timeout())
        .with_metrics(Arc::new(AssessorMetrics::new()))
        .with_registry_address(registry_address))
}

/// Resolve on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("failed to listen for SIGINT: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => { tracing::info!("received SIGINT, shutting down"); }
        _ = terminate => { tracing::info!("received SIGTERM, shutting down"); }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    init_logging(LogFormat::parse(&config.log_format), &config.log_level)?;

    let assessor = Arc::new(build_assessor(&config)?);

    match cli.command {
        Command::Serve => {
            tracing::info!(
                "Starting safereg on port {} (chain: {})",
                config.listen_port,
                config.rpc_url
            );
            let server = RpcServer::new(config.listen_port, assessor);
            server.start(shutdown_signal()).await?;
            tracing::info!("safereg daemon exited cleanly");
        }
        Command::Check { address } => {
            let result = assessor.check(&address).await?;
            println!("{}", serde_json::to_string_pretty(&result.assessment)?);
        }
    }

    Ok(())
}
