use std::path::PathBuf;

use anyhow::Context;
use clap::{Args as ClapArgs, Parser, Subcommand};
use critica_server::{
    create_app,
    infra::{
        config::{
            Config, ConfigLoad, ConfigLoader, ConfigLoaderOptions, ConfigOverrides,
            StorageBackend,
        },
        startup::{build_state, connect_postgres},
    },
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "critica-server")]
#[command(about = "Catalog and review service for games and movies")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(ClapArgs, Debug, Clone)]
struct ServeArgs {
    /// Path to a TOML configuration file (default: critica.toml or config/critica.toml)
    #[arg(long, env = "CRITICA_CONFIG")]
    config: Option<PathBuf>,

    /// Path to a .env file (default: .env in the working directory)
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Server port (overrides config)
    #[arg(short, long, env = "SERVER_PORT")]
    port: Option<u16>,

    /// Server host (overrides config)
    #[arg(long, env = "SERVER_HOST")]
    host: Option<String>,

    /// PostgreSQL connection URL (overrides config)
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: Option<String>,

    /// Storage backend: postgres or memory
    #[arg(long)]
    storage: Option<StorageBackend>,

    /// Enable dev mode (permissive CORS, relaxed guard rails)
    #[arg(long, default_value_t = false)]
    dev: bool,
}

impl ServeArgs {
    fn loader(&self) -> ConfigLoader {
        ConfigLoader::with_options(ConfigLoaderOptions {
            config_path: self.config.clone(),
            env_file: self.env_file.clone(),
        })
        .with_overrides(ConfigOverrides {
            host: self.host.clone(),
            port: self.port,
            database_url: self.database_url.clone(),
            storage: self.storage,
            dev_mode: self.dev.then_some(true),
        })
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (the default)
    Serve,
    #[command(subcommand)]
    Db(DbCommand),
}

#[derive(Debug, Subcommand)]
enum DbCommand {
    /// Apply database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Some(Command::Db(DbCommand::Migrate)) => run_db_migrate(&cli.serve).await,
        Some(Command::Serve) | None => run_server(&cli.serve).await,
    }
}

fn load_runtime_config(args: &ServeArgs) -> anyhow::Result<Config> {
    let ConfigLoad { config, warnings } = args
        .loader()
        .load()
        .context("failed to load configuration")?;

    if config.metadata.env_file_loaded {
        info!("loaded .env file");
    }
    if let Some(path) = &config.metadata.config_path {
        info!(path = %path.display(), "configuration file loaded");
    }

    for warning in &warnings.items {
        match &warning.hint {
            Some(hint) => {
                warn!(message = %warning.message, hint = %hint, "configuration warning")
            }
            None => {
                warn!(message = %warning.message, "configuration warning")
            }
        }
    }

    info!(
        storage = %config.storage,
        dev_mode = config.dev_mode,
        page_size.default = config.pagination.default_size,
        page_size.max = config.pagination.max_size,
        filters.strict_keys = config.filters.strict_keys,
        "configuration in effect"
    );

    Ok(config)
}

async fn run_db_migrate(args: &ServeArgs) -> anyhow::Result<()> {
    let config = load_runtime_config(args)?;
    if config.storage != StorageBackend::Postgres {
        anyhow::bail!("`db migrate` requires the postgres storage backend");
    }

    let postgres = connect_postgres(&config)
        .await
        .context("failed to connect to PostgreSQL for migration")?;
    postgres
        .initialize_schema()
        .await
        .context("database migration failed")?;
    info!("Database migrations applied successfully");
    Ok(())
}

async fn run_server(args: &ServeArgs) -> anyhow::Result<()> {
    let config = load_runtime_config(args)?;
    let addr = config.bind_address();
    let state = build_state(config).await?;
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(addr = %addr, "critica-server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
