//! `agorad` — the Agora server binary.
//!
//! Usage:
//!   agorad -c <context-name-or-path> [--listen <addr>]
//!
//! The context name resolves to `/etc/agora/<name>.toml`.
//! If a path with `/` or `.` is given, it's used directly.

mod config;
mod routes;

use std::sync::Arc;

use clap::Parser;
use tracing::info;

use agora_core::Module;
use config::ServerConfig;
use social::service::SocialConfig;

/// Agora server.
#[derive(Parser, Debug)]
#[command(name = "agorad", about = "Agora server")]
struct Cli {
    /// Context name or path to config file.
    #[arg(short = 'c', long = "config", required = true)]
    config: String,

    /// Listen address (overrides default 0.0.0.0:8080).
    #[arg(long = "listen", default_value = "0.0.0.0:8080")]
    listen: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    // Load server configuration.
    let config_path = ServerConfig::resolve_path(&cli.config);
    info!("Loading configuration from {}", config_path.display());
    let server_config = ServerConfig::load(&config_path)?;

    // Initialize storage.
    let data_dir = std::path::PathBuf::from(&server_config.storage.data_dir);
    std::fs::create_dir_all(&data_dir)?;

    let core_config = agora_core::ServiceConfig {
        data_dir: Some(data_dir),
        listen: cli.listen.clone(),
        ..Default::default()
    };

    let db: Arc<dyn agora_sql::DocStore> = Arc::new(
        agora_sql::SqliteStore::open(&core_config.resolve_sqlite_path())
            .map_err(|e| anyhow::anyhow!("failed to open document store: {}", e))?,
    );

    // Email provider is optional; without one, notifications stay in-app.
    let mailer: Arc<dyn agora_mail::Mailer> = match &server_config.mail {
        Some(mail) => {
            info!("Mail channel enabled via {}", mail.endpoint);
            Arc::new(agora_mail::HttpMailer::new(
                mail.endpoint.clone(),
                mail.api_key.clone(),
                mail.from.clone(),
            ))
        }
        None => {
            info!("No mail provider configured; email notifications disabled");
            Arc::new(agora_mail::NoopMailer)
        }
    };

    let social_config = SocialConfig {
        site_name: server_config.social.site_name.clone(),
        ..Default::default()
    };
    let social_module = social::SocialModule::new(db, mailer, social_config)?;
    info!("Social module initialized");

    let module_routes = vec![(social_module.name(), social_module.routes())];

    // Build router.
    let app = routes::build_router(module_routes);

    // Start server.
    let listener = tokio::net::TcpListener::bind(&cli.listen).await?;
    info!("Agora server listening on {}", cli.listen);
    axum::serve(listener, app).await?;

    Ok(())
}
