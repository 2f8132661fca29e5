use anyhow::Result;
use clap::Parser;
use console::style;
use tracing::info;
use tracing_subscriber::EnvFilter;

use backfill_console_core::config::{BackendKind, ConsoleConfig, LoggingConfig};
use backfill_console_runtime::backend;
use backfill_console_runtime::ConsoleServer;

/// Run the console server.
#[derive(Parser)]
pub struct RunCommand {
    /// Configuration file path.
    #[arg(short, long, default_value = super::init::DEFAULT_CONFIG_PATH)]
    pub config: String,

    /// Port to listen on (overrides config).
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    pub host: Option<String>,
}

impl RunCommand {
    /// Execute the run command.
    pub async fn execute(self) -> Result<()> {
        dotenvy::dotenv().ok();

        let config_path = std::path::Path::new(&self.config);
        if !config_path.exists() {
            anyhow::bail!(
                "Configuration file not found: {}\nRun `backfill-console init` to create one.",
                self.config
            );
        }

        let config = self.load_config()?;
        init_tracing(&config.logging);
        info!("Loaded configuration from {}", self.config);

        println!();
        println!(
            "  {} v{}",
            style(&config.ui.title).bold().cyan(),
            env!("CARGO_PKG_VERSION")
        );
        println!();
        println!(
            "  Listening on {}",
            style(format!("http://{}:{}", config.server.host, config.server.port)).cyan()
        );
        match config.backend.kind {
            BackendKind::Http => println!("  Backend     {}", style(&config.backend.url).cyan()),
            BackendKind::Memory => println!("  Backend     {}", style("in-memory").yellow()),
        }
        println!();

        let backend = backend::from_config(&config.backend)?;
        ConsoleServer::new(config, backend).run().await?;

        println!("\n  Goodbye!");
        Ok(())
    }

    /// Read the config file and apply command-line overrides.
    fn load_config(&self) -> Result<ConsoleConfig> {
        let mut config = ConsoleConfig::from_file(&self.config)?;

        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

/// Install the global subscriber. `RUST_LOG` takes precedence over the
/// configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    if logging.json_format {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
