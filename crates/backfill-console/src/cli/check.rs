use anyhow::Result;
use clap::Parser;
use console::style;

use backfill_console_core::config::{BackendKind, ConsoleConfig};

/// Validate a configuration file.
#[derive(Parser)]
pub struct CheckCommand {
    /// Configuration file path.
    #[arg(short, long, default_value = super::init::DEFAULT_CONFIG_PATH)]
    pub config: String,
}

impl CheckCommand {
    pub fn execute(self) -> Result<()> {
        let config = ConsoleConfig::from_file(&self.config)?;

        println!("{} {} is valid", style("✔").green(), style(&self.config).cyan());
        for line in summary(&config) {
            println!("  {}", line);
        }
        Ok(())
    }
}

fn summary(config: &ConsoleConfig) -> Vec<String> {
    let backend = match config.backend.kind {
        BackendKind::Http => format!(
            "http {} (timeout {}s)",
            config.backend.url, config.backend.timeout_secs
        ),
        BackendKind::Memory => "in-memory".to_string(),
    };
    let reload = match config.ui.auto_reload_secs {
        0 => "off".to_string(),
        secs => format!("every {}s", secs),
    };

    vec![
        format!("server:      {}:{}", config.server.host, config.server.port),
        format!("backend:     {}", backend),
        format!("auto reload: {}", reload),
        format!("log level:   {}", config.logging.level),
    ]
}
