use std::fs;
use std::path::Path;

use anyhow::Result;
use clap::Parser;
use console::style;

pub const DEFAULT_CONFIG_PATH: &str = "backfill-console.toml";

const CONFIG_TEMPLATE: &str = r#"# Backfill Console configuration.
# Values of the form ${VAR} are replaced from the environment.

[server]
host = "127.0.0.1"
port = 8080
request_timeout_secs = 30

[backend]
# "http" talks to a running backfill service, "memory" keeps runs in-process.
kind = "memory"
# url = "${BACKFILL_SERVICE_URL}"
timeout_secs = 10

[ui]
title = "Backfill Console"
# Seconds between status page refreshes; 0 disables.
auto_reload_secs = 10
logs_url_template = "https://logs.example.com/search?q=backfill_run_id%3A{id}"

[logging]
level = "info"
json_format = false
"#;

/// Write a starter configuration file.
#[derive(Parser)]
pub struct InitCommand {
    /// Where to write the configuration.
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub output: String,

    /// Overwrite an existing file.
    #[arg(long)]
    pub force: bool,
}

impl InitCommand {
    pub fn execute(self) -> Result<()> {
        write_config(Path::new(&self.output), self.force)?;
        println!(
            "{} Wrote {}",
            style("✔").green(),
            style(&self.output).cyan()
        );
        println!("  {} to start the console", style("backfill-console run").dim());
        Ok(())
    }
}

/// Write the starter configuration to `path`.
pub fn write_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, CONFIG_TEMPLATE)?;
    Ok(())
}
