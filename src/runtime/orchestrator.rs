use anyhow::{bail, Context, Result};
use std::io;
use tracing::{info, warn};

use crate::{
    app::{get_config_dir, load_config, load_config_from, AppState, Config},
    cli::{handle_command, handle_local_command, Cli},
    constants::LOG_FILE_NAME,
    tui::{run_ui, App},
    utils::{init_logger, LogTarget},
};

/// Main runtime orchestrator
pub struct Orchestrator {
    cli: Cli,
    config: Config,
}

impl Orchestrator {
    /// Create a new orchestrator from CLI args
    pub fn new(cli: Cli) -> Result<Self> {
        let config = Self::resolve_config(&cli)?;
        Ok(Self { cli, config })
    }

    /// Configuration files, environment, then flags
    fn resolve_config(cli: &Cli) -> Result<Config> {
        let mut config = match &cli.config {
            Some(path) => {
                if !path.is_file() {
                    bail!("Config file not found: {}", path.display());
                }
                load_config_from(std::slice::from_ref(path))
                    .with_context(|| format!("Failed to load {}", path.display()))?
            }
            None => match load_config() {
                Ok(cfg) => cfg,
                Err(e) => {
                    eprintln!("Failed to load config: {:#}. Using defaults.", e);
                    Config::default()
                }
            },
        };

        if let Some(base_url) = &cli.base_url {
            config.api.base_url = base_url.clone();
        }
        Ok(config)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the orchestrator
    pub async fn run(self) -> Result<()> {
        if let Some(command) = &self.cli.command {
            init_logger(LogTarget::Stderr, self.cli.verbose)?;
            if handle_local_command(command)? {
                return Ok(());
            }

            let state = AppState::from_config(self.config)?;
            let mut stdout = io::stdout();
            return handle_command(command, &state, self.cli.output_format, &mut stdout).await;
        }

        // The alternate screen owns the terminal, so logs go to a file
        let log_target = match get_config_dir() {
            Ok(dir) => LogTarget::File(dir.join(LOG_FILE_NAME)),
            Err(e) => {
                eprintln!("No config directory for the log file: {:#}", e);
                LogTarget::Stderr
            }
        };
        init_logger(log_target, self.cli.verbose)?;

        let state = AppState::from_config(self.config)?;
        let route = state.gate().determine_initial_route().await;
        info!("Starting UI at {:?} against {}", route, state.api.base_url());

        let result = run_ui(App::new(state, route)).await;
        if let Err(e) = &result {
            warn!("UI exited with error: {:#}", e);
        }
        result
    }
}
