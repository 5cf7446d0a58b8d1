use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tareas")]
#[command(version)]
#[command(about = "Terminal client for the Tareas notes service", long_about = None)]
pub struct Cli {
    /// Path to configuration file (replaces the global and project files)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// API base URL, overriding the configuration
    #[arg(long)]
    pub base_url: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Output format for subcommands
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output_format: OutputFormat,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize configuration
    Init,
    /// Show version information
    Version,
    /// Show API endpoint, credential store and session status
    Status,
    /// Sign in and store the session token
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long, env = "TAREAS_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create a new account
    Register {
        #[arg(short, long)]
        email: String,
        #[arg(short, long, env = "TAREAS_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Remove the stored session token
    Logout,
    /// List notes
    List,
    /// Show one note
    Show { id: i64 },
    /// Create a note
    Create {
        #[arg(short, long)]
        title: String,
        #[arg(short, long, default_value = "")]
        description: String,
        #[arg(long)]
        completed: bool,
    },
    /// Change fields of a note; omitted fields are left as they are
    Update {
        id: i64,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long)]
        completed: Option<bool>,
    },
    /// Delete a note
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

impl Commands {
    /// Commands that need a signed-in session
    pub fn is_protected(&self) -> bool {
        matches!(
            self,
            Self::List | Self::Show { .. } | Self::Create { .. } | Self::Update { .. } | Self::Delete { .. }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    Text,
    /// JSON structured output
    Json,
}
