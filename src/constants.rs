/// Constants module to avoid magic numbers in the codebase

// Network Configuration
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";

// Credential storage
pub const TOKEN_KEY: &str = "token";
pub const CREDENTIALS_FILE_NAME: &str = "credentials.toml";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const LOCAL_CONFIG_DIR: &str = ".tareas";
pub const CONFIG_ENV_PREFIX: &str = "TAREAS_";
pub const LOG_FILE_NAME: &str = "tareas.log";

// Input validation
pub const MIN_PASSWORD_LEN: usize = 8;

// UI Configuration
pub const UI_REFRESH_INTERVAL_MS: u64 = 50;
pub const DEFAULT_PREVIEW_CHARS: usize = 200;
pub const UI_EVENT_CHANNEL_SIZE: usize = 32;
