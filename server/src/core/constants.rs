// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display and platform directories)
pub const APP_NAME: &str = "AgentPulse";

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "agentpulse";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".agentpulse";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "agentpulse.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "AGENTPULSE_CONFIG";

// =============================================================================
// Environment Variables - Debug
// =============================================================================

/// Environment variable for debug mode
pub const ENV_DEBUG: &str = "AGENTPULSE_DEBUG";

// =============================================================================
// Environment Variables - Server
// =============================================================================

/// Environment variable for server host
pub const ENV_HOST: &str = "AGENTPULSE_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "AGENTPULSE_PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "AGENTPULSE_LOG";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 3000;

/// Maximum request body size in bytes (1MB)
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

// =============================================================================
// Environment Variables - Storage
// =============================================================================

/// Environment variable to override data directory
pub const ENV_DATA_DIR: &str = "AGENTPULSE_DATA_DIR";

// =============================================================================
// Authentication
// =============================================================================

/// Request header carrying the project API key
pub const API_KEY_HEADER: &str = "X-AgentPulse-Key";

// =============================================================================
// Default Project
// =============================================================================

/// Id of the project seeded on first start
pub const DEFAULT_PROJECT_ID: &str = "default";

/// API key of the seeded project (development convenience, rotate in prod)
pub const DEFAULT_PROJECT_API_KEY: &str = "ap_dev_default";

// =============================================================================
// SQLite
// =============================================================================

/// SQLite database file name (inside the db subdirectory)
pub const SQLITE_DB_FILENAME: &str = "agentpulse.db";

/// Maximum connections in the SQLite pool
pub const SQLITE_MAX_CONNECTIONS: u32 = 5;

/// Seconds to wait on a locked database before giving up
pub const SQLITE_BUSY_TIMEOUT_SECS: u64 = 30;

/// Page cache size (negative value = size in KB)
pub const SQLITE_CACHE_SIZE: &str = "-64000";

/// WAL auto-checkpoint threshold in pages
pub const SQLITE_WAL_AUTOCHECKPOINT: &str = "1000";

/// Interval between periodic WAL checkpoints in seconds
pub const SQLITE_CHECKPOINT_INTERVAL_SECS: u64 = 300;

// =============================================================================
// Query Limits
// =============================================================================

/// Default page size for trace listings
pub const DEFAULT_PAGE_LIMIT: u32 = 50;

/// Maximum page size for trace listings (larger requests are clamped)
pub const MAX_PAGE_LIMIT: u32 = 500;

/// Trailing window for the daily cost aggregation
pub const STATS_DAILY_WINDOW_DAYS: i64 = 7;

/// Maximum number of agents in the cost leaderboard
pub const STATS_TOP_AGENTS: u32 = 10;

// =============================================================================
// Shutdown
// =============================================================================

/// Maximum seconds to wait for background tasks during shutdown
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 300;
