/// Application name, shared by the binary, the config file and the env prefix.
pub const APP_NAME: &str = "cadence";
pub const CONFIG_FILE_NAME: &str = const_str::concat!(APP_NAME, ".toml");
pub const ENV_PREFIX: &str = "CADENCE";

pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// The scheduler ticks once a minute, so a job is due if it fired within the last tick.
pub const DEFAULT_DUE_TOLERANCE_MS: i64 = 60_000;

/// Ten years, the cap for next-occurrence searches.
pub const DEFAULT_SEARCH_HORIZON_DAYS: i64 = 3_660;

pub const DEFAULT_PREVIEW_COUNT: usize = 5;
