//! Configuration management for the birthday greeter.
//!
//! Settings are read from `GREETER_*` environment variables (a `.env` file is
//! loaded first when present) and then overridden by command-line flags. Logs
//! go to stderr, so nothing here writes to stdout.

use crate::calendar::google::DEFAULT_API_URL;
use crate::cli::Cli;
use crate::error::{ConfigError, ConfigResult};
use chrono_tz::Tz;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Which calendar adapter feeds the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalendarSource {
    #[default]
    File,
    Google,
}

impl FromStr for CalendarSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "google" => Ok(Self::Google),
            other => Err(format!("unknown calendar provider {:?} (use file|google)", other)),
        }
    }
}

impl fmt::Display for CalendarSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Google => write!(f, "google"),
        }
    }
}

/// Configuration for one greeting run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Calendar adapter (default: file)
    pub calendar_provider: CalendarSource,

    /// JSON events file, required for the file provider
    pub calendar_file: Option<PathBuf>,

    /// Generate messages without sending them (default: true)
    pub dry_run: bool,

    /// Events processed per run, 0 or negative for no cap (default: 10)
    pub max_per_run: i64,

    /// Run for this `YYYY-MM-DD` instead of today
    pub date: Option<String>,

    /// Emoji for the template generator (default: 🎉)
    pub emoji: String,

    /// Label passed to the calendar filter (default: empty)
    pub tag: String,

    /// Timezone the run day is computed in (default: Europe/Madrid)
    pub timezone: Tz,

    /// Google calendar name (default: "gobirth")
    pub google_calendar: String,

    /// OAuth client secrets path
    pub google_credentials: PathBuf,

    /// OAuth token cache path
    pub google_token: PathBuf,

    /// Google Calendar API root
    pub google_api_url: String,

    /// HTTP request timeout in seconds (default: 10)
    pub request_timeout: u64,

    /// Log level (default: "warn")
    pub log_level: String,
}

/// `<config dir>/gobirth/<file>`.
fn default_config_file(file: &str) -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("gobirth")
        .join(file)
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `GREETER_CALENDAR_PROVIDER`: `file` or `google` (default: file)
    /// - `GREETER_CALENDAR_FILE`: path to the JSON events file
    /// - `GREETER_DRY_RUN`: `true`/`false` (default: true)
    /// - `GREETER_MAX_PER_RUN`: events per run, 0 or negative for no cap (default: 10)
    /// - `GREETER_DATE`: run date override, `YYYY-MM-DD`
    /// - `GREETER_EMOJI`: template emoji (default: 🎉)
    /// - `GREETER_TAG`: calendar tag filter (default: empty)
    /// - `GREETER_TIMEZONE`: IANA timezone (default: Europe/Madrid)
    /// - `GREETER_GOOGLE_CALENDAR`: calendar name (default: gobirth)
    /// - `GREETER_GOOGLE_CREDENTIALS`, `GREETER_GOOGLE_TOKEN`: OAuth files
    /// - `GREETER_GOOGLE_API_URL`: API root override
    /// - `GREETER_REQUEST_TIMEOUT`: HTTP timeout in seconds (default: 10)
    /// - `LOG_LEVEL`: logging level (default: "warn")
    pub fn from_env() -> ConfigResult<Self> {
        // Missing .env is fine
        let _ = dotenvy::dotenv();

        let defaults = Config::default();

        let calendar_provider = match Self::env_string("GREETER_CALENDAR_PROVIDER") {
            Some(raw) => raw.parse().map_err(|reason| ConfigError::InvalidValue {
                var: "GREETER_CALENDAR_PROVIDER".to_string(),
                reason,
            })?,
            None => defaults.calendar_provider,
        };

        let timezone = match Self::env_string("GREETER_TIMEZONE") {
            Some(raw) => Self::parse_timezone("GREETER_TIMEZONE", &raw)?,
            None => defaults.timezone,
        };

        let request_timeout = Self::parse_env_u64("GREETER_REQUEST_TIMEOUT", defaults.request_timeout)?;
        if request_timeout == 0 {
            return Err(ConfigError::InvalidValue {
                var: "GREETER_REQUEST_TIMEOUT".to_string(),
                reason: "Must be greater than zero".to_string(),
            });
        }

        Ok(Config {
            calendar_provider,
            calendar_file: Self::env_string("GREETER_CALENDAR_FILE").map(PathBuf::from),
            dry_run: Self::parse_env_bool("GREETER_DRY_RUN", defaults.dry_run)?,
            max_per_run: Self::parse_env_i64("GREETER_MAX_PER_RUN", defaults.max_per_run)?,
            date: Self::env_string("GREETER_DATE"),
            emoji: Self::env_string("GREETER_EMOJI").unwrap_or(defaults.emoji),
            tag: env::var("GREETER_TAG").unwrap_or(defaults.tag),
            timezone,
            google_calendar: Self::env_string("GREETER_GOOGLE_CALENDAR")
                .unwrap_or(defaults.google_calendar),
            google_credentials: Self::env_string("GREETER_GOOGLE_CREDENTIALS")
                .map(PathBuf::from)
                .unwrap_or(defaults.google_credentials),
            google_token: Self::env_string("GREETER_GOOGLE_TOKEN")
                .map(PathBuf::from)
                .unwrap_or(defaults.google_token),
            google_api_url: Self::env_string("GREETER_GOOGLE_API_URL")
                .unwrap_or(defaults.google_api_url),
            request_timeout,
            log_level: Self::env_string("LOG_LEVEL").unwrap_or(defaults.log_level),
        })
    }

    /// Check the settings that depend on each other. Call after all layers
    /// have been applied.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.calendar_provider == CalendarSource::File && self.calendar_file.is_none() {
            return Err(ConfigError::MissingVar(
                "--calendar-file (required when --calendar-provider=file)".to_string(),
            ));
        }

        if self.calendar_provider == CalendarSource::Google
            && self.google_calendar.trim().is_empty()
        {
            return Err(ConfigError::InvalidValue {
                var: "--google-calendar".to_string(),
                reason: "Cannot be empty".to_string(),
            });
        }

        if !self.google_api_url.starts_with("http://") && !self.google_api_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                var: "GREETER_GOOGLE_API_URL".to_string(),
                reason: "Must start with http:// or https://".to_string(),
            });
        }

        Ok(())
    }

    /// Override settings with the flags given on the command line.
    pub fn apply_cli(&mut self, cli: &Cli) -> ConfigResult<()> {
        if let Some(source) = cli.calendar_provider {
            self.calendar_provider = source;
        }
        if let Some(path) = &cli.calendar_file {
            self.calendar_file = Some(path.clone());
        }
        if let Some(dry_run) = cli.dry_run {
            self.dry_run = dry_run;
        }
        if let Some(max) = cli.max_per_run {
            self.max_per_run = max;
        }
        if let Some(date) = &cli.date {
            self.date = Some(date.clone());
        }
        if let Some(emoji) = &cli.emoji {
            self.emoji = emoji.clone();
        }
        if let Some(tag) = &cli.tag {
            self.tag = tag.clone();
        }
        if let Some(tz) = &cli.timezone {
            self.timezone = Self::parse_timezone("--timezone", tz)?;
        }
        if let Some(name) = &cli.google_calendar {
            self.google_calendar = name.clone();
        }
        if let Some(path) = &cli.google_credentials {
            self.google_credentials = path.clone();
        }
        if let Some(path) = &cli.google_token {
            self.google_token = path.clone();
        }
        Ok(())
    }

    /// `max_per_run` as the run option: zero or negative means no cap.
    pub fn run_limit(&self) -> Option<usize> {
        usize::try_from(self.max_per_run).ok().filter(|max| *max > 0)
    }

    /// Parse an IANA timezone name.
    pub fn parse_timezone(var_name: &str, raw: &str) -> ConfigResult<Tz> {
        raw.trim().parse::<Tz>().map_err(|_| ConfigError::InvalidValue {
            var: var_name.to_string(),
            reason: format!("Unknown timezone: {}", raw),
        })
    }

    /// Read a variable, treating blank values as unset.
    fn env_string(var_name: &str) -> Option<String> {
        env::var(var_name).ok().filter(|v| !v.trim().is_empty())
    }

    /// Parse an environment variable as u64 with a default value.
    fn parse_env_u64(var_name: &str, default: u64) -> ConfigResult<u64> {
        match Self::env_string(var_name) {
            Some(val) => val.trim().parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a non-negative number, got: {}", val),
            }),
            None => Ok(default),
        }
    }

    /// Parse an environment variable as i64 with a default value.
    fn parse_env_i64(var_name: &str, default: i64) -> ConfigResult<i64> {
        match Self::env_string(var_name) {
            Some(val) => val.trim().parse::<i64>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a whole number, got: {}", val),
            }),
            None => Ok(default),
        }
    }

    /// Parse an environment variable as bool with a default value.
    fn parse_env_bool(var_name: &str, default: bool) -> ConfigResult<bool> {
        match Self::env_string(var_name) {
            Some(val) => match val.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                _ => Err(ConfigError::InvalidValue {
                    var: var_name.to_string(),
                    reason: format!("Must be true or false, got: {}", val),
                }),
            },
            None => Ok(default),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            calendar_provider: CalendarSource::File,
            calendar_file: None,
            dry_run: true,
            max_per_run: 10,
            date: None,
            emoji: "🎉".to_string(),
            tag: String::new(),
            timezone: chrono_tz::Europe::Madrid,
            google_calendar: "gobirth".to_string(),
            google_credentials: default_config_file("credentials.json"),
            google_token: default_config_file("token.json"),
            google_api_url: DEFAULT_API_URL.to_string(),
            request_timeout: 10,
            log_level: "warn".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    const VARS: &[&str] = &[
        "GREETER_CALENDAR_PROVIDER",
        "GREETER_CALENDAR_FILE",
        "GREETER_DRY_RUN",
        "GREETER_MAX_PER_RUN",
        "GREETER_DATE",
        "GREETER_EMOJI",
        "GREETER_TAG",
        "GREETER_TIMEZONE",
        "GREETER_GOOGLE_CALENDAR",
        "GREETER_GOOGLE_CREDENTIALS",
        "GREETER_GOOGLE_TOKEN",
        "GREETER_GOOGLE_API_URL",
        "GREETER_REQUEST_TIMEOUT",
    ];

    // Helper to set and unset env vars for testing
    struct EnvGuard {
        vars: Vec<String>,
    }

    impl EnvGuard {
        /// Start from a clean slate for every greeter variable.
        fn new() -> Self {
            for var in VARS {
                env::remove_var(var);
            }
            EnvGuard { vars: Vec::new() }
        }

        fn set(&mut self, key: &str, value: &str) {
            env::set_var(key, value);
            self.vars.push(key.to_string());
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for var in &self.vars {
                env::remove_var(var);
            }
        }
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.calendar_provider, CalendarSource::File);
        assert!(config.dry_run);
        assert_eq!(config.max_per_run, 10);
        assert_eq!(config.emoji, "🎉");
        assert_eq!(config.timezone, chrono_tz::Europe::Madrid);
        assert_eq!(config.google_calendar, "gobirth");
        assert!(config.google_token.ends_with("gobirth/token.json"));
    }

    #[test]
    #[serial]
    fn test_config_from_env_defaults() {
        let _guard = EnvGuard::new();

        let config = Config::from_env().unwrap();
        assert_eq!(config.calendar_provider, CalendarSource::File);
        assert!(config.dry_run);
        assert_eq!(config.max_per_run, 10);
        assert_eq!(config.tag, "");
    }

    #[test]
    #[serial]
    fn test_config_from_env_valid() {
        let mut guard = EnvGuard::new();
        guard.set("GREETER_CALENDAR_PROVIDER", "Google");
        guard.set("GREETER_DRY_RUN", "false");
        guard.set("GREETER_MAX_PER_RUN", "3");
        guard.set("GREETER_TAG", "birthday");
        guard.set("GREETER_TIMEZONE", "America/New_York");
        guard.set("GREETER_GOOGLE_CALENDAR", "Cumples");

        let config = Config::from_env().unwrap();
        assert_eq!(config.calendar_provider, CalendarSource::Google);
        assert!(!config.dry_run);
        assert_eq!(config.max_per_run, 3);
        assert_eq!(config.tag, "birthday");
        assert_eq!(config.timezone, chrono_tz::America::New_York);
        assert_eq!(config.google_calendar, "Cumples");
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_config_invalid_provider() {
        let mut guard = EnvGuard::new();
        guard.set("GREETER_CALENDAR_PROVIDER", "outlook");

        match Config::from_env() {
            Err(ConfigError::InvalidValue { var, .. }) => {
                assert_eq!(var, "GREETER_CALENDAR_PROVIDER")
            }
            other => panic!("Expected InvalidValue error, got: {:?}", other),
        }
    }

    #[test]
    #[serial]
    fn test_config_invalid_timezone() {
        let mut guard = EnvGuard::new();
        guard.set("GREETER_TIMEZONE", "Mars/Olympus_Mons");

        match Config::from_env() {
            Err(ConfigError::InvalidValue { var, .. }) => assert_eq!(var, "GREETER_TIMEZONE"),
            other => panic!("Expected InvalidValue error, got: {:?}", other),
        }
    }

    #[test]
    #[serial]
    fn test_config_invalid_dry_run() {
        let mut guard = EnvGuard::new();
        guard.set("GREETER_DRY_RUN", "maybe");

        assert!(Config::from_env().is_err());
    }

    #[test]
    #[serial]
    fn test_config_zero_timeout_rejected() {
        let mut guard = EnvGuard::new();
        guard.set("GREETER_REQUEST_TIMEOUT", "0");

        assert!(Config::from_env().is_err());
    }

    #[test]
    fn test_validate_requires_calendar_file() {
        let config = Config::default();
        match config.validate() {
            Err(ConfigError::MissingVar(var)) => assert!(var.starts_with("--calendar-file")),
            other => panic!("Expected MissingVar error, got: {:?}", other),
        }

        let config = Config {
            calendar_file: Some(PathBuf::from("events.json")),
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_api_url() {
        let config = Config {
            calendar_provider: CalendarSource::Google,
            google_api_url: "ftp://nope".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_run_limit() {
        let config = Config {
            max_per_run: 0,
            ..Config::default()
        };
        assert_eq!(config.run_limit(), None);
        assert_eq!(Config::default().run_limit(), Some(10));

        let config = Config {
            max_per_run: -1,
            ..Config::default()
        };
        assert_eq!(config.run_limit(), None);
    }

    #[test]
    #[serial]
    fn test_config_negative_max_means_no_cap() {
        let mut guard = EnvGuard::new();
        guard.set("GREETER_MAX_PER_RUN", "-1");

        let config = Config::from_env().unwrap();
        assert_eq!(config.max_per_run, -1);
        assert_eq!(config.run_limit(), None);
    }

    #[test]
    #[serial]
    fn test_parse_env_i64() {
        let mut guard = EnvGuard::new();
        guard.set("TEST_GREETER_I64", "42");
        guard.set("TEST_GREETER_I64_NEGATIVE", "-1");

        assert_eq!(Config::parse_env_i64("TEST_GREETER_I64", 10).unwrap(), 42);
        assert_eq!(Config::parse_env_i64("TEST_GREETER_I64_NEGATIVE", 10).unwrap(), -1);
        assert_eq!(Config::parse_env_i64("NONEXISTENT_GREETER", 10).unwrap(), 10);
    }

    #[test]
    #[serial]
    fn test_parse_env_u64_invalid() {
        let mut guard = EnvGuard::new();
        guard.set("TEST_GREETER_U64_INVALID", "not-a-number");

        assert!(Config::parse_env_u64("TEST_GREETER_U64_INVALID", 10).is_err());
    }

    #[test]
    fn test_apply_cli_overrides() {
        let mut config = Config::default();
        let cli = Cli {
            calendar_provider: Some(CalendarSource::Google),
            dry_run: Some(false),
            max_per_run: Some(0),
            tag: Some("birthday".to_string()),
            timezone: Some("UTC".to_string()),
            ..Cli::default()
        };

        config.apply_cli(&cli).unwrap();
        assert_eq!(config.calendar_provider, CalendarSource::Google);
        assert!(!config.dry_run);
        assert_eq!(config.run_limit(), None);
        assert_eq!(config.tag, "birthday");
        assert_eq!(config.timezone, chrono_tz::UTC);
        // Untouched flags keep their values
        assert_eq!(config.emoji, "🎉");
    }

    #[test]
    fn test_apply_cli_bad_timezone() {
        let mut config = Config::default();
        let cli = Cli {
            timezone: Some("Nowhere/Land".to_string()),
            ..Cli::default()
        };

        match config.apply_cli(&cli) {
            Err(ConfigError::InvalidValue { var, .. }) => assert_eq!(var, "--timezone"),
            other => panic!("Expected InvalidValue error, got: {:?}", other),
        }
    }

    #[test]
    fn test_calendar_source_parse() {
        assert_eq!("file".parse::<CalendarSource>(), Ok(CalendarSource::File));
        assert_eq!(" GOOGLE ".parse::<CalendarSource>(), Ok(CalendarSource::Google));
        assert!("ical".parse::<CalendarSource>().is_err());
        assert_eq!(CalendarSource::Google.to_string(), "google");
    }
}
