use anyhow::Result;
use chrono::FixedOffset;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder};
use serde::Deserialize;

use crate::constants::{DEFAULT_MAX_OCCURRENCES, DEFAULT_UTC_OFFSET};
use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub calendar: CalendarConfig,
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub serve_origin: Option<String>,
}

impl ServerConfig {
    /// ## Summary
    /// Returns the bind address as an `http://host:port` URL.
    #[must_use]
    pub fn bind_origin(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// ## Summary
    /// Returns the server origin URL.
    #[must_use]
    pub fn origin(&self) -> String {
        if let Some(origin) = &self.serve_origin {
            origin.clone()
        } else {
            self.bind_origin()
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CalendarConfig {
    /// Fixed community offset, e.g. `+03:00`.
    pub utc_offset: String,
    pub max_occurrences: u16,
    pub upcoming_horizon_days: u16,
    pub upcoming_limit: u16,
}

impl CalendarConfig {
    /// ## Summary
    /// Parses the configured community offset.
    ///
    /// ## Errors
    /// Returns `CoreError::InvalidConfiguration` if the offset is malformed.
    pub fn offset(&self) -> CoreResult<FixedOffset> {
        parse_utc_offset(&self.utc_offset).map_err(|err| {
            CoreError::InvalidConfiguration(format!("calendar.utc_offset: {err}"))
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// JSON document seeding the in-memory catalog.
    pub seed_path: Option<String>,
}

/// ## Summary
/// Parses a fixed UTC offset such as `+03:00`, `+0300`, `-05:30`, `+03`, `Z` or `UTC`.
///
/// ## Errors
/// Returns `CoreError::ParseError` if the text is not a recognised offset or
/// its magnitude reaches 24 hours.
pub fn parse_utc_offset(text: &str) -> CoreResult<FixedOffset> {
    let trimmed = text.trim();
    if trimmed.eq_ignore_ascii_case("z") || trimmed.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0)
            .ok_or(CoreError::InvariantViolation("zero offset is always valid"));
    }

    let invalid = || CoreError::ParseError(format!("invalid UTC offset '{text}'"));

    let (sign, digits) = match trimmed.as_bytes().first() {
        Some(b'+') => (1, &trimmed[1..]),
        Some(b'-') => (-1, &trimmed[1..]),
        _ => return Err(invalid()),
    };
    if !digits.is_ascii() {
        return Err(invalid());
    }

    let (hours, minutes) = match digits.len() {
        2 => (digits, "00"),
        4 => (&digits[..2], &digits[2..]),
        5 if digits.as_bytes()[2] == b':' => (&digits[..2], &digits[3..]),
        _ => return Err(invalid()),
    };

    if !hours.bytes().chain(minutes.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let hours: i32 = hours.parse().map_err(|_err| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_err| invalid())?;
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

impl Settings {
    /// ## Summary
    /// Registers the default value for every setting on a builder.
    ///
    /// ## Errors
    /// Returns an error if a default cannot be set.
    pub fn with_defaults(
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>> {
        Ok(builder
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8698)?
            .set_default("logging.level", "debug")?
            .set_default("calendar.utc_offset", DEFAULT_UTC_OFFSET)?
            .set_default("calendar.max_occurrences", i64::from(DEFAULT_MAX_OCCURRENCES))?
            .set_default("calendar.upcoming_horizon_days", 90)?
            .set_default("calendar.upcoming_limit", 10)?)
    }

    /// ## Summary
    /// Loads configuration from environment variables and `config.toml`.
    /// Environment variables (`COURTYARD__SECTION__KEY`) take precedence over file values.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        let settings = Self::with_defaults(Config::builder())?
            // TOML file
            .add_source(config::File::with_name("config.toml").required(false))
            // Environment
            .add_source(
                config::Environment::with_prefix("COURTYARD")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Settings>()?;

        settings.calendar.offset()?;
        Ok(settings)
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load()
}
