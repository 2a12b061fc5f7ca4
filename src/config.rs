use std::{env, fmt::Display, str::FromStr, time::Duration};

use log::{debug, warn};
use thiserror::Error;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 4000;
const API_PREFIX: &str = "/api/v1";
const DATABASE: &str = "tripplanner";

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const GEMINI_MODEL: &str = "gemini-2.0-flash";
const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";
const SERPAPI_URL: &str = "https://serpapi.com/search.json";
const OPEN_METEO_EVENTS_URL: &str = "https://api.open-meteo.com/v1/events";

pub const DEFAULT_NEAR_THRESHOLD_METERS: f64 = 100_000.0;
pub const DEFAULT_ANONYMOUS_TTL_HOURS: i64 = 24;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

/// Knobs the trip-generation pipeline needs; everything else stays with the
/// collaborators that own it.
#[derive(Debug, Clone, Copy)]
pub struct PlannerConfig {
    pub near_threshold_meters: f64,
    pub anonymous_ttl_hours: i64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            near_threshold_meters: DEFAULT_NEAR_THRESHOLD_METERS,
            anonymous_ttl_hours: DEFAULT_ANONYMOUS_TTL_HOURS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct GeocodingConfig {
    pub provider_url: String,
    pub user_agent: String,
}

#[derive(Debug, Clone)]
pub struct EventsConfig {
    pub serpapi_key: Option<String>,
    pub serpapi_url: String,
    pub open_meteo_url: String,
}

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub sendgrid_api_key: Option<String>,
    pub from: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub api_prefix: String,
    pub mongodb_uri: String,
    pub database: String,
    pub jwt_secret: String,
    pub lookup_timeout: Duration,
    pub generation: GenerationConfig,
    pub geocoding: GeocodingConfig,
    pub events: EventsConfig,
    pub email: EmailConfig,
    pub planner: PlannerConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let planner = PlannerConfig {
            near_threshold_meters: parse_or("NEAR_THRESHOLD_METERS", DEFAULT_NEAR_THRESHOLD_METERS)?,
            anonymous_ttl_hours: parse_or("ANONYMOUS_TTL_HOURS", DEFAULT_ANONYMOUS_TTL_HOURS)?,
        };
        if planner.near_threshold_meters < 0.0 {
            return Err(ConfigError::Invalid {
                key: "NEAR_THRESHOLD_METERS",
                message: "must not be negative".to_string(),
            });
        }
        if planner.anonymous_ttl_hours <= 0 {
            return Err(ConfigError::Invalid {
                key: "ANONYMOUS_TTL_HOURS",
                message: "must be positive".to_string(),
            });
        }

        Ok(Self {
            host: var_or("HOST", HOST),
            port: parse_or("PORT", PORT)?,
            api_prefix: var_or("API_PREFIX", API_PREFIX),
            mongodb_uri: required("MONGODB_URI")?,
            database: var_or("MONGODB_DATABASE", DATABASE),
            jwt_secret: required("JWT_SECRET")?,
            lookup_timeout: Duration::from_secs(parse_or("LOOKUP_TIMEOUT_SECS", 10u64)?),
            generation: GenerationConfig {
                api_key: required("GEMINI_API_KEY")?,
                base_url: var_or("GEMINI_BASE_URL", GEMINI_BASE_URL),
                model: var_or("GEMINI_MODEL", GEMINI_MODEL),
                timeout: Duration::from_secs(parse_or("GENERATION_TIMEOUT_SECS", 60u64)?),
            },
            geocoding: GeocodingConfig {
                provider_url: var_or("GEOCODING_PROVIDER_URL", NOMINATIM_URL),
                user_agent: var_or(
                    "GEOCODING_USER_AGENT",
                    concat!("trip-planner-api/", env!("CARGO_PKG_VERSION")),
                ),
            },
            events: EventsConfig {
                serpapi_key: optional("SERPAPI_API_KEY"),
                serpapi_url: var_or("SERPAPI_BASE_URL", SERPAPI_URL),
                open_meteo_url: var_or("OPEN_METEO_EVENTS_URL", OPEN_METEO_EVENTS_URL),
            },
            email: EmailConfig {
                sendgrid_api_key: optional("SENDGRID_API_KEY"),
                from: var_or("EMAIL_FROM", "no-reply@tripplanner.local"),
            },
            planner,
        })
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    optional(key).ok_or(ConfigError::Missing(key))
}

fn var_or(key: &str, default: &str) -> String {
    optional(key).unwrap_or_else(|| {
        debug!("{key} not set, using default: {default}");
        default.to_string()
    })
}

fn parse_or<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match optional(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| {
            warn!("Invalid {key} value: {e}");
            ConfigError::Invalid {
                key,
                message: e.to_string(),
            }
        }),
        None => Ok(default),
    }
}
