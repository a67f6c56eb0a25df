use std::{env, fmt, time::Duration};

use url::Url;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;
const MONGODB_URI: &str = "mongodb://localhost:27017";
const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";
const GEOAPIFY_URL: &str = "https://api.geoapify.com";
const UNSPLASH_URL: &str = "https://api.unsplash.com";
const USER_AGENT: &str = "TripPlannerApp/1.0";
const REQUEST_TIMEOUT_SECS: u64 = 10;
const IMAGE_CONCURRENCY: usize = 4;

#[derive(Debug)]
pub enum ConfigError {
    MissingVar(String),
    InvalidUrl(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingVar(name) => write!(f, "{} must be set", name),
            ConfigError::InvalidUrl(err) => write!(f, "Invalid upstream URL: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Process-wide settings, read once at startup and handed to every service.
///
/// API keys are optional: a missing key switches the matching feature to its
/// empty or placeholder behaviour instead of failing the request.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub mongodb_uri: String,
    pub jwt_secret: String,
    pub geoapify_api_key: Option<String>,
    pub unsplash_access_key: Option<String>,
    pub nominatim_url: String,
    pub geoapify_url: String,
    pub unsplash_url: String,
    pub user_agent: String,
    pub request_timeout: Duration,
    pub image_concurrency: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: HOST.to_string(),
            port: PORT,
            mongodb_uri: MONGODB_URI.to_string(),
            jwt_secret: String::new(),
            geoapify_api_key: None,
            unsplash_access_key: None,
            nominatim_url: NOMINATIM_URL.to_string(),
            geoapify_url: GEOAPIFY_URL.to_string(),
            unsplash_url: UNSPLASH_URL.to_string(),
            user_agent: USER_AGENT.to_string(),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            image_concurrency: IMAGE_CONCURRENCY,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let jwt_secret = match optional_var("JWT_SECRET") {
            Some(secret) => secret,
            None if cfg!(debug_assertions) => {
                log::warn!("JWT_SECRET not set, using development secret");
                "development_secret".to_string()
            }
            None => return Err(ConfigError::MissingVar("JWT_SECRET".to_string())),
        };

        let config = Self {
            host: optional_var("HOST").unwrap_or(defaults.host),
            port: parse_or("PORT", defaults.port),
            mongodb_uri: optional_var("MONGODB_URI").unwrap_or(defaults.mongodb_uri),
            jwt_secret,
            geoapify_api_key: optional_var("GEOAPIFY_API_KEY"),
            unsplash_access_key: optional_var("UNSPLASH_ACCESS_KEY"),
            nominatim_url: optional_var("NOMINATIM_URL").unwrap_or(defaults.nominatim_url),
            geoapify_url: optional_var("GEOAPIFY_URL").unwrap_or(defaults.geoapify_url),
            unsplash_url: optional_var("UNSPLASH_URL").unwrap_or(defaults.unsplash_url),
            user_agent: optional_var("USER_AGENT").unwrap_or(defaults.user_agent),
            request_timeout: Duration::from_secs(parse_or(
                "REQUEST_TIMEOUT_SECS",
                REQUEST_TIMEOUT_SECS,
            )),
            image_concurrency: parse_or("IMAGE_CONCURRENCY", IMAGE_CONCURRENCY).max(1),
        };

        config.validate()?;

        if config.geoapify_api_key.is_none() {
            log::warn!("GEOAPIFY_API_KEY not set, attractions and emergency lookups are disabled");
        }
        if config.unsplash_access_key.is_none() {
            log::warn!("UNSPLASH_ACCESS_KEY not set, attraction photos are disabled");
        }

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for base in [&self.nominatim_url, &self.geoapify_url, &self.unsplash_url] {
            Url::parse(base).map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", base, e)))?;
        }
        Ok(())
    }
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    optional_var(name)
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
