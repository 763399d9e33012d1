use std::env;
use std::fs;
use log::LevelFilter;
use serde::Deserialize;
use crate::errors::ConfigError;

#[derive(Deserialize, Debug, Clone)]
pub struct WeatherParameters {
    #[serde(default)]
    pub api_key: String,
    pub location: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct PostgresParameters {
    pub host: String,
    pub port: u16,
    pub db_name: String,
    pub user: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct TrafficParameters {
    #[serde(default)]
    pub api_key: String,
    pub origin: String,
    pub destination: String,
    #[serde(default = "default_days_ahead")]
    pub days_ahead: u32,
}

#[derive(Deserialize, Debug, Clone)]
pub struct InfluxParameters {
    pub url: String,
    #[serde(default)]
    pub token: String,
    pub org: String,
    pub bucket: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct General {
    pub log_path: String,
    pub log_level: LevelFilter,
    pub log_to_stdout: bool,
    pub interval_minutes: Option<u64>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub general: General,
    pub weather: WeatherParameters,
    pub postgres: PostgresParameters,
    pub traffic: Option<TrafficParameters>,
    pub influx: Option<InfluxParameters>,
}

fn default_days_ahead() -> u32 {
    1
}

/// Loads the configuration file and returns a struct with all configuration items.
/// Credentials and store parameters given as environment variables take precedence.
///
/// # Arguments
///
/// * 'config_path' - path to the configuration file
pub fn load_config(config_path: &str) -> Result<Config, ConfigError> {

    let mut config = read_config(config_path)?;

    apply_env_overrides(&mut config, |key| env::var(key).ok())?;
    validate(&config)?;

    Ok(config)
}

/// Reads and parses the configuration file as is
///
/// # Arguments
///
/// * 'config_path' - path to the configuration file
fn read_config(config_path: &str) -> Result<Config, ConfigError> {
    let toml = fs::read_to_string(config_path)?;

    Ok(toml::from_str(&toml)?)
}

/// Overrides configuration items with values from the environment
///
/// # Arguments
///
/// * 'config' - configuration to update
/// * 'lookup' - returns the value of an environment variable if set
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
where F: Fn(&str) -> Option<String> {

    if let Some(v) = lookup("OWM_API_KEY") { config.weather.api_key = v; }

    if let Some(v) = lookup("POSTGRES_HOST") { config.postgres.host = v; }
    if let Some(v) = lookup("POSTGRES_PORT") {
        config.postgres.port = v.trim().parse()
            .map_err(|_| ConfigError(format!("POSTGRES_PORT is not a valid port: {}", v)))?;
    }
    if let Some(v) = lookup("POSTGRES_DB_NAME") { config.postgres.db_name = v; }
    if let Some(v) = lookup("POSTGRES_USER") { config.postgres.user = v; }
    if let Some(v) = lookup("POSTGRES_PASSWORD") { config.postgres.password = v; }

    if let Some(traffic) = config.traffic.as_mut() {
        if let Some(v) = lookup("GOOGLE_API_KEY") { traffic.api_key = v; }
    }

    if let Some(influx) = config.influx.as_mut() {
        if let Some(v) = lookup("INFLUX_URL") { influx.url = v; }
        if let Some(v) = lookup("INFLUX_TOKEN") { influx.token = v; }
        if let Some(v) = lookup("INFLUX_ORG") { influx.org = v; }
        if let Some(v) = lookup("INFLUX_BUCKET") { influx.bucket = v; }
    }

    Ok(())
}

/// Checks that configuration sections depending on each other are all present
/// and that values out of range are rejected
///
/// # Arguments
///
/// * 'config' - configuration to check
fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.general.interval_minutes == Some(0) {
        return Err(ConfigError::from("interval_minutes must be at least 1"));
    }
    if config.traffic.is_some() && config.influx.is_none() {
        return Err(ConfigError::from("traffic analysis requires an [influx] section"));
    }
    if config.weather.api_key.is_empty() {
        return Err(ConfigError::from("no weather api key given, set OWM_API_KEY"));
    }

    Ok(())
}
