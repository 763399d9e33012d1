use thiserror::Error;
use crate::manager_influx::errors::InfluxError;
use crate::manager_owm::errors::OwmError;
use crate::manager_postgres::errors::PostgresError;
use crate::travel_time::TravelTimeError;

/// Error depicting errors that occur while loading configuration
#[derive(Error, Debug)]
#[error("ConfigError: {0}")]
pub struct ConfigError(pub String);
impl From<&str> for ConfigError {
    fn from(e: &str) -> Self { ConfigError(e.to_string()) }
}
impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self { ConfigError(e.to_string()) }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self { ConfigError(e.to_string()) }
}

/// Error depicting errors that occur while initializing the collector
#[derive(Error, Debug)]
pub enum InitError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("LoggingError: {0}")]
    Logging(String),
    #[error(transparent)]
    Postgres(#[from] PostgresError),
}
impl From<log::SetLoggerError> for InitError {
    fn from(e: log::SetLoggerError) -> Self { InitError::Logging(e.to_string()) }
}
impl From<std::io::Error> for InitError {
    fn from(e: std::io::Error) -> Self { InitError::Logging(e.to_string()) }
}

/// Error depicting errors that occur during a collection cycle
#[derive(Error, Debug)]
pub enum WorkerError {
    #[error(transparent)]
    Weather(#[from] OwmError),
    #[error(transparent)]
    TravelTime(#[from] TravelTimeError),
    #[error(transparent)]
    Postgres(#[from] PostgresError),
    #[error(transparent)]
    Influx(#[from] InfluxError),
}
