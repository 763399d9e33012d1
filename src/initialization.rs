use std::env;
use std::path::Path;
use log::info;
use log4rs::append::console::ConsoleAppender;
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Root};
use log4rs::encode::pattern::PatternEncoder;
use crate::config::{load_config, Config, General};
use crate::errors::InitError;
use crate::manager_directions::Directions;
use crate::manager_influx::Influx;
use crate::manager_owm::OpenWeatherMap;
use crate::manager_postgres::Postgres;

/// Default configuration file when neither argument nor environment gives one
const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Log line pattern for all appenders
const LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {l} {t} - {m}{n}";

/// Clients and stores used by a collection cycle
pub struct Mgr<W = OpenWeatherMap, S = Postgres, T = Directions, P = Influx> {
    pub weather: W,
    pub store: S,
    pub traffic: Option<TrafficMgr<T, P>>,
}

/// Travel time source and its time series sink, only present when traffic analysis is configured
pub struct TrafficMgr<T = Directions, P = Influx> {
    pub origin: String,
    pub destination: String,
    pub travel_times: T,
    pub peaks: P,
    pub days_ahead: u32,
}

/// Loads configuration, sets up logging and instantiates all clients and stores
///
pub fn init() -> Result<(Config, Mgr), InitError> {
    let config_path = config_path(env::args().skip(1), env::var("CONFIG_PATH").ok());
    let config = load_config(&config_path)?;

    setup_logger(&config.general)?;

    // Print version
    info!("pleasant_commute version: {}", env!("CARGO_PKG_VERSION"));
    info!("using configuration from {}", config_path);

    let weather = OpenWeatherMap::new(&config.weather);
    let store = Postgres::new(&config.postgres)?;

    let traffic = match (&config.traffic, &config.influx) {
        (Some(traffic), Some(influx)) => Some(TrafficMgr {
            origin: traffic.origin.to_string(),
            destination: traffic.destination.to_string(),
            travel_times: Directions::new(traffic),
            peaks: Influx::new(influx),
            days_ahead: traffic.days_ahead,
        }),
        _ => None,
    };

    Ok((config, Mgr { weather, store, traffic }))
}

/// Picks the configuration file path from a `--config=<path>` argument,
/// the given environment value or the default, in that order
///
/// # Arguments
///
/// * 'args' - command line arguments, program name excluded
/// * 'env_path' - value of CONFIG_PATH if set
fn config_path<I: Iterator<Item = String>>(mut args: I, env_path: Option<String>) -> String {
    args.find_map(|a| a.strip_prefix("--config=").map(|p| p.to_string()))
        .or(env_path)
        .unwrap_or(DEFAULT_CONFIG_PATH.to_string())
}

/// Sets up log4rs with a file appender and optionally a stdout appender
///
/// # Arguments
///
/// * 'general' - general configuration holding log path, level and stdout switch
fn setup_logger(general: &General) -> Result<(), InitError> {
    let log_file = Path::new(&general.log_path).join("pleasant_commute.log");

    let file = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build(log_file)?;

    let mut builder = log4rs::Config::builder()
        .appender(Appender::builder().build("file", Box::new(file)));
    let mut root = Root::builder().appender("file");

    if general.log_to_stdout {
        let stdout = ConsoleAppender::builder()
            .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
            .build();
        builder = builder.appender(Appender::builder().build("stdout", Box::new(stdout)));
        root = root.appender("stdout");
    }

    let log_config = builder
        .build(root.build(general.log_level))
        .map_err(|e| InitError::Logging(e.to_string()))?;
    log4rs::init_config(log_config)?;

    Ok(())
}
