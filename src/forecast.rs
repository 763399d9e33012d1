use std::fmt;
use std::fmt::Formatter;
use chrono::NaiveDateTime;
use thiserror::Error;
use crate::models::owm_weather::{CurrentResponse, ForecastEntry, ForecastResponse, WeatherInfo};
use crate::scoring::{pleasantness, round_to};

/// Success status code as reported in the provider payload
const STATUS_OK: u16 = 200;

/// Format of the `dt_txt` field in forecast entries
const FORECAST_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("API Error: {0}")]
    Provider(String),
    #[error("forecast document error: {0}")]
    Document(String),
}

/// One 3-hour forecast sample for a location
///
/// The pleasantness score is derived from temperature, wind and weather on demand,
/// so it can never disagree with the values it is computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastPoint {
    pub forecast_time: NaiveDateTime,
    pub location: String,
    pub day_of_week: String,
    pub temp_f: f64,
    pub temp_min_f: f64,
    pub temp_max_f: f64,
    pub humidity_percent: f64,
    pub cloudiness_percent: f64,
    pub chance_of_rain_percent: f64,
    pub wind_mph: f64,
    pub weather: String,
    pub weather_description: String,
}

impl ForecastPoint {
    /// Returns the 0-100 pleasantness score for this forecast point
    pub fn pleasantness_score(&self) -> f64 {
        pleasantness(self.temp_f, self.wind_mph, &self.weather)
    }
}

/// Implementation of the Display Trait for pretty print
impl fmt::Display for ForecastPoint {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{} {:<9} {:>6.1}°F ({:>5.1}-{:>5.1}) Wind {:>4.1} mph, Hum {:>3.0}%, Cloud {:>3.0}%, Rain {:>5.1}%, {} ({}) -> {:>6.2}",
               self.forecast_time.format("%Y-%m-%d %H:%M"),
               self.day_of_week,
               self.temp_f, self.temp_min_f, self.temp_max_f,
               self.wind_mph,
               self.humidity_percent, self.cloudiness_percent, self.chance_of_rain_percent,
               self.weather, self.weather_description,
               self.pleasantness_score())
    }
}

/// Current weather conditions for a location
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    pub location: String,
    pub temp_f: f64,
    pub temp_min_f: f64,
    pub temp_max_f: f64,
    pub humidity_percent: f64,
    pub cloudiness_percent: f64,
    pub chance_of_rain_percent: f64,
    pub wind_mph: f64,
    pub weather: String,
    pub weather_description: String,
}

/// Implementation of the Display Trait for pretty print
impl fmt::Display for CurrentConditions {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}: {:>6.1}°F ({:>5.1}-{:>5.1}) Wind {:>4.1} mph, Hum {:>3.0}%, Cloud {:>3.0}%, Rain {:>5.1}%, {} ({})",
               self.location,
               self.temp_f, self.temp_min_f, self.temp_max_f,
               self.wind_mph,
               self.humidity_percent, self.cloudiness_percent, self.chance_of_rain_percent,
               self.weather, self.weather_description)
    }
}

/// Transforms a raw forecast payload into forecast points, one per entry and in the same order
///
/// # Arguments
///
/// * 'location' - the location the forecast was requested for
/// * 'forecast' - the raw forecast payload
pub fn normalize_forecast(location: &str, forecast: &ForecastResponse) -> Result<Vec<ForecastPoint>, ForecastError> {
    if forecast.cod != STATUS_OK {
        return Err(ForecastError::Provider(provider_message(&forecast.message)));
    }

    forecast.list
        .iter()
        .map(|entry| normalize_entry(location, entry))
        .collect()
}

/// Transforms a raw current conditions payload into a CurrentConditions struct
///
/// The current endpoint does not report a probability of rain, so any rain volume
/// over the last hour counts as 100% and no rain as 0%.
///
/// # Arguments
///
/// * 'location' - the location the conditions were requested for
/// * 'current' - the raw current conditions payload
pub fn normalize_current(location: &str, current: &CurrentResponse) -> Result<CurrentConditions, ForecastError> {
    if current.cod != STATUS_OK {
        return Err(ForecastError::Provider(provider_message(&current.message)));
    }

    let main = current.main.as_ref()
        .ok_or(ForecastError::Document("missing main values".to_string()))?;
    let weather = first_weather(&current.weather)?;
    let rain_volume = current.rain.as_ref().map_or(0.0, |r| r.one_hour);

    Ok(CurrentConditions {
        location: location.to_string(),
        temp_f: main.temp,
        temp_min_f: main.temp_min,
        temp_max_f: main.temp_max,
        humidity_percent: main.humidity,
        cloudiness_percent: current.clouds.as_ref().map_or(0.0, |c| c.all),
        chance_of_rain_percent: if rain_volume > 0.0 { 100.0 } else { 0.0 },
        wind_mph: current.wind.as_ref().map_or(0.0, |w| w.speed),
        weather: weather.main.clone(),
        weather_description: weather.description.clone(),
    })
}

/// Builds one forecast point from a raw forecast entry
///
/// # Arguments
///
/// * 'location' - the location the forecast was requested for
/// * 'entry' - raw forecast entry
fn normalize_entry(location: &str, entry: &ForecastEntry) -> Result<ForecastPoint, ForecastError> {
    let forecast_time = NaiveDateTime::parse_from_str(&entry.dt_txt, FORECAST_TIME_FORMAT)
        .map_err(|e| ForecastError::Document(format!("bad forecast time '{}': {}", entry.dt_txt, e)))?;
    let weather = first_weather(&entry.weather)?;

    Ok(ForecastPoint {
        forecast_time,
        location: location.to_string(),
        day_of_week: forecast_time.format("%A").to_string(),
        temp_f: entry.main.temp,
        temp_min_f: entry.main.temp_min,
        temp_max_f: entry.main.temp_max,
        humidity_percent: entry.main.humidity,
        cloudiness_percent: entry.clouds.all,
        chance_of_rain_percent: round_to(entry.pop.unwrap_or(0.0) * 100.0, 1),
        wind_mph: entry.wind.speed,
        weather: weather.main.clone(),
        weather_description: weather.description.clone(),
    })
}

fn first_weather(weather: &[WeatherInfo]) -> Result<&WeatherInfo, ForecastError> {
    weather.first().ok_or(ForecastError::Document("missing weather element".to_string()))
}

fn provider_message(message: &Option<String>) -> String {
    message.clone().unwrap_or("Unknown error".to_string())
}
