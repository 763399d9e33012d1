pub mod errors;

use std::time::Duration;
use ureq::Agent;
use crate::config::WeatherParameters;
use crate::forecast::{normalize_current, normalize_forecast, CurrentConditions, ForecastPoint};
use crate::manager_owm::errors::OwmError;
use crate::models::owm_weather::{CurrentResponse, ErrorResponse, ForecastResponse};
use crate::worker::WeatherSource;

const REQUEST_DOMAIN: &str = "https://api.openweathermap.org";

/// Struct for retrieving current weather and 3-hour forecasts from OpenWeatherMap
pub struct OpenWeatherMap {
    api_key: String,
    agent: Agent,
}

impl OpenWeatherMap {
    /// Returns a new instance of the OpenWeatherMap struct
    ///
    /// Http error statuses are not turned into transport errors by the agent since
    /// OpenWeatherMap explains what went wrong in the response body.
    ///
    /// # Arguments
    ///
    /// * 'config' - weather configuration holding the api key
    pub fn new(config: &WeatherParameters) -> Self {
        let agent_config = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(30)))
            .http_status_as_error(false)
            .build();

        let agent = agent_config.into();

        Self { api_key: config.api_key.to_string(), agent }
    }

    /// Sends a get request with location, api key and imperial units and returns the body
    ///
    /// # Arguments
    ///
    /// * 'path' - endpoint path
    /// * 'location' - location query
    fn get_request(&self, path: &str, location: &str) -> Result<String, OwmError> {
        let url = format!("{}{}", REQUEST_DOMAIN, path);

        let mut response = self.agent
            .get(url)
            .query("q", location)
            .query("appid", &self.api_key)
            .query("units", "imperial")
            .call()?;

        let status = response.status().as_u16();
        let json = response.body_mut().read_to_string()?;

        check_status(status, &json)?;

        Ok(json)
    }
}

impl WeatherSource for OpenWeatherMap {
    /// Retrieves current weather conditions for a location, temperatures in Fahrenheit
    ///
    /// See https://openweathermap.org/current
    ///
    /// # Arguments
    ///
    /// * 'location' - location query, e.g. "Portland, US"
    fn get_current_conditions(&self, location: &str) -> Result<CurrentConditions, OwmError> {
        let json = self.get_request("/data/2.5/weather", location)?;

        let current: CurrentResponse = serde_json::from_str(&json)?;

        Ok(normalize_current(location, &current)?)
    }

    /// Retrieves the 5 day forecast in 3-hour steps for a location and returns one
    /// forecast point per step including its pleasantness score
    ///
    /// See https://openweathermap.org/forecast5
    ///
    /// # Arguments
    ///
    /// * 'location' - location query, e.g. "Portland, US"
    fn get_forecast_points(&self, location: &str) -> Result<Vec<ForecastPoint>, OwmError> {
        let json = self.get_request("/data/2.5/forecast", location)?;

        let forecast: ForecastResponse = serde_json::from_str(&json)?;

        Ok(normalize_forecast(location, &forecast)?)
    }
}

/// Returns the provider's message as an error if the http status isn't 200
///
/// # Arguments
///
/// * 'status' - http status code
/// * 'body' - response body
fn check_status(status: u16, body: &str) -> Result<(), OwmError> {
    if status == 200 {
        return Ok(());
    }

    let message = serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|e| e.message)
        .unwrap_or("Unknown error".to_string());

    Err(OwmError::Provider(message))
}
