pub mod errors;

use std::time::Duration;
use chrono::{DateTime, Local};
use ureq::Agent;
use crate::config::TrafficParameters;
use crate::manager_directions::errors::DirectionsError;
use crate::models::directions::{DirectionsResponse, LegDuration};
use crate::travel_time::TravelTimeSource;

const REQUEST_URL: &str = "https://maps.googleapis.com/maps/api/directions/json";

/// Struct for retrieving traffic aware travel times between two places
pub struct Directions {
    api_key: String,
    origin: String,
    destination: String,
    agent: Agent,
}

impl Directions {
    /// Returns a new instance of the Directions struct
    ///
    /// # Arguments
    ///
    /// * 'config' - traffic configuration holding api key, origin and destination
    pub fn new(config: &TrafficParameters) -> Self {
        let agent_config = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(30)))
            .http_status_as_error(false)
            .build();

        let agent = agent_config.into();

        Self {
            api_key: config.api_key.to_string(),
            origin: config.origin.to_string(),
            destination: config.destination.to_string(),
            agent,
        }
    }
}

impl TravelTimeSource for Directions {
    type Error = DirectionsError;

    /// Requests a route for the given departure using the best guess traffic model
    ///
    /// See https://developers.google.com/maps/documentation/directions/get-directions
    ///
    /// # Arguments
    ///
    /// * 'departure' - departure time
    fn leg_duration(&self, departure: DateTime<Local>) -> Result<LegDuration, Self::Error> {
        let json = self.agent
            .get(REQUEST_URL)
            .query("origin", &self.origin)
            .query("destination", &self.destination)
            .query("departure_time", departure.timestamp().to_string())
            .query("traffic_model", "best_guess")
            .query("key", &self.api_key)
            .call()?
            .body_mut()
            .read_to_string()?;

        let response: DirectionsResponse = serde_json::from_str(&json)?;

        leg_duration_from(&response)
    }
}

/// Extracts baseline and in-traffic durations in minutes from the first leg of the first route
///
/// # Arguments
///
/// * 'response' - directions response
fn leg_duration_from(response: &DirectionsResponse) -> Result<LegDuration, DirectionsError> {
    if response.status != "OK" {
        return Err(DirectionsError::Provider(
            response.error_message.clone().unwrap_or(response.status.clone())));
    }

    let leg = response.routes
        .first()
        .and_then(|r| r.legs.first())
        .ok_or(DirectionsError::Document("no route leg in response".to_string()))?;

    let in_traffic = leg.duration_in_traffic
        .as_ref()
        .ok_or(DirectionsError::Document("no duration in traffic in response".to_string()))?;

    Ok(LegDuration {
        in_traffic_minutes: in_traffic.value / 60.0,
        baseline_minutes: leg.duration.value / 60.0,
    })
}
