use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct TextValue {
    pub value: f64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Leg {
    pub duration: TextValue,
    pub duration_in_traffic: Option<TextValue>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Route {
    #[serde(default)]
    pub legs: Vec<Leg>,
}

/// Response from the Directions API, durations are given in seconds
#[derive(Deserialize, Debug, Clone)]
pub struct DirectionsResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub routes: Vec<Route>,
}

/// Travel durations for one departure, in minutes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegDuration {
    pub in_traffic_minutes: f64,
    pub baseline_minutes: f64,
}
