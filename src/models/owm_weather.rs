use serde::{Deserialize, Deserializer};
use serde::de::Error;
use serde_json::Value;

#[derive(Deserialize, Debug, Clone)]
pub struct MainValues {
    pub temp: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: f64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct WeatherInfo {
    pub main: String,
    pub description: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Clouds {
    pub all: f64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Wind {
    pub speed: f64,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct RainVolume {
    #[serde(rename = "1h", default)]
    pub one_hour: f64,
}

/// One 3-hour entry in the forecast response
#[derive(Deserialize, Debug, Clone)]
pub struct ForecastEntry {
    pub dt_txt: String,
    pub main: MainValues,
    #[serde(default)]
    pub weather: Vec<WeatherInfo>,
    pub clouds: Clouds,
    pub wind: Wind,
    #[serde(default)]
    pub pop: Option<f64>,
}

/// Forecast response from `/data/2.5/forecast`
///
/// Error responses carry only `cod` and `message`, hence the defaults
#[derive(Deserialize, Debug, Clone)]
pub struct ForecastResponse {
    #[serde(deserialize_with = "deserialize_status_code")]
    pub cod: u16,
    #[serde(default, deserialize_with = "deserialize_message")]
    pub message: Option<String>,
    #[serde(default)]
    pub list: Vec<ForecastEntry>,
}

/// Current conditions response from `/data/2.5/weather`
#[derive(Deserialize, Debug, Clone)]
pub struct CurrentResponse {
    #[serde(deserialize_with = "deserialize_status_code")]
    pub cod: u16,
    #[serde(default, deserialize_with = "deserialize_message")]
    pub message: Option<String>,
    pub main: Option<MainValues>,
    #[serde(default)]
    pub weather: Vec<WeatherInfo>,
    pub clouds: Option<Clouds>,
    pub wind: Option<Wind>,
    #[serde(default)]
    pub rain: Option<RainVolume>,
}

/// Error body returned alongside a non-success http status
#[derive(Deserialize, Debug)]
pub struct ErrorResponse {
    #[serde(default, deserialize_with = "deserialize_message")]
    pub message: Option<String>,
}

/// OpenWeatherMap returns `cod` as a string on some endpoints and as a number on others
fn deserialize_status_code<'de, D>(deserializer: D) -> Result<u16, D::Error>
where D: Deserializer<'de> {

    let v = Value::deserialize(deserializer)?;
    let code = v.as_u64()
        .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
        .ok_or_else(|| D::Error::custom("non-numeric status code"))?
        .try_into()
        .map_err(|_| D::Error::custom("status code overflow"))?;

    Ok(code)
}

/// `message` is a number on successful forecast responses and a string on errors
fn deserialize_message<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where D: Deserializer<'de> {

    let v = Value::deserialize(deserializer)?;
    Ok(v.as_str().map(|s| s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_code_as_text_or_number() {
        let text: ForecastResponse = serde_json::from_str(r#"{"cod":"200","message":0,"list":[]}"#).unwrap();
        assert_eq!(text.cod, 200);
        assert_eq!(text.message, None);

        let number: CurrentResponse = serde_json::from_str(r#"{"cod":200}"#).unwrap();
        assert_eq!(number.cod, 200);
    }

    #[test]
    fn error_payload_parses() {
        let err: ForecastResponse = serde_json::from_str(r#"{"cod":"404","message":"city not found"}"#).unwrap();
        assert_eq!(err.cod, 404);
        assert_eq!(err.message.as_deref(), Some("city not found"));
        assert!(err.list.is_empty());
    }
}
