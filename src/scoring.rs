/// Lower bound of the ideal temperature band in Fahrenheit
const IDEAL_MIN_TEMP: f64 = 65.0;

/// Upper bound of the ideal temperature band in Fahrenheit
const IDEAL_MAX_TEMP: f64 = 72.0;

/// Temperature at and below which the temperature score is zero
const HARD_MIN_TEMP: f64 = 45.0;

/// Temperature at and above which the temperature score is zero
const HARD_MAX_TEMP: f64 = 90.0;

/// Wind speed in mph at and above which the wind score is zero
const MAX_WIND: f64 = 22.0;

/// Weights for the temperature, wind and sky condition sub-scores
const TEMPERATURE_WEIGHT: f64 = 0.7;
const WIND_WEIGHT: f64 = 0.2;
const WEATHER_WEIGHT: f64 = 0.1;

/// Sky condition as derived from a provider weather category label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkyCondition {
    Clear,
    Clouds,
    Precipitation,
    Other,
}

impl SkyCondition {
    /// Classifies a weather label by case-insensitive substring match.
    /// Labels not recognized fall through to `Other`.
    ///
    /// # Arguments
    ///
    /// * 'label' - weather category label, e.g. "Clear", "Clouds" or "light rain"
    pub fn from_label(label: &str) -> SkyCondition {
        let label = label.to_lowercase();

        if label.contains("clear") {
            SkyCondition::Clear
        } else if label.contains("cloud") {
            SkyCondition::Clouds
        } else if ["rain", "drizzle", "thunderstorm", "snow"].iter().any(|w| label.contains(w)) {
            SkyCondition::Precipitation
        } else {
            SkyCondition::Other
        }
    }

    /// Returns the sub-score for the sky condition
    pub fn score(&self) -> f64 {
        match self {
            SkyCondition::Clear => 1.0,
            SkyCondition::Clouds => 0.8,
            SkyCondition::Precipitation => 0.0,
            SkyCondition::Other => 0.5,
        }
    }
}

/// Scores a temperature between 0 and 1 where the ideal band 65-72°F gives 1.0.
/// Outside the band the score decays linearly towards the hard limits 45°F and 90°F
/// and is clamped at 0 beyond them.
///
/// # Arguments
///
/// * 'temp_f' - temperature in Fahrenheit
pub fn temperature_score(temp_f: f64) -> f64 {
    if temp_f >= IDEAL_MIN_TEMP && temp_f <= IDEAL_MAX_TEMP {
        1.0
    } else if temp_f < IDEAL_MIN_TEMP {
        (1.0 - (IDEAL_MIN_TEMP - temp_f) / (IDEAL_MIN_TEMP - HARD_MIN_TEMP)).max(0.0)
    } else {
        (1.0 - (temp_f - IDEAL_MAX_TEMP) / (HARD_MAX_TEMP - IDEAL_MAX_TEMP)).max(0.0)
    }
}

/// Scores wind speed between 0 and 1, decreasing linearly up to 22 mph
///
/// # Arguments
///
/// * 'wind_mph' - wind speed in miles per hour
pub fn wind_score(wind_mph: f64) -> f64 {
    (1.0 - wind_mph / MAX_WIND).max(0.0)
}

/// Scores a weather category label, see `SkyCondition`
///
/// # Arguments
///
/// * 'label' - weather category label
pub fn weather_score(label: &str) -> f64 {
    SkyCondition::from_label(label).score()
}

/// Weighted pleasantness score from 0 to 100, rounded to 2 decimals
///
/// # Arguments
///
/// * 'temp_f' - temperature in Fahrenheit
/// * 'wind_mph' - wind speed in miles per hour
/// * 'label' - weather category label
pub fn pleasantness(temp_f: f64, wind_mph: f64, label: &str) -> f64 {
    let temp = temperature_score(temp_f) * TEMPERATURE_WEIGHT;
    let wind = wind_score(wind_mph) * WIND_WEIGHT;
    let weather = weather_score(label) * WEATHER_WEIGHT;

    round_to((temp + wind + weather) * 100.0, 2)
}

/// Rounds a value to the given number of decimals.
///
/// Rounding goes through the exact decimal expansion of the value, so 28.384999999999998
/// becomes 28.38 where scaling by 100 first would have rounded up to 28.39.
///
/// # Arguments
///
/// * 'value' - value to round
/// * 'decimals' - number of decimals to keep
pub fn round_to(value: f64, decimals: usize) -> f64 {
    format!("{:.*}", decimals, value).parse().unwrap_or(value)
}
