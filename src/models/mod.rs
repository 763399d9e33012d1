pub mod directions;
pub mod owm_weather;
