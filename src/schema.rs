diesel::table! {
    latest_temperature (location) {
        location -> Text,
        temperature -> Double,
    }
}

diesel::table! {
    weather_forecast_3h (forecast_time, location) {
        forecast_time -> Timestamp,
        location -> Text,
        day_of_week -> Text,
        temp_f -> Double,
        temp_min_f -> Double,
        temp_max_f -> Double,
        humidity_percent -> Double,
        cloudiness_percent -> Double,
        rain_percent -> Double,
        wind_mph -> Double,
        weather -> Text,
        pleasantness_score -> Double,
    }
}
