pub mod errors;

use chrono::NaiveDateTime;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::upsert::excluded;
use crate::config::PostgresParameters;
use crate::forecast::ForecastPoint;
use crate::manager_postgres::errors::PostgresError;
use crate::schema::{latest_temperature, weather_forecast_3h};
use crate::worker::WeatherStore;

#[derive(Insertable)]
#[diesel(table_name = latest_temperature)]
struct LatestTemperatureRow<'a> {
    location: &'a str,
    temperature: f64,
}

#[derive(Insertable)]
#[diesel(table_name = weather_forecast_3h)]
struct ForecastRow<'a> {
    forecast_time: NaiveDateTime,
    location: &'a str,
    day_of_week: &'a str,
    temp_f: f64,
    temp_min_f: f64,
    temp_max_f: f64,
    humidity_percent: f64,
    cloudiness_percent: f64,
    rain_percent: f64,
    wind_mph: f64,
    weather: &'a str,
    pleasantness_score: f64,
}

impl<'a> From<&'a ForecastPoint> for ForecastRow<'a> {
    fn from(p: &'a ForecastPoint) -> Self {
        ForecastRow {
            forecast_time: p.forecast_time,
            location: &p.location,
            day_of_week: &p.day_of_week,
            temp_f: p.temp_f,
            temp_min_f: p.temp_min_f,
            temp_max_f: p.temp_max_f,
            humidity_percent: p.humidity_percent,
            cloudiness_percent: p.cloudiness_percent,
            rain_percent: p.chance_of_rain_percent,
            wind_mph: p.wind_mph,
            weather: &p.weather,
            pleasantness_score: p.pleasantness_score(),
        }
    }
}

/// Struct for writing weather data to Postgres
///
/// The connection is held for the lifetime of the struct and closed when it is dropped.
pub struct Postgres {
    conn: PgConnection,
}

impl Postgres {
    /// Connects to Postgres and returns a new instance of the Postgres struct
    ///
    /// # Arguments
    ///
    /// * 'config' - connection parameters
    pub fn new(config: &PostgresParameters) -> Result<Self, PostgresError> {
        let conn = PgConnection::establish(&connection_string(config))?;

        Ok(Self { conn })
    }
}

impl WeatherStore for Postgres {
    /// Inserts or overwrites the latest temperature for a location
    ///
    /// # Arguments
    ///
    /// * 'location' - the location the temperature is valid for
    /// * 'temp_f' - temperature in Fahrenheit
    fn upsert_latest_temperature(&mut self, location: &str, temp_f: f64) -> Result<(), PostgresError> {
        let row = LatestTemperatureRow { location, temperature: temp_f };

        diesel::insert_into(latest_temperature::table)
            .values(&row)
            .on_conflict(latest_temperature::location)
            .do_update()
            .set(latest_temperature::temperature.eq(excluded(latest_temperature::temperature)))
            .execute(&mut self.conn)?;

        Ok(())
    }

    /// Inserts or overwrites a forecast point keyed by forecast time and location
    ///
    /// # Arguments
    ///
    /// * 'point' - the forecast point to write
    fn upsert_forecast_point(&mut self, point: &ForecastPoint) -> Result<(), PostgresError> {
        use crate::schema::weather_forecast_3h as wf;

        let row = ForecastRow::from(point);

        diesel::insert_into(wf::table)
            .values(&row)
            .on_conflict((wf::forecast_time, wf::location))
            .do_update()
            .set((
                wf::day_of_week.eq(excluded(wf::day_of_week)),
                wf::temp_f.eq(excluded(wf::temp_f)),
                wf::temp_min_f.eq(excluded(wf::temp_min_f)),
                wf::temp_max_f.eq(excluded(wf::temp_max_f)),
                wf::humidity_percent.eq(excluded(wf::humidity_percent)),
                wf::cloudiness_percent.eq(excluded(wf::cloudiness_percent)),
                wf::rain_percent.eq(excluded(wf::rain_percent)),
                wf::wind_mph.eq(excluded(wf::wind_mph)),
                wf::weather.eq(excluded(wf::weather)),
                wf::pleasantness_score.eq(excluded(wf::pleasantness_score)),
            ))
            .execute(&mut self.conn)?;

        Ok(())
    }
}

/// Builds a libpq key/value connection string, quoting every value
///
/// # Arguments
///
/// * 'config' - connection parameters
fn connection_string(config: &PostgresParameters) -> String {
    fn quote(value: &str) -> String {
        format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
    }

    format!("host={} port={} dbname={} user={} password={}",
            quote(&config.host),
            config.port,
            quote(&config.db_name),
            quote(&config.user),
            quote(&config.password))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn connection_string_is_quoted() {
        let config = PostgresParameters {
            host: "db.local".to_string(),
            port: 5432,
            db_name: "weather".to_string(),
            user: "collector".to_string(),
            password: "it's a s\\ecret".to_string(),
        };

        assert_eq!(connection_string(&config),
                   r"host='db.local' port=5432 dbname='weather' user='collector' password='it\'s a s\\ecret'");
    }

    #[test]
    fn forecast_row_carries_score() {
        let point = ForecastPoint {
            forecast_time: NaiveDate::from_ymd_opt(2025, 9, 9).unwrap().and_hms_opt(12, 0, 0).unwrap(),
            location: "Portland, US".to_string(),
            day_of_week: "Tuesday".to_string(),
            temp_f: 68.0,
            temp_min_f: 66.0,
            temp_max_f: 69.0,
            humidity_percent: 50.0,
            cloudiness_percent: 0.0,
            chance_of_rain_percent: 20.0,
            wind_mph: 0.0,
            weather: "Clear".to_string(),
            weather_description: "clear sky".to_string(),
        };
        let row = ForecastRow::from(&point);

        assert_eq!(row.pleasantness_score, 100.0);
        assert_eq!(row.rain_percent, 20.0);
        assert_eq!(row.location, "Portland, US");
    }
}
