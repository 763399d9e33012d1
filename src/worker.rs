use std::thread;
use std::time::Duration;
use chrono::{Days, Local, NaiveDate};
use log::{debug, error, info};
use crate::config::Config;
use crate::errors::WorkerError;
use crate::forecast::{CurrentConditions, ForecastPoint};
use crate::initialization::{Mgr, TrafficMgr};
use crate::manager_influx::errors::InfluxError;
use crate::manager_owm::errors::OwmError;
use crate::manager_postgres::errors::PostgresError;
use crate::travel_time::{analyze_travel_times, TravelTimeSample, TravelTimeSource};

/// Source of current conditions and forecast points for a location
pub trait WeatherSource {
    fn get_current_conditions(&self, location: &str) -> Result<CurrentConditions, OwmError>;
    fn get_forecast_points(&self, location: &str) -> Result<Vec<ForecastPoint>, OwmError>;
}

/// Relational store keeping the latest temperature and forecast points per location
pub trait WeatherStore {
    fn upsert_latest_temperature(&mut self, location: &str, temp_f: f64) -> Result<(), PostgresError>;
    fn upsert_forecast_point(&mut self, point: &ForecastPoint) -> Result<(), PostgresError>;
}

/// Time series sink for traffic peaks
pub trait PeakSink {
    fn write_traffic_peak(&self, origin: &str, destination: &str, sample: &TravelTimeSample) -> Result<(), InfluxError>;
}

/// Runs collection cycles. With an interval configured the cycles repeat forever and a failed
/// cycle is only logged, otherwise one cycle is run and its outcome returned.
///
/// # Arguments
///
/// * 'config' - the configuration
/// * 'mgr' - clients and stores to use
pub fn run<W, S, T, P>(config: &Config, mgr: &mut Mgr<W, S, T, P>) -> Result<(), WorkerError>
where W: WeatherSource, S: WeatherStore, T: TravelTimeSource, P: PeakSink {

    let Some(minutes) = config.general.interval_minutes else {
        return run_cycle(config, mgr, Local::now().date_naive());
    };

    loop {
        if let Err(e) = run_cycle(config, mgr, Local::now().date_naive()) {
            error!("collection cycle failed: {}", e);
        }

        info!("next collection in {} minutes", minutes);
        thread::sleep(Duration::from_secs(minutes.saturating_mul(60)));
    }
}

/// One collection cycle: latest temperature, forecast points and, if configured,
/// traffic peaks for the coming days
///
/// # Arguments
///
/// * 'config' - the configuration
/// * 'mgr' - clients and stores to use
/// * 'today' - the local date the cycle runs on
fn run_cycle<W, S, T, P>(config: &Config, mgr: &mut Mgr<W, S, T, P>, today: NaiveDate) -> Result<(), WorkerError>
where W: WeatherSource, S: WeatherStore, T: TravelTimeSource, P: PeakSink {

    let location = config.weather.location.as_str();

    update_latest_temperature(&mgr.weather, &mut mgr.store, location)?;
    update_forecast(&mgr.weather, &mut mgr.store, location)?;

    if let Some(traffic) = &mgr.traffic {
        for offset in 1..=traffic.days_ahead {
            if let Some(date) = today.checked_add_days(Days::new(offset as u64)) {
                update_traffic_peaks(traffic, date)?;
            }
        }
    }

    Ok(())
}

/// Fetches current conditions and overwrites the latest temperature for the location
///
/// # Arguments
///
/// * 'weather' - weather source
/// * 'store' - store to write to
/// * 'location' - location to fetch for
fn update_latest_temperature(weather: &impl WeatherSource, store: &mut impl WeatherStore, location: &str) -> Result<(), WorkerError> {
    let current = weather.get_current_conditions(location)?;
    info!("current conditions {}", current);

    store.upsert_latest_temperature(location, current.temp_f)?;

    Ok(())
}

/// Fetches forecast points and upserts them one by one
///
/// # Arguments
///
/// * 'weather' - weather source
/// * 'store' - store to write to
/// * 'location' - location to fetch for
fn update_forecast(weather: &impl WeatherSource, store: &mut impl WeatherStore, location: &str) -> Result<(), WorkerError> {
    let points = weather.get_forecast_points(location)?;
    info!("received {} forecast points for {}", points.len(), location);

    for point in &points {
        info!("{}", point);
        store.upsert_forecast_point(point)?;
    }

    Ok(())
}

/// Analyzes travel times for a date and writes the worst hours as traffic peaks
///
/// # Arguments
///
/// * 'traffic' - travel time source and peak sink
/// * 'date' - the date to analyze
fn update_traffic_peaks<T: TravelTimeSource, P: PeakSink>(traffic: &TrafficMgr<T, P>, date: NaiveDate) -> Result<(), WorkerError> {
    let origin = traffic.origin.as_str();
    let destination = traffic.destination.as_str();

    let analysis = analyze_travel_times(date, &traffic.travel_times)?;

    debug!("hourly traffic predictions {} -> {} on {}:", origin, destination, analysis.date);
    for sample in &analysis.samples {
        debug!("{}", sample);
    }

    info!("peak traffic times to avoid {} -> {} on {}:", origin, destination, analysis.date);
    for sample in &analysis.worst {
        info!("{}", sample);
        traffic.peaks.write_traffic_peak(origin, destination, sample)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use chrono::{DateTime, Timelike};
    use super::*;
    use crate::manager_directions::errors::DirectionsError;
    use crate::models::directions::LegDuration;

    const CONFIG: &str = r#"
        [general]
        log_path = "/tmp/"
        log_level = "info"
        log_to_stdout = false

        [weather]
        api_key = "key"
        location = "Portland, US"

        [postgres]
        host = "localhost"
        port = 5432
        db_name = "weather"
        user = "weather"
    "#;

    struct FakeWeather {
        calls: RefCell<Vec<&'static str>>,
        fail_forecast: bool,
    }

    impl WeatherSource for FakeWeather {
        fn get_current_conditions(&self, location: &str) -> Result<CurrentConditions, OwmError> {
            self.calls.borrow_mut().push("current");
            Ok(CurrentConditions {
                location: location.to_string(),
                temp_f: 61.5,
                temp_min_f: 59.0,
                temp_max_f: 63.0,
                humidity_percent: 70.0,
                cloudiness_percent: 20.0,
                chance_of_rain_percent: 0.0,
                wind_mph: 4.0,
                weather: "Clouds".to_string(),
                weather_description: "few clouds".to_string(),
            })
        }

        fn get_forecast_points(&self, location: &str) -> Result<Vec<ForecastPoint>, OwmError> {
            self.calls.borrow_mut().push("forecast");
            if self.fail_forecast {
                return Err(OwmError::Provider("city not found".to_string()));
            }

            let points = (0..3).map(|step| ForecastPoint {
                forecast_time: NaiveDate::from_ymd_opt(2025, 9, 9).unwrap().and_hms_opt(12 + step * 3, 0, 0).unwrap(),
                location: location.to_string(),
                day_of_week: "Tuesday".to_string(),
                temp_f: 68.0,
                temp_min_f: 66.0,
                temp_max_f: 69.0,
                humidity_percent: 50.0,
                cloudiness_percent: 0.0,
                chance_of_rain_percent: 0.0,
                wind_mph: 0.0,
                weather: "Clear".to_string(),
                weather_description: "clear sky".to_string(),
            }).collect();

            Ok(points)
        }
    }

    #[derive(Default)]
    struct FakeStore {
        latest: Vec<(String, f64)>,
        forecast_times: Vec<String>,
    }

    impl WeatherStore for FakeStore {
        fn upsert_latest_temperature(&mut self, location: &str, temp_f: f64) -> Result<(), PostgresError> {
            self.latest.push((location.to_string(), temp_f));
            Ok(())
        }

        fn upsert_forecast_point(&mut self, point: &ForecastPoint) -> Result<(), PostgresError> {
            self.forecast_times.push(point.forecast_time.format("%H:%M").to_string());
            Ok(())
        }
    }

    /// Baseline of 20 minutes with rush hours at 09:00 and 18:00
    #[derive(Default)]
    struct FakeTravelTimes {
        departures: RefCell<Vec<DateTime<Local>>>,
    }

    impl TravelTimeSource for FakeTravelTimes {
        type Error = DirectionsError;

        fn leg_duration(&self, departure: DateTime<Local>) -> Result<LegDuration, DirectionsError> {
            self.departures.borrow_mut().push(departure);
            let in_traffic = match departure.hour() {
                9 => 30.0,
                18 => 26.0,
                _ => 20.0,
            };
            Ok(LegDuration { in_traffic_minutes: in_traffic, baseline_minutes: 20.0 })
        }
    }

    #[derive(Default)]
    struct FakePeaks {
        written: RefCell<Vec<String>>,
    }

    impl PeakSink for FakePeaks {
        fn write_traffic_peak(&self, origin: &str, destination: &str, sample: &TravelTimeSample) -> Result<(), InfluxError> {
            self.written.borrow_mut().push(format!("{}->{} {} {}",
                origin, destination, sample.departure.format("%Y-%m-%d"), sample.hour_label()));
            Ok(())
        }
    }

    fn config() -> Config {
        toml::from_str(CONFIG).unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 8).unwrap()
    }

    fn mgr(days_ahead: Option<u32>) -> Mgr<FakeWeather, FakeStore, FakeTravelTimes, FakePeaks> {
        Mgr {
            weather: FakeWeather { calls: RefCell::new(Vec::new()), fail_forecast: false },
            store: FakeStore::default(),
            traffic: days_ahead.map(|days_ahead| TrafficMgr {
                origin: "Portland,OR".to_string(),
                destination: "Hillsboro,OR".to_string(),
                travel_times: FakeTravelTimes::default(),
                peaks: FakePeaks::default(),
                days_ahead,
            }),
        }
    }

    #[test]
    fn latest_temperature_once_per_cycle() {
        let mut mgr = mgr(None);
        run_cycle(&config(), &mut mgr, today()).unwrap();

        assert_eq!(*mgr.weather.calls.borrow(), vec!["current", "forecast"]);
        assert_eq!(mgr.store.latest, vec![("Portland, US".to_string(), 61.5)]);
        assert_eq!(mgr.store.forecast_times, vec!["12:00", "15:00", "18:00"]);
    }

    #[test]
    fn traffic_dates_start_tomorrow() {
        let mut mgr = mgr(Some(2));
        run_cycle(&config(), &mut mgr, today()).unwrap();

        let traffic = mgr.traffic.as_ref().unwrap();
        let departures = traffic.travel_times.departures.borrow();
        assert_eq!(departures.len(), 2 * 17);
        assert_eq!(departures[0].date_naive(), NaiveDate::from_ymd_opt(2025, 9, 9).unwrap());
        assert_eq!(departures[0].hour(), 6);
        assert_eq!(departures[33].date_naive(), NaiveDate::from_ymd_opt(2025, 9, 10).unwrap());
        assert_eq!(departures[33].hour(), 22);
    }

    #[test]
    fn only_worst_samples_are_written() {
        let mut mgr = mgr(Some(2));
        run_cycle(&config(), &mut mgr, today()).unwrap();

        let written = mgr.traffic.as_ref().unwrap().peaks.written.borrow().clone();
        assert_eq!(written, vec![
            "Portland,OR->Hillsboro,OR 2025-09-09 09:00",
            "Portland,OR->Hillsboro,OR 2025-09-09 18:00",
            "Portland,OR->Hillsboro,OR 2025-09-10 09:00",
            "Portland,OR->Hillsboro,OR 2025-09-10 18:00",
        ]);
    }

    #[test]
    fn weather_failure_stops_cycle() {
        let mut mgr = mgr(Some(1));
        mgr.weather.fail_forecast = true;

        let result = run_cycle(&config(), &mut mgr, today());

        assert!(matches!(result, Err(WorkerError::Weather(OwmError::Provider(_)))));
        assert_eq!(mgr.store.latest.len(), 1);
        assert!(mgr.store.forecast_times.is_empty());
        assert!(mgr.traffic.as_ref().unwrap().travel_times.departures.borrow().is_empty());
    }
}
