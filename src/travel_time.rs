use std::fmt;
use std::fmt::Formatter;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;
use crate::models::directions::LegDuration;
use crate::scoring::round_to;

/// First hour of the day to sample travel times for
const FIRST_HOUR: u32 = 6;

/// Last hour of the day to sample travel times for (inclusive)
const LAST_HOUR: u32 = 22;

/// Number of worst hours to select
pub const WORST_COUNT: usize = 2;

#[derive(Error, Debug)]
pub enum TravelTimeError {
    #[error("travel time source error: {0}")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("departure {0} does not exist in local time")]
    Departure(NaiveDateTime),
}

/// Anything that can measure travel durations for a departure moment
pub trait TravelTimeSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns baseline and in-traffic durations for the given departure
    ///
    /// # Arguments
    ///
    /// * 'departure' - departure time
    fn leg_duration(&self, departure: DateTime<Local>) -> Result<LegDuration, Self::Error>;
}

/// Travel time measurement for one hour of the day
#[derive(Debug, Clone, PartialEq)]
pub struct TravelTimeSample {
    pub hour: NaiveTime,
    pub departure: DateTime<Local>,
    pub in_traffic_minutes: f64,
    pub baseline_minutes: f64,
    pub delay_minutes: f64,
    pub ratio: Option<f64>,
}

impl TravelTimeSample {
    /// Creates a sample from two duration measurements.
    /// The ratio is left out when the baseline is zero or negative.
    ///
    /// # Arguments
    ///
    /// * 'departure' - the departure the durations were measured for
    /// * 'in_traffic_minutes' - duration accounting for traffic
    /// * 'baseline_minutes' - traffic free duration
    pub fn new(departure: DateTime<Local>, in_traffic_minutes: f64, baseline_minutes: f64) -> TravelTimeSample {
        let ratio = if baseline_minutes > 0.0 {
            Some(round_to(in_traffic_minutes / baseline_minutes, 2))
        } else {
            None
        };

        TravelTimeSample {
            hour: departure.time(),
            departure,
            in_traffic_minutes,
            baseline_minutes,
            delay_minutes: in_traffic_minutes - baseline_minutes,
            ratio,
        }
    }

    /// Returns the hour as "HH:MM"
    pub fn hour_label(&self) -> String {
        self.hour.format("%H:%M").to_string()
    }
}

/// Implementation of the Display Trait for pretty print
impl fmt::Display for TravelTimeSample {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let ratio = self.ratio.map_or("n/a".to_string(), |r| format!("{:.2}", r));
        write!(f, "{}: {:>5.1} mins (baseline {:>5.1}), delay {:>+5.1} mins, ratio={}",
               self.hour_label(), self.in_traffic_minutes, self.baseline_minutes, self.delay_minutes, ratio)
    }
}

/// Result of a day's travel time analysis
#[derive(Debug, Clone)]
pub struct TravelTimeAnalysis {
    pub date: NaiveDate,
    pub samples: Vec<TravelTimeSample>,
    pub worst: Vec<TravelTimeSample>,
}

/// Measures travel times for every hour between 06:00 and 22:00 on the given date
/// and picks the hours with the worst traffic compared to baseline.
///
/// Measurements are taken in order and the first failure aborts the whole analysis.
///
/// # Arguments
///
/// * 'date' - the date to analyze
/// * 'source' - where to get travel durations from
pub fn analyze_travel_times(date: NaiveDate, source: &impl TravelTimeSource) -> Result<TravelTimeAnalysis, TravelTimeError> {
    let mut samples: Vec<TravelTimeSample> = Vec::with_capacity((LAST_HOUR - FIRST_HOUR + 1) as usize);

    for hour in FIRST_HOUR..=LAST_HOUR {
        let departure = local_departure(date, hour)?;
        let leg = source.leg_duration(departure)
            .map_err(|e| TravelTimeError::Source(Box::new(e)))?;
        samples.push(TravelTimeSample::new(departure, leg.in_traffic_minutes, leg.baseline_minutes));
    }

    let worst = worst_times(&samples, WORST_COUNT);

    Ok(TravelTimeAnalysis { date, samples, worst })
}

/// Selects the samples with the highest ratio and returns them ordered by hour.
///
/// Samples without a ratio rank below all others, and equal ratios keep their
/// input order, so for hourly input the earlier hour wins a tie.
///
/// # Arguments
///
/// * 'samples' - the samples to select from
/// * 'count' - number of samples to select
pub fn worst_times(samples: &[TravelTimeSample], count: usize) -> Vec<TravelTimeSample> {
    let mut ranked = samples.to_vec();
    ranked.sort_by(|a, b| {
        let a = a.ratio.unwrap_or(f64::NEG_INFINITY);
        let b = b.ratio.unwrap_or(f64::NEG_INFINITY);
        b.total_cmp(&a)
    });
    ranked.truncate(count);
    ranked.sort_by(|a, b| a.hour.cmp(&b.hour));

    ranked
}

/// Resolves a local departure time for the given date and hour
///
/// # Arguments
///
/// * 'date' - departure date
/// * 'hour' - departure hour
fn local_departure(date: NaiveDate, hour: u32) -> Result<DateTime<Local>, TravelTimeError> {
    let naive = date.and_time(NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or_default());

    naive.and_local_timezone(Local)
        .earliest()
        .ok_or(TravelTimeError::Departure(naive))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use crate::manager_directions::errors::DirectionsError;

    const RATIOS: [f64; 17] = [1.0, 1.0, 1.1, 1.5, 1.2, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.3, 1.0, 1.0, 1.0, 1.0];

    /// Source returning a fixed baseline and the ratio table above
    struct FixedSource {
        baseline: f64,
        fail_at: Option<u32>,
    }

    impl TravelTimeSource for FixedSource {
        type Error = DirectionsError;

        fn leg_duration(&self, departure: DateTime<Local>) -> Result<LegDuration, DirectionsError> {
            let hour = departure.hour();
            if self.fail_at == Some(hour) {
                return Err(DirectionsError::Provider("OVER_QUERY_LIMIT".to_string()));
            }
            let ratio = RATIOS[(hour - FIRST_HOUR) as usize];
            Ok(LegDuration { in_traffic_minutes: self.baseline * ratio, baseline_minutes: self.baseline })
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 9).unwrap()
    }

    fn departure(hour: u32) -> DateTime<Local> {
        local_departure(date(), hour).unwrap()
    }

    #[test]
    fn samples_every_hour() {
        let source = FixedSource { baseline: 20.0, fail_at: None };
        let analysis = analyze_travel_times(date(), &source).unwrap();

        assert_eq!(analysis.samples.len(), 17);
        assert_eq!(analysis.samples[0].hour_label(), "06:00");
        assert_eq!(analysis.samples[16].hour_label(), "22:00");
        assert_eq!(analysis.samples[3].ratio, Some(1.5));
        assert_eq!(analysis.samples[3].delay_minutes, 10.0);
    }

    #[test]
    fn picks_worst_two_ordered_by_hour() {
        let source = FixedSource { baseline: 20.0, fail_at: None };
        let analysis = analyze_travel_times(date(), &source).unwrap();

        let hours = analysis.worst.iter().map(|s| s.hour_label()).collect::<Vec<String>>();
        assert_eq!(hours, vec!["09:00", "18:00"]);
        assert_eq!(analysis.worst[0].ratio, Some(1.5));
        assert_eq!(analysis.worst[1].ratio, Some(1.3));
    }

    #[test]
    fn failure_aborts_analysis() {
        let source = FixedSource { baseline: 20.0, fail_at: Some(14) };
        let result = analyze_travel_times(date(), &source);

        match result {
            Err(TravelTimeError::Source(e)) => {
                assert!(matches!(e.downcast_ref::<DirectionsError>(), Some(DirectionsError::Provider(_))));
                assert_eq!(e.to_string(), "directions provider error: OVER_QUERY_LIMIT");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn no_ratio_without_baseline() {
        for baseline in [0.0, -1.0, -30.5] {
            for in_traffic in [0.0, 12.0, -3.0] {
                let sample = TravelTimeSample::new(departure(8), in_traffic, baseline);
                assert_eq!(sample.ratio, None);
            }
        }
    }

    #[test]
    fn missing_ratio_ranks_last() {
        let samples = vec![
            TravelTimeSample::new(departure(6), 10.0, 0.0),
            TravelTimeSample::new(departure(7), 12.0, 10.0),
            TravelTimeSample::new(departure(8), 10.0, 10.0),
        ];
        let worst = worst_times(&samples, 2);

        assert_eq!(worst[0].hour_label(), "07:00");
        assert_eq!(worst[1].hour_label(), "08:00");
    }

    #[test]
    fn ties_keep_earlier_hour() {
        let samples = vec![
            TravelTimeSample::new(departure(6), 10.0, 10.0),
            TravelTimeSample::new(departure(7), 14.0, 10.0),
            TravelTimeSample::new(departure(8), 14.0, 10.0),
            TravelTimeSample::new(departure(9), 14.0, 10.0),
        ];
        let worst = worst_times(&samples, 2);

        let hours = worst.iter().map(|s| s.hour_label()).collect::<Vec<String>>();
        assert_eq!(hours, vec!["07:00", "08:00"]);
    }
}
