pub mod errors;

use std::time::Duration;
use ureq::Agent;
use crate::config::InfluxParameters;
use crate::manager_influx::errors::InfluxError;
use crate::travel_time::TravelTimeSample;
use crate::worker::PeakSink;

/// Measurement name for traffic peak points
const TRAFFIC_PEAK: &str = "traffic_peak";

/// Struct for writing points to InfluxDB using the v2 http write API
pub struct Influx {
    url: String,
    token: String,
    org: String,
    bucket: String,
    agent: Agent,
}

impl Influx {
    /// Returns a new instance of the Influx struct
    ///
    /// # Arguments
    ///
    /// * 'config' - influx url, token, organization and bucket
    pub fn new(config: &InfluxParameters) -> Self {
        let agent_config = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(30)))
            .http_status_as_error(false)
            .build();

        let agent = agent_config.into();

        Self {
            url: config.url.trim_end_matches('/').to_string(),
            token: config.token.to_string(),
            org: config.org.to_string(),
            bucket: config.bucket.to_string(),
            agent,
        }
    }

    /// Posts one line protocol record with second precision
    ///
    /// See https://docs.influxdata.com/influxdb/v2/api/#operation/PostWrite
    ///
    /// # Arguments
    ///
    /// * 'line' - line protocol record
    fn write_line(&self, line: String) -> Result<(), InfluxError> {
        let url = format!("{}/api/v2/write", self.url);

        let mut response = self.agent
            .post(url)
            .query("org", &self.org)
            .query("bucket", &self.bucket)
            .query("precision", "s")
            .header("Authorization", format!("Token {}", self.token))
            .content_type("text/plain; charset=utf-8")
            .send(line)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.body_mut().read_to_string().unwrap_or_default();
            return Err(InfluxError::Rejected(status, body));
        }

        Ok(())
    }
}

impl PeakSink for Influx {
    /// Writes a traffic peak sample, timestamped at its departure time
    ///
    /// # Arguments
    ///
    /// * 'origin' - route origin
    /// * 'destination' - route destination
    /// * 'sample' - the travel time sample to write
    fn write_traffic_peak(&self, origin: &str, destination: &str, sample: &TravelTimeSample) -> Result<(), InfluxError> {
        self.write_line(traffic_peak_line(origin, destination, sample))
    }
}

/// Renders a traffic peak sample as a line protocol record.
/// The ratio field is left out when the sample has no ratio.
///
/// # Arguments
///
/// * 'origin' - route origin
/// * 'destination' - route destination
/// * 'sample' - the travel time sample
fn traffic_peak_line(origin: &str, destination: &str, sample: &TravelTimeSample) -> String {
    let tags = format!("origin={},destination={},day_of_week={},hour={}",
                       escape_tag(origin),
                       escape_tag(destination),
                       sample.departure.format("%A"),
                       sample.hour_label());

    let mut fields = format!("in_traffic_mins={},baseline_mins={},delay_mins={}",
                             sample.in_traffic_minutes, sample.baseline_minutes, sample.delay_minutes);
    if let Some(ratio) = sample.ratio {
        fields += &format!(",ratio={}", ratio);
    }

    format!("{},{} {} {}", TRAFFIC_PEAK, tags, fields, sample.departure.timestamp())
}

/// Escapes backslashes, commas, spaces and equal signs in a tag value
fn escape_tag(value: &str) -> String {
    value.replace('\\', "\\\\").replace(',', "\\,").replace(' ', "\\ ").replace('=', "\\=")
}
