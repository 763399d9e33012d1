use thiserror::Error;

#[derive(Error, Debug)]
pub enum InfluxError {
    #[error("influx write rejected with status {0}: {1}")]
    Rejected(u16, String),
    #[error("influx http request error: {0}")]
    Request(String),
}
impl From<ureq::Error> for InfluxError {
    fn from(e: ureq::Error) -> InfluxError {
        InfluxError::Request(e.to_string())
    }
}
