use thiserror::Error;
use crate::forecast::ForecastError;

#[derive(Error, Debug)]
pub enum OwmError {
    #[error("API Error: {0}")]
    Provider(String),
    #[error("weather document error: {0}")]
    Document(String),
    #[error("weather http request error: {0}")]
    Request(String),
}
impl From<serde_json::Error> for OwmError {
    fn from(e: serde_json::Error) -> OwmError {
        OwmError::Document(e.to_string())
    }
}
impl From<ureq::Error> for OwmError {
    fn from(e: ureq::Error) -> OwmError {
        OwmError::Request(e.to_string())
    }
}
impl From<ForecastError> for OwmError {
    fn from(e: ForecastError) -> OwmError {
        match e {
            ForecastError::Provider(msg) => OwmError::Provider(msg),
            ForecastError::Document(msg) => OwmError::Document(msg),
        }
    }
}
