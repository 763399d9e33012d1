use thiserror::Error;

#[derive(Error, Debug)]
pub enum DirectionsError {
    #[error("directions provider error: {0}")]
    Provider(String),
    #[error("directions document error: {0}")]
    Document(String),
    #[error("directions http request error: {0}")]
    Request(String),
}
impl From<serde_json::Error> for DirectionsError {
    fn from(e: serde_json::Error) -> DirectionsError {
        DirectionsError::Document(e.to_string())
    }
}
impl From<ureq::Error> for DirectionsError {
    fn from(e: ureq::Error) -> DirectionsError {
        DirectionsError::Request(e.to_string())
    }
}
