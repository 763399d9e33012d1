use thiserror::Error;

#[derive(Error, Debug)]
pub enum PostgresError {
    #[error("error connecting to postgres: {0}")]
    Connection(#[from] diesel::ConnectionError),
    #[error("error writing to postgres: {0}")]
    Query(#[from] diesel::result::Error),
}
