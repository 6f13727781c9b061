use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unable to parse time {value:?}: {source}")]
    TimeParse {
        value: String,
        source: chrono::ParseError,
    },

    #[error("Unknown transport icon id {0}")]
    UnknownTransport(i64),

    #[error("Journey has no legs")]
    EmptyJourney,

    #[error("Journey leg has no {0} time")]
    MissingTime(&'static str),

    #[error("Status message has no validity window")]
    MissingValidity,

    #[error("Invalid ticket price {0:?}")]
    InvalidPrice(String),

    #[error("Invalid date and time {0:?}, expected e.g. 2024/06/01 9:30am")]
    InvalidDateTime(String),

    #[error("Unknown fare category {0:?}, expected one of ADULT, CHILD, SENIOR, SCHOLAR")]
    InvalidFareCategory(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(&'static str),

    #[error("{0} must be set")]
    MissingEnv(&'static str),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Malformed response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, Error>;
