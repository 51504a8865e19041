use thiserror::Error;

pub type PuckResult<T> = Result<T, PuckError>;

/// Failures at the JSON boundary. The physics itself never fails.
#[derive(Error, Debug)]
pub enum PuckError {
    #[error("invalid brew request: {0}")]
    InvalidRequest(#[source] serde_json::Error),

    #[error("could not serialize simulation result: {0}")]
    Serialize(#[source] serde_json::Error),
}
