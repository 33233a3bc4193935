//! Domain errors for the broadcast guide

use thiserror::Error;

use crate::models::RuleId;

/// Rejected viewer location input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    #[error("Please enter a valid 5-digit ZIP code (got '{0}')")]
    InvalidZip(String),

    #[error("No ZIP code provided")]
    Missing,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Game '{game}' has no default regional channel")]
    MissingDefault { game: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("No mapping rule at position {0}")]
    NotFound(usize),

    #[error("No mapping rule with id {0}")]
    UnknownId(RuleId),

    #[error("Missing required field '{0}' in rule data")]
    MissingField(&'static str),

    #[error("A rule for {region}/{team}/{sport} already exists")]
    Conflict {
        region: String,
        team: String,
        sport: String,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReviewError {
    #[error("Game not found: {0}")]
    NotFound(String),

    #[error("Game {0} is already validated")]
    AlreadyValidated(String),

    #[error("A regional channel is required to approve a game")]
    EmptyChannel,

    #[error("Game {0} has no default regional channel")]
    MissingDefault(String),
}

/// Failure talking to the remote guide API
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error(transparent)]
    Rule(#[from] RuleError),

    #[error(transparent)]
    Location(#[from] LocationError),
}

/// Failure loading or saving the persisted location
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
