// src/error.rs

//! Error types shared across the crate.

use thiserror::Error;

/// Failure to turn a shot description into derived values.
#[derive(Debug, Error)]
pub enum CalcError {
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("shot must be a JSON object")]
    NotAnObject,

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` has invalid value {value}")]
    InvalidValue { field: &'static str, value: f64 },

    #[error("ball did not land within {0} seconds of flight")]
    NoLanding(f64),
}

/// Failure to read runtime settings from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} is not a valid socket address: {value}")]
    InvalidAddress { key: &'static str, value: String },

    #[error("{key} is not a valid boolean: {value}")]
    InvalidBool { key: &'static str, value: String },

    #[error("{key} is not a valid number: {value}")]
    InvalidNumber { key: &'static str, value: String },
}

/// Failure to locate a launch monitor on the network.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("network error during discovery: {0}")]
    Io(#[from] std::io::Error),

    #[error("mDNS error: {0}")]
    Mdns(String),

    #[error("no {0} response received")]
    Timeout(&'static str),

    #[error("manual discovery requires --monitor-host")]
    MissingHost,
}

/// Failure while relaying shots from a launch monitor.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("connection error: {0}")]
    Io(#[from] std::io::Error),

    #[error("timed out connecting to {0}")]
    ConnectTimeout(String),

    #[error("no data from launch monitor for {0} seconds")]
    ReadTimeout(u64),

    #[error("invalid JSON from launch monitor: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("unable to map record into a shot")]
    Unmappable,

    #[error("calculation error: {0}")]
    Calc(#[from] CalcError),
}
