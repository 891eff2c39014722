// src/config.rs

//! Runtime settings, read from the environment (after `.env` is loaded by the
//! binary).

use std::env;
use std::net::SocketAddr;

use crate::error::ConfigError;

pub const DEFAULT_SHOT_SERVER_ADDR: &str = "0.0.0.0:10000";
pub const DEFAULT_OPENAPI_ADDR: &str = "0.0.0.0:921";
pub const DEFAULT_HTTP_ADDR: &str = "127.0.0.1:5441";
pub const DEFAULT_DB_PATH: &str = "shots.db";
pub const DEFAULT_GAME_ID: &str = "shotlink";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Native JSON shot socket.
    pub shot_server_addr: SocketAddr,
    /// OpenAPI Connect V1 ingest socket.
    pub openapi_addr: SocketAddr,
    /// HTTP status API and shot feed.
    pub http_addr: SocketAddr,
    pub db_path: String,
    pub left_handed: bool,
    pub openapi_handshake: bool,
    pub openapi_game_id: String,
    /// Capacity of the live shot feed; slow subscribers past this lag.
    pub feed_capacity: usize,
}

fn parse_addr(key: &'static str, value: Option<String>, default: &str) -> Result<SocketAddr, ConfigError> {
    let raw = value.unwrap_or_else(|| default.to_string());
    raw.parse()
        .map_err(|_| ConfigError::InvalidAddress { key, value: raw })
}

fn parse_bool(key: &'static str, value: Option<String>, default: bool) -> Result<bool, ConfigError> {
    match value {
        None => Ok(default),
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidBool { key, value: raw }),
        },
    }
}

fn parse_usize(key: &'static str, value: Option<String>, default: usize) -> Result<usize, ConfigError> {
    match value {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<usize>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(ConfigError::InvalidNumber { key, value: raw }),
        },
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            shot_server_addr: parse_addr(
                "SHOT_SERVER_ADDR",
                lookup("SHOT_SERVER_ADDR"),
                DEFAULT_SHOT_SERVER_ADDR,
            )?,
            openapi_addr: parse_addr("OPENAPI_ADDR", lookup("OPENAPI_ADDR"), DEFAULT_OPENAPI_ADDR)?,
            http_addr: parse_addr("HTTP_ADDR", lookup("HTTP_ADDR"), DEFAULT_HTTP_ADDR)?,
            db_path: lookup("SHOT_DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.to_string()),
            left_handed: parse_bool("LEFT_HANDED", lookup("LEFT_HANDED"), false)?,
            openapi_handshake: parse_bool("OPENAPI_HANDSHAKE", lookup("OPENAPI_HANDSHAKE"), true)?,
            openapi_game_id: lookup("OPENAPI_GAME_ID").unwrap_or_else(|| DEFAULT_GAME_ID.to_string()),
            feed_capacity: parse_usize("SHOT_FEED_CAPACITY", lookup("SHOT_FEED_CAPACITY"), 256)?,
        })
    }
}
