// src/protocol/native.rs

//! Replies on the native shot socket. Every reply is one JSON line.

use serde_json::{json, Value};

use crate::error::CalcError;

/// Parses an incoming message, producing the reply to send if it is not JSON.
pub fn parse_request(message: &str) -> Result<Value, String> {
    serde_json::from_str(message).map_err(|e| error_reply(&format!("Invalid JSON: {}", e)))
}

pub fn error_reply(message: &str) -> String {
    format!("{}\n", json!({ "error": message }))
}

pub fn calculation_error_reply(error: &CalcError) -> String {
    error_reply(&format!("Calculation error: {}", error))
}

pub fn result_reply(result: &Value) -> String {
    format!("{}\n", result)
}
