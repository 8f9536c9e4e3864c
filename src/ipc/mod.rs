//! Line-delimited JSON IPC between the presentation process and the store.
//!
//! Each input line is one [`Request`]; each output line is the matching
//! [`Response`], written in request order.

mod dispatch;
mod server;

pub use dispatch::dispatch;
pub use server::serve;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::commands::CommandError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub id: u64,
    pub channel: String,
    #[serde(default)]
    pub payload: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Echo of the request id; `None` when the line could not be parsed.
    pub id: Option<u64>,
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<CommandError>,
}

impl Response {
    pub fn success(id: u64, data: Value) -> Self {
        Self {
            id: Some(id),
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(id: Option<u64>, error: CommandError) -> Self {
        Self {
            id,
            ok: false,
            data: None,
            error: Some(error),
        }
    }
}
