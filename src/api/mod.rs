// Proxmox VE REST API access
pub mod client;
#[cfg(test)]
pub mod fixture;

pub use client::ProxmoxClient;

use serde_json::Value;

use crate::error::{InventoryError, Result};

/// Read-only access to the Proxmox API.
///
/// `get` returns the `data` member of the response envelope, so callers only
/// ever see the payload.
pub trait ApiClient {
    fn get(&self, path: &str) -> Result<Value>;
}

/// Pull `data` out of a `{ "data": ... }` envelope.
pub fn unwrap_envelope(path: &str, mut body: Value) -> Result<Value> {
    match body.get_mut("data") {
        Some(data) => Ok(data.take()),
        None => Err(InventoryError::malformed(path, "response has no `data` member")),
    }
}
