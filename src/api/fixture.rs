use std::cell::RefCell;
use std::collections::HashMap;

use serde_json::Value;

use super::ApiClient;
use crate::error::{InventoryError, Result};

/// Canned API responses keyed by path, recording every path requested.
#[derive(Default)]
pub struct FixtureClient {
    responses: HashMap<String, Value>,
    failures: HashMap<String, u16>,
    pub calls: RefCell<Vec<String>>,
}

impl FixtureClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: &str, data: Value) -> Self {
        self.responses.insert(path.to_string(), data);
        self
    }

    pub fn failing(mut self, path: &str, status: u16) -> Self {
        self.failures.insert(path.to_string(), status);
        self
    }

    pub fn was_called(&self, path: &str) -> bool {
        self.calls.borrow().iter().any(|p| p == path)
    }

    pub fn called_with_prefix(&self, prefix: &str) -> bool {
        self.calls.borrow().iter().any(|p| p.starts_with(prefix))
    }
}

impl ApiClient for FixtureClient {
    fn get(&self, path: &str) -> Result<Value> {
        self.calls.borrow_mut().push(path.to_string());
        if let Some(status) = self.failures.get(path) {
            return Err(InventoryError::Api {
                path: path.to_string(),
                status: *status,
                body: "fixture failure".to_string(),
            });
        }
        self.responses.get(path).cloned().ok_or_else(|| InventoryError::Api {
            path: path.to_string(),
            status: 404,
            body: "no fixture".to_string(),
        })
    }
}
