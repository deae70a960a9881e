use thiserror::Error;

pub type Result<T> = std::result::Result<T, InventoryError>;

#[derive(Error, Debug)]
pub enum InventoryError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Request to {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Proxmox API returned HTTP {status} for {path}: {body}")]
    Api {
        path: String,
        status: u16,
        body: String,
    },

    #[error("Malformed response from {path}: {msg}")]
    MalformedResponse { path: String, msg: String },

    #[error("Empty result: {0}")]
    EmptyResult(String),

    #[error("Host not found: {0}")]
    HostNotFound(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl InventoryError {
    pub fn malformed(path: &str, msg: impl Into<String>) -> Self {
        InventoryError::MalformedResponse {
            path: path.to_string(),
            msg: msg.into(),
        }
    }
}
