use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{InventoryError, Result};

const CONFIG_DIR_NAME: &str = "proxmox-inventory";
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Runtime settings, loaded once at startup and passed down to every stage.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub node: Option<String>,
    pub credentials: Credentials,
    #[serde(default)]
    pub inventory: InventorySettings,
}

/// Connection parameters for the Proxmox API. Either `password` or the
/// `token_id`/`token_secret` pair must be set.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Credentials {
    pub hostname: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub username: String,
    #[serde(default = "default_realm")]
    pub realm: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub token_id: Option<String>,
    #[serde(default)]
    pub token_secret: Option<String>,
    #[serde(default = "default_true")]
    pub verify_tls: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InventorySettings {
    #[serde(default)]
    pub agent_errors: AgentErrorPolicy,
    #[serde(default = "default_true")]
    pub os_groups: bool,
}

impl Default for InventorySettings {
    fn default() -> Self {
        InventorySettings {
            agent_errors: AgentErrorPolicy::default(),
            os_groups: true,
        }
    }
}

/// What to do when a guest-agent call fails for a single VM.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentErrorPolicy {
    /// Abort the whole run.
    #[default]
    Fatal,
    /// Keep the VM without agent data and log a warning.
    Skip,
}

fn default_port() -> u16 {
    8006
}

fn default_realm() -> String {
    "pam".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|source| InventoryError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&raw)
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(raw)?;
        config.credentials.validate()?;
        Ok(config)
    }

    /// `<config dir>/proxmox-inventory/config.yaml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// API path of the configured node, e.g. `/nodes/pve1`.
    pub fn node_path(&self) -> Result<String> {
        match self.node.as_deref().map(str::trim) {
            Some(node) if !node.is_empty() => Ok(format!("/nodes/{}", node)),
            _ => Err(InventoryError::Configuration(
                "`node` is not defined in config".to_string(),
            )),
        }
    }
}

impl Credentials {
    fn validate(&self) -> Result<()> {
        let has_token = self.token_id.is_some() && self.token_secret.is_some();
        if self.token_id.is_some() != self.token_secret.is_some() {
            return Err(InventoryError::Configuration(
                "`token_id` and `token_secret` must be set together".to_string(),
            ));
        }
        if !has_token && self.password.is_none() {
            return Err(InventoryError::Configuration(
                "credentials need either `password` or `token_id`/`token_secret`".to_string(),
            ));
        }
        Ok(())
    }

    /// Full user id as Proxmox expects it, e.g. `root@pam`.
    pub fn user_id(&self) -> String {
        if self.username.contains('@') {
            self.username.clone()
        } else {
            format!("{}@{}", self.username, self.realm)
        }
    }

    pub fn base_url(&self) -> String {
        format!("https://{}:{}/api2/json", self.hostname, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
node: pve1
credentials:
  hostname: pve.example.com
  username: ansible
  realm: pve
  token_id: inventory
  token_secret: 00000000-aaaa-bbbb-cccc-000000000000
  verify_tls: false
inventory:
  agent_errors: skip
  os_groups: false
"#;

    #[test]
    fn test_full_config() {
        let config = Config::from_yaml(FULL).unwrap();
        assert_eq!(config.node_path().unwrap(), "/nodes/pve1");
        assert_eq!(config.credentials.port, 8006);
        assert_eq!(config.credentials.user_id(), "ansible@pve");
        assert_eq!(config.credentials.base_url(), "https://pve.example.com:8006/api2/json");
        assert!(!config.credentials.verify_tls);
        assert_eq!(config.inventory.agent_errors, AgentErrorPolicy::Skip);
        assert!(!config.inventory.os_groups);
    }

    #[test]
    fn test_defaults() {
        let raw = "node: pve1\ncredentials:\n  hostname: h\n  username: root\n  password: secret\n";
        let config = Config::from_yaml(raw).unwrap();
        assert_eq!(config.credentials.user_id(), "root@pam");
        assert!(config.credentials.verify_tls);
        assert_eq!(config.inventory.agent_errors, AgentErrorPolicy::Fatal);
        assert!(config.inventory.os_groups);
    }

    #[test]
    fn test_missing_node_is_configuration_error() {
        let raw = "credentials:\n  hostname: h\n  username: root\n  password: secret\n";
        let config = Config::from_yaml(raw).unwrap();
        assert!(matches!(config.node_path(), Err(InventoryError::Configuration(_))));
    }

    #[test]
    fn test_credentials_require_secret() {
        let raw = "node: pve1\ncredentials:\n  hostname: h\n  username: root\n";
        assert!(matches!(Config::from_yaml(raw), Err(InventoryError::Configuration(_))));

        let raw = "node: pve1\ncredentials:\n  hostname: h\n  username: root\n  token_id: x\n";
        assert!(matches!(Config::from_yaml(raw), Err(InventoryError::Configuration(_))));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let raw = "node: pve1\nnodes: pve2\ncredentials:\n  hostname: h\n  username: root\n  password: p\n";
        assert!(matches!(Config::from_yaml(raw), Err(InventoryError::Yaml(_))));
    }
}
