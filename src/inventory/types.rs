use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Group every inventoried VM belongs to.
pub const GUEST_GROUP: &str = "ProxmoxGuest";
/// Top-level key reserved for host variables in the inventory document.
pub const META_KEY: &str = "_meta";

/// Normalized view of one non-template VM.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VmRecord {
    pub vmid: u64,
    pub name: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    /// Ordered set: description groups, then the fixed tags, then the OS name.
    pub groups: Vec<String>,
}

pub type HostVars = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryGroup {
    #[serde(skip)]
    pub name: String,
    pub hosts: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InventoryMeta {
    pub hostvars: BTreeMap<String, HostVars>,
}

/// Aggregated inventory. Groups keep first-use order; serializes to the
/// `{"_meta": {...}, "<group>": {"hosts": [...]}}` document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryResult {
    pub groups: Vec<InventoryGroup>,
    pub meta: InventoryMeta,
}

#[cfg(test)]
impl InventoryResult {
    pub fn group(&self, name: &str) -> Option<&InventoryGroup> {
        self.groups.iter().find(|g| g.name == name)
    }
}

impl Serialize for InventoryResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len() + 1))?;
        map.serialize_entry(META_KEY, &self.meta)?;
        for group in &self.groups {
            map.serialize_entry(&group.name, group)?;
        }
        map.end()
    }
}

// Proxmox API payloads. Only the fields the inventory reads are declared.

/// Entry of `GET /nodes/{node}/qemu`.
#[derive(Debug, Deserialize)]
pub struct VmListEntry {
    pub vmid: u64,
    #[serde(default)]
    pub template: Option<Value>,
}

impl VmListEntry {
    pub fn is_template(&self) -> bool {
        match &self.template {
            Some(Value::Number(n)) => n.as_u64() == Some(1),
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s.trim() == "1",
            _ => false,
        }
    }
}

/// `GET /nodes/{node}/qemu/{vmid}/status/current`
#[derive(Debug, Deserialize)]
pub struct VmStatus {
    pub name: String,
    pub status: String,
}

/// `GET /nodes/{node}/qemu/{vmid}/config`
#[derive(Debug, Default, Deserialize)]
pub struct VmConfig {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub agent: Option<Value>,
}

/// Guest agent responses wrap their payload in `result`. A missing
/// `result` reads as an empty payload.
#[derive(Debug, Deserialize)]
pub struct AgentResponse<T> {
    #[serde(default)]
    pub result: T,
}

/// `GET .../agent/get-osinfo`
#[derive(Debug, Default, Deserialize)]
pub struct AgentOsInfo {
    #[serde(default)]
    pub name: Option<String>,
}

/// One entry of `GET .../agent/network-get-interfaces`
#[derive(Debug, Deserialize)]
pub struct AgentInterface {
    pub name: String,
    #[serde(rename = "ip-addresses", default)]
    pub ip_addresses: Option<Vec<AgentIpAddress>>,
}

#[derive(Debug, Deserialize)]
pub struct AgentIpAddress {
    #[serde(rename = "ip-address")]
    pub ip_address: String,
    #[serde(rename = "ip-address-type")]
    pub ip_address_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_template_flag_variants() {
        let cases = [
            (json!({"vmid": 1, "template": 1}), true),
            (json!({"vmid": 1, "template": "1"}), true),
            (json!({"vmid": 1, "template": true}), true),
            (json!({"vmid": 1, "template": 0}), false),
            (json!({"vmid": 1}), false),
        ];
        for (raw, expected) in cases {
            let entry: VmListEntry = serde_json::from_value(raw.clone()).unwrap();
            assert_eq!(entry.is_template(), expected, "{}", raw);
        }
    }

    #[test]
    fn test_empty_hostvars_serialize_as_object() {
        let mut meta = InventoryMeta::default();
        meta.hostvars.insert("vm100".to_string(), HostVars::new());
        let result = InventoryResult { groups: Vec::new(), meta };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value, json!({"_meta": {"hostvars": {"vm100": {}}}}));
    }

    #[test]
    fn test_meta_serialized_first() {
        let result = InventoryResult {
            groups: vec![InventoryGroup { name: "web".to_string(), hosts: vec!["vm100".to_string()] }],
            meta: InventoryMeta::default(),
        };
        let text = serde_json::to_string(&result).unwrap();
        assert_eq!(text, r#"{"_meta":{"hostvars":{}},"web":{"hosts":["vm100"]}}"#);
    }
}
