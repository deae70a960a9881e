use serde_json::Value;
use tracing::{debug, warn};

use crate::api::ApiClient;
use crate::config::{AgentErrorPolicy, InventorySettings};
use crate::error::Result;
use crate::inventory::enumerate::decode;
use crate::inventory::types::{
    AgentInterface, AgentOsInfo, AgentResponse, VmConfig, VmRecord, VmStatus, GUEST_GROUP, META_KEY,
};

const LOOPBACK: &str = "lo";
const IPV4: &str = "ipv4";
const RUNNING: &str = "running";

/// What the guest agent told us about a VM.
#[derive(Debug, Default, PartialEq)]
struct AgentData {
    os_name: Option<String>,
    ip: Option<String>,
}

/// Fetch status, config and (for running, agent-enabled VMs) guest-agent
/// data for one VM and derive its inventory record.
pub fn collect_vm_info(
    client: &dyn ApiClient,
    node_path: &str,
    vmid: u64,
    settings: &InventorySettings,
) -> Result<VmRecord> {
    let prefix = format!("{}/qemu/{}", node_path, vmid);

    let status_path = format!("{}/status/current", prefix);
    let status: VmStatus = decode(&status_path, client.get(&status_path)?)?;

    let config_path = format!("{}/config", prefix);
    let config: VmConfig = decode(&config_path, client.get(&config_path)?)?;

    let mut groups = Vec::new();
    for group in description_groups(config.description.as_deref()) {
        push_unique(&mut groups, group);
    }
    push_unique(&mut groups, GUEST_GROUP.to_string());
    push_unique(&mut groups, capitalize(&status.status));

    let mut ip = None;
    if status.status == RUNNING && agent_enabled(config.agent.as_ref()) {
        match fetch_agent_data(client, &prefix) {
            Ok(agent) => {
                if settings.os_groups {
                    if let Some(os_name) = agent.os_name {
                        push_unique(&mut groups, os_name);
                    }
                }
                ip = agent.ip;
            }
            Err(e) if settings.agent_errors == AgentErrorPolicy::Skip => {
                warn!(vmid, name = %status.name, error = %e, "guest agent query failed, keeping VM without agent data");
            }
            Err(e) => return Err(e),
        }
    }

    debug!(vmid, name = %status.name, status = %status.status, ?ip, ?groups, "collected VM");

    Ok(VmRecord {
        vmid,
        name: status.name,
        status: status.status,
        ip,
        groups,
    })
}

fn fetch_agent_data(client: &dyn ApiClient, prefix: &str) -> Result<AgentData> {
    let os_path = format!("{}/agent/get-osinfo", prefix);
    let os_name = match client.get(&os_path)? {
        Value::Null => None,
        data => decode::<AgentResponse<AgentOsInfo>>(&os_path, data)?.result.name,
    }
    .filter(|name| !name.is_empty());

    let net_path = format!("{}/agent/network-get-interfaces", prefix);
    let interfaces = match client.get(&net_path)? {
        Value::Null => Vec::new(),
        data => decode::<AgentResponse<Vec<AgentInterface>>>(&net_path, data)?.result,
    };

    Ok(AgentData {
        os_name,
        ip: first_ipv4(&interfaces),
    })
}

/// Groups listed in a JSON description such as `{"groups": ["web"]}`.
/// Anything that is not such an object yields no groups.
pub fn description_groups(description: Option<&str>) -> Vec<String> {
    let Some(raw) = description else {
        return Vec::new();
    };
    let parsed: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            debug!(error = %e, "description is not JSON, ignoring");
            return Vec::new();
        }
    };

    parsed
        .get("groups")
        .and_then(Value::as_array)
        .map(|groups| {
            groups
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Interpret the `agent` config value, which is either a plain flag or a
/// property string like `enabled=1,fstrim_cloned_disks=1`.
pub fn agent_enabled(agent: Option<&Value>) -> bool {
    match agent {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
        Some(Value::String(s)) => {
            let mut enabled = false;
            for part in s.split(',').map(str::trim) {
                match part.split_once('=') {
                    Some(("enabled", value)) => enabled = is_truthy(value),
                    Some(_) => {}
                    None => enabled = is_truthy(part),
                }
            }
            enabled
        }
        _ => false,
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "yes" | "on" | "true")
}

/// First IPv4 address in interface order, skipping loopback and interfaces
/// without addresses.
pub fn first_ipv4(interfaces: &[AgentInterface]) -> Option<String> {
    interfaces
        .iter()
        .filter(|iface| iface.name != LOOPBACK)
        .filter_map(|iface| iface.ip_addresses.as_ref())
        .flatten()
        .find(|addr| addr.ip_address_type == IPV4)
        .map(|addr| addr.ip_address.clone())
}

pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Empty names and `_meta` are never groups: the latter is the host-variable key.
fn push_unique(groups: &mut Vec<String>, group: String) {
    if group.is_empty() || group == META_KEY {
        debug!(group = %group, "dropping reserved group name");
        return;
    }
    if !groups.contains(&group) {
        groups.push(group);
    }
}
