use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::api::ApiClient;
use crate::error::{InventoryError, Result};
use crate::inventory::types::VmListEntry;

/// List the ids of all non-template VMs on a node, in API order.
pub fn list_vm_ids(client: &dyn ApiClient, node_path: &str) -> Result<Vec<u64>> {
    let path = format!("{}/qemu", node_path);
    let data = client.get(&path)?;
    if data.is_null() {
        return Err(InventoryError::EmptyResult(format!("{} returned no data", path)));
    }

    let entries: Vec<VmListEntry> = decode(&path, data)?;
    let total = entries.len();
    let ids: Vec<u64> = entries
        .into_iter()
        .filter(|vm| !vm.is_template())
        .map(|vm| vm.vmid)
        .collect();

    debug!(total, kept = ids.len(), "enumerated VMs");
    Ok(ids)
}

pub(crate) fn decode<T: DeserializeOwned>(path: &str, data: Value) -> Result<T> {
    serde_json::from_value(data).map_err(|e| InventoryError::malformed(path, e.to_string()))
}
