// Inventory pipeline: enumerate -> collect -> aggregate
pub mod types;
pub mod enumerate;
pub mod collect_vm;
pub mod aggregate;

pub use aggregate::aggregate;
pub use collect_vm::collect_vm_info;
pub use enumerate::list_vm_ids;
pub use types::{InventoryResult, VmRecord};

use tracing::{debug, info};

use crate::api::ApiClient;
use crate::config::InventorySettings;
use crate::error::{InventoryError, Result};

/// Run the whole pipeline for one node.
pub fn build_inventory(
    client: &dyn ApiClient,
    node_path: &str,
    settings: &InventorySettings,
) -> Result<InventoryResult> {
    let vmids = list_vm_ids(client, node_path)?;

    let mut records = Vec::with_capacity(vmids.len());
    for vmid in vmids {
        records.push(collect_vm_info(client, node_path, vmid, settings)?);
    }

    if records.is_empty() {
        return Err(InventoryError::EmptyResult(format!("no VMs found on {}", node_path)));
    }

    let inventory = aggregate(&records);
    info!(
        hosts = inventory.meta.hostvars.len(),
        groups = inventory.groups.len(),
        "inventory built"
    );
    Ok(inventory)
}

/// Collect the record of the first VM named `name`, stopping as soon as it
/// is found.
pub fn find_host(
    client: &dyn ApiClient,
    node_path: &str,
    name: &str,
    settings: &InventorySettings,
) -> Result<VmRecord> {
    for vmid in list_vm_ids(client, node_path)? {
        let record = collect_vm_info(client, node_path, vmid, settings)?;
        if record.name == name {
            return Ok(record);
        }
        debug!(vmid, name = %record.name, "not the requested host");
    }
    Err(InventoryError::HostNotFound(name.to_string()))
}
