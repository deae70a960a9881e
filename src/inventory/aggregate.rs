use crate::inventory::types::{HostVars, InventoryGroup, InventoryResult, VmRecord};

const ANSIBLE_HOST: &str = "ansible_host";

/// Fold VM records into groups and host variables. Group and host order
/// follows the order of `records`.
pub fn aggregate(records: &[VmRecord]) -> InventoryResult {
    let mut inventory = InventoryResult::default();

    for record in records {
        for group in &record.groups {
            match inventory.groups.iter_mut().find(|g| &g.name == group) {
                Some(existing) => existing.hosts.push(record.name.clone()),
                None => inventory.groups.push(InventoryGroup {
                    name: group.clone(),
                    hosts: vec![record.name.clone()],
                }),
            }
        }
        inventory.meta.hostvars.insert(record.name.clone(), host_vars(record));
    }

    inventory
}

/// `{ansible_host: ip}` when an address was resolved, otherwise empty.
pub fn host_vars(record: &VmRecord) -> HostVars {
    let mut vars = HostVars::new();
    if let Some(ip) = &record.ip {
        vars.insert(ANSIBLE_HOST.to_string(), ip.clone());
    }
    vars
}
