use crate::api::ApiClient;
use crate::config::InventorySettings;
use crate::error::Result;
use crate::inventory::build_inventory;
use crate::output::{output_data, OutputFormat};

pub fn handle_list_command(
    client: &dyn ApiClient,
    node_path: &str,
    settings: &InventorySettings,
    format: OutputFormat,
) -> Result<()> {
    let inventory = build_inventory(client, node_path, settings)?;
    output_data(&inventory, format)
}
