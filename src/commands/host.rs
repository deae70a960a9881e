use crate::api::ApiClient;
use crate::config::InventorySettings;
use crate::error::Result;
use crate::inventory::find_host;
use crate::output::{output_data, OutputFormat};

/// Print the record of one host, derived exactly as in the `--list` output.
pub fn handle_host_command(
    client: &dyn ApiClient,
    node_path: &str,
    name: &str,
    settings: &InventorySettings,
    format: OutputFormat,
) -> Result<()> {
    let record = find_host(client, node_path, name, settings)?;
    output_data(&record, format)
}
