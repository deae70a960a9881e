pub mod host;
pub mod list;

pub use host::handle_host_command;
pub use list::handle_list_command;

use tracing::debug;

use crate::api::ProxmoxClient;
use crate::cli::{Cli, Mode};
use crate::config::Config;
use crate::error::Result;

/// Resolve the node, connect, and run the selected mode.
pub fn run(cli: &Cli, config: &Config) -> Result<()> {
    let node_path = config.node_path()?;
    let client = ProxmoxClient::connect(&config.credentials)?;
    debug!(node_path = %node_path, host = %config.credentials.hostname, "connected");

    match cli.mode() {
        Mode::List => handle_list_command(&client, &node_path, &config.inventory, cli.format),
        Mode::Host(name) => handle_host_command(&client, &node_path, name, &config.inventory, cli.format),
    }
}
