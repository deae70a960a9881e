use std::path::PathBuf;

use clap::{ArgAction, ArgGroup, Parser};

use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "proxmox-inventory")]
#[command(about = "Dynamic Ansible inventory for the VMs of a Proxmox VE node")]
#[command(group(ArgGroup::new("mode").required(true).args(["list", "host"])))]
pub struct Cli {
    /// Print the full inventory
    #[arg(long)]
    pub list: bool,

    /// Print the variables of a single host
    #[arg(long, value_name = "NAME")]
    pub host: Option<String>,

    /// Path to the YAML config file
    #[arg(short, long, env = "PROXMOX_INVENTORY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format (json or yaml)
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Increase log verbosity on stderr (-v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Mode<'a> {
    List,
    Host(&'a str),
}

impl Cli {
    pub fn mode(&self) -> Mode<'_> {
        match &self.host {
            Some(name) => Mode::Host(name),
            None => Mode::List,
        }
    }
}
