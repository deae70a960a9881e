use std::io::{self, Write};

use clap::ValueEnum;
use serde::Serialize;

use crate::error::Result;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty JSON, the format Ansible reads
    #[default]
    Json,
    /// YAML, for reading by hand
    Yaml,
}

pub fn render<T: Serialize>(data: &T, format: OutputFormat) -> Result<String> {
    let text = match format {
        OutputFormat::Json => serde_json::to_string_pretty(data)?,
        OutputFormat::Yaml => serde_yaml::to_string(data)?,
    };
    Ok(text)
}

/// Render fully before touching stdout so a failure never leaves partial output.
pub fn output_data<T: Serialize>(data: &T, format: OutputFormat) -> Result<()> {
    let text = render(data, format)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", text)
        .and_then(|_| stdout.flush())
        .map_err(|source| crate::error::InventoryError::Io {
            path: "<stdout>".to_string(),
            source,
        })
}

pub fn print_error(message: &str) {
    eprintln!("\x1b[31m❌ Error: {}\x1b[0m", message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::types::{InventoryGroup, InventoryMeta, InventoryResult};

    fn inventory() -> InventoryResult {
        let mut meta = InventoryMeta::default();
        meta.hostvars.insert("vm100".to_string(), Default::default());
        InventoryResult {
            groups: vec![InventoryGroup { name: "ProxmoxGuest".to_string(), hosts: vec!["vm100".to_string()] }],
            meta,
        }
    }

    #[test]
    fn test_render_json_pretty() {
        let text = render(&inventory(), OutputFormat::Json).unwrap();
        let expected = "{\n  \"_meta\": {\n    \"hostvars\": {\n      \"vm100\": {}\n    }\n  },\n  \"ProxmoxGuest\": {\n    \"hosts\": [\n      \"vm100\"\n    ]\n  }\n}";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_render_yaml() {
        let text = render(&inventory(), OutputFormat::Yaml).unwrap();
        assert!(text.starts_with("_meta:"));
        assert!(text.contains("ProxmoxGuest:"));
    }
}
