//! Configuration and inventory loading

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use threadmap_core::{classify_transport, KnownRouter, PairedDevice, Transport};
use tracing::info;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub daemon: DaemonConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub inventory: InventoryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Border router REST API base URL
    #[serde(default = "default_otbr_url")]
    pub otbr_url: String,
    /// Poll interval in seconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            otbr_url: default_otbr_url(),
            poll_interval_secs: default_poll_interval(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_otbr_url() -> String {
    "http://core-openthread-border-router:8081".to_string()
}

fn default_poll_interval() -> u64 {
    30
}

fn default_request_timeout() -> u64 {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Where the rendered SVG is written each cycle
    #[serde(default = "default_svg_path")]
    pub svg_path: String,
    /// Directory for published state JSON files (empty disables)
    #[serde(default = "default_state_dir")]
    pub state_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            svg_path: default_svg_path(),
            state_dir: default_state_dir(),
        }
    }
}

fn default_svg_path() -> String {
    "./thread-topology.svg".to_string()
}

fn default_state_dir() -> String {
    "./state".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryConfig {
    /// Path to the paired-device inventory file
    #[serde(default = "default_inventory_path")]
    pub path: String,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            path: default_inventory_path(),
        }
    }
}

fn default_inventory_path() -> String {
    "./devices.toml".to_string()
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    } else {
        info!(
            path = %path.display(),
            "Configuration file not found, using defaults"
        );
        Ok(Config::default())
    }
}

/// Save default configuration to file
pub fn save_default_config(path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(&Config::default())?;
    std::fs::write(path, content)?;
    Ok(())
}

/// On-disk shape of the paired-device inventory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct InventoryFile {
    #[serde(default, rename = "device")]
    devices: Vec<InventoryDevice>,
    #[serde(default, rename = "router")]
    routers: Vec<KnownRouter>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct InventoryDevice {
    name: String,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    manufacturer: Option<String>,
    #[serde(default)]
    identifiers: Vec<String>,
    /// Auto-classified from name/model/manufacturer when omitted
    #[serde(default)]
    transport: Option<Transport>,
}

/// The loaded device registry: paired devices plus known border routers.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    pub devices: Vec<PairedDevice>,
    pub routers: Vec<KnownRouter>,
}

/// Load the paired-device inventory. A missing file yields an empty
/// registry, not an error.
pub fn load_inventory(path: &Path) -> Result<Inventory> {
    if !path.exists() {
        info!(path = %path.display(), "Inventory file not found, using empty registry");
        return Ok(Inventory::default());
    }

    let content = std::fs::read_to_string(path)?;
    let file: InventoryFile = toml::from_str(&content)?;

    let devices = file
        .devices
        .into_iter()
        .map(|d| {
            let transport = d.transport.unwrap_or_else(|| {
                classify_transport(&d.name, d.model.as_deref(), d.manufacturer.as_deref())
            });
            PairedDevice {
                name: d.name,
                model: d.model,
                manufacturer: d.manufacturer,
                identifiers: d.identifiers,
                transport,
            }
        })
        .collect::<Vec<_>>();

    info!(
        path = %path.display(),
        devices = devices.len(),
        routers = file.routers.len(),
        "Loaded device inventory"
    );

    Ok(Inventory {
        devices,
        routers: file.routers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.daemon.poll_interval_secs, 30);
        assert_eq!(config.daemon.request_timeout_secs, 10);
        assert_eq!(config.output.svg_path, "./thread-topology.svg");
        assert_eq!(config.inventory.path, "./devices.toml");
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [daemon]
            otbr_url = "http://otbr.local:8081"
            "#,
        )
        .unwrap();
        assert_eq!(config.daemon.otbr_url, "http://otbr.local:8081");
        assert_eq!(config.daemon.poll_interval_secs, 30);
        assert_eq!(config.output.state_dir, "./state");
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let config = load_config(Path::new("/nonexistent/threadmap.toml")).unwrap();
        assert_eq!(config.daemon.poll_interval_secs, 30);
    }

    #[test]
    fn test_load_inventory_classifies_transport() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [[device]]
            name = "Door Sensor"
            model = "SNZB-04"
            manufacturer = "Sonoff"

            [[device]]
            name = "Smart Lock"
            manufacturer = "Nuki"

            [[device]]
            name = "Bulb"
            transport = "wifi"

            [[router]]
            name = "Living Room HomePod"
            manufacturer = "Apple"
            "#
        )
        .unwrap();

        let inventory = load_inventory(file.path()).unwrap();
        assert_eq!(inventory.devices.len(), 3);
        assert_eq!(inventory.devices[0].transport, Transport::Thread);
        // Bridge vendor forces wifi
        assert_eq!(inventory.devices[1].transport, Transport::Wifi);
        // Explicit transport wins over classification
        assert_eq!(inventory.devices[2].transport, Transport::Wifi);
        assert_eq!(inventory.routers.len(), 1);
        assert_eq!(inventory.routers[0].name, "Living Room HomePod");
    }

    #[test]
    fn test_missing_inventory_is_empty() {
        let inventory = load_inventory(Path::new("/nonexistent/devices.toml")).unwrap();
        assert!(inventory.devices.is_empty());
        assert!(inventory.routers.is_empty());
    }
}
