//! Paired Matter device inventory
//!
//! The inventory is maintained outside the core (the daemon loads it from a
//! TOML file); the builder only consumes a flat list of records and never
//! mutates them.

use serde::{Deserialize, Serialize};

/// Transport a paired Matter device uses to reach the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// Matter over Thread (mesh)
    Thread,
    /// Matter over WiFi (local wireless, often via a bridge)
    Wifi,
}

/// A device from the paired-device registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairedDevice {
    pub name: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub manufacturer: Option<String>,
    /// Pairing-protocol identifiers, carried through verbatim
    #[serde(default)]
    pub identifiers: Vec<String>,
    pub transport: Transport,
}

/// A known border-router host from the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownRouter {
    pub name: String,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

/// Manufacturers whose Matter devices typically reach the fabric through a
/// WiFi bridge rather than Thread.
const WIFI_BRIDGE_VENDORS: &[&str] = &["nuki", "wemo", "lifx"];

/// Classify a paired device's transport from its registry metadata.
///
/// A wifi keyword in the model or name, or a known bridge vendor, forces
/// WiFi; everything else defaults to Thread.
pub fn classify_transport(name: &str, model: Option<&str>, manufacturer: Option<&str>) -> Transport {
    let name = name.to_lowercase();
    let model = model.unwrap_or("").to_lowercase();
    let manufacturer = manufacturer.unwrap_or("").to_lowercase();

    if model.contains("wifi") || name.contains("wifi") {
        Transport::Wifi
    } else if WIFI_BRIDGE_VENDORS.contains(&manufacturer.as_str()) {
        Transport::Wifi
    } else {
        Transport::Thread
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_defaults_to_thread() {
        assert_eq!(
            classify_transport("Hue Bulb", Some("LCA001"), Some("Signify")),
            Transport::Thread
        );
        assert_eq!(classify_transport("Sensor", None, None), Transport::Thread);
    }

    #[test]
    fn test_classify_wifi_keyword() {
        assert_eq!(
            classify_transport("Plug", Some("Smart WiFi Plug"), Some("TP-Link")),
            Transport::Wifi
        );
        assert_eq!(
            classify_transport("WiFi Doorbell", None, None),
            Transport::Wifi
        );
    }

    #[test]
    fn test_classify_bridge_vendor() {
        assert_eq!(
            classify_transport("Smart Lock", Some("4.0"), Some("Nuki")),
            Transport::Wifi
        );
        assert_eq!(
            classify_transport("Bulb", None, Some("LIFX")),
            Transport::Wifi
        );
    }

    #[test]
    fn test_transport_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Transport::Thread).unwrap(), "\"thread\"");
        assert_eq!(serde_json::to_string(&Transport::Wifi).unwrap(), "\"wifi\"");
    }
}
