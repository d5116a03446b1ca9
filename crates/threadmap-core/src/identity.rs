//! Router identity resolver
//!
//! Maps a mesh node's extended address and leadership flag to a friendly
//! vendor identity. The resolver is a pure, total function over an ordered
//! rule chain: leader rule, exact OUI-prefix lookup, substring fallback,
//! cyclic generic naming.

/// Resolved display identity for a mesh router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterIdentity {
    pub name: String,
    pub manufacturer: String,
    pub device_type: String,
    pub icon: String,
}

/// Known border-router OUI prefixes (first or last 3 octets of the
/// extended address), from the IEEE OUI database and observed devices.
/// Checked in order with exact string matching.
const KNOWN_ROUTER_OUIS: &[(&str, &str, &str, &str)] = &[
    // Apple (HomePod, Apple TV)
    ("28:6D:97", "Apple HomePod", "Apple", "homepod"),
    ("3C:22:FB", "Apple HomePod", "Apple", "homepod"),
    ("38:C9:86", "Apple TV", "Apple", "appletv"),
    ("D0:03:4B", "Apple HomePod", "Apple", "homepod"),
    ("F0:B3:EC", "Apple HomePod Mini", "Apple", "homepod"),
    ("64:B5:C6", "Apple Device", "Apple", "apple"),
    // Google/Nest
    ("18:D6:C7", "Google Nest Hub", "Google", "nest"),
    ("1C:F2:9A", "Google Nest", "Google", "nest"),
    ("20:DF:B9", "Google Nest WiFi", "Google", "nest"),
    ("48:D6:D5", "Google Nest Hub Max", "Google", "nest"),
    ("54:60:09", "Google Nest", "Google", "nest"),
    ("F4:F5:D8", "Google Nest", "Google", "nest"),
    ("F4:F5:E8", "Google Nest Mini", "Google", "nest"),
    // Amazon/Eero
    ("50:EC:50", "Eero Pro", "Amazon/Eero", "eero"),
    ("68:2A:2B", "Eero Pro 6", "Amazon/Eero", "eero"),
    ("70:3A:CB", "Eero", "Amazon/Eero", "eero"),
    ("F0:81:75", "Eero Pro 6E", "Amazon/Eero", "eero"),
    // Samsung SmartThings
    ("24:FC:E5", "SmartThings Hub", "Samsung", "smartthings"),
    ("28:6D:CD", "SmartThings Station", "Samsung", "smartthings"),
    ("D0:52:A8", "SmartThings Hub", "Samsung", "smartthings"),
    // Nanoleaf
    ("00:55:DA", "Nanoleaf Controller", "Nanoleaf", "nanoleaf"),
    // Silicon Labs (dev boards, dongles)
    ("04:CD:15", "Silicon Labs Device", "Silicon Labs", "chip"),
    ("58:8E:81", "Silicon Labs Device", "Silicon Labs", "chip"),
    ("84:2E:14", "Silicon Labs Device", "Silicon Labs", "chip"),
    // Nordic Semiconductor
    ("F8:F0:05", "Nordic Device", "Nordic Semiconductor", "chip"),
    // Espressif (ESP32-H2 etc.)
    ("34:85:18", "ESP32 Thread", "Espressif", "chip"),
    ("40:22:D8", "ESP32 Thread", "Espressif", "chip"),
];

/// Substring fallback rules for partial address matches. Order matters:
/// "EA17" must stay ahead of "EA" or the shorter rule shadows it.
/// TODO: collapse the overlapping "EA" entry once enough Eero addresses
/// have been sampled to confirm the "EA17" suffix is universal.
const ROUTER_PATTERNS: &[(&str, &str, &str)] = &[
    ("EA17", "Eero", "Amazon/Eero"),
    ("EA", "Eero", "Amazon/Eero"),
];

/// Generic identities cycled through when nothing else matches.
const GENERIC_ROUTERS: &[(&str, &str)] = &[
    ("Eero", "Amazon/Eero"),
    ("Google Nest", "Google"),
    ("Apple HomePod", "Apple"),
    ("SmartThings", "Samsung"),
    ("Thread Router", "Unknown"),
];

fn router_identity(name: &str, manufacturer: &str, icon: &str) -> RouterIdentity {
    RouterIdentity {
        name: name.to_string(),
        manufacturer: manufacturer.to_string(),
        device_type: "border_router".to_string(),
        icon: icon.to_string(),
    }
}

/// Format six hex characters as a colon-separated OUI prefix.
fn oui_format(hex: &str) -> String {
    format!("{}:{}:{}", &hex[0..2], &hex[2..4], &hex[4..6])
}

/// Resolve a router's display identity from its extended address.
///
/// `router_index` is the running count of leader/router records already
/// processed this cycle; it only affects the generic fallback. The function
/// is deterministic for identical arguments.
pub fn resolve_identity(ext_address: &str, is_leader: bool, router_index: usize) -> RouterIdentity {
    // The leader is the border router host itself, whatever its address
    if is_leader {
        return router_identity("OTBR Host", "OpenThread", "border-router");
    }

    let ext_upper = ext_address.to_uppercase();
    if ext_upper.is_ascii() && ext_upper.len() >= 6 {
        // Leading prefix first, then trailing; vendors burn the OUI into
        // either end depending on how the extended address was derived
        let ouis = [
            oui_format(&ext_upper[0..6]),
            oui_format(&ext_upper[ext_upper.len() - 6..]),
        ];
        for oui in &ouis {
            if let Some((_, name, manufacturer, icon)) = KNOWN_ROUTER_OUIS
                .iter()
                .find(|(prefix, ..)| *prefix == oui.as_str())
            {
                return router_identity(name, manufacturer, icon);
            }
        }
    }

    for (pattern, name, manufacturer) in ROUTER_PATTERNS {
        if ext_upper.contains(pattern) {
            return router_identity(name, manufacturer, "router");
        }
    }

    let (name, manufacturer) = GENERIC_ROUTERS[router_index % GENERIC_ROUTERS.len()];
    let name = if router_index > 0 {
        format!("{} #{}", name, router_index + 1)
    } else {
        name.to_string()
    };
    RouterIdentity {
        name,
        manufacturer: manufacturer.to_string(),
        device_type: "border_router".to_string(),
        icon: "router".to_string(),
    }
}
