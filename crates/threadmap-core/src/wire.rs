//! Wire types for the two OTBR REST documents
//!
//! These mirror the JSON shapes returned by the border router's `/node` and
//! `/diagnostics` endpoints. Every field carries a serde default so a
//! degenerate or truncated document still deserializes; the builder never
//! has to handle a missing field.

use serde::{Deserialize, Serialize};

/// Network-level summary from the `/node` endpoint.
///
/// Additional fields in the document are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeSummary {
    /// Extended (hardware) address of the border router's mesh node
    #[serde(rename = "ExtAddress", default)]
    pub ext_address: String,
    /// Thread network name
    #[serde(rename = "NetworkName", default)]
    pub network_name: String,
    /// Number of routers reported by the border router
    #[serde(rename = "NumOfRouter", default)]
    pub num_of_router: u32,
    /// Operational state of the node
    #[serde(rename = "State", default = "default_state")]
    pub state: String,
}

fn default_state() -> String {
    "unknown".to_string()
}

/// One per-node entry from the `/diagnostics` endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiagnosticRecord {
    /// Extended address, the stable per-device identifier
    #[serde(rename = "ExtAddress", default)]
    pub ext_address: String,
    /// Short routing locator; changes with network topology
    #[serde(rename = "Rloc16", default)]
    pub rloc16: u16,
    #[serde(rename = "Mode", default)]
    pub mode: Mode,
    #[serde(rename = "Connectivity", default)]
    pub connectivity: Connectivity,
    #[serde(rename = "ChildTable", default)]
    pub child_table: Vec<ChildEntry>,
    #[serde(rename = "Route", default)]
    pub route: Route,
    #[serde(rename = "IP6AddressList", default)]
    pub ip6_address_list: Vec<String>,
}

/// Device mode flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mode {
    /// 1 for router-capable devices, 0 for end devices
    #[serde(rename = "DeviceType", default)]
    pub device_type: u8,
    /// 0 means the device sleeps between polls
    #[serde(rename = "RxOnWhenIdle", default = "default_rx_on")]
    pub rx_on_when_idle: u8,
}

fn default_rx_on() -> u8 {
    1
}

impl Default for Mode {
    fn default() -> Self {
        Self {
            device_type: 0,
            rx_on_when_idle: default_rx_on(),
        }
    }
}

/// Neighbor connectivity counters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Connectivity {
    #[serde(rename = "LinkQuality1", default)]
    pub link_quality_1: u32,
    #[serde(rename = "LinkQuality2", default)]
    pub link_quality_2: u32,
    #[serde(rename = "LinkQuality3", default)]
    pub link_quality_3: u32,
    /// Path cost to the current leader
    #[serde(rename = "LeaderCost", default)]
    pub leader_cost: u8,
}

impl Connectivity {
    /// Reduce the three tier counters to a single quality value (0-3).
    ///
    /// The highest tier with a nonzero neighbor count wins; lower tiers are
    /// irrelevant once a higher one is populated. This is a priority
    /// reduction, not a sum.
    pub fn best_link_quality(&self) -> u8 {
        if self.link_quality_3 > 0 {
            3
        } else if self.link_quality_2 > 0 {
            2
        } else if self.link_quality_1 > 0 {
            1
        } else {
            0
        }
    }
}

/// Child table entry under a router.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChildEntry {
    #[serde(rename = "ChildId", default)]
    pub child_id: u16,
    #[serde(rename = "Timeout", default)]
    pub timeout: u32,
    #[serde(rename = "Mode", default)]
    pub mode: Mode,
}

/// Route table wrapper.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Route {
    #[serde(rename = "RouteData", default)]
    pub route_data: Vec<RouteEntry>,
}

/// One entry in a node's route table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteEntry {
    #[serde(rename = "RouteId", default)]
    pub route_id: u8,
    #[serde(rename = "LinkQualityIn", default)]
    pub link_quality_in: u8,
    #[serde(rename = "LinkQualityOut", default)]
    pub link_quality_out: u8,
    /// 255 is the unreachable sentinel
    #[serde(rename = "RouteCost", default = "default_route_cost")]
    pub route_cost: u8,
}

fn default_route_cost() -> u8 {
    255
}

impl Default for RouteEntry {
    fn default() -> Self {
        Self {
            route_id: 0,
            link_quality_in: 0,
            link_quality_out: 0,
            route_cost: default_route_cost(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_summary_defaults() {
        let node: NodeSummary = serde_json::from_str("{}").unwrap();
        assert_eq!(node.ext_address, "");
        assert_eq!(node.network_name, "");
        assert_eq!(node.num_of_router, 0);
        assert_eq!(node.state, "unknown");
    }

    #[test]
    fn test_node_summary_ignores_extra_fields() {
        let json = r#"{
            "ExtAddress": "AABBCCDDEEFF0011",
            "NetworkName": "home-mesh",
            "NumOfRouter": 3,
            "State": "leader",
            "Rloc16": 1024,
            "ExtPanId": "DEAD00BEEF00CAFE"
        }"#;
        let node: NodeSummary = serde_json::from_str(json).unwrap();
        assert_eq!(node.ext_address, "AABBCCDDEEFF0011");
        assert_eq!(node.network_name, "home-mesh");
        assert_eq!(node.num_of_router, 3);
        assert_eq!(node.state, "leader");
    }

    #[test]
    fn test_diagnostic_record_defaults() {
        let diag: DiagnosticRecord = serde_json::from_str("{}").unwrap();
        assert_eq!(diag.ext_address, "");
        assert_eq!(diag.rloc16, 0);
        assert_eq!(diag.mode.device_type, 0);
        // Default is receive-active, i.e. not sleepy
        assert_eq!(diag.mode.rx_on_when_idle, 1);
        assert!(diag.child_table.is_empty());
        assert!(diag.route.route_data.is_empty());
        assert!(diag.ip6_address_list.is_empty());
    }

    #[test]
    fn test_diagnostic_record_full() {
        let json = r#"{
            "ExtAddress": "1122334455667788",
            "Rloc16": 2048,
            "Mode": {"DeviceType": 1, "RxOnWhenIdle": 1},
            "Connectivity": {"LinkQuality3": 2, "LinkQuality2": 0, "LinkQuality1": 1, "LeaderCost": 2},
            "ChildTable": [{"ChildId": 5, "Timeout": 240, "Mode": {"RxOnWhenIdle": 0}}],
            "Route": {"RouteData": [{"RouteId": 10, "LinkQualityIn": 3, "LinkQualityOut": 3, "RouteCost": 1}]},
            "IP6AddressList": ["fd00::1", "fe80::1"]
        }"#;
        let diag: DiagnosticRecord = serde_json::from_str(json).unwrap();
        assert_eq!(diag.rloc16, 2048);
        assert_eq!(diag.mode.device_type, 1);
        assert_eq!(diag.child_table.len(), 1);
        assert_eq!(diag.child_table[0].child_id, 5);
        assert_eq!(diag.child_table[0].mode.rx_on_when_idle, 0);
        assert_eq!(diag.route.route_data[0].route_cost, 1);
        assert_eq!(diag.ip6_address_list.len(), 2);
    }

    #[test]
    fn test_route_cost_defaults_to_unreachable() {
        let entry: RouteEntry = serde_json::from_str(r#"{"RouteId": 4}"#).unwrap();
        assert_eq!(entry.route_cost, 255);
    }

    #[test]
    fn test_best_link_quality_priority() {
        let lq = |t3, t2, t1| Connectivity {
            link_quality_3: t3,
            link_quality_2: t2,
            link_quality_1: t1,
            leader_cost: 0,
        };
        assert_eq!(lq(1, 1, 1).best_link_quality(), 3);
        assert_eq!(lq(0, 1, 1).best_link_quality(), 2);
        assert_eq!(lq(0, 0, 1).best_link_quality(), 1);
        assert_eq!(lq(0, 0, 0).best_link_quality(), 0);
        // A populated lower tier never outranks a higher one
        assert_eq!(lq(1, 0, 9).best_link_quality(), 3);
    }
}
