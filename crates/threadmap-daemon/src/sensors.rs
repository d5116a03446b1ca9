//! Published state projections
//!
//! Pure projections over an already-built [`Topology`]: one aggregate
//! network state, one topology-map state carrying rendered markdown, and
//! one state object per mesh node. No new logic beyond formatting; these
//! are what external consumers read from `state_dir`.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;
use threadmap_core::{ChildKind, NodeRole, Topology, TopologyNode};

/// Aggregate network overview state.
#[derive(Debug, Clone, Serialize)]
pub struct NetworkSummaryState {
    /// State value: the network name
    pub value: String,
    pub state: String,
    pub router_count: u32,
    pub total_thread_devices: usize,
    pub matter_thread_devices: usize,
    pub matter_wifi_devices: usize,
    pub leader_address: String,
}

/// Topology-map state with a human-readable rendering.
#[derive(Debug, Clone, Serialize)]
pub struct TopologyMapState {
    /// State value: total device count
    pub value: usize,
    pub markdown: String,
}

/// Per-node state.
#[derive(Debug, Clone, Serialize)]
pub struct NodeState {
    pub ext_address: String,
    /// State value: link quality tier
    pub value: u8,
    pub unit: &'static str,
    pub rloc16: String,
    pub role: NodeRole,
    pub name: String,
    pub manufacturer: String,
    pub child_count: usize,
    pub leader_cost: u8,
    pub children: Vec<ChildState>,
    pub connections: Vec<threadmap_core::RouteLink>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChildState {
    pub rloc16: String,
    pub kind: ChildKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
}

/// Project the aggregate network state.
pub fn network_summary(topology: &Topology) -> NetworkSummaryState {
    NetworkSummaryState {
        value: topology.network_name.clone(),
        state: topology.state.clone(),
        router_count: topology.router_count,
        total_thread_devices: topology.total_devices,
        matter_thread_devices: topology.matter.thread.len(),
        matter_wifi_devices: topology.matter.wifi.len(),
        leader_address: topology.leader_address.clone(),
    }
}

/// Project the topology-map state, including the markdown rendering.
pub fn topology_map(topology: &Topology) -> TopologyMapState {
    TopologyMapState {
        value: topology.total_devices,
        markdown: topology_markdown(topology),
    }
}

/// Project one state object per mesh node.
pub fn node_states(topology: &Topology) -> Vec<NodeState> {
    topology
        .sorted_nodes()
        .into_iter()
        .map(|node| NodeState {
            ext_address: node.ext_address.clone(),
            value: node.link_quality,
            unit: "LQI",
            rloc16: format!("0x{:04X}", node.rloc16),
            role: node.role,
            name: node.name.clone(),
            manufacturer: node.manufacturer.clone(),
            child_count: node.child_count,
            leader_cost: node.leader_cost,
            children: node
                .children
                .iter()
                .map(|c| ChildState {
                    rloc16: format!("0x{:04X}", c.rloc16),
                    kind: c.kind,
                    name: c.device.as_ref().map(|d| d.name.clone()),
                    manufacturer: c.device.as_ref().and_then(|d| d.manufacturer.clone()),
                })
                .collect(),
            connections: node.connections.clone(),
        })
        .collect()
}

fn role_heading(node: &TopologyNode) -> (&'static str, &'static str) {
    match node.role {
        NodeRole::Leader => ("\u{1F451}", "Leader"),
        NodeRole::Router => ("\u{1F4E1}", "Router"),
        NodeRole::EndDevice => ("\u{1F4F1}", "End Device"),
    }
}

/// Render the topology as markdown, leader first.
pub fn topology_markdown(topology: &Topology) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "## \u{1F9F5} Thread Network: {}", topology.network_name);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "**Routers:** {} | **Thread Devices:** {}",
        topology.router_count, topology.total_devices
    );

    let thread_count = topology.matter.thread.len();
    let wifi_count = topology.matter.wifi.len();
    if thread_count > 0 || wifi_count > 0 {
        let _ = writeln!(out, "**Matter:** {thread_count} Thread + {wifi_count} WiFi");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "---");
    let _ = writeln!(out);

    for node in topology.sorted_nodes() {
        let (icon, label) = role_heading(node);
        let lq = node.link_quality.min(3) as usize;
        let lq_bar: String = "\u{2588}".repeat(lq) + &"\u{2591}".repeat(3 - lq);
        let lq_text = ["Poor", "Fair", "Good", "Excellent"][lq];

        let _ = writeln!(out, "### {icon} {}", node.name);
        if node.manufacturer.is_empty() {
            let _ = writeln!(out, "{label} \u{2022} LQ: [{lq_bar}] {lq_text}");
        } else {
            let _ = writeln!(
                out,
                "*{}* \u{2022} {label} \u{2022} LQ: [{lq_bar}] {lq_text}",
                node.manufacturer
            );
        }
        let _ = writeln!(out);

        for child in &node.children {
            let (child_icon, type_label) = match child.kind {
                ChildKind::Sleepy => ("\u{1F4A4}", "Sleepy End Device"),
                ChildKind::Active => ("\u{1F4F1}", "End Device"),
            };

            if let Some(device) = &child.device {
                let _ = writeln!(out, "   \u{2514}\u{2500} {child_icon} **{}**", device.name);
                let manufacturer = device.manufacturer.as_deref().unwrap_or("");
                let model = device.model.as_deref().unwrap_or("");
                if !manufacturer.is_empty() || !model.is_empty() {
                    let _ = writeln!(out, "       *{manufacturer}* {model}");
                }
            } else {
                let _ = writeln!(
                    out,
                    "   \u{2514}\u{2500} {child_icon} {type_label} (0x{:04X})",
                    child.rloc16
                );
            }
            let _ = writeln!(out);
        }
    }

    if !topology.matter.wifi.is_empty() {
        let _ = writeln!(out, "---");
        let _ = writeln!(out);
        let _ = writeln!(out, "### \u{1F4F6} Matter over WiFi");
        for device in &topology.matter.wifi {
            let _ = writeln!(
                out,
                "- **{}** ({})",
                device.name,
                device.manufacturer.as_deref().unwrap_or("")
            );
        }
        let _ = writeln!(out);
    }

    out
}

/// Write all state projections as JSON files under `dir`.
pub fn write_states(dir: &Path, topology: &Topology) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create state dir {}", dir.display()))?;

    let network = serde_json::to_vec_pretty(&network_summary(topology))?;
    std::fs::write(dir.join("network.json"), network)?;

    let map = serde_json::to_vec_pretty(&topology_map(topology))?;
    std::fs::write(dir.join("topology_map.json"), map)?;

    for node in node_states(topology) {
        let content = serde_json::to_vec_pretty(&node)?;
        std::fs::write(dir.join(format!("node_{}.json", node.ext_address)), content)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use threadmap_core::{
        ChildEntry, DiagnosticRecord, Mode, NodeSummary, PairedDevice, Transport,
    };

    fn sample_topology() -> Topology {
        let node = NodeSummary {
            ext_address: "LEADER01".to_string(),
            network_name: "home-mesh".to_string(),
            num_of_router: 2,
            state: "leader".to_string(),
        };
        let leader = DiagnosticRecord {
            ext_address: "LEADER01".to_string(),
            rloc16: 0x0400,
            mode: Mode {
                device_type: 1,
                rx_on_when_idle: 1,
            },
            ..Default::default()
        };
        let router = DiagnosticRecord {
            ext_address: "ROUTER01".to_string(),
            rloc16: 0x0800,
            mode: Mode {
                device_type: 1,
                rx_on_when_idle: 1,
            },
            child_table: vec![
                ChildEntry {
                    child_id: 1,
                    timeout: 240,
                    mode: Mode {
                        device_type: 0,
                        rx_on_when_idle: 0,
                    },
                },
                ChildEntry {
                    child_id: 2,
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let paired = vec![
            PairedDevice {
                name: "Door Sensor".to_string(),
                model: Some("SNZB-04".to_string()),
                manufacturer: Some("Sonoff".to_string()),
                identifiers: vec![],
                transport: Transport::Thread,
            },
            PairedDevice {
                name: "WiFi Plug".to_string(),
                model: None,
                manufacturer: Some("TP-Link".to_string()),
                identifiers: vec![],
                transport: Transport::Wifi,
            },
        ];
        Topology::build(&node, &[leader, router], &paired, &[])
    }

    #[test]
    fn test_network_summary() {
        let summary = network_summary(&sample_topology());
        assert_eq!(summary.value, "home-mesh");
        assert_eq!(summary.router_count, 2);
        assert_eq!(summary.total_thread_devices, 4);
        assert_eq!(summary.matter_thread_devices, 1);
        assert_eq!(summary.matter_wifi_devices, 1);
        assert_eq!(summary.leader_address, "LEADER01");
    }

    #[test]
    fn test_topology_map_value_is_device_count() {
        let map = topology_map(&sample_topology());
        assert_eq!(map.value, 4);
        assert!(!map.markdown.is_empty());
    }

    #[test]
    fn test_markdown_structure() {
        let md = topology_markdown(&sample_topology());
        assert!(md.starts_with("## \u{1F9F5} Thread Network: home-mesh"));
        assert!(md.contains("**Routers:** 2 | **Thread Devices:** 4"));
        assert!(md.contains("**Matter:** 1 Thread + 1 WiFi"));
        // Leader heading appears before the router heading
        let leader_pos = md.find("OTBR Host").unwrap();
        let router_pos = md.find("### \u{1F4E1}").unwrap();
        assert!(leader_pos < router_pos);
        // Matched child shows its device name; unmatched falls back to rloc
        assert!(md.contains("**Door Sensor**"));
        assert!(md.contains("End Device (0x0802)"));
        // Sleepy child gets the sleep icon
        assert!(md.contains("\u{1F4A4}"));
        // WiFi section lists the bridge device
        assert!(md.contains("### \u{1F4F6} Matter over WiFi"));
        assert!(md.contains("**WiFi Plug** (TP-Link)"));
    }

    #[test]
    fn test_node_states() {
        let states = node_states(&sample_topology());
        assert_eq!(states.len(), 2);
        // Leader first
        assert_eq!(states[0].ext_address, "LEADER01");
        assert_eq!(states[0].unit, "LQI");
        let router = &states[1];
        assert_eq!(router.rloc16, "0x0800");
        assert_eq!(router.child_count, 2);
        assert_eq!(router.children[0].name.as_deref(), Some("Door Sensor"));
        assert_eq!(router.children[1].name, None);
    }

    #[test]
    fn test_write_states() {
        let dir = tempfile::tempdir().unwrap();
        write_states(dir.path(), &sample_topology()).unwrap();

        assert!(dir.path().join("network.json").exists());
        assert!(dir.path().join("topology_map.json").exists());
        assert!(dir.path().join("node_LEADER01.json").exists());
        assert!(dir.path().join("node_ROUTER01.json").exists());

        let content = std::fs::read_to_string(dir.path().join("network.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["value"], "home-mesh");
    }
}
