//! Topology reconciliation
//!
//! Builds the unified mesh topology from the two raw OTBR documents and the
//! paired-device inventory. The build is a pure transformation: a fresh
//! [`Topology`] is constructed wholesale on every refresh cycle and nothing
//! survives between invocations.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::identity::resolve_identity;
use crate::inventory::{KnownRouter, PairedDevice, Transport};
use crate::wire::{DiagnosticRecord, NodeSummary};

/// Role of a node in the mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeRole {
    /// Coordinates network-wide state; exactly one per healthy network
    Leader,
    Router,
    EndDevice,
}

/// Whether a child stays receive-active while idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChildKind {
    /// Sleeps between polls; the parent buffers traffic for it
    Sleepy,
    Active,
}

/// A child attached to a router, optionally matched to a paired device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChildNode {
    pub id: u16,
    pub kind: ChildKind,
    pub timeout: u32,
    /// Synthesized short address: parent rloc16 + child id
    pub rloc16: u16,
    /// Matched paired device, if the inventory pool had one left
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<PairedDevice>,
}

/// An outgoing route connection to a peer router.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteLink {
    pub router_id: u8,
    pub lq_in: u8,
    pub lq_out: u8,
    pub cost: u8,
}

/// One node in the reconciled topology, keyed by extended address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopologyNode {
    pub ext_address: String,
    pub rloc16: u16,
    pub role: NodeRole,
    pub name: String,
    pub manufacturer: String,
    pub device_type: String,
    pub icon: String,
    /// Best link-quality tier, 0-3
    pub link_quality: u8,
    pub leader_cost: u8,
    pub children: Vec<ChildNode>,
    /// Cached; always equals `children.len()`
    pub child_count: usize,
    pub connections: Vec<RouteLink>,
    pub ip_addresses: Vec<String>,
}

/// Paired-device registry summary, split by transport.
///
/// Reflects the full registry, independent of which devices got matched to
/// children.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatterSummary {
    pub thread: Vec<PairedDevice>,
    pub wifi: Vec<PairedDevice>,
    pub total: usize,
}

/// The reconciled mesh topology, rebuilt from scratch each refresh.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Topology {
    pub network_name: String,
    pub state: String,
    pub leader_address: String,
    pub router_count: u32,
    pub nodes: HashMap<String, TopologyNode>,
    /// Mesh nodes plus all attached children
    pub total_devices: usize,
    pub matter: MatterSummary,
    pub known_routers: Vec<KnownRouter>,
}

impl Topology {
    /// Reconcile the raw OTBR documents with the paired-device inventory.
    ///
    /// Never fails: missing or malformed optional fields were already
    /// defaulted at deserialization, and every classification step has a
    /// fallback. Records are processed in input order; the thread-transport
    /// device pool is consumed first-come-first-served across the whole
    /// record set, so a paired device is matched to at most one child.
    pub fn build(
        node: &NodeSummary,
        diagnostics: &[DiagnosticRecord],
        paired: &[PairedDevice],
        known_routers: &[KnownRouter],
    ) -> Self {
        let thread_devices: Vec<PairedDevice> = paired
            .iter()
            .filter(|d| d.transport == Transport::Thread)
            .cloned()
            .collect();
        let wifi_devices: Vec<PairedDevice> = paired
            .iter()
            .filter(|d| d.transport == Transport::Wifi)
            .cloned()
            .collect();

        let mut nodes: HashMap<String, TopologyNode> = HashMap::new();
        // Cursor into the thread pool, shared across all records
        let mut device_cursor = 0usize;
        // Running leader/router count, drives generic name cycling
        let mut router_index = 0usize;

        for diag in diagnostics {
            let is_leader = diag.ext_address == node.ext_address;
            let role = if is_leader {
                NodeRole::Leader
            } else if diag.mode.device_type == 1 {
                NodeRole::Router
            } else {
                NodeRole::EndDevice
            };

            let identity = resolve_identity(&diag.ext_address, is_leader, router_index);
            if matches!(role, NodeRole::Leader | NodeRole::Router) {
                router_index += 1;
            }

            let mut children = Vec::with_capacity(diag.child_table.len());
            for child in &diag.child_table {
                let kind = if child.mode.rx_on_when_idle == 0 {
                    ChildKind::Sleepy
                } else {
                    ChildKind::Active
                };

                let device = if device_cursor < thread_devices.len() {
                    let matched = thread_devices[device_cursor].clone();
                    device_cursor += 1;
                    Some(matched)
                } else {
                    None
                };

                children.push(ChildNode {
                    id: child.child_id,
                    kind,
                    timeout: child.timeout,
                    rloc16: diag.rloc16.wrapping_add(child.child_id),
                    device,
                });
            }

            let connections = diag
                .route
                .route_data
                .iter()
                .filter(|rd| rd.route_cost < 255)
                .map(|rd| RouteLink {
                    router_id: rd.route_id,
                    lq_in: rd.link_quality_in,
                    lq_out: rd.link_quality_out,
                    cost: rd.route_cost,
                })
                .collect();

            let child_count = children.len();
            nodes.insert(
                diag.ext_address.clone(),
                TopologyNode {
                    ext_address: diag.ext_address.clone(),
                    rloc16: diag.rloc16,
                    role,
                    name: identity.name,
                    manufacturer: identity.manufacturer,
                    device_type: identity.device_type,
                    icon: identity.icon,
                    link_quality: diag.connectivity.best_link_quality(),
                    leader_cost: diag.connectivity.leader_cost,
                    children,
                    child_count,
                    connections,
                    ip_addresses: diag.ip6_address_list.clone(),
                },
            );
        }

        let total_devices = nodes.len() + nodes.values().map(|n| n.child_count).sum::<usize>();

        Topology {
            network_name: node.network_name.clone(),
            state: node.state.clone(),
            leader_address: node.ext_address.clone(),
            router_count: node.num_of_router,
            nodes,
            total_devices,
            matter: MatterSummary {
                total: thread_devices.len() + wifi_devices.len(),
                thread: thread_devices,
                wifi: wifi_devices,
            },
            known_routers: known_routers.to_vec(),
        }
    }

    /// The leader node, when one of the diagnostics records matched the
    /// summary's leader address.
    pub fn leader(&self) -> Option<&TopologyNode> {
        self.nodes.get(&self.leader_address)
    }

    /// Nodes sorted leader-first, then by short address. Gives the
    /// presentation layers a stable ordering over the address-keyed map.
    pub fn sorted_nodes(&self) -> Vec<&TopologyNode> {
        let mut nodes: Vec<&TopologyNode> = self.nodes.values().collect();
        nodes.sort_by_key(|n| (n.ext_address != self.leader_address, n.rloc16));
        nodes
    }
}
