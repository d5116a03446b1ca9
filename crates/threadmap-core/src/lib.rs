//! Threadmap Core - Thread mesh topology model and reconciliation
//!
//! This crate contains the pure heart of threadmap: the wire types for the
//! OTBR REST documents, the paired-device inventory model, the router
//! identity resolver, and the topology builder that reconciles all three
//! into a single immutable [`Topology`] per refresh cycle.

pub mod identity;
pub mod inventory;
pub mod topology;
pub mod wire;

pub use identity::{resolve_identity, RouterIdentity};
pub use inventory::{classify_transport, KnownRouter, PairedDevice, Transport};
pub use topology::{
    ChildKind, ChildNode, MatterSummary, NodeRole, RouteLink, Topology, TopologyNode,
};
pub use wire::{ChildEntry, Connectivity, DiagnosticRecord, Mode, NodeSummary, Route, RouteEntry};
