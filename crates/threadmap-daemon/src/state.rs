//! Application state and reactive publishing

use chrono::{DateTime, Utc};
use std::sync::Arc;
use threadmap_core::Topology;
use threadmap_otbr::OtbrClient;
use tokio::sync::{broadcast, watch};
use tracing::debug;

use crate::config::{Config, Inventory};

/// The published view of the last refresh.
///
/// Replaced wholesale on every successful cycle; a failed cycle only flips
/// `stale` so subscribers keep the last good topology.
#[derive(Debug, Clone, Default)]
pub struct TopologySnapshot {
    pub topology: Option<Arc<Topology>>,
    pub stale: bool,
    pub last_updated: Option<DateTime<Utc>>,
}

/// Refresh event for subscribers.
#[derive(Debug, Clone)]
pub enum RefreshEvent {
    /// A refresh cycle completed and a new topology was published
    Updated { nodes: usize, devices: usize },
    /// A refresh cycle was aborted; the previous topology is stale
    Failed(String),
}

/// Shared application state
pub struct AppState {
    /// Reusable border router client
    pub client: OtbrClient,
    /// Paired devices and known routers, loaded once at startup
    pub inventory: Inventory,
    /// Configuration
    pub config: Config,
    snapshot_tx: watch::Sender<TopologySnapshot>,
    events: broadcast::Sender<RefreshEvent>,
}

impl AppState {
    pub fn new(config: Config, client: OtbrClient, inventory: Inventory) -> Arc<Self> {
        let (snapshot_tx, _) = watch::channel(TopologySnapshot::default());
        let (events, _) = broadcast::channel(16);
        Arc::new(Self {
            client,
            inventory,
            config,
            snapshot_tx,
            events,
        })
    }

    /// Publish a freshly built topology.
    pub fn publish(&self, topology: Topology) {
        let event = RefreshEvent::Updated {
            nodes: topology.nodes.len(),
            devices: topology.total_devices,
        };
        self.snapshot_tx.send_replace(TopologySnapshot {
            topology: Some(Arc::new(topology)),
            stale: false,
            last_updated: Some(Utc::now()),
        });
        let _ = self.events.send(event);
        debug!("Published topology snapshot");
    }

    /// Mark the current snapshot stale after a failed refresh.
    pub fn mark_stale(&self, reason: String) {
        self.snapshot_tx.send_modify(|snapshot| {
            snapshot.stale = true;
        });
        let _ = self.events.send(RefreshEvent::Failed(reason));
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> TopologySnapshot {
        self.snapshot_tx.borrow().clone()
    }

    /// Watch the snapshot for changes.
    pub fn watch(&self) -> watch::Receiver<TopologySnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Subscribe to refresh events.
    pub fn subscribe(&self) -> broadcast::Receiver<RefreshEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use threadmap_core::NodeSummary;

    fn test_state() -> Arc<AppState> {
        let config = Config::default();
        let client = OtbrClient::new("http://otbr.local:8081", Duration::from_secs(1)).unwrap();
        AppState::new(config, client, Inventory::default())
    }

    fn test_topology(name: &str) -> Topology {
        let node = NodeSummary {
            network_name: name.to_string(),
            ..Default::default()
        };
        Topology::build(&node, &[], &[], &[])
    }

    #[test]
    fn test_publish_replaces_snapshot() {
        let state = test_state();
        assert!(state.snapshot().topology.is_none());

        state.publish(test_topology("mesh-a"));
        let snapshot = state.snapshot();
        assert_eq!(snapshot.topology.unwrap().network_name, "mesh-a");
        assert!(!snapshot.stale);
        assert!(snapshot.last_updated.is_some());

        state.publish(test_topology("mesh-b"));
        assert_eq!(state.snapshot().topology.unwrap().network_name, "mesh-b");
    }

    #[test]
    fn test_failure_keeps_last_topology_and_marks_stale() {
        let state = test_state();
        state.publish(test_topology("mesh-a"));
        state.mark_stale("connection refused".to_string());

        let snapshot = state.snapshot();
        assert!(snapshot.stale);
        assert_eq!(snapshot.topology.unwrap().network_name, "mesh-a");
    }

    #[tokio::test]
    async fn test_events_delivered_to_subscribers() {
        let state = test_state();
        let mut rx = state.subscribe();

        state.publish(test_topology("mesh-a"));
        match rx.recv().await.unwrap() {
            RefreshEvent::Updated { nodes, devices } => {
                assert_eq!(nodes, 0);
                assert_eq!(devices, 0);
            }
            other => panic!("unexpected event: {other:?}"),
        }

        state.mark_stale("timeout".to_string());
        match rx.recv().await.unwrap() {
            RefreshEvent::Failed(reason) => assert_eq!(reason, "timeout"),
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
