//! Refresh cycle driver
//!
//! One cycle is two sequential fetches, a pure rebuild, publication, and
//! best-effort file outputs. Fetch failures abort the cycle before anything
//! is published; file-write failures never fail the cycle.

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use threadmap_core::Topology;
use threadmap_otbr::OtbrError;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::sensors;
use crate::state::AppState;

/// Run one refresh cycle.
///
/// Partial topologies are never published: either both fetches succeed and
/// a complete rebuild replaces the snapshot, or the previous snapshot is
/// kept and marked stale.
pub async fn refresh_once(state: &AppState) -> Result<(), OtbrError> {
    let node = state.client.fetch_node().await?;
    let diagnostics = state.client.fetch_diagnostics().await?;

    let topology = Topology::build(
        &node,
        &diagnostics,
        &state.inventory.devices,
        &state.inventory.routers,
    );

    info!(
        network = %topology.network_name,
        nodes = topology.nodes.len(),
        devices = topology.total_devices,
        "Refreshed topology"
    );

    write_outputs(state, &topology);
    state.publish(topology);
    Ok(())
}

/// Write the SVG and state files. Failures are logged and swallowed; the
/// topology is published regardless.
fn write_outputs(state: &AppState, topology: &Topology) {
    let svg_path = &state.config.output.svg_path;
    if !svg_path.is_empty() {
        let svg = threadmap_render::render_svg(topology);
        if let Err(e) = std::fs::write(svg_path, svg) {
            warn!(path = %svg_path, error = %e, "Failed to write topology SVG");
        } else {
            debug!(path = %svg_path, "Wrote topology SVG");
        }
    }

    let state_dir = &state.config.output.state_dir;
    if !state_dir.is_empty() {
        if let Err(e) = sensors::write_states(Path::new(state_dir), topology) {
            warn!(dir = %state_dir, error = %e, "Failed to write state files");
        }
    }
}

/// Drive refresh cycles on the configured interval until cancelled.
pub async fn run(state: Arc<AppState>) -> Result<()> {
    let mut ticker = interval(Duration::from_secs(state.config.daemon.poll_interval_secs));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(
        url = %state.client.base_url(),
        interval_secs = state.config.daemon.poll_interval_secs,
        "Poller started"
    );

    loop {
        ticker.tick().await;

        if let Err(e) = refresh_once(&state).await {
            warn!(error = %e, "Refresh failed, keeping previous topology");
            state.mark_stale(e.to_string());
        }
    }
}
