//! SVG document generation

use std::fmt::Write;
use threadmap_core::{ChildKind, NodeRole, Topology, TopologyNode};

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 600.0;
const LEADER_Y: f64 = 100.0;
const ROUTER_Y: f64 = 280.0;
const CHILD_Y: f64 = 440.0;
const CHILD_SPACING: f64 = 70.0;

/// Horizontal spacing for the router row.
fn router_spacing(count: usize) -> f64 {
    (600.0 / (count as f64 + 1.0)).min(200.0)
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn role_color(role: NodeRole) -> &'static str {
    match role {
        NodeRole::Leader => "#f5a623",
        NodeRole::Router => "#4a90d9",
        NodeRole::EndDevice => "#7ed321",
    }
}

fn role_label(role: NodeRole) -> &'static str {
    match role {
        NodeRole::Leader => "Leader",
        NodeRole::Router => "Router",
        NodeRole::EndDevice => "End Device",
    }
}

fn draw_node(out: &mut String, node: &TopologyNode, x: f64, y: f64) {
    let _ = writeln!(
        out,
        r##"  <g class="node"><circle cx="{x:.1}" cy="{y:.1}" r="28" fill="{fill}" stroke="#333" stroke-width="2"/>"##,
        fill = role_color(node.role),
    );
    let _ = writeln!(
        out,
        r#"    <text x="{x:.1}" y="{ty:.1}" text-anchor="middle" font-size="12">{name}</text>"#,
        ty = y + 44.0,
        name = xml_escape(&node.name),
    );
    let _ = writeln!(
        out,
        r##"    <text x="{x:.1}" y="{ty:.1}" text-anchor="middle" font-size="10" fill="#666">{label} | LQ {lq}</text>"##,
        ty = y + 58.0,
        label = role_label(node.role),
        lq = node.link_quality,
    );
    let _ = writeln!(out, "  </g>");
}

fn draw_children(out: &mut String, node: &TopologyNode, parent_x: f64, parent_y: f64) {
    let count = node.children.len();
    if count == 0 {
        return;
    }

    let start_x = parent_x - CHILD_SPACING * (count as f64 - 1.0) / 2.0;
    for (i, child) in node.children.iter().enumerate() {
        let x = start_x + CHILD_SPACING * i as f64;
        let dash = match child.kind {
            ChildKind::Sleepy => r#" stroke-dasharray="4 3""#,
            ChildKind::Active => "",
        };
        let label = child
            .device
            .as_ref()
            .map(|d| d.name.clone())
            .unwrap_or_else(|| format!("0x{:04X}", child.rloc16));

        let _ = writeln!(
            out,
            r##"  <line x1="{parent_x:.1}" y1="{y1:.1}" x2="{x:.1}" y2="{y2:.1}" stroke="#999" stroke-width="1"/>"##,
            y1 = parent_y + 28.0,
            y2 = CHILD_Y - 16.0,
        );
        let _ = writeln!(
            out,
            r##"  <g class="child"><circle cx="{x:.1}" cy="{cy:.1}" r="16" fill="#fff" stroke="#7ed321" stroke-width="2"{dash}/>"##,
            cy = CHILD_Y,
        );
        let _ = writeln!(
            out,
            r#"    <text x="{x:.1}" y="{ty:.1}" text-anchor="middle" font-size="10">{label}</text>"#,
            ty = CHILD_Y + 32.0,
            label = xml_escape(&label),
        );
        let _ = writeln!(out, "  </g>");
    }
}

/// Render the topology as a standalone SVG document.
pub fn render_svg(topology: &Topology) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}">"#
    );
    let _ = writeln!(
        out,
        r##"  <rect width="{WIDTH}" height="{HEIGHT}" fill="#fafafa"/>"##
    );
    let _ = writeln!(
        out,
        r#"  <text x="{x:.1}" y="30" text-anchor="middle" font-size="18" font-weight="bold">Thread Network: {name}</text>"#,
        x = WIDTH / 2.0,
        name = xml_escape(&topology.network_name),
    );
    let _ = writeln!(
        out,
        r##"  <text x="{x:.1}" y="52" text-anchor="middle" font-size="12" fill="#666">{routers} routers | {total} devices | state: {state}</text>"##,
        x = WIDTH / 2.0,
        routers = topology.router_count,
        total = topology.total_devices,
        state = xml_escape(&topology.state),
    );

    let sorted = topology.sorted_nodes();
    let leader = sorted
        .first()
        .filter(|n| n.role == NodeRole::Leader)
        .copied();
    let row: Vec<&TopologyNode> = sorted
        .iter()
        .copied()
        .filter(|n| n.role != NodeRole::Leader)
        .collect();

    let leader_x = WIDTH / 2.0;
    let spacing = router_spacing(row.len());
    let start_x = leader_x - spacing * (row.len() as f64 - 1.0) / 2.0;

    // Edges first so nodes draw on top of them
    if leader.is_some() {
        for (i, _) in row.iter().enumerate() {
            let x = start_x + spacing * i as f64;
            let _ = writeln!(
                out,
                r##"  <line x1="{leader_x:.1}" y1="{y1:.1}" x2="{x:.1}" y2="{y2:.1}" stroke="#bbb" stroke-width="2"/>"##,
                y1 = LEADER_Y + 28.0,
                y2 = ROUTER_Y - 28.0,
            );
        }
    }

    if let Some(leader) = leader {
        draw_node(&mut out, leader, leader_x, LEADER_Y);
        draw_children(&mut out, leader, leader_x, LEADER_Y);
    }

    for (i, node) in row.iter().enumerate() {
        let x = start_x + spacing * i as f64;
        draw_node(&mut out, node, x, ROUTER_Y);
        draw_children(&mut out, node, x, ROUTER_Y);
    }

    let _ = writeln!(out, "</svg>");
    out
}
