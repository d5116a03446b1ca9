//! Threadmap Render - vector-graphic topology summary
//!
//! Pure projection of a [`Topology`] into an SVG document: the leader
//! centered at the top, routers in an evenly spaced row beneath it, and
//! each parent's children arrayed below. No decision logic beyond layout
//! arithmetic lives here.

mod svg;

pub use svg::render_svg;
