use super::config::{EdgeParams, EdgeStyle};
use super::node::{Node, NodeId};
use super::types::NodeKind;

const FADING_RGB: &str = "120, 120, 120";
const LINK_RGB: &str = "0, 240, 255";
const FAINT_RGB: &str = "255, 255, 255";
const FAINT_ALPHA: f64 = 0.05;

/// Render-only connection between two nearby nodes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
	pub a: NodeId,
	pub b: NodeId,
	pub ax: f64,
	pub ay: f64,
	pub bx: f64,
	pub by: f64,
	/// `r, g, b` components for an `rgba()` stroke.
	pub rgb: &'static str,
	pub alpha: f64,
}

/// Slow global pulse applied to every edge, in `[0.6, 1.0]`.
pub fn breathe(time_ms: f64) -> f64 {
	0.8 + (time_ms * 0.002).sin() * 0.2
}

/// Every unordered pair of sufficiently opaque nodes closer than
/// `params.max_dist`, each pair emitted once with `a` preceding `b` in `nodes`.
pub fn compute_edges(nodes: &[Node], params: &EdgeParams, time_ms: f64) -> Vec<Edge> {
	let pulse = if params.breathing { breathe(time_ms) } else { 1.0 };
	let mut edges = Vec::new();

	for (i, a) in nodes.iter().enumerate() {
		if a.current_opacity < params.min_opacity {
			continue;
		}
		for b in &nodes[i + 1..] {
			if b.current_opacity < params.min_opacity {
				continue;
			}
			let dist = a.distance_to(b.x, b.y);
			if dist >= params.max_dist {
				continue;
			}
			let (rgb, alpha) = match params.style {
				EdgeStyle::Fading => (
					FADING_RGB,
					(1.0 - dist / params.max_dist)
						* params.base_alpha
						* pulse * a.current_opacity.min(b.current_opacity),
				),
				EdgeStyle::DataLinks if a.kind() != NodeKind::Noise && b.kind() != NodeKind::Noise => {
					(LINK_RGB, params.base_alpha * pulse)
				}
				EdgeStyle::DataLinks => (FAINT_RGB, FAINT_ALPHA * pulse),
			};
			edges.push(Edge {
				a: a.id(),
				b: b.id(),
				ax: a.x,
				ay: a.y,
				bx: b.x,
				by: b.y,
				rgb,
				alpha,
			});
		}
	}
	edges
}
