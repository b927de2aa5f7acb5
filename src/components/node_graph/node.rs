use rand::Rng;

use super::config::{PointerConfig, SimConfig};
use super::types::{NodeFilter, NodeKind, NodeRecord};

pub const INVISIBLE_OPACITY: f64 = 0.1;
pub const INVISIBLE_SCALE: f64 = 0.5;

/// Stable handle of a live node. Never reused within one simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

#[derive(Clone, Debug)]
pub struct Node {
	id: NodeId,
	record: NodeRecord,
	search_text: String,
	color: &'static str,
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	pub base_size: f64,
	pub current_radius: f64,
	pub target_radius: f64,
	pub current_opacity: f64,
	pub target_opacity: f64,
	pub hovered: bool,
}

impl Node {
	/// A node at rest at `(x, y)`, invisible and growing towards `base_size`.
	pub fn new(id: NodeId, record: NodeRecord, x: f64, y: f64, base_size: f64) -> Self {
		let search_text = record.search_text();
		let color = record.kind.color();
		Self {
			id,
			record,
			search_text,
			color,
			x,
			y,
			vx: 0.0,
			vy: 0.0,
			base_size,
			current_radius: 0.0,
			target_radius: base_size,
			current_opacity: 0.0,
			target_opacity: 1.0,
			hovered: false,
		}
	}

	/// Random position inside the viewport and a random drift velocity.
	pub fn scattered(
		id: NodeId,
		record: NodeRecord,
		cfg: &SimConfig,
		width: f64,
		height: f64,
		rng: &mut impl Rng,
	) -> Self {
		let size = if cfg.size_jitter > 0.0 {
			cfg.node_size + rng.random_range(0.0..cfg.size_jitter)
		} else {
			cfg.node_size
		};
		let mut node = Self::new(
			id,
			record,
			rng.random_range(0.0..=width.max(0.0)),
			rng.random_range(0.0..=height.max(0.0)),
			size,
		);
		node.vx = (rng.random_range(0.0..1.0) - 0.5) * cfg.velocity_spread;
		node.vy = (rng.random_range(0.0..1.0) - 0.5) * cfg.velocity_spread;
		node
	}

	pub fn id(&self) -> NodeId {
		self.id
	}

	pub fn record(&self) -> &NodeRecord {
		&self.record
	}

	pub fn kind(&self) -> NodeKind {
		self.record.kind
	}

	pub fn color(&self) -> &'static str {
		self.color
	}

	pub fn set_color(&mut self, color: &'static str) {
		self.color = color;
	}

	/// Euler step with reflective walls. The node may sit up to one step
	/// outside the viewport before the reversed velocity brings it back.
	pub fn advance(&mut self, width: f64, height: f64) {
		self.x += self.vx;
		self.y += self.vy;

		if self.x < 0.0 || self.x > width {
			self.vx = -self.vx;
		}
		if self.y < 0.0 || self.y > height {
			self.vy = -self.vy;
		}
	}

	pub fn clamp_speed(&mut self, max_speed: f64) {
		let speed = (self.vx * self.vx + self.vy * self.vy).sqrt();
		if speed > max_speed {
			self.vx = self.vx / speed * max_speed;
			self.vy = self.vy / speed * max_speed;
		}
	}

	pub fn distance_to(&self, x: f64, y: f64) -> f64 {
		let (dx, dy) = (x - self.x, y - self.y);
		(dx * dx + dy * dy).sqrt()
	}

	/// Updates `hovered` and pushes the node away from the pointer.
	pub fn apply_pointer(&mut self, pointer: Option<(f64, f64)>, cfg: &PointerConfig) {
		let Some((px, py)) = pointer else {
			self.hovered = false;
			return;
		};
		let dist = self.distance_to(px, py);
		self.hovered = dist < cfg.hover_radius;

		if cfg.repel_strength > 0.0 && dist < cfg.repel_radius {
			let angle = (py - self.y).atan2(px - self.x);
			let force = (cfg.repel_radius - dist) / cfg.repel_radius * cfg.repel_strength;
			self.x -= angle.cos() * force;
			self.y -= angle.sin() * force;
		}
	}

	/// Pure function of the record and the current filter/search.
	/// `search` must already be lowercase.
	pub fn is_visible(&self, filter: NodeFilter, search: &str) -> bool {
		filter.matches(self.record.kind) && (search.is_empty() || self.search_text.contains(search))
	}

	pub fn resolve_targets(&mut self, visible: bool, emphasized: bool, hover_scale: f64) {
		if visible {
			self.target_opacity = 1.0;
			self.target_radius = if emphasized {
				self.base_size * hover_scale
			} else {
				self.base_size
			};
		} else {
			self.target_opacity = INVISIBLE_OPACITY;
			self.target_radius = self.base_size * INVISIBLE_SCALE;
		}
	}

	/// Moves the visual state a fraction of the way towards its targets.
	pub fn smooth(&mut self, radius_k: f64, opacity_k: f64) {
		self.current_radius += (self.target_radius - self.current_radius) * radius_k;
		self.current_opacity += (self.target_opacity - self.current_opacity) * opacity_k;
		self.current_radius = self.current_radius.max(0.0);
		self.current_opacity = self.current_opacity.clamp(0.0, 1.0);
	}
}
