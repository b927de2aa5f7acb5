use std::collections::HashSet;

use log::{debug, warn};
use rand::Rng;

use super::config::SimConfig;
use super::edges::{Edge, compute_edges};
use super::growth::{self, GrowthOutcome, GrowthPhase, PoolDraw};
use super::node::{Node, NodeId};
use super::types::{GrowthPool, NodeFilter, NodeKind, NodeRecord};

pub const RELATED_LIMIT: usize = 3;

/// A nearby node listed next to the selection.
#[derive(Clone, Debug, PartialEq)]
pub struct RelatedItem {
	pub id: NodeId,
	pub title: String,
	pub color: &'static str,
	pub distance: f64,
}

/// Everything the detail panel shows about the selected node.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectionView {
	pub id: NodeId,
	pub record: NodeRecord,
	pub color: &'static str,
	pub related: Vec<RelatedItem>,
}

pub struct SimulationState {
	pub config: SimConfig,
	nodes: Vec<Node>,
	next_id: u32,
	filter: NodeFilter,
	search: String,
	selected: Option<NodeId>,
	pointer: Option<(f64, f64)>,
	pool_exhausted: bool,
	pub width: f64,
	pub height: f64,
	pub time_ms: f64,
}

impl SimulationState {
	pub fn new(config: SimConfig, width: f64, height: f64) -> Self {
		Self {
			config,
			nodes: Vec::new(),
			next_id: 0,
			filter: NodeFilter::All,
			search: String::new(),
			selected: None,
			pointer: None,
			pool_exhausted: false,
			width,
			height,
			time_ms: 0.0,
		}
	}

	/// One node per record, scattered over the viewport.
	pub fn from_records(
		config: SimConfig,
		records: Vec<NodeRecord>,
		width: f64,
		height: f64,
		rng: &mut impl Rng,
	) -> Self {
		let mut state = Self::new(config, width, height);
		for record in records {
			state.add_record(record, rng);
		}
		state
	}

	pub fn add_record(&mut self, record: NodeRecord, rng: &mut impl Rng) -> NodeId {
		let id = NodeId(self.next_id);
		self.next_id += 1;
		let mut node = Node::scattered(id, record, &self.config, self.width, self.height, rng);
		if let Some(color) = self.config.data_color {
			if node.kind() != NodeKind::Noise {
				node.set_color(color);
			}
		}
		self.nodes.push(node);
		id
	}

	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	fn index_of(&self, id: NodeId) -> Option<usize> {
		// ids are handed out in push order
		self.nodes.binary_search_by_key(&id, Node::id).ok()
	}

	pub fn node(&self, id: NodeId) -> Option<&Node> {
		self.index_of(id).map(|idx| &self.nodes[idx])
	}

	pub fn filter(&self) -> NodeFilter {
		self.filter
	}

	pub fn search(&self) -> &str {
		&self.search
	}

	pub fn selected(&self) -> Option<NodeId> {
		self.selected
	}

	pub fn selected_node(&self) -> Option<&Node> {
		self.selected.and_then(|id| self.node(id))
	}

	pub fn pointer(&self) -> Option<(f64, f64)> {
		self.pointer
	}

	pub fn is_selected(&self, id: NodeId) -> bool {
		self.selected == Some(id)
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	fn clustering_active(&self) -> bool {
		self.config.clustering && self.filter == NodeFilter::All && self.search.is_empty()
	}

	/// Summed pull on node `i` from same-kind nodes in range. Only node `i`
	/// is affected; the partner gets its own pull when its turn comes.
	fn cluster_pull(&self, i: usize) -> (f64, f64) {
		let me = &self.nodes[i];
		let range_sq = self.config.cluster_range * self.config.cluster_range;
		let mut pull = (0.0, 0.0);
		for (j, other) in self.nodes.iter().enumerate() {
			if j == i || other.kind() != me.kind() {
				continue;
			}
			let (dx, dy) = (other.x - me.x, other.y - me.y);
			if dx * dx + dy * dy < range_sq {
				pull.0 += dx * self.config.attraction_force;
				pull.1 += dy * self.config.attraction_force;
			}
		}
		pull
	}

	/// Advances every node by one frame. Nodes are updated in order, so
	/// later nodes see the already-moved positions of earlier ones.
	pub fn tick(&mut self, time_ms: f64) {
		self.time_ms = time_ms;
		if let Some(id) = self.selected {
			if self.index_of(id).is_none() {
				warn!("selected node {id:?} is gone, clearing selection");
				self.selected = None;
			}
		}

		let clustering = self.clustering_active();
		for i in 0..self.nodes.len() {
			self.nodes[i].advance(self.width, self.height);

			if clustering {
				let (dvx, dvy) = self.cluster_pull(i);
				let node = &mut self.nodes[i];
				node.vx += dvx;
				node.vy += dvy;
				node.clamp_speed(self.config.max_speed);
			}

			let node = &mut self.nodes[i];
			node.apply_pointer(self.pointer, &self.config.pointer);
			let visible = node.is_visible(self.filter, &self.search);
			let emphasized = (node.hovered || self.selected == Some(node.id()))
				&& node.kind() != NodeKind::Noise;
			node.resolve_targets(visible, emphasized, self.config.hover_scale);
			node.smooth(self.config.radius_smoothing, self.config.opacity_smoothing);
		}
	}

	/// Edges for the current frame.
	pub fn edges(&self) -> Vec<Edge> {
		compute_edges(&self.nodes, &self.config.edges, self.time_ms)
	}

	pub fn pointer_move(&mut self, x: f64, y: f64) {
		self.pointer = Some((x, y));
	}

	pub fn pointer_leave(&mut self) {
		self.pointer = None;
	}

	/// Nearest clickable node whose disc (plus margin) contains the point.
	pub fn node_at_position(&self, x: f64, y: f64) -> Option<NodeId> {
		self.nodes
			.iter()
			.filter(|n| n.kind() != NodeKind::Noise && n.current_opacity >= self.config.click_min_opacity)
			.map(|n| (n.distance_to(x, y), n))
			.filter(|(d, n)| {
				*d < self
					.config
					.click_radius
					.unwrap_or(n.current_radius + self.config.click_margin)
			})
			.min_by(|a, b| a.0.total_cmp(&b.0))
			.map(|(_, n)| n.id())
	}

	/// Selects the node under the point, or clears the selection on a miss.
	pub fn click(&mut self, x: f64, y: f64) -> Option<SelectionView> {
		match self.node_at_position(x, y) {
			Some(id) => self.select_node(id),
			None => {
				self.clear_selection();
				None
			}
		}
	}

	pub fn select_node(&mut self, id: NodeId) -> Option<SelectionView> {
		if self.index_of(id).is_none() {
			warn!("cannot select unknown node {id:?}");
			self.selected = None;
			return None;
		}
		self.selected = Some(id);
		self.selection_view()
	}

	pub fn clear_selection(&mut self) {
		self.selected = None;
	}

	pub fn selection_view(&self) -> Option<SelectionView> {
		let node = self.selected_node()?;
		Some(SelectionView {
			id: node.id(),
			record: node.record().clone(),
			color: node.color(),
			related: self.related(node.id()),
		})
	}

	/// Up to three visible neighbours within edge distance, nearest first.
	pub fn related(&self, id: NodeId) -> Vec<RelatedItem> {
		let Some(origin) = self.node(id) else {
			return Vec::new();
		};
		let mut items: Vec<RelatedItem> = self
			.nodes
			.iter()
			.filter(|n| {
				n.id() != id && n.kind() != NodeKind::Noise && n.current_opacity > self.config.edges.min_opacity
			})
			.map(|n| RelatedItem {
				id: n.id(),
				title: n.record().title.clone(),
				color: n.color(),
				distance: n.distance_to(origin.x, origin.y),
			})
			.filter(|item| item.distance < self.config.edges.max_dist)
			.collect();
		items.sort_by(|a, b| a.distance.total_cmp(&b.distance));
		items.truncate(RELATED_LIMIT);
		items
	}

	/// Changing to a kind the selection doesn't have drops the selection.
	pub fn set_filter(&mut self, filter: NodeFilter) {
		self.filter = filter;
		if let Some(node) = self.selected_node() {
			if !filter.matches(node.kind()) {
				self.selected = None;
			}
		}
	}

	pub fn set_search(&mut self, text: &str) {
		self.search = text.to_lowercase();
		if self.search.is_empty() {
			return;
		}
		if let Some(node) = self.selected_node() {
			let record = node.record();
			let text = format!("{} {}", record.title, record.summary).to_lowercase();
			if !text.contains(&self.search) {
				self.selected = None;
			}
		}
	}

	/// One growth timer firing.
	pub fn grow(&mut self, pool: &GrowthPool, now_ms: f64, rng: &mut impl Rng) -> GrowthOutcome {
		let Some(cfg) = self.config.growth.clone() else {
			return GrowthOutcome::Disabled;
		};
		if GrowthPhase::of(self.nodes.len(), cfg.max_nodes) == GrowthPhase::AtCap {
			return GrowthOutcome::AtCap;
		}
		if rng.random_bool(cfg.skip_probability.clamp(0.0, 1.0)) {
			return GrowthOutcome::SkippedByChance;
		}

		let from_pool = !self.pool_exhausted
			&& !pool.is_empty()
			&& rng.random_bool(cfg.pool_probability.clamp(0.0, 1.0));
		let record = if from_pool {
			let draw = {
				let live: HashSet<&str> = self.nodes.iter().map(|n| n.record().title.as_str()).collect();
				growth::draw_from_pool(pool, &live, rng)
			};
			match draw {
				PoolDraw::Fresh(record) => record,
				PoolDraw::Duplicate { exhausted } => {
					if exhausted {
						debug!("every growth pool title is live, switching to procedural growth");
						self.pool_exhausted = true;
					}
					return GrowthOutcome::DuplicateTitle;
				}
				PoolDraw::Empty => growth::procedural_record(rng, now_ms),
			}
		} else {
			growth::procedural_record(rng, now_ms)
		};

		let (x, y) = growth::spawn_point(self.width, self.height, cfg.edge_spawn_probability, rng);
		debug!("spawning '{}' at ({x:.0}, {y:.0})", record.title);
		let id = self.add_record(record, rng);
		if let Some(idx) = self.index_of(id) {
			self.nodes[idx].x = x;
			self.nodes[idx].y = y;
		}
		GrowthOutcome::Spawned(id)
	}
}
