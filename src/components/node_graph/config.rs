/// Pointer hover and repulsion behavior.
#[derive(Clone, Debug, PartialEq)]
pub struct PointerConfig {
	pub hover_radius: f64,
	pub repel_radius: f64,
	/// Displacement per tick at zero distance; 0 disables repulsion.
	pub repel_strength: f64,
}

/// Timer-driven spawning of new nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct GrowthConfig {
	pub interval_ms: u64,
	pub max_nodes: usize,
	pub skip_probability: f64,
	pub pool_probability: f64,
	pub edge_spawn_probability: f64,
}

/// How an edge's color and alpha are picked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeStyle {
	/// Gray, fading with distance and with the dimmer endpoint.
	Fading,
	/// Constant cyan between two data nodes, faint white when noise is involved.
	DataLinks,
}

/// Proximity edge parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeParams {
	pub max_dist: f64,
	/// Nodes dimmer than this get no edges. 0 connects everything.
	pub min_opacity: f64,
	pub base_alpha: f64,
	pub breathing: bool,
	pub style: EdgeStyle,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SimConfig {
	pub node_size: f64,
	/// Extra random size added per node, in `[0, size_jitter)`.
	pub size_jitter: f64,
	pub hover_scale: f64,
	pub velocity_spread: f64,
	pub clustering: bool,
	pub cluster_range: f64,
	pub attraction_force: f64,
	pub max_speed: f64,
	pub radius_smoothing: f64,
	pub opacity_smoothing: f64,
	pub click_margin: f64,
	/// Fixed hit radius; `None` uses the drawn radius plus `click_margin`.
	pub click_radius: Option<f64>,
	pub click_min_opacity: f64,
	/// Overrides the kind color of every non-noise node.
	pub data_color: Option<&'static str>,
	pub pointer: PointerConfig,
	pub edges: EdgeParams,
	pub growth: Option<GrowthConfig>,
}

impl SimConfig {
	/// Library visualizer: clustering, filters, growth.
	pub fn library() -> Self {
		Self {
			node_size: 4.0,
			size_jitter: 0.0,
			hover_scale: 3.5,
			velocity_spread: 0.5,
			clustering: true,
			cluster_range: 300.0,
			attraction_force: 0.0005,
			max_speed: 1.0,
			radius_smoothing: 0.1,
			opacity_smoothing: 0.05,
			click_margin: 10.0,
			click_radius: None,
			click_min_opacity: 0.5,
			data_color: None,
			pointer: PointerConfig {
				hover_radius: 30.0,
				repel_radius: 0.0,
				repel_strength: 0.0,
			},
			edges: EdgeParams {
				max_dist: 150.0,
				min_opacity: 0.3,
				base_alpha: 0.4,
				breathing: true,
				style: EdgeStyle::Fading,
			},
			growth: Some(GrowthConfig {
				interval_ms: 1500,
				max_nodes: 80,
				skip_probability: 0.6,
				pool_probability: 0.5,
				edge_spawn_probability: 0.9,
			}),
		}
	}

	/// Identity visualizer: fast drifting nodes pushed away by the pointer.
	pub fn identity() -> Self {
		Self {
			node_size: 2.0,
			size_jitter: 3.0,
			hover_scale: 3.0,
			velocity_spread: 1.5,
			clustering: false,
			click_radius: Some(30.0),
			data_color: Some("#00f0ff"),
			pointer: PointerConfig {
				hover_radius: 150.0,
				repel_radius: 150.0,
				repel_strength: 2.0,
			},
			edges: EdgeParams {
				max_dist: 100.0,
				min_opacity: 0.0,
				base_alpha: 0.2,
				breathing: false,
				style: EdgeStyle::DataLinks,
			},
			growth: None,
			..Self::library()
		}
	}
}

impl Default for SimConfig {
	fn default() -> Self {
		Self::library()
	}
}
