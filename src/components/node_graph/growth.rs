//! Organic growth: new nodes drift in from the viewport edges over time,
//! either taken from a growth pool or synthesized as system events.

use std::collections::HashSet;

use chrono::{DateTime, SecondsFormat, Utc};
use rand::Rng;
use rand::seq::IndexedRandom;

use super::node::NodeId;
use super::types::{GrowthPool, NodeKind, NodeRecord};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GrowthPhase {
	BelowCap,
	AtCap,
}

impl GrowthPhase {
	pub fn of(count: usize, max_nodes: usize) -> Self {
		if count >= max_nodes {
			GrowthPhase::AtCap
		} else {
			GrowthPhase::BelowCap
		}
	}
}

/// Result of one growth timer firing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GrowthOutcome {
	Disabled,
	AtCap,
	SkippedByChance,
	DuplicateTitle,
	Spawned(NodeId),
}

/// A procedural event stream a synthesized node can come from.
#[derive(Clone, Copy, Debug)]
pub struct Template {
	pub kind: NodeKind,
	pub prefix: &'static str,
}

pub const TEMPLATES: [Template; 3] = [
	Template {
		kind: NodeKind::Signal,
		prefix: "SYS",
	},
	Template {
		kind: NodeKind::Artifact,
		prefix: "BLD",
	},
	Template {
		kind: NodeKind::Wisdom,
		prefix: "LOG",
	},
];

const CONCEPTS: &[&str] = &[
	"Evolution",
	"Entropy",
	"Recursion",
	"Synthesis",
	"Pattern",
	"Void",
	"Nexus",
	"Glitch",
];

const ACTIONS: &[&str] = &[
	"Detected",
	"Optimized",
	"Purged",
	"Compiled",
	"Refactored",
	"Observed",
	"Indexed",
];

/// A synthesized system event record stamped with `now_ms` (Unix millis).
pub fn procedural_record(rng: &mut impl Rng, now_ms: f64) -> NodeRecord {
	let template = TEMPLATES.choose(rng).unwrap_or(&TEMPLATES[0]);
	let action = ACTIONS.choose(rng).copied().unwrap_or("Observed");
	let concept = CONCEPTS.choose(rng).copied().unwrap_or("Void");

	let millis = now_ms as i64;
	let stamp = DateTime::<Utc>::from_timestamp_millis(millis).unwrap_or_default();
	let stream_tag = template.prefix.to_lowercase();

	let mut record = NodeRecord::new(
		template.kind,
		format!("{}: {} {}", template.prefix, action, concept),
		format!(
			"Automated system event. Source: {}-Stream. Timestamp: {}",
			template.prefix,
			stamp.to_rfc3339_opts(SecondsFormat::Millis, true)
		),
	)
	.with_tags(["auto", "simulation", stream_tag.as_str()]);
	record.id = Some(format!("sim-{millis}"));
	record.link = "#".to_string();
	record.date = stamp.format("%Y-%m-%d").to_string();
	record
}

#[derive(Clone, Debug, PartialEq)]
pub enum PoolDraw {
	Empty,
	Fresh(NodeRecord),
	/// The drawn title is already live. `exhausted` is set when every
	/// candidate in the pool is.
	Duplicate { exhausted: bool },
}

pub fn draw_from_pool(pool: &GrowthPool, live_titles: &HashSet<&str>, rng: &mut impl Rng) -> PoolDraw {
	if pool.is_empty() {
		return PoolDraw::Empty;
	}
	let idx = rng.random_range(0..pool.len());
	let Some(candidate) = pool.get(idx) else {
		return PoolDraw::Empty;
	};
	if live_titles.contains(candidate.title.as_str()) {
		let exhausted = pool.iter().all(|r| live_titles.contains(r.title.as_str()));
		return PoolDraw::Duplicate { exhausted };
	}
	PoolDraw::Fresh(candidate.clone())
}

/// Usually just outside a random viewport edge; occasionally dead center.
pub fn spawn_point(width: f64, height: f64, edge_probability: f64, rng: &mut impl Rng) -> (f64, f64) {
	if !rng.random_bool(edge_probability.clamp(0.0, 1.0)) {
		return (width / 2.0, height / 2.0);
	}
	let far = rng.random_bool(0.5);
	if rng.random_bool(0.5) {
		let x = if far { width } else { 0.0 };
		(x, rng.random_range(0.0..=height.max(0.0)))
	} else {
		let y = if far { height } else { 0.0 };
		(rng.random_range(0.0..=width.max(0.0)), y)
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	use super::*;

	#[test]
	fn phase_flips_at_cap() {
		assert_eq!(GrowthPhase::of(79, 80), GrowthPhase::BelowCap);
		assert_eq!(GrowthPhase::of(80, 80), GrowthPhase::AtCap);
		assert_eq!(GrowthPhase::of(95, 80), GrowthPhase::AtCap);
	}

	#[test]
	fn procedural_record_uses_templates() {
		let mut rng = SmallRng::seed_from_u64(3);
		// 2024-03-01T12:00:00Z
		let now = 1_709_294_400_000.0;
		for _ in 0..30 {
			let rec = procedural_record(&mut rng, now);
			let template = TEMPLATES
				.iter()
				.find(|t| rec.title.starts_with(&format!("{}: ", t.prefix)))
				.expect("title carries a template prefix");
			assert_eq!(rec.kind, template.kind);
			assert_eq!(rec.tags[2], template.prefix.to_lowercase());
			assert_eq!(rec.date, "2024-03-01");
			assert!(rec.summary.ends_with("2024-03-01T12:00:00.000Z"));
			assert_eq!(rec.id.as_deref(), Some("sim-1709294400000"));
		}
	}

	#[test]
	fn procedural_streams_are_equally_likely() {
		let mut rng = SmallRng::seed_from_u64(8);
		let mut counts = [0usize; 3];
		for _ in 0..3000 {
			let rec = procedural_record(&mut rng, 0.0);
			let idx = TEMPLATES
				.iter()
				.position(|t| rec.title.starts_with(t.prefix))
				.expect("known prefix");
			counts[idx] += 1;
		}
		for count in counts {
			assert!((850..1150).contains(&count), "stream counts: {counts:?}");
		}
	}

	#[test]
	fn pool_draw_reports_duplicates_and_exhaustion() {
		let mut rng = SmallRng::seed_from_u64(11);
		let pool = GrowthPool {
			latent_concepts: vec![NodeRecord::new(NodeKind::Wisdom, "Entropy", "")],
			..GrowthPool::default()
		};
		let live: HashSet<&str> = ["Entropy"].into_iter().collect();
		assert_eq!(
			draw_from_pool(&pool, &live, &mut rng),
			PoolDraw::Duplicate { exhausted: true }
		);

		let pool = GrowthPool {
			projects: vec![NodeRecord::new(NodeKind::Artifact, "Forge", "")],
			..pool
		};
		let mut fresh = 0;
		for _ in 0..40 {
			match draw_from_pool(&pool, &live, &mut rng) {
				PoolDraw::Fresh(rec) => {
					assert_eq!(rec.title, "Forge");
					fresh += 1;
				}
				PoolDraw::Duplicate { exhausted } => assert!(!exhausted),
				PoolDraw::Empty => panic!("pool is not empty"),
			}
		}
		assert!(fresh > 0);
	}

	#[test]
	fn empty_pool_draws_nothing() {
		let mut rng = SmallRng::seed_from_u64(1);
		assert_eq!(
			draw_from_pool(&GrowthPool::default(), &HashSet::new(), &mut rng),
			PoolDraw::Empty
		);
	}

	#[test]
	fn spawn_points_sit_on_an_edge_or_center() {
		let mut rng = SmallRng::seed_from_u64(5);
		let (w, h) = (800.0, 600.0);
		let mut centered = 0;
		for _ in 0..2000 {
			let (x, y) = spawn_point(w, h, 0.9, &mut rng);
			if (x, y) == (w / 2.0, h / 2.0) {
				centered += 1;
				continue;
			}
			assert!(x == 0.0 || x == w || y == 0.0 || y == h, "({x}, {y}) is off-edge");
		}
		assert!((100..300).contains(&centered), "center spawns: {centered}");
	}
}
