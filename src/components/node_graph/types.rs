use std::fmt;

use serde::{Deserialize, Deserializer};

/// Category of a record; drives color, filtering and clustering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
	Artifact,
	Wisdom,
	Paper,
	Signal,
	Noise,
	#[serde(other)]
	Unknown,
}

impl NodeKind {
	/// Kinds offered as filter buttons, in display order.
	pub const FILTERABLE: [NodeKind; 4] = [
		NodeKind::Artifact,
		NodeKind::Wisdom,
		NodeKind::Paper,
		NodeKind::Signal,
	];

	pub fn as_str(self) -> &'static str {
		match self {
			NodeKind::Artifact => "artifact",
			NodeKind::Wisdom => "wisdom",
			NodeKind::Paper => "paper",
			NodeKind::Signal => "signal",
			NodeKind::Noise => "noise",
			NodeKind::Unknown => "unknown",
		}
	}

	pub fn color(self) -> &'static str {
		match self {
			NodeKind::Artifact => "#00f3ff",
			NodeKind::Wisdom => "#ff00ff",
			NodeKind::Paper => "#ffe100",
			NodeKind::Signal => "#00ff66",
			NodeKind::Noise => "#333333",
			NodeKind::Unknown => "#ffffff",
		}
	}
}

impl fmt::Display for NodeKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// One entry of the library data file. Immutable once loaded.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct NodeRecord {
	#[serde(default)]
	pub id: Option<String>,
	#[serde(rename = "type")]
	pub kind: NodeKind,
	pub title: String,
	#[serde(default)]
	pub summary: String,
	#[serde(default)]
	pub tags: Vec<String>,
	#[serde(default)]
	pub link: String,
	#[serde(default)]
	pub date: String,
	#[serde(default)]
	pub status: Option<String>,
	#[serde(default)]
	pub version: Option<String>,
}

impl NodeRecord {
	pub fn new(kind: NodeKind, title: impl Into<String>, summary: impl Into<String>) -> Self {
		Self {
			id: None,
			kind,
			title: title.into(),
			summary: summary.into(),
			tags: Vec::new(),
			link: String::new(),
			date: String::new(),
			status: None,
			version: None,
		}
	}

	pub fn with_tags<I, S>(mut self, tags: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.tags = tags.into_iter().map(Into::into).collect();
		self
	}

	/// Lowercased `title summary tags...` used for search matching.
	pub fn search_text(&self) -> String {
		format!("{} {} {}", self.title, self.summary, self.tags.join(" ")).to_lowercase()
	}
}

/// A repository commit listed in the growth pool. Commits grow into
/// `signal` nodes, or `artifact` nodes when they carry a release tag.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CommitEntry {
	pub sha: String,
	pub message: String,
	#[serde(default)]
	pub date: String,
	#[serde(default)]
	pub tag: Option<String>,
}

impl CommitEntry {
	pub fn short_sha(&self) -> &str {
		self.sha.get(..7).unwrap_or(&self.sha)
	}

	/// Subject line becomes the title; the tag, minus any `v`, becomes the
	/// version badge.
	pub fn into_record(self) -> NodeRecord {
		let short = self.short_sha().to_string();
		let subject = self.message.lines().next().unwrap_or_default().trim();
		let title = if subject.is_empty() {
			format!("commit {short}")
		} else {
			subject.to_string()
		};
		let kind = if self.tag.is_some() {
			NodeKind::Artifact
		} else {
			NodeKind::Signal
		};

		let mut record = NodeRecord::new(kind, title, format!("Commit {short}: {}", self.message.trim()))
			.with_tags(["commit", short.as_str()]);
		record.version = self
			.tag
			.map(|t| t.trim_start_matches('v').to_string())
			.filter(|v| !v.is_empty());
		record.id = Some(self.sha);
		record.link = "#".to_string();
		record.date = self.date;
		record
	}
}

fn commit_records<'de, D>(deserializer: D) -> Result<Vec<NodeRecord>, D::Error>
where
	D: Deserializer<'de>,
{
	let commits = Vec::<CommitEntry>::deserialize(deserializer)?;
	Ok(commits.into_iter().map(CommitEntry::into_record).collect())
}

/// Candidate records new nodes may be grown from.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthPool {
	#[serde(default)]
	pub latent_concepts: Vec<NodeRecord>,
	#[serde(default)]
	pub projects: Vec<NodeRecord>,
	/// Already converted from [`CommitEntry`] at load time.
	#[serde(default, deserialize_with = "commit_records")]
	pub commits: Vec<NodeRecord>,
}

impl GrowthPool {
	pub fn len(&self) -> usize {
		self.latent_concepts.len() + self.projects.len() + self.commits.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn get(&self, idx: usize) -> Option<&NodeRecord> {
		self.iter().nth(idx)
	}

	pub fn iter(&self) -> impl Iterator<Item = &NodeRecord> {
		self.latent_concepts
			.iter()
			.chain(self.projects.iter())
			.chain(self.commits.iter())
	}
}

/// Active type filter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NodeFilter {
	#[default]
	All,
	Kind(NodeKind),
}

impl NodeFilter {
	pub fn matches(self, kind: NodeKind) -> bool {
		match self {
			NodeFilter::All => true,
			NodeFilter::Kind(k) => k == kind,
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			NodeFilter::All => "all",
			NodeFilter::Kind(k) => k.as_str(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn record_parses_library_entry() {
		let raw = r#"{
			"id": "1707",
			"type": "paper",
			"title": "Attention Is All You Need",
			"summary": "Transformers.",
			"link": "https://arxiv.org/abs/1706.03762",
			"date": "2017-06-12",
			"tags": ["ml", "nlp"]
		}"#;
		let rec: NodeRecord = serde_json::from_str(raw).expect("parse record");
		assert_eq!(rec.kind, NodeKind::Paper);
		assert_eq!(rec.tags, vec!["ml", "nlp"]);
		assert_eq!(rec.status, None);
	}

	#[test]
	fn unknown_kind_maps_to_unknown() {
		let rec: NodeRecord =
			serde_json::from_str(r#"{"type": "comet", "title": "x"}"#).expect("parse record");
		assert_eq!(rec.kind, NodeKind::Unknown);
		assert_eq!(rec.kind.color(), "#ffffff");
	}

	#[test]
	fn search_text_is_case_folded() {
		let rec = NodeRecord::new(NodeKind::Wisdom, "Deep WORK", "Focus").with_tags(["Habits"]);
		assert_eq!(rec.search_text(), "deep work focus habits");
	}

	#[test]
	fn pool_indexes_across_all_lists() {
		let pool = GrowthPool {
			latent_concepts: vec![NodeRecord::new(NodeKind::Wisdom, "a", "")],
			projects: vec![NodeRecord::new(NodeKind::Artifact, "b", "")],
			commits: vec![NodeRecord::new(NodeKind::Signal, "c", "")],
		};
		assert_eq!(pool.len(), 3);
		assert_eq!(pool.get(1).map(|r| r.title.as_str()), Some("b"));
		assert_eq!(pool.get(2).map(|r| r.title.as_str()), Some("c"));
		assert!(pool.get(3).is_none());
	}

	#[test]
	fn commits_become_signal_or_release_records() {
		let raw = r#"{
			"commits": [
				{"sha": "4f2a9c1e0b7d", "message": "Fix edge fade\n\nLong body", "date": "2025-03-20"},
				{"sha": "9ab03de", "message": "Release graph", "date": "2025-03-21", "tag": "v0.2.0"}
			]
		}"#;
		let pool: GrowthPool = serde_json::from_str(raw).expect("parse pool");
		assert_eq!(pool.len(), 2);

		let fix = &pool.commits[0];
		assert_eq!(fix.kind, NodeKind::Signal);
		assert_eq!(fix.title, "Fix edge fade");
		assert_eq!(fix.tags, vec!["commit", "4f2a9c1"]);
		assert_eq!(fix.version, None);
		assert_eq!(fix.id.as_deref(), Some("4f2a9c1e0b7d"));
		assert_eq!(fix.date, "2025-03-20");

		let release = &pool.commits[1];
		assert_eq!(release.kind, NodeKind::Artifact);
		assert_eq!(release.version.as_deref(), Some("0.2.0"));
		assert!(release.summary.starts_with("Commit 9ab03de: "));
	}

	#[test]
	fn commit_without_subject_is_named_by_sha() {
		let commit = CommitEntry {
			sha: "abc".to_string(),
			message: "  ".to_string(),
			date: String::new(),
			tag: Some("v".to_string()),
		};
		let rec = commit.into_record();
		assert_eq!(rec.title, "commit abc");
		assert_eq!(rec.version, None);
	}

	#[test]
	fn filter_all_matches_every_kind() {
		assert!(NodeFilter::All.matches(NodeKind::Noise));
		assert!(!NodeFilter::Kind(NodeKind::Artifact).matches(NodeKind::Wisdom));
	}
}
