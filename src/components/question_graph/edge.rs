use super::model::{RelationId, net_votes};
use super::node::GraphNode;

/// Index of a node in the graph's node array.
pub type NodeIdx = usize;

/// Shortest gap kept between two bubbles joined by a strongly endorsed relation.
pub const MIN_SPAN: f64 = 30.0;
/// Gap between two bubbles joined by a strongly rejected relation.
pub const MAX_SPAN: f64 = 150.0;

/// A link between two nodes, usually backed by a relation.
/// A link between two nodes in the graph.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
	pub source: NodeIdx,
	pub target: NodeIdx,
	/// `None` for links created locally that have no stored relation yet.
	pub relation_id: Option<RelationId>,
	/// Highlighted by the edit-relation mode.
	pub is_selected: bool,
}

impl Edge {
	/// `None` when both ends are the same node.
	pub fn new(source: NodeIdx, target: NodeIdx, relation_id: Option<RelationId>) -> Option<Self> {
		(source != target).then_some(Self {
			source,
			target,
			relation_id,
			is_selected: false,
		})
	}

	/// Whether the edge joins `a` and `b`, in either direction.
	pub fn touches(&self, a: NodeIdx, b: NodeIdx) -> bool {
		(self.source == a && self.target == b) || (self.source == b && self.target == a)
	}

	/// Net vote on the underlying relation, read from whichever endpoint carries it.
	pub fn net_votes(&self, nodes: &[GraphNode]) -> i32 {
		let Some(id) = &self.relation_id else {
			return 0;
		};
		[self.source, self.target]
			.iter()
			.filter_map(|&i| nodes.get(i)?.votes_for_relation(id))
			.next()
			.map(net_votes)
			.unwrap_or(0)
	}

	/// Rest length for the link force.
	///
	/// Both radii plus a gap that shrinks from `MAX_SPAN` toward `MIN_SPAN` as
	/// the net vote grows.
	pub fn distance(&self, nodes: &[GraphNode]) -> f64 {
		let radius = |i: NodeIdx| nodes.get(i).map(GraphNode::radius).unwrap_or(0.0);
		radius(self.source) + radius(self.target) + span(self.net_votes(nodes))
	}
}

fn span(net: i32) -> f64 {
	MIN_SPAN + (MAX_SPAN - MIN_SPAN) / (1.0 + (net as f64 / 2.0).exp())
}
