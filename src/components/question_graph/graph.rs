use log::debug;
use thiserror::Error;

use super::edge::{Edge, NodeIdx};
use super::geometry::Point;
use super::model::{QuestionId, RelationId};
use super::node::GraphNode;

/// Structural violations when wiring nodes together.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
	/// An edge would connect a node to itself.
	#[error("question {id} cannot relate to itself")]
	SelfLoop { id: QuestionId },

	/// An edge endpoint is not part of the graph.
	#[error("question {id} is not in the graph")]
	UnknownNode { id: QuestionId },
}

/// The live node and edge arrays. Nodes are only ever appended, so a
/// `NodeIdx` stays valid for the graph's lifetime.
#[derive(Clone, Debug, Default)]
pub struct QuestionGraph {
	pub nodes: Vec<GraphNode>,
	pub edges: Vec<Edge>,
}

impl QuestionGraph {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn index_of(&self, id: QuestionId) -> Option<NodeIdx> {
		self.nodes.iter().position(|n| n.id == id)
	}

	pub fn contains(&self, id: QuestionId) -> bool {
		self.index_of(id).is_some()
	}

	/// Whether the question with this id, as served by the data source, is in
	/// the graph. Unsaved local nodes do not count.
	pub fn holds_fetched(&self, id: QuestionId) -> bool {
		self.index_of(id).is_some_and(|i| !self.nodes[i].is_local)
	}

	/// Move an unsaved node off `id` so the fetched question with that id can
	/// take it. The new id also avoids every id in `known`.
	pub fn yield_local_id(&mut self, id: QuestionId, known: &[QuestionId]) -> Option<QuestionId> {
		let idx = self.index_of(id).filter(|&i| self.nodes[i].is_local)?;
		let fresh = known
			.iter()
			.map(|k| k + 1)
			.max()
			.unwrap_or(1)
			.max(self.next_question_id());
		let node = &mut self.nodes[idx];
		node.id = fresh;
		node.question.id = fresh;
		debug!("unsaved question {} renumbered to {}", id, fresh);
		Some(fresh)
	}

	/// Append a node unless one with the same id exists; either way returns its index.
	pub fn push_node(&mut self, node: GraphNode) -> NodeIdx {
		if let Some(idx) = self.index_of(node.id) {
			debug!("question {} already in graph", node.id);
			return idx;
		}
		self.nodes.push(node);
		self.nodes.len() - 1
	}

	/// Add an edge between two questions already in the graph.
	///
	/// An edge for the same relation, or between the same pair of nodes, is
	/// not added twice. Returns the edge's index.
	pub fn connect(
		&mut self,
		from: QuestionId,
		to: QuestionId,
		relation_id: Option<RelationId>,
	) -> Result<usize, GraphError> {
		let source = self.index_of(from).ok_or(GraphError::UnknownNode { id: from })?;
		let target = self.index_of(to).ok_or(GraphError::UnknownNode { id: to })?;
		if let Some(existing) = self.edges.iter().position(|e| {
			e.touches(source, target) || (relation_id.is_some() && e.relation_id == relation_id)
		}) {
			return Ok(existing);
		}
		let edge = Edge::new(source, target, relation_id).ok_or(GraphError::SelfLoop { id: from })?;
		self.edges.push(edge);
		Ok(self.edges.len() - 1)
	}

	/// One greater than the largest question id, 1 for an empty graph.
	pub fn next_question_id(&self) -> QuestionId {
		self.nodes.iter().map(|n| n.id).max().map_or(1, |max| max + 1)
	}

	pub fn clear_edge_selection(&mut self) {
		for edge in &mut self.edges {
			edge.is_selected = false;
		}
	}

	/// Endpoint positions of an edge, once both are laid out.
	pub fn edge_ends(&self, edge: &Edge) -> Option<(Point, Point)> {
		let a = self.nodes.get(edge.source)?.position?;
		let b = self.nodes.get(edge.target)?.position?;
		Some((a, b))
	}
}
