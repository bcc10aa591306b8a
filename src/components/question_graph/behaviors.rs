//! What each mode does with a completed click.
//!
//! Expansion runs asynchronously against the data source while the layout
//! keeps ticking. It holds only a weak handle to the view: if the view is
//! dropped while a fetch is in flight the result is discarded. Nothing is
//! rolled back when the mode or selection changes during a fetch; the fetched
//! nodes are appended to whatever the graph looks like when the fetch lands.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use futures::FutureExt;
use futures::future::{LocalBoxFuture, join_all};
use log::{debug, error, info};

use super::edge::NodeIdx;
use super::geometry::Point;
use super::graph::GraphError;
use super::loader::fetch_node;
use super::mode::Interaction;
use super::model::{Question, QuestionId};
use super::node::GraphNode;
use super::source::{DataResult, DataSource};
use super::view::GraphView;

/// What the inspect dialog shows about a question.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Inspection {
	/// The viewer wrote the question and may change its text.
	pub is_author: bool,
	pub text: String,
	pub author_name: String,
	pub net_votes: i32,
	/// The viewer's current vote, if any.
	pub vote: Option<i32>,
}

/// A confirmed inspect dialog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditResult {
	/// Question text; only applied for the author.
	pub text: String,
	/// The viewer's vote; only applied for anyone but the author.
	pub vote: Option<i32>,
}

/// Text input and the question inspector, supplied by the host.
pub trait Dialogs {
	/// `None` when the user cancels.
	fn prompt(&self, message: &str, default: &str) -> Option<String>;

	/// Show a question for editing or voting. `None` when the user cancels.
	fn inspect(&self, inspection: &Inspection) -> Option<EditResult>;
}

/// Prompt input with surrounding whitespace removed, or `None` if blank.
fn non_empty(input: Option<String>) -> Option<String> {
	let text = input?.trim().to_string();
	(!text.is_empty()).then_some(text)
}

impl GraphView {
	/// Ask for a follow-up to `parent` and append it with a connecting edge.
	///
	/// The new question gets the next free id and is not persisted.
	pub fn add_child(&mut self, parent: NodeIdx, dialogs: &dyn Dialogs) -> Result<Option<NodeIdx>, GraphError> {
		let Some(parent_node) = self.graph.nodes.get(parent) else {
			return Ok(None);
		};
		let message = format!("Ask a follow up question to: {}", parent_node.label());
		let (parent_id, spawn_at) = (
			parent_node.id,
			parent_node.position.map(|p| p + Point::new(parent_node.radius(), 0.0)),
		);
		let Some(text) = non_empty(dialogs.prompt(&message, "")) else {
			return Ok(None);
		};

		let id = self.graph.next_question_id();
		let question = Question {
			id,
			text,
			author_id: self.viewer_name.clone(),
			timestamp_last_modified: 0,
			follow_ups: 0,
			votes: Vec::new(),
		};
		let mut node = GraphNode::new(question, self.viewer_name.clone(), &[], &*self.measure());
		node.position = spawn_at;
		node.is_local = true;
		let idx = self.graph.push_node(node);
		self.graph.connect(parent_id, id, None)?;
		info!("added question {} below {}", id, parent_id);
		self.reregister();
		Ok(Some(idx))
	}

	/// Show a question in the inspect dialog. The author's edited text
	/// replaces the label; anyone else's vote is recorded and retints the
	/// border. Returns whether the node changed.
	pub fn inspect_question(&mut self, idx: NodeIdx, dialogs: &dyn Dialogs) -> bool {
		let Some(node) = self.graph.nodes.get(idx) else {
			return false;
		};
		let inspection = Inspection {
			is_author: node.question.author_id == self.viewer_name,
			text: node.question.text.clone(),
			author_name: node.author_name.clone(),
			net_votes: node.net_votes(),
			vote: node
				.question_votes
				.iter()
				.find(|v| v.voter_agent_id == self.viewer_name)
				.map(|v| v.value),
		};
		let Some(result) = dialogs.inspect(&inspection) else {
			return false;
		};

		let (measure, viewer) = (self.measure(), self.viewer_name.clone());
		let Some(node) = self.graph.nodes.get_mut(idx) else {
			return false;
		};
		let changed = if inspection.is_author {
			match non_empty(Some(result.text)) {
				Some(text) if text != node.question.text => {
					node.set_label(text, &*measure);
					true
				}
				_ => false,
			}
		} else {
			result.vote.is_some_and(|value| node.cast_vote(&viewer, value))
		};
		if changed {
			info!("question {} updated by {}", node.id, viewer);
			self.reregister();
		}
		changed
	}

	/// Make `edge` the only selected edge.
	pub fn select_edge(&mut self, edge: usize) -> bool {
		if edge >= self.graph.edges.len() {
			return false;
		}
		self.graph.clear_edge_selection();
		self.graph.edges[edge].is_selected = true;
		self.reregister();
		true
	}
}

/// Select a node and append every neighbour not yet in the graph, with the
/// edges for its relations. Returns the number of nodes appended.
///
/// A node that is already selected is left alone, and an unsaved node has
/// nothing to expand. Neighbours that fail to load are skipped; those that
/// loaded are kept and the first error is returned. An unsaved node holding
/// the id of a fetched neighbour is renumbered out of its way.
pub async fn navigate<D: DataSource>(view: Weak<RefCell<GraphView>>, source: Rc<D>, idx: NodeIdx) -> DataResult<usize> {
	let (id, measure) = {
		let Some(rc) = view.upgrade() else {
			return Ok(0);
		};
		let mut v = rc.borrow_mut();
		let Some(node) = v.graph.nodes.get_mut(idx) else {
			return Ok(0);
		};
		if node.is_selected {
			return Ok(0);
		}
		node.is_selected = true;
		let (id, local) = (node.id, node.is_local);
		v.reregister();
		if local {
			debug!("question {} is unsaved, nothing to expand", id);
			return Ok(0);
		}
		(id, v.measure())
	};

	let relations = source.relations_for_question(id).await?;

	let missing: Vec<QuestionId> = {
		let Some(rc) = view.upgrade() else {
			debug!("view gone, dropping relations of {}", id);
			return Ok(0);
		};
		let v = rc.borrow();
		let mut missing = Vec::new();
		for r in &relations {
			let other = r.other_end(id);
			if !v.graph.holds_fetched(other) && !missing.contains(&other) {
				missing.push(other);
			}
		}
		missing
	};

	let fetched = join_all(missing.iter().map(|&q| fetch_node(&*source, q, &*measure))).await;

	let Some(rc) = view.upgrade() else {
		debug!("view gone, dropping {} fetched questions", fetched.len());
		return Ok(0);
	};
	let mut v = rc.borrow_mut();
	let known: Vec<QuestionId> = relations.iter().flat_map(|r| [r.from, r.to]).collect();
	for &k in &known {
		v.graph.yield_local_id(k, &known);
	}
	let before = v.graph.nodes.len();
	let mut failure = None;
	for result in fetched {
		match result {
			Ok((node, _)) => {
				v.graph.push_node(node);
			}
			Err(err) => {
				error!("failed to load neighbour of {}: {}", id, err);
				failure.get_or_insert(err);
			}
		}
	}
	for r in &relations {
		if let Err(err) = v.graph.connect(r.from, r.to, Some(r.relation_id.clone())) {
			debug!("relation {} not wired: {}", r.relation_id, err);
		}
	}
	let added = v.graph.nodes.len() - before;
	v.reregister();
	info!("expanded question {}: {} new nodes", id, added);
	match failure {
		Some(err) => Err(err),
		None => Ok(added),
	}
}

/// Carry out a click. Synchronous actions complete before returning;
/// expansion is returned as a future for the host to spawn.
pub fn dispatch<D>(
	view: &Rc<RefCell<GraphView>>,
	interaction: Interaction,
	source: &Rc<D>,
	dialogs: &dyn Dialogs,
) -> Option<LocalBoxFuture<'static, ()>>
where
	D: DataSource + 'static,
{
	match interaction {
		Interaction::Navigate(idx) => {
			let (weak, source) = (Rc::downgrade(view), source.clone());
			Some(
				async move {
					if let Err(err) = navigate(weak, source, idx).await {
						error!("expansion failed: {}", err);
					}
				}
				.boxed_local(),
			)
		}
		Interaction::AddChild(idx) => {
			if let Err(err) = view.borrow_mut().add_child(idx, dialogs) {
				error!("could not add question: {}", err);
			}
			None
		}
		Interaction::Inspect(idx) => {
			view.borrow_mut().inspect_question(idx, dialogs);
			None
		}
		Interaction::SelectEdge(edge) => {
			view.borrow_mut().select_edge(edge);
			None
		}
	}
}
