use serde::{Deserialize, Serialize};

use super::edge::NodeIdx;

/// What a click on the graph does.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InteractionMode {
	/// Pan, zoom and drag only.
	#[default]
	Explore,
	SelectAndNavigate,
	AddQuestion,
	EditQuestion,
	/// Not implemented yet; behaves like `Explore`.
	AddRelation,
	EditRelation,
}

impl InteractionMode {
	pub const ALL: [InteractionMode; 6] = [
		InteractionMode::Explore,
		InteractionMode::SelectAndNavigate,
		InteractionMode::AddQuestion,
		InteractionMode::EditQuestion,
		InteractionMode::AddRelation,
		InteractionMode::EditRelation,
	];

	pub fn label(self) -> &'static str {
		match self {
			InteractionMode::Explore => "Explore",
			InteractionMode::SelectAndNavigate => "Navigate",
			InteractionMode::AddQuestion => "Add question",
			InteractionMode::EditQuestion => "Edit question",
			InteractionMode::AddRelation => "Add relation",
			InteractionMode::EditRelation => "Edit relation",
		}
	}
}

/// What a gesture grabbed when it started.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Subject {
	Node(NodeIdx),
	/// Index into the edge array.
	Edge(usize),
}

/// A completed click on a subject, to be carried out against the graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interaction {
	/// Select the node and pull in its neighbours.
	Navigate(NodeIdx),
	/// Ask for a follow-up question to the node.
	AddChild(NodeIdx),
	/// Show the question: its author may edit the text, anyone else may vote.
	Inspect(NodeIdx),
	/// Make this edge the only selected one.
	SelectEdge(usize),
}

/// Gesture handling bound for one mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Behavior {
	Explore,
	Navigate,
	AddChild,
	Inspect,
	SelectEdge,
}

impl Behavior {
	pub fn for_mode(mode: InteractionMode) -> Self {
		match mode {
			InteractionMode::Explore | InteractionMode::AddRelation => Behavior::Explore,
			InteractionMode::SelectAndNavigate => Behavior::Navigate,
			InteractionMode::AddQuestion => Behavior::AddChild,
			InteractionMode::EditQuestion => Behavior::Inspect,
			InteractionMode::EditRelation => Behavior::SelectEdge,
		}
	}

	/// Gestures that miss every subject pan and zoom the canvas.
	pub fn pans(self) -> bool {
		self == Behavior::Explore
	}

	/// The grabbed node follows the pointer.
	pub fn drags(self) -> bool {
		self == Behavior::Explore
	}

	/// Edges rather than nodes are the gesture subjects.
	pub fn grabs_edges(self) -> bool {
		self == Behavior::SelectEdge
	}

	/// The action for a click that started and ended on `subject`.
	pub fn interact_with(self, subject: Subject) -> Option<Interaction> {
		match (self, subject) {
			(Behavior::Navigate, Subject::Node(n)) => Some(Interaction::Navigate(n)),
			(Behavior::AddChild, Subject::Node(n)) => Some(Interaction::AddChild(n)),
			(Behavior::Inspect, Subject::Node(n)) => Some(Interaction::Inspect(n)),
			(Behavior::SelectEdge, Subject::Edge(e)) => Some(Interaction::SelectEdge(e)),
			_ => None,
		}
	}
}
