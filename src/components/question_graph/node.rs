use indexmap::IndexMap;

use super::geometry::Point;
use super::model::{Question, QuestionId, Relation, RelationId, RelationRef, Vote, net_votes};
use super::surface::TextMeasure;
use super::text_fit::{self, LabelStyle, TextLayout};

/// A question rendered as a bubble.
#[derive(Clone, Debug)]
pub struct GraphNode {
	pub id: QuestionId,
	pub question: Question,
	/// Display name shown in front of the question text.
	pub author_name: String,
	pub question_votes: Vec<Vote>,
	pub relations: Vec<RelationRef>,
	/// Author of each entry of `relations`, same order.
	pub relation_authors: Vec<String>,
	/// One entry per relation, in relation order.
	pub relation_votes: IndexMap<RelationId, Vec<Vote>>,
	pub is_selected: bool,
	pub is_seed: bool,
	/// Created in this view and not saved; its id is provisional.
	pub is_local: bool,
	/// Assigned by the layout engine; `None` until then.
	pub position: Option<Point>,
	pub velocity: Point,
	/// Fixed position while the node is dragged.
	pub pinned: Option<Point>,
	layout: TextLayout,
	style: LabelStyle,
}

impl GraphNode {
	/// Build a node from a fetched question and the relations touching it.
	///
	/// The question's votes move into `question_votes`.
	pub fn new(
		mut question: Question,
		author_name: impl Into<String>,
		relations: &[Relation],
		measure: &dyn TextMeasure,
	) -> Self {
		let author_name = author_name.into();
		let style = LabelStyle::default();
		let layout = text_fit::fit(&author_name, &question.text, |s| measure.text_width(s), &style);
		let mut relation_votes = IndexMap::with_capacity(relations.len());
		for r in relations {
			relation_votes.insert(r.relation_id.clone(), r.votes.clone());
		}
		Self {
			id: question.id,
			question_votes: std::mem::take(&mut question.votes),
			question,
			author_name,
			relations: relations.iter().map(Relation::to_ref).collect(),
			relation_authors: relations.iter().map(|r| r.author_id.clone()).collect(),
			relation_votes,
			is_selected: false,
			is_seed: false,
			is_local: false,
			position: None,
			velocity: Point::default(),
			pinned: None,
			layout,
			style,
		}
	}

	pub fn seed(mut self) -> Self {
		self.is_seed = true;
		self
	}

	pub fn radius(&self) -> f64 {
		self.layout.radius
	}

	pub fn lines(&self) -> &[String] {
		&self.layout.lines
	}

	pub fn style(&self) -> &LabelStyle {
		&self.style
	}

	pub fn label(&self) -> String {
		format!("{}: {}", self.author_name, self.question.text)
	}

	/// Replace the question text and re-fit the bubble around it.
	pub fn set_label(&mut self, text: impl Into<String>, measure: &dyn TextMeasure) {
		self.question.text = text.into();
		self.layout = text_fit::fit(
			&self.author_name,
			&self.question.text,
			|s| measure.text_width(s),
			&self.style,
		);
	}

	pub fn net_votes(&self) -> i32 {
		net_votes(&self.question_votes)
	}

	/// Record `voter`'s vote on the question, replacing any earlier one.
	///
	/// Only the sign of `value` counts; zero withdraws the vote. Returns
	/// whether the votes changed.
	pub fn cast_vote(&mut self, voter: &str, value: i32) -> bool {
		let value = value.signum();
		let existing = self.question_votes.iter().position(|v| v.voter_agent_id == voter);
		match (existing, value) {
			(None, 0) => false,
			(Some(i), 0) => {
				self.question_votes.remove(i);
				true
			}
			(Some(i), _) if self.question_votes[i].value == value => false,
			(Some(i), _) => {
				self.question_votes[i].value = value;
				true
			}
			(None, _) => {
				self.question_votes.push(Vote {
					value,
					voter_agent_id: voter.to_string(),
				});
				true
			}
		}
	}

	/// Votes cast on one of this node's relations.
	pub fn votes_for_relation(&self, relation_id: &str) -> Option<&[Vote]> {
		self.relation_votes.get(relation_id).map(Vec::as_slice)
	}

	pub fn pin(&mut self, at: Point) {
		self.pinned = Some(at);
	}

	pub fn unpin(&mut self) {
		self.pinned = None;
	}

	/// Structural equality of content, ignoring layout position and display flags.
	///
	/// Collections of different shape compare unequal.
	pub fn is_equal(&self, other: &GraphNode) -> bool {
		let same_votes = |a: &[Vote], b: &[Vote]| {
			a.len() == b.len()
				&& a.iter()
					.zip(b)
					.all(|(x, y)| x.value == y.value && x.voter_agent_id == y.voter_agent_id)
		};
		self.question.id == other.question.id
			&& self.question.timestamp_last_modified == other.question.timestamp_last_modified
			&& self.relations == other.relations
			&& self.layout.lines == other.layout.lines
			&& self.layout.radius == other.layout.radius
			&& self.style == other.style
			&& self.question_votes.len() == other.question_votes.len()
			&& self
				.question_votes
				.iter()
				.zip(&other.question_votes)
				.all(|(a, b)| a.value == b.value)
			&& self.relation_votes.len() == other.relation_votes.len()
			&& self.relations.iter().all(|r| {
				match (
					self.relation_votes.get(&r.relation_id),
					other.relation_votes.get(&r.relation_id),
				) {
					(Some(a), Some(b)) => same_votes(a, b),
					_ => false,
				}
			})
	}

	/// Copy content from a freshly fetched copy of this node.
	///
	/// Returns `false` without touching anything when both are structurally equal.
	pub fn update(&mut self, other: &GraphNode) -> bool {
		if self.is_equal(other) {
			return false;
		}
		self.question = other.question.clone();
		self.author_name = other.author_name.clone();
		self.relations = other.relations.clone();
		self.layout = other.layout.clone();
		self.style = other.style;
		self.question_votes = other.question_votes.clone();
		self.relation_votes = other.relation_votes.clone();
		self.relation_authors = other.relation_authors.clone();
		true
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn mono(s: &str) -> f64 {
		s.chars().count() as f64 * 6.0
	}

	fn vote(value: i32, voter: &str) -> Vote {
		Vote {
			value,
			voter_agent_id: voter.into(),
		}
	}

	fn question(id: QuestionId, text: &str) -> Question {
		Question {
			id,
			text: text.into(),
			author_id: "a1".into(),
			timestamp_last_modified: 100,
			follow_ups: 0,
			votes: vec![vote(1, "a2"), vote(-1, "a3")],
		}
	}

	fn relation(id: &str, from: QuestionId, to: QuestionId, votes: Vec<Vote>) -> Relation {
		Relation {
			relation_id: id.into(),
			from,
			to,
			author_id: "a1".into(),
			votes,
		}
	}

	fn node() -> GraphNode {
		GraphNode::new(
			question(1, "What is a good first question?"),
			"ann",
			&[relation("r1", 1, 2, vec![vote(1, "a2")]), relation("r2", 3, 1, vec![])],
			&mono,
		)
	}

	#[test]
	fn relation_votes_follow_relation_order() {
		let n = node();
		assert_eq!(n.relation_votes.len(), n.relations.len());
		let keys: Vec<&str> = n.relation_votes.keys().map(String::as_str).collect();
		assert_eq!(keys, ["r1", "r2"]);
		assert_eq!(n.votes_for_relation("r2"), Some(&[][..]));
		assert_eq!(n.relation_authors, ["a1", "a1"]);
	}

	#[test]
	fn votes_move_out_of_question() {
		let n = node();
		assert!(n.question.votes.is_empty());
		assert_eq!(n.question_votes.len(), 2);
		assert_eq!(n.net_votes(), 0);
	}

	#[test]
	fn update_with_identical_node_is_noop() {
		let mut n = node();
		n.position = Some(Point::new(4.0, 2.0));
		n.is_selected = true;
		let fresh = node();
		assert!(!n.update(&fresh));
		assert_eq!(n.position, Some(Point::new(4.0, 2.0)));
		assert!(n.is_selected);
	}

	#[test]
	fn update_copies_newer_timestamp() {
		let mut n = node();
		let mut fresh = node();
		fresh.question.timestamp_last_modified = 200;
		fresh.question.text = "changed".into();
		assert!(n.update(&fresh));
		assert_eq!(n.question.timestamp_last_modified, 200);
		assert_eq!(n.question.text, "changed");
		assert!(n.is_equal(&fresh));
	}

	#[test]
	fn update_detects_vote_value_change() {
		let mut n = node();
		let mut fresh = node();
		fresh.question_votes[1].value = 1;
		assert!(n.update(&fresh));
		assert_eq!(n.net_votes(), 2);
	}

	#[test]
	fn update_detects_relation_vote_voter_change() {
		let mut n = node();
		let mut fresh = node();
		fresh.relation_votes["r1"][0].voter_agent_id = "a9".into();
		assert!(n.update(&fresh));
		assert_eq!(n.votes_for_relation("r1").unwrap()[0].voter_agent_id, "a9");
	}

	#[test]
	fn update_detects_relation_list_change() {
		let mut n = node();
		let fresh = GraphNode::new(
			question(1, "What is a good first question?"),
			"ann",
			&[relation("r1", 1, 2, vec![vote(1, "a2")])],
			&mono,
		);
		assert!(n.update(&fresh));
		assert_eq!(n.relations.len(), 1);
		assert_eq!(n.relation_votes.len(), 1);
	}

	#[test]
	fn mismatched_vote_shape_is_unequal() {
		let n = node();
		let mut other = node();
		other.relation_votes.shift_remove("r2");
		other.relation_votes.insert("r9".into(), vec![]);
		assert!(!n.is_equal(&other));
		let mut fewer = node();
		fewer.question_votes.pop();
		assert!(!n.is_equal(&fewer));
	}

	#[test]
	fn set_label_refits() {
		let mut n = node();
		let before = n.radius();
		n.set_label("A considerably longer question that needs a much larger bubble to hold it", &mono);
		assert!(n.radius() > before);
		assert!(n.label().starts_with("ann: A considerably"));
	}

	#[test]
	fn cast_vote_replaces_the_voters_earlier_vote() {
		let mut n = node();
		assert_eq!(n.net_votes(), 0);
		assert!(n.cast_vote("a3", 5));
		assert_eq!(n.net_votes(), 2);
		assert_eq!(n.question_votes.len(), 2);
		assert!(!n.cast_vote("a3", 1));
		assert!(n.cast_vote("a4", -1));
		assert_eq!(n.question_votes.len(), 3);
		assert!(n.cast_vote("a2", 0));
		assert!(!n.cast_vote("a9", 0));
		assert_eq!(n.net_votes(), 0);
	}
}
