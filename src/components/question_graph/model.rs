use serde::{Deserialize, Serialize};

/// Identifier of a question; new ids are allocated as `max + 1`.
pub type QuestionId = u64;
/// Identifier of a relation between two questions.
pub type RelationId = String;

/// One agent's vote on a question or relation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
	/// +1 or -1.
	pub value: i32,
	pub voter_agent_id: String,
}

/// A question as served by the data source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
	pub id: QuestionId,
	pub text: String,
	pub author_id: String,
	/// Milliseconds since the epoch.
	#[serde(default)]
	pub timestamp_last_modified: i64,
	/// Number of follow-up questions asked below this one.
	#[serde(default)]
	pub follow_ups: u32,
	#[serde(default)]
	pub votes: Vec<Vote>,
}

/// A directed relation as delivered by the data source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relation {
	pub relation_id: RelationId,
	/// The question the relation starts at.
	pub from: QuestionId,
	pub to: QuestionId,
	#[serde(default)]
	pub author_id: String,
	#[serde(default)]
	pub votes: Vec<Vote>,
}

impl Relation {
	/// The endpoint that is not `id`.
	pub fn other_end(&self, id: QuestionId) -> QuestionId {
		if self.from == id { self.to } else { self.from }
	}

	/// The relation without its author and votes.
	pub fn to_ref(&self) -> RelationRef {
		RelationRef {
			relation_id: self.relation_id.clone(),
			from: self.from,
			to: self.to,
		}
	}
}

/// The part of a relation a node keeps for itself.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationRef {
	pub relation_id: RelationId,
	pub from: QuestionId,
	pub to: QuestionId,
}

/// Sum of vote values.
pub fn net_votes(votes: &[Vote]) -> i32 {
	votes.iter().map(|v| v.value).sum()
}
