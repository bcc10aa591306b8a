//! Contract for the external collaborator that serves questions and relations.

use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

use super::model::{Question, QuestionId, Relation};

pub type DataResult<T> = Result<T, DataError>;

/// Errors raised while fetching graph data.
#[derive(Debug, Error)]
pub enum DataError {
	/// No question with this id exists.
	#[error("question not found: {id}")]
	NotFound { id: QuestionId },

	/// The backend could not serve the request.
	#[error("data source unavailable: {0}")]
	Unavailable(String),

	/// A payload could not be decoded.
	#[error("malformed graph data: {0}")]
	Malformed(#[from] serde_json::Error),
}

/// Read-only access to questions, relations and agent names.
///
/// Futures run on the single UI thread, so implementations need not be `Send`.
#[allow(async_fn_in_trait)]
pub trait DataSource {
	async fn question(&self, id: QuestionId) -> DataResult<Question>;

	/// Every relation that has `id` as one of its endpoints.
	async fn relations_for_question(&self, id: QuestionId) -> DataResult<Vec<Relation>>;

	/// Display name of an agent.
	async fn agent_name(&self, agent_id: &str) -> DataResult<String>;
}

/// A data source held entirely in memory.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct MemoryDataSource {
	questions: Vec<Question>,
	relations: Vec<Relation>,
	#[serde(default)]
	agents: HashMap<String, String>,
}

impl MemoryDataSource {
	pub fn new(questions: Vec<Question>, relations: Vec<Relation>) -> Self {
		Self {
			questions,
			relations,
			agents: HashMap::new(),
		}
	}

	/// Parse `{ "questions": [...], "relations": [...], "agents": {...} }`.
	pub fn from_json(json: &str) -> DataResult<Self> {
		Ok(serde_json::from_str(json)?)
	}

	pub fn with_agent(mut self, agent_id: impl Into<String>, name: impl Into<String>) -> Self {
		self.agents.insert(agent_id.into(), name.into());
		self
	}

	pub fn len(&self) -> usize {
		self.questions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.questions.is_empty()
	}
}

impl DataSource for MemoryDataSource {
	async fn question(&self, id: QuestionId) -> DataResult<Question> {
		self.questions
			.iter()
			.find(|q| q.id == id)
			.cloned()
			.ok_or(DataError::NotFound { id })
	}

	async fn relations_for_question(&self, id: QuestionId) -> DataResult<Vec<Relation>> {
		Ok(self
			.relations
			.iter()
			.filter(|r| r.from == id || r.to == id)
			.cloned()
			.collect())
	}

	async fn agent_name(&self, agent_id: &str) -> DataResult<String> {
		self.agents
			.get(agent_id)
			.cloned()
			.ok_or_else(|| DataError::Unavailable(format!("no agent {}", agent_id)))
	}
}

#[cfg(test)]
mod tests {
	use futures::executor::block_on;

	use super::*;

	const SPACE: &str = r#"{
		"questions": [
			{ "id": 1, "text": "Root", "authorId": "a1", "followUps": 2,
			  "votes": [{ "value": 1, "voterAgentId": "a2" }] },
			{ "id": 2, "text": "Child", "authorId": "a2" }
		],
		"relations": [
			{ "relationId": "r1", "from": 1, "to": 2 }
		],
		"agents": { "a1": "ann" }
	}"#;

	#[test]
	fn parses_camel_case_json() {
		let source = MemoryDataSource::from_json(SPACE).unwrap();
		assert_eq!(source.len(), 2);
		let root = block_on(source.question(1)).unwrap();
		assert_eq!(root.follow_ups, 2);
		assert_eq!(root.votes[0].voter_agent_id, "a2");
		let child = block_on(source.question(2)).unwrap();
		assert!(child.votes.is_empty());
		assert_eq!(child.timestamp_last_modified, 0);
	}

	#[test]
	fn relations_match_either_endpoint() {
		let source = MemoryDataSource::from_json(SPACE).unwrap();
		assert_eq!(block_on(source.relations_for_question(1)).unwrap().len(), 1);
		assert_eq!(block_on(source.relations_for_question(2)).unwrap().len(), 1);
		assert!(block_on(source.relations_for_question(3)).unwrap().is_empty());
	}

	#[test]
	fn missing_question_is_not_found() {
		let source = MemoryDataSource::from_json(SPACE).unwrap();
		assert!(matches!(block_on(source.question(9)), Err(DataError::NotFound { id: 9 })));
	}

	#[test]
	fn unknown_agent_is_an_error() {
		let source = MemoryDataSource::from_json(SPACE).unwrap();
		assert_eq!(block_on(source.agent_name("a1")).unwrap(), "ann");
		assert!(block_on(source.agent_name("a2")).is_err());
	}

	#[test]
	fn bad_json_is_malformed() {
		assert!(matches!(MemoryDataSource::from_json("{"), Err(DataError::Malformed(_))));
	}
}
