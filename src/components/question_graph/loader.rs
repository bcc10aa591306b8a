use futures::future::try_join_all;
use log::{info, warn};

use super::graph::QuestionGraph;
use super::model::{QuestionId, Relation};
use super::node::GraphNode;
use super::source::{DataResult, DataSource};
use super::surface::TextMeasure;

/// Shown when an author's name cannot be resolved.
pub const UNKNOWN_AUTHOR: &str = "unknown";

/// Fetch a question with its relations and author name, and build its node.
///
/// Returns the relations as well so callers can wire edges.
pub async fn fetch_node<D: DataSource>(
	source: &D,
	id: QuestionId,
	measure: &dyn TextMeasure,
) -> DataResult<(GraphNode, Vec<Relation>)> {
	let (question, relations) =
		futures::try_join!(source.question(id), source.relations_for_question(id))?;
	let author = source
		.agent_name(&question.author_id)
		.await
		.unwrap_or_else(|_| UNKNOWN_AUTHOR.to_string());
	let node = GraphNode::new(question, author, &relations, measure);
	Ok((node, relations))
}

/// Load the seed question and its direct neighbours.
pub async fn load_graph<D: DataSource>(
	source: &D,
	seed: QuestionId,
	measure: &dyn TextMeasure,
) -> DataResult<QuestionGraph> {
	let (seed_node, relations) = fetch_node(source, seed, measure).await?;

	let mut neighbours: Vec<QuestionId> = Vec::new();
	for r in &relations {
		let other = r.other_end(seed);
		if other != seed && !neighbours.contains(&other) {
			neighbours.push(other);
		}
	}
	let fetched = try_join_all(neighbours.iter().map(|&id| fetch_node(source, id, measure))).await?;

	let mut graph = QuestionGraph::new();
	graph.push_node(seed_node.seed());
	for (node, _) in fetched {
		graph.push_node(node);
	}
	for r in &relations {
		if let Err(err) = graph.connect(r.from, r.to, Some(r.relation_id.clone())) {
			warn!("skipping relation {}: {}", r.relation_id, err);
		}
	}
	info!(
		"loaded question {}: {} nodes, {} edges",
		seed,
		graph.nodes.len(),
		graph.edges.len()
	);
	Ok(graph)
}
