use std::rc::Rc;

use log::info;
use serde::{Deserialize, Serialize};

use super::controller::{EDGE_HIT_DISTANCE_SQ, InteractionController};
use super::edge::NodeIdx;
use super::geometry::{Point, ViewTransform, point_in_circle, segment_distance_sq};
use super::graph::QuestionGraph;
use super::layout::LayoutEngine;
use super::mode::InteractionMode;
use super::surface::{Surface, TextMeasure};

/// Host-provided settings, re-read whenever they change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphViewConfig {
	pub width: f64,
	pub height: f64,
	pub interaction_mode: InteractionMode,
	/// Author name put on questions created in this view.
	#[serde(default = "default_viewer")]
	pub viewer_name: String,
}

fn default_viewer() -> String {
	"anonymous".into()
}

impl Default for GraphViewConfig {
	fn default() -> Self {
		Self {
			width: 800.0,
			height: 600.0,
			interaction_mode: InteractionMode::Explore,
			viewer_name: default_viewer(),
		}
	}
}

/// Everything the renderer, the gesture handlers and in-flight fetches share.
pub struct GraphView {
	pub graph: QuestionGraph,
	pub layout: LayoutEngine,
	pub transform: ViewTransform,
	pub controller: InteractionController,
	pub width: f64,
	pub height: f64,
	pub viewer_name: String,
	measure: Rc<dyn TextMeasure>,
}

impl GraphView {
	pub fn new(mut graph: QuestionGraph, config: &GraphViewConfig, measure: Rc<dyn TextMeasure>) -> Self {
		let mut layout = LayoutEngine::new(config.width, config.height);
		layout.register(&mut graph);
		let mut view = Self {
			graph,
			layout,
			transform: ViewTransform::IDENTITY,
			controller: InteractionController::new(),
			width: config.width,
			height: config.height,
			viewer_name: config.viewer_name.clone(),
			measure,
		};
		view.set_mode(config.interaction_mode);
		view
	}

	/// Apply a changed configuration: resize, rebind the mode.
	pub fn apply_config(&mut self, config: &GraphViewConfig) {
		if (config.width, config.height) != (self.width, self.height) {
			self.resize(config.width, config.height);
		}
		self.viewer_name = config.viewer_name.clone();
		self.set_mode(config.interaction_mode);
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		info!("graph view resized to {}x{}", width, height);
		self.width = width;
		self.height = height;
		self.layout.resize(width, height);
	}

	pub fn measure(&self) -> Rc<dyn TextMeasure> {
		self.measure.clone()
	}

	/// Hand the node and edge arrays back to the layout engine and restart it
	/// at full energy. Required after every structural or size change.
	pub fn reregister(&mut self) {
		self.layout.register(&mut self.graph);
		self.layout.reheat();
	}

	/// One simulation step; `true` when the frame needs repainting.
	pub fn tick(&mut self) -> bool {
		self.layout.step(&mut self.graph)
	}

	pub fn draw(&self, surface: &dyn Surface) {
		self.layout
			.draw(surface, &self.graph, &self.transform, (self.width, self.height));
	}

	/// Topmost node under a screen point. Later nodes are drawn on top, so
	/// they are tested first.
	pub fn node_at(&self, screen: Point) -> Option<NodeIdx> {
		let p = self.transform.invert(screen);
		self.graph
			.nodes
			.iter()
			.enumerate()
			.rev()
			.find(|(_, n)| n.position.is_some_and(|c| point_in_circle(c, n.radius(), p)))
			.map(|(i, _)| i)
	}

	/// Last-added edge passing within the hit distance of a screen point.
	pub fn edge_at(&self, screen: Point) -> Option<usize> {
		let p = self.transform.invert(screen);
		(0..self.graph.edges.len()).rev().find(|&i| self.edge_hit(i, p))
	}

	pub(crate) fn node_hit(&self, idx: NodeIdx, graph_point: Point) -> bool {
		self.graph
			.nodes
			.get(idx)
			.and_then(|n| n.position.map(|c| point_in_circle(c, n.radius(), graph_point)))
			.unwrap_or(false)
	}

	pub(crate) fn edge_hit(&self, idx: usize, graph_point: Point) -> bool {
		self.graph
			.edges
			.get(idx)
			.and_then(|e| self.graph.edge_ends(e))
			.is_some_and(|(a, b)| segment_distance_sq(a, b, graph_point) <= EDGE_HIT_DISTANCE_SQ)
	}
}
