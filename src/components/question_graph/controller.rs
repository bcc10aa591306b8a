//! Pointer gestures and the interaction mode state machine.
//!
//! The subject of a gesture is decided once, on pointer-down. In pan-capable
//! modes a gesture without a subject pans the canvas; a gesture with one never
//! does. A click action only fires when the pointer is released over the same
//! subject it went down on.

use log::info;

use super::edge::NodeIdx;
use super::geometry::{Point, ViewTransform};
use super::layout::DRAG_ALPHA_TARGET;
use super::mode::{Behavior, Interaction, InteractionMode, Subject};
use super::view::GraphView;

/// Allowed range of the zoom factor.
pub const ZOOM_EXTENT: (f64, f64) = (0.25, 4.0);
/// An edge is hit within this squared distance, in graph units.
pub const EDGE_HIT_DISTANCE_SQ: f64 = 100.0;
/// Wheel delta to zoom exponent, per pixel.
const WHEEL_SENSITIVITY: f64 = 0.002;

#[derive(Clone, Copy, Debug, PartialEq)]
enum Gesture {
	Grab {
		subject: Subject,
		/// Offset from the pointer to the grabbed node, graph units.
		offset: Point,
	},
	Pan {
		origin: Point,
		start: ViewTransform,
	},
}

/// The active mode, its bound behavior and the gesture in progress.
#[derive(Clone, Debug)]
pub struct InteractionController {
	mode: Option<InteractionMode>,
	behavior: Behavior,
	gesture: Option<Gesture>,
	bindings: u32,
}

impl Default for InteractionController {
	fn default() -> Self {
		Self::new()
	}
}

impl InteractionController {
	pub fn new() -> Self {
		Self {
			mode: None,
			behavior: Behavior::Explore,
			gesture: None,
			bindings: 0,
		}
	}

	pub fn mode(&self) -> Option<InteractionMode> {
		self.mode
	}

	/// How many times gesture handling has been rebound.
	pub fn bindings(&self) -> u32 {
		self.bindings
	}

	pub fn is_panning(&self) -> bool {
		matches!(self.gesture, Some(Gesture::Pan { .. }))
	}

	pub fn grabbed(&self) -> Option<Subject> {
		match self.gesture {
			Some(Gesture::Grab { subject, .. }) => Some(subject),
			_ => None,
		}
	}
}

impl GraphView {
	/// Switch interaction mode. Re-entering the active mode is a no-op and
	/// returns `false`.
	pub fn set_mode(&mut self, mode: InteractionMode) -> bool {
		if self.controller.mode == Some(mode) {
			return false;
		}
		self.cancel_gesture();
		self.controller.behavior = Behavior::for_mode(mode);
		self.controller.mode = Some(mode);
		self.controller.bindings += 1;
		info!("interaction mode {:?} bound as {:?}", mode, self.controller.behavior);
		true
	}

	fn subject_at(&self, screen: Point) -> Option<Subject> {
		if self.controller.behavior.grabs_edges() {
			self.edge_at(screen).map(Subject::Edge)
		} else {
			self.node_at(screen).map(Subject::Node)
		}
	}

	fn still_over(&self, subject: Subject, screen: Point) -> bool {
		let p = self.transform.invert(screen);
		match subject {
			Subject::Node(idx) => self.node_hit(idx, p),
			Subject::Edge(idx) => self.edge_hit(idx, p),
		}
	}

	pub fn pointer_down(&mut self, screen: Point) {
		let behavior = self.controller.behavior;
		self.controller.gesture = match self.subject_at(screen) {
			Some(subject) => {
				let mut offset = Point::default();
				if let (true, Subject::Node(idx)) = (behavior.drags(), subject) {
					let pointer = self.transform.invert(screen);
					if let Some(node) = self.graph.nodes.get_mut(idx) {
						let at = node.position.unwrap_or(pointer);
						offset = at - pointer;
						node.pin(at);
					}
					self.layout.set_alpha_target(DRAG_ALPHA_TARGET);
				}
				Some(Gesture::Grab { subject, offset })
			}
			None if behavior.pans() => Some(Gesture::Pan {
				origin: screen,
				start: self.transform,
			}),
			None => None,
		};
	}

	pub fn pointer_move(&mut self, screen: Point) {
		match self.controller.gesture {
			Some(Gesture::Grab {
				subject: Subject::Node(idx),
				offset,
			}) if self.controller.behavior.drags() => {
				let at = self.transform.invert(screen) + offset;
				if let Some(node) = self.graph.nodes.get_mut(idx) {
					node.pin(at);
				}
			}
			Some(Gesture::Pan { origin, start }) => {
				self.transform.x = start.x + (screen.x - origin.x);
				self.transform.y = start.y + (screen.y - origin.y);
				self.layout.restart();
			}
			_ => {}
		}
	}

	/// End the gesture. Returns the action to carry out when the pointer is
	/// released over the subject it grabbed.
	pub fn pointer_up(&mut self, screen: Point) -> Option<Interaction> {
		let gesture = self.controller.gesture.take()?;
		let Gesture::Grab { subject, .. } = gesture else {
			return None;
		};
		if let Subject::Node(idx) = subject {
			self.release(idx);
		}
		if !self.still_over(subject, screen) {
			return None;
		}
		self.controller.behavior.interact_with(subject)
	}

	/// Abandon the gesture without any action, e.g. when the pointer leaves.
	pub fn cancel_gesture(&mut self) {
		if let Some(Gesture::Grab {
			subject: Subject::Node(idx),
			..
		}) = self.controller.gesture.take()
		{
			self.release(idx);
		}
	}

	fn release(&mut self, idx: NodeIdx) {
		if !self.controller.behavior.drags() {
			return;
		}
		if let Some(node) = self.graph.nodes.get_mut(idx) {
			node.unpin();
		}
		self.layout.set_alpha_target(0.0);
	}

	/// Zoom around the pointer by a wheel delta in pixels.
	pub fn wheel(&mut self, screen: Point, delta_y: f64) {
		self.zoom_by(screen, 2f64.powf(-delta_y * WHEEL_SENSITIVITY));
	}

	/// Zoom around `center` by a two-finger pinch ratio.
	pub fn pinch(&mut self, center: Point, ratio: f64) {
		self.zoom_by(center, ratio);
	}

	fn zoom_by(&mut self, anchor: Point, factor: f64) {
		if !self.controller.behavior.pans() || !factor.is_finite() || factor <= 0.0 {
			return;
		}
		self.transform = self.transform.zoom_about(anchor, factor, ZOOM_EXTENT);
		self.layout.restart();
	}
}

#[cfg(test)]
mod tests {
	use std::rc::Rc;

	use super::*;
	use crate::components::question_graph::graph::QuestionGraph;
	use crate::components::question_graph::model::Question;
	use crate::components::question_graph::node::GraphNode;
	use crate::components::question_graph::view::GraphViewConfig;

	fn mono(s: &str) -> f64 {
		s.chars().count() as f64 * 6.0
	}

	fn view(mode: InteractionMode) -> GraphView {
		let mut graph = QuestionGraph::new();
		for (id, x) in [(1, 100.0), (2, 400.0)] {
			let q = Question {
				id,
				text: "q".into(),
				author_id: "a".into(),
				timestamp_last_modified: 0,
				follow_ups: 0,
				votes: vec![],
			};
			let mut n = GraphNode::new(q, "ann", &[], &mono);
			n.position = Some(Point::new(x, 100.0));
			graph.push_node(n);
		}
		graph.connect(1, 2, Some("r1".into())).unwrap();
		let config = GraphViewConfig {
			interaction_mode: mode,
			..GraphViewConfig::default()
		};
		GraphView::new(graph, &config, Rc::new(mono))
	}

	#[test]
	fn same_mode_twice_does_not_rebind() {
		let mut v = view(InteractionMode::Explore);
		assert_eq!(v.controller.bindings(), 1);
		assert!(!v.set_mode(InteractionMode::Explore));
		assert_eq!(v.controller.bindings(), 1);
		assert!(v.set_mode(InteractionMode::EditQuestion));
		assert!(!v.set_mode(InteractionMode::EditQuestion));
		assert_eq!(v.controller.bindings(), 2);
	}

	#[test]
	fn explore_drag_pins_then_releases() {
		let mut v = view(InteractionMode::Explore);
		v.pointer_down(Point::new(102.0, 100.0));
		assert_eq!(v.controller.grabbed(), Some(Subject::Node(0)));
		assert_eq!(v.layout.simulation().alpha_target(), DRAG_ALPHA_TARGET);
		v.pointer_move(Point::new(152.0, 130.0));
		assert_eq!(v.graph.nodes[0].pinned, Some(Point::new(150.0, 130.0)));
		assert!(!v.controller.is_panning());
		assert_eq!(v.transform, ViewTransform::IDENTITY);
		assert_eq!(v.pointer_up(Point::new(152.0, 130.0)), None);
		assert_eq!(v.graph.nodes[0].pinned, None);
		assert_eq!(v.layout.simulation().alpha_target(), 0.0);
	}

	#[test]
	fn explore_background_drag_pans() {
		let mut v = view(InteractionMode::Explore);
		v.pointer_down(Point::new(250.0, 300.0));
		assert!(v.controller.is_panning());
		v.pointer_move(Point::new(270.0, 290.0));
		assert_eq!(v.transform, ViewTransform { x: 20.0, y: -10.0, k: 1.0 });
		assert_eq!(v.pointer_up(Point::new(270.0, 290.0)), None);
		assert!(!v.controller.is_panning());
	}

	#[test]
	fn wheel_zoom_is_clamped() {
		let mut v = view(InteractionMode::Explore);
		for _ in 0..50 {
			v.wheel(Point::new(0.0, 0.0), -500.0);
		}
		assert_eq!(v.transform.k, ZOOM_EXTENT.1);
		for _ in 0..50 {
			v.wheel(Point::new(0.0, 0.0), 500.0);
		}
		assert_eq!(v.transform.k, ZOOM_EXTENT.0);
	}

	#[test]
	fn edit_mode_click_on_node_edits_without_moving() {
		let mut v = view(InteractionMode::EditQuestion);
		v.pointer_down(Point::new(100.0, 100.0));
		v.pointer_move(Point::new(105.0, 100.0));
		assert_eq!(v.graph.nodes[0].pinned, None);
		assert_eq!(v.pointer_up(Point::new(105.0, 100.0)), Some(Interaction::Inspect(0)));
	}

	#[test]
	fn release_away_from_subject_does_nothing() {
		let mut v = view(InteractionMode::SelectAndNavigate);
		v.pointer_down(Point::new(100.0, 100.0));
		assert_eq!(v.pointer_up(Point::new(250.0, 300.0)), None);
	}

	#[test]
	fn semantic_modes_neither_pan_nor_zoom() {
		let mut v = view(InteractionMode::AddQuestion);
		v.pointer_down(Point::new(250.0, 300.0));
		v.pointer_move(Point::new(300.0, 350.0));
		v.wheel(Point::new(0.0, 0.0), -500.0);
		assert_eq!(v.transform, ViewTransform::IDENTITY);
		assert_eq!(v.pointer_up(Point::new(300.0, 350.0)), None);
	}

	#[test]
	fn edit_relation_grabs_edges() {
		let mut v = view(InteractionMode::EditRelation);
		v.pointer_down(Point::new(250.0, 105.0));
		assert_eq!(v.controller.grabbed(), Some(Subject::Edge(0)));
		assert_eq!(v.pointer_up(Point::new(250.0, 104.0)), Some(Interaction::SelectEdge(0)));
	}

	#[test]
	fn explore_round_trip_restores_pan_zoom() {
		let mut v = view(InteractionMode::Explore);
		v.set_mode(InteractionMode::EditQuestion);
		v.pointer_down(Point::new(250.0, 300.0));
		assert!(!v.controller.is_panning());
		v.pointer_up(Point::new(250.0, 300.0));

		v.set_mode(InteractionMode::Explore);
		v.pointer_down(Point::new(250.0, 300.0));
		assert!(v.controller.is_panning());
		v.pointer_up(Point::new(250.0, 300.0));
		v.wheel(Point::new(0.0, 0.0), -100.0);
		assert!(v.transform.k > 1.0);
		assert_eq!(v.pointer_up(Point::new(100.0, 100.0)), None);
	}

	#[test]
	fn mode_switch_releases_dragged_node() {
		let mut v = view(InteractionMode::Explore);
		v.pointer_down(Point::new(100.0, 100.0));
		assert!(v.graph.nodes[0].pinned.is_some());
		v.set_mode(InteractionMode::SelectAndNavigate);
		assert_eq!(v.graph.nodes[0].pinned, None);
		assert_eq!(v.controller.grabbed(), None);
	}

	#[test]
	fn pinch_zooms_only_when_panning_allowed() {
		let mut v = view(InteractionMode::Explore);
		v.pinch(Point::new(10.0, 10.0), 2.0);
		assert_eq!(v.transform.k, 2.0);
		v.set_mode(InteractionMode::EditRelation);
		v.pinch(Point::new(10.0, 10.0), 2.0);
		assert_eq!(v.transform.k, 2.0);
	}
}
