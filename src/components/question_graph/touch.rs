//! Touch input folded into the single-pointer gestures of the controller.
//!
//! Browsers follow a tap with emulated mouse events. Cancelling the touch
//! events suppresses them, and mouse input arriving shortly after a touch
//! is ignored as well.

use super::geometry::Point;
use super::mode::Interaction;
use super::view::GraphView;

/// How long after a touch ends mouse input is taken to be emulated.
pub const EMULATED_MOUSE_MS: f64 = 500.0;

/// One step of a touch gesture, in canvas coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TouchStep {
	Down(Point),
	Move(Point),
	Pinch { center: Point, ratio: f64 },
	Cancel,
	Up(Point),
	Idle,
}

/// Tracks the fingers on the canvas between touch events.
#[derive(Clone, Debug, Default)]
pub struct TouchInput {
	/// Finger spread of an active pinch.
	spread: Option<f64>,
	/// Last single-finger position; `touchend` reports no active touches.
	last: Option<Point>,
	ended_at: Option<f64>,
}

impl TouchInput {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn start(&mut self, touches: &[Point]) -> TouchStep {
		match *touches {
			[p] if self.spread.is_none() => {
				self.last = Some(p);
				TouchStep::Down(p)
			}
			[a, b, ..] => {
				self.last = None;
				self.spread = Some(a.distance_sq(b).sqrt());
				TouchStep::Cancel
			}
			_ => TouchStep::Idle,
		}
	}

	pub fn moved(&mut self, touches: &[Point]) -> TouchStep {
		match *touches {
			[p] if self.spread.is_none() => {
				self.last = Some(p);
				TouchStep::Move(p)
			}
			[a, b, ..] => {
				let spread = a.distance_sq(b).sqrt();
				let step = match self.spread.filter(|d| *d > 0.0) {
					Some(previous) => TouchStep::Pinch {
						center: a.midpoint(b),
						ratio: spread / previous,
					},
					None => TouchStep::Idle,
				};
				self.spread = Some(spread);
				step
			}
			_ => TouchStep::Idle,
		}
	}

	/// `remaining` is the number of fingers still down; `at_ms` the event time.
	pub fn end(&mut self, remaining: usize, at_ms: f64) -> TouchStep {
		if remaining > 0 {
			return TouchStep::Idle;
		}
		self.ended_at = Some(at_ms);
		if self.spread.take().is_some() {
			self.last = None;
			return TouchStep::Idle;
		}
		self.last.take().map_or(TouchStep::Idle, TouchStep::Up)
	}

	/// Whether mouse input at `at_ms` is the user's rather than a tap's echo.
	pub fn accepts_mouse(&self, at_ms: f64) -> bool {
		self.ended_at.is_none_or(|t| at_ms - t > EMULATED_MOUSE_MS)
	}
}

impl GraphView {
	/// Feed a touch step to the gesture handlers.
	pub fn apply_touch(&mut self, step: TouchStep) -> Option<Interaction> {
		match step {
			TouchStep::Down(p) => self.pointer_down(p),
			TouchStep::Move(p) => self.pointer_move(p),
			TouchStep::Pinch { center, ratio } => self.pinch(center, ratio),
			TouchStep::Cancel => self.cancel_gesture(),
			TouchStep::Up(p) => return self.pointer_up(p),
			TouchStep::Idle => {}
		}
		None
	}
}

#[cfg(test)]
mod tests {
	use std::rc::Rc;

	use super::*;
	use crate::components::question_graph::graph::QuestionGraph;
	use crate::components::question_graph::mode::InteractionMode;
	use crate::components::question_graph::model::Question;
	use crate::components::question_graph::node::GraphNode;
	use crate::components::question_graph::view::GraphViewConfig;

	fn mono(s: &str) -> f64 {
		s.chars().count() as f64 * 6.0
	}

	fn view(mode: InteractionMode) -> GraphView {
		let q = Question {
			id: 1,
			text: "q".into(),
			author_id: "a".into(),
			timestamp_last_modified: 0,
			follow_ups: 0,
			votes: vec![],
		};
		let mut n = GraphNode::new(q, "ann", &[], &mono);
		n.position = Some(Point::new(100.0, 100.0));
		let mut graph = QuestionGraph::new();
		graph.push_node(n);
		let config = GraphViewConfig {
			interaction_mode: mode,
			..GraphViewConfig::default()
		};
		GraphView::new(graph, &config, Rc::new(mono))
	}

	#[test]
	fn tap_fires_once_despite_emulated_mouse() {
		let mut v = view(InteractionMode::AddQuestion);
		let mut touch = TouchInput::new();
		let p = Point::new(102.0, 100.0);
		let mut fired = Vec::new();

		fired.extend(v.apply_touch(touch.start(&[p])));
		fired.extend(v.apply_touch(touch.end(0, 1000.0)));
		// The browser's mouse echo of the same tap.
		for at in [1010.0, 1020.0] {
			if touch.accepts_mouse(at) {
				v.pointer_down(p);
				fired.extend(v.pointer_up(p));
			}
		}
		assert_eq!(fired, [Interaction::AddChild(0)]);
		assert!(touch.accepts_mouse(1600.0));
	}

	#[test]
	fn mouse_is_accepted_before_any_touch() {
		assert!(TouchInput::new().accepts_mouse(0.0));
	}

	#[test]
	fn one_finger_drags() {
		let mut v = view(InteractionMode::Explore);
		let mut touch = TouchInput::new();
		v.apply_touch(touch.start(&[Point::new(100.0, 100.0)]));
		v.apply_touch(touch.moved(&[Point::new(140.0, 120.0)]));
		assert_eq!(v.graph.nodes[0].pinned, Some(Point::new(140.0, 120.0)));
		assert_eq!(v.apply_touch(touch.end(0, 0.0)), None);
		assert_eq!(v.graph.nodes[0].pinned, None);
	}

	#[test]
	fn two_fingers_pinch_without_tapping() {
		let mut v = view(InteractionMode::Explore);
		let mut touch = TouchInput::new();
		let (a, b) = (Point::new(300.0, 300.0), Point::new(400.0, 300.0));
		assert_eq!(touch.start(&[a]), TouchStep::Down(a));
		assert_eq!(v.apply_touch(touch.start(&[a, b])), None);
		v.apply_touch(touch.moved(&[Point::new(250.0, 300.0), Point::new(450.0, 300.0)]));
		assert!((v.transform.k - 2.0).abs() < 1e-9);
		// Lifting one finger, then the other, is not a tap.
		assert_eq!(touch.end(1, 0.0), TouchStep::Idle);
		assert_eq!(touch.moved(&[b]), TouchStep::Idle);
		assert_eq!(touch.end(0, 0.0), TouchStep::Idle);
		assert_eq!(touch.start(&[a]), TouchStep::Down(a));
	}
}
