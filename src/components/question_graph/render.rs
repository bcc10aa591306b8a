use std::f64::consts::PI;

use super::edge::Edge;
use super::graph::QuestionGraph;
use super::node::GraphNode;
use super::scale;
use super::surface::Surface;

/// Angle where the notch in every bubble begins.
const NOTCH_START: f64 = PI / 8.0;
/// Angular width of the notch.
const NOTCH_WIDTH: f64 = PI / 16.0;
/// At most this many follow-up shadows are stacked behind a bubble.
const MAX_FOLLOW_UPS: u32 = 4;
const FOLLOW_UP_OFFSET: f64 = 4.0;

const EDGE_COLOR: &str = "#999";
const SELECTED_EDGE_COLOR: &str = "#1f77b4";

pub fn draw_edge(surface: &dyn Surface, graph: &QuestionGraph, edge: &Edge) {
	let Some((a, b)) = graph.edge_ends(edge) else {
		return;
	};
	surface.begin_path();
	surface.move_to(a.x, a.y);
	surface.line_to(b.x, b.y);
	if edge.is_selected {
		surface.set_line_dash(&[8.0, 4.0]);
		surface.stroke(SELECTED_EDGE_COLOR, 3.0);
		surface.set_line_dash(&[]);
	} else {
		surface.stroke(EDGE_COLOR, 1.0);
	}
}

pub fn draw_node(surface: &dyn Surface, node: &GraphNode) {
	let Some(p) = node.position else {
		return;
	};
	let radius = node.radius();
	let scale_factor = node.style().bubble_scale;

	for i in 1..=node.question.follow_ups.min(MAX_FOLLOW_UPS) {
		let alpha = 1.0 - 0.2 * i as f64;
		let offset = i as f64 * FOLLOW_UP_OFFSET;
		bubble(surface, p.x + offset, p.y + offset, radius, scale_factor);
		surface.stroke(&format!("rgba(0, 0, 0, {})", alpha), 1.0);
	}

	let border = scale::vote_color(node.net_votes(), node.question_votes.len());
	bubble(surface, p.x, p.y, radius, scale_factor);
	surface.stroke(&border, if node.is_selected { 3.0 } else { 1.0 });
	surface.fill("#fff");

	let style = node.style();
	let font = style.font(node.is_seed);
	let lines = node.lines();
	let top = p.y - style.line_height * lines.len() as f64 / 2.0;
	for (i, line) in lines.iter().enumerate() {
		if line.is_empty() {
			continue;
		}
		surface.fill_text(line, p.x, top + i as f64 * style.line_height, &font, "#000");
	}
}

/// Trace a notched circle. The arcs run at the inner radius, the notch
/// reaches out to the full radius.
fn bubble(surface: &dyn Surface, x: f64, y: f64, radius: f64, scale_factor: f64) {
	let inner = radius / scale_factor;
	let tip = NOTCH_START + NOTCH_WIDTH / 2.0;
	surface.begin_path();
	surface.move_to(x + inner, y);
	surface.arc(x, y, inner, 0.0, NOTCH_START);
	surface.line_to(x + tip.cos() * radius, y + tip.sin() * radius);
	surface.arc(x, y, inner, NOTCH_START + NOTCH_WIDTH, 2.0 * PI);
}
