use log::debug;

use super::geometry::{Point, ViewTransform};
use super::graph::QuestionGraph;
use super::render;
use super::simulation::{Simulation, SimulationParameters};
use super::surface::Surface;

/// Sustained energy while a node is dragged.
pub const DRAG_ALPHA_TARGET: f64 = 0.3;

/// Drives the force simulation over the graph and repaints it every tick.
#[derive(Clone, Debug)]
pub struct LayoutEngine {
	simulation: Simulation,
	registered: (usize, usize),
}

impl LayoutEngine {
	pub fn new(width: f64, height: f64) -> Self {
		Self::with_parameters(SimulationParameters::default(), width, height)
	}

	pub fn with_parameters(params: SimulationParameters, width: f64, height: f64) -> Self {
		Self {
			simulation: Simulation::new(params, Point::new(width / 2.0, height / 2.0)),
			registered: (0, 0),
		}
	}

	pub fn simulation(&self) -> &Simulation {
		&self.simulation
	}

	/// Hand the current arrays to the engine: place new nodes and rebind
	/// link rest lengths. Must follow every change to the node or edge list.
	pub fn register(&mut self, graph: &mut QuestionGraph) {
		self.simulation.initialize_nodes(&mut graph.nodes);
		self.simulation.bind_links(&graph.nodes, &graph.edges);
		self.registered = (graph.nodes.len(), graph.edges.len());
		debug!(
			"layout registered {} nodes, {} edges",
			graph.nodes.len(),
			graph.edges.len()
		);
	}

	/// Whether the engine has seen the graph's current arrays.
	pub fn is_registered(&self, graph: &QuestionGraph) -> bool {
		self.registered == (graph.nodes.len(), graph.edges.len())
	}

	/// Full-energy restart so new or changed elements settle.
	pub fn reheat(&mut self) {
		self.simulation.set_alpha(1.0);
		self.simulation.restart();
	}

	pub fn restart(&mut self) {
		self.simulation.restart();
	}

	pub fn set_alpha_target(&mut self, target: f64) {
		self.simulation.set_alpha_target(target);
		self.simulation.restart();
	}

	pub fn is_running(&self) -> bool {
		self.simulation.is_running()
	}

	/// Recenter the center force on a resized viewport.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.simulation.set_center(Point::new(width / 2.0, height / 2.0));
		self.simulation.restart();
	}

	/// Advance one tick if the simulation is running.
	pub fn step(&mut self, graph: &mut QuestionGraph) -> bool {
		self.simulation.step(&mut graph.nodes)
	}

	/// Repaint the viewport: clear, apply the pan/zoom transform, draw every
	/// edge and then every node on top.
	pub fn draw(
		&self,
		surface: &dyn Surface,
		graph: &QuestionGraph,
		transform: &ViewTransform,
		(width, height): (f64, f64),
	) {
		surface.save();
		surface.clear(width, height);
		surface.translate(transform.x, transform.y);
		surface.scale(transform.k);
		for edge in &graph.edges {
			render::draw_edge(surface, graph, edge);
		}
		for node in &graph.nodes {
			render::draw_node(surface, node);
		}
		surface.restore();
	}
}
