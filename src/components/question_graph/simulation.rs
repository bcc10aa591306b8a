//! Velocity-Verlet force simulation in the style of d3-force.
//!
//! Each tick cools `alpha` toward `alpha_target`, accumulates the link,
//! many-body, center and collide forces into node velocities, then moves
//! every node not pinned by a drag. The simulation stops once `alpha` falls
//! below `alpha_min` and resumes on `restart`.

use std::f64::consts::PI;

use super::edge::{Edge, NodeIdx};
use super::geometry::Point;
use super::node::GraphNode;

const INITIAL_RADIUS: f64 = 10.0;

#[derive(Clone, Debug, PartialEq)]
pub struct SimulationParameters {
	pub alpha_min: f64,
	pub alpha_decay: f64,
	pub velocity_decay: f64,
	/// Negative values repel.
	pub charge_strength: f64,
	/// Below this distance the many-body force stops growing.
	pub charge_distance_min: f64,
	/// Exclusion radius as a multiple of the bubble radius.
	pub collide_scale: f64,
	pub collide_strength: f64,
}

impl Default for SimulationParameters {
	fn default() -> Self {
		let alpha_min = 0.001;
		Self {
			alpha_min,
			alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
			velocity_decay: 0.4,
			charge_strength: -30.0,
			charge_distance_min: 1.0,
			collide_scale: 1.2,
			collide_strength: 1.0,
		}
	}
}

/// A spring between two nodes, bound from an `Edge`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Link {
	pub source: NodeIdx,
	pub target: NodeIdx,
	pub distance: f64,
	strength: f64,
	bias: f64,
}

/// Deterministic generator for the tiny offsets that separate coincident nodes.
#[derive(Clone, Debug)]
struct Lcg(u64);

impl Lcg {
	fn next(&mut self) -> f64 {
		self.0 = (1_664_525 * self.0 + 1_013_904_223) % 4_294_967_296;
		self.0 as f64 / 4_294_967_296.0
	}

	fn jiggle(&mut self) -> f64 {
		(self.next() - 0.5) * 1e-6
	}
}

#[derive(Clone, Debug)]
pub struct Simulation {
	pub params: SimulationParameters,
	alpha: f64,
	alpha_target: f64,
	running: bool,
	center: Point,
	links: Vec<Link>,
	random: Lcg,
}

impl Simulation {
	pub fn new(params: SimulationParameters, center: Point) -> Self {
		Self {
			params,
			alpha: 1.0,
			alpha_target: 0.0,
			running: true,
			center,
			links: Vec::new(),
			random: Lcg(1),
		}
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn set_alpha(&mut self, alpha: f64) {
		self.alpha = alpha;
	}

	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	pub fn set_alpha_target(&mut self, target: f64) {
		self.alpha_target = target;
	}

	pub fn is_running(&self) -> bool {
		self.running
	}

	pub fn restart(&mut self) {
		self.running = true;
	}

	pub fn center(&self) -> Point {
		self.center
	}

	pub fn set_center(&mut self, center: Point) {
		self.center = center;
	}

	pub fn links(&self) -> &[Link] {
		&self.links
	}

	/// Give unplaced nodes a position on a phyllotaxis spiral around the
	/// center and clear non-finite velocities.
	pub fn initialize_nodes(&mut self, nodes: &mut [GraphNode]) {
		let angle_step = PI * (3.0 - 5.0_f64.sqrt());
		for (i, node) in nodes.iter_mut().enumerate() {
			if node.position.is_none() {
				let (r, a) = (INITIAL_RADIUS * (0.5 + i as f64).sqrt(), i as f64 * angle_step);
				node.position = Some(
					node.pinned
						.unwrap_or(Point::new(self.center.x + r * a.cos(), self.center.y + r * a.sin())),
				);
			}
			if !node.velocity.x.is_finite() || !node.velocity.y.is_finite() {
				node.velocity = Point::default();
			}
		}
	}

	/// Rebind the link force to `edges`, recomputing rest lengths and the
	/// degree-based strength and bias of every link.
	pub fn bind_links(&mut self, nodes: &[GraphNode], edges: &[Edge]) {
		let mut degree = vec![0usize; nodes.len()];
		for e in edges {
			if e.source < nodes.len() && e.target < nodes.len() {
				degree[e.source] += 1;
				degree[e.target] += 1;
			}
		}
		self.links = edges
			.iter()
			.filter(|e| e.source < nodes.len() && e.target < nodes.len())
			.map(|e| {
				let (s, t) = (degree[e.source] as f64, degree[e.target] as f64);
				Link {
					source: e.source,
					target: e.target,
					distance: e.distance(nodes),
					strength: 1.0 / s.min(t),
					bias: s / (s + t),
				}
			})
			.collect();
	}

	/// Advance one tick if running. Returns whether a tick happened.
	pub fn step(&mut self, nodes: &mut [GraphNode]) -> bool {
		if !self.running {
			return false;
		}
		self.tick(nodes);
		if self.alpha < self.params.alpha_min {
			self.running = false;
		}
		true
	}

	pub fn tick(&mut self, nodes: &mut [GraphNode]) {
		self.alpha += (self.alpha_target - self.alpha) * self.params.alpha_decay;
		self.initialize_nodes(nodes);

		self.apply_links(nodes);
		self.apply_charge(nodes);
		self.apply_center(nodes);
		self.apply_collide(nodes);

		let keep = 1.0 - self.params.velocity_decay;
		for node in nodes.iter_mut() {
			let Some(p) = node.position else { continue };
			match node.pinned {
				Some(pin) => {
					node.position = Some(pin);
					node.velocity = Point::default();
				}
				None => {
					node.velocity = Point::new(node.velocity.x * keep, node.velocity.y * keep);
					node.position = Some(p + node.velocity);
				}
			}
		}
	}

	fn apply_links(&mut self, nodes: &mut [GraphNode]) {
		let alpha = self.alpha;
		for link in &self.links {
			let (Some(s), Some(t)) = (nodes.get(link.source), nodes.get(link.target)) else {
				continue;
			};
			let (Some(sp), Some(tp)) = (s.position, t.position) else { continue };
			let mut x = tp.x + t.velocity.x - sp.x - s.velocity.x;
			let mut y = tp.y + t.velocity.y - sp.y - s.velocity.y;
			if x == 0.0 {
				x = self.random.jiggle();
			}
			if y == 0.0 {
				y = self.random.jiggle();
			}
			let l = (x * x + y * y).sqrt();
			let l = (l - link.distance) / l * alpha * link.strength;
			let (x, y) = (x * l, y * l);

			let b = link.bias;
			let t = &mut nodes[link.target];
			t.velocity.x -= x * b;
			t.velocity.y -= y * b;
			let s = &mut nodes[link.source];
			s.velocity.x += x * (1.0 - b);
			s.velocity.y += y * (1.0 - b);
		}
	}

	fn apply_charge(&mut self, nodes: &mut [GraphNode]) {
		let strength = self.params.charge_strength * self.alpha;
		let min2 = self.params.charge_distance_min.powi(2);
		let positions: Vec<Option<Point>> = nodes.iter().map(|n| n.position).collect();
		for (i, node) in nodes.iter_mut().enumerate() {
			let Some(pi) = positions[i] else { continue };
			for (j, pj) in positions.iter().enumerate() {
				let Some(pj) = pj else { continue };
				if i == j {
					continue;
				}
				let mut x = pj.x - pi.x;
				let mut y = pj.y - pi.y;
				if x == 0.0 {
					x = self.random.jiggle();
				}
				if y == 0.0 {
					y = self.random.jiggle();
				}
				let mut l = x * x + y * y;
				if l < min2 {
					l = (min2 * l).sqrt();
				}
				node.velocity.x += x * strength / l;
				node.velocity.y += y * strength / l;
			}
		}
	}

	fn apply_center(&mut self, nodes: &mut [GraphNode]) {
		let placed: Vec<Point> = nodes.iter().filter_map(|n| n.position).collect();
		if placed.is_empty() {
			return;
		}
		let n = placed.len() as f64;
		let mean = placed.iter().fold(Point::default(), |acc, p| acc + *p);
		let shift = Point::new(mean.x / n - self.center.x, mean.y / n - self.center.y);
		for node in nodes.iter_mut() {
			if let Some(p) = node.position {
				node.position = Some(p - shift);
			}
		}
	}

	fn apply_collide(&mut self, nodes: &mut [GraphNode]) {
		let scale = self.params.collide_scale;
		let strength = self.params.collide_strength;
		for i in 0..nodes.len() {
			for j in (i + 1)..nodes.len() {
				let (Some(pi), Some(pj)) = (nodes[i].position, nodes[j].position) else {
					continue;
				};
				let (ri, rj) = (nodes[i].radius() * scale, nodes[j].radius() * scale);
				let r = ri + rj;
				let mut x = pi.x + nodes[i].velocity.x - pj.x - nodes[j].velocity.x;
				let mut y = pi.y + nodes[i].velocity.y - pj.y - nodes[j].velocity.y;
				let mut l = x * x + y * y;
				if l >= r * r {
					continue;
				}
				if x == 0.0 {
					x = self.random.jiggle();
					l += x * x;
				}
				if y == 0.0 {
					y = self.random.jiggle();
					l += y * y;
				}
				let d = l.sqrt();
				let push = (r - d) / d * strength;
				let (x, y) = (x * push, y * push);
				let (ri2, rj2) = (ri * ri, rj * rj);
				let share = rj2 / (ri2 + rj2);
				nodes[i].velocity.x += x * share;
				nodes[i].velocity.y += y * share;
				nodes[j].velocity.x -= x * (1.0 - share);
				nodes[j].velocity.y -= y * (1.0 - share);
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::question_graph::model::Question;

	fn mono(s: &str) -> f64 {
		s.chars().count() as f64 * 6.0
	}

	fn node(id: u64) -> GraphNode {
		let q = Question {
			id,
			text: "q".into(),
			author_id: "a".into(),
			timestamp_last_modified: 0,
			follow_ups: 0,
			votes: vec![],
		};
		GraphNode::new(q, "ann", &[], &mono)
	}

	fn settle(sim: &mut Simulation, nodes: &mut [GraphNode]) -> usize {
		let mut ticks = 0;
		while sim.step(nodes) {
			ticks += 1;
			assert!(ticks < 1000, "simulation never cooled");
		}
		ticks
	}

	#[test]
	fn initial_positions_are_distinct_and_near_center() {
		let center = Point::new(200.0, 100.0);
		let mut sim = Simulation::new(SimulationParameters::default(), center);
		let mut nodes: Vec<GraphNode> = (1..=5).map(node).collect();
		sim.initialize_nodes(&mut nodes);
		for (i, a) in nodes.iter().enumerate() {
			let p = a.position.unwrap();
			assert!(p.distance_sq(center) < 40.0 * 40.0);
			for b in &nodes[i + 1..] {
				assert!(p.distance_sq(b.position.unwrap()) > 0.0);
			}
		}
	}

	#[test]
	fn cools_and_stops_after_about_three_hundred_ticks() {
		let mut sim = Simulation::new(SimulationParameters::default(), Point::default());
		let mut nodes: Vec<GraphNode> = (1..=3).map(node).collect();
		let ticks = settle(&mut sim, &mut nodes);
		assert!((295..=305).contains(&ticks), "{} ticks", ticks);
		assert!(!sim.is_running());
		assert!(!sim.step(&mut nodes));
	}

	#[test]
	fn collision_separates_bubbles() {
		let mut sim = Simulation::new(SimulationParameters::default(), Point::default());
		let mut nodes: Vec<GraphNode> = (1..=2).map(node).collect();
		nodes[0].position = Some(Point::new(0.0, 0.0));
		nodes[1].position = Some(Point::new(1.0, 0.0));
		settle(&mut sim, &mut nodes);
		let gap = nodes[0].position.unwrap().distance_sq(nodes[1].position.unwrap()).sqrt();
		let min = (nodes[0].radius() + nodes[1].radius()) * 1.2;
		assert!(gap > min * 0.95, "gap {} < {}", gap, min);
	}

	#[test]
	fn links_pull_toward_rest_length() {
		let mut sim = Simulation::new(SimulationParameters::default(), Point::default());
		let mut nodes: Vec<GraphNode> = (1..=2).map(node).collect();
		nodes[0].position = Some(Point::new(-500.0, 0.0));
		nodes[1].position = Some(Point::new(500.0, 0.0));
		let edges = vec![Edge::new(0, 1, None).unwrap()];
		sim.bind_links(&nodes, &edges);
		let rest = sim.links()[0].distance;
		settle(&mut sim, &mut nodes);
		let gap = nodes[0].position.unwrap().distance_sq(nodes[1].position.unwrap()).sqrt();
		assert!(gap < 1000.0);
		assert!((gap - rest).abs() < rest * 0.5, "gap {} rest {}", gap, rest);
	}

	#[test]
	fn centering_moves_mean_to_center() {
		let center = Point::new(300.0, 200.0);
		let mut sim = Simulation::new(SimulationParameters::default(), center);
		let mut nodes: Vec<GraphNode> = (1..=3).map(node).collect();
		sim.tick(&mut nodes);
		settle(&mut sim, &mut nodes);
		let mean = nodes.iter().fold(Point::default(), |acc, n| acc + n.position.unwrap());
		assert!((mean.x / 3.0 - center.x).abs() < 5.0);
		assert!((mean.y / 3.0 - center.y).abs() < 5.0);
	}

	#[test]
	fn pinned_node_stays_put() {
		let mut sim = Simulation::new(SimulationParameters::default(), Point::default());
		let mut nodes: Vec<GraphNode> = (1..=3).map(node).collect();
		nodes[1].pin(Point::new(40.0, -20.0));
		for _ in 0..20 {
			sim.tick(&mut nodes);
		}
		assert_eq!(nodes[1].position, Some(Point::new(40.0, -20.0)));
		assert_eq!(nodes[1].velocity, Point::default());
	}

	#[test]
	fn alpha_target_keeps_simulation_warm() {
		let mut sim = Simulation::new(SimulationParameters::default(), Point::default());
		let mut nodes: Vec<GraphNode> = (1..=2).map(node).collect();
		sim.set_alpha_target(0.3);
		for _ in 0..2000 {
			assert!(sim.step(&mut nodes));
		}
		assert!((sim.alpha() - 0.3).abs() < 0.01);
		sim.set_alpha_target(0.0);
		settle(&mut sim, &mut nodes);
		assert!(!sim.is_running());
	}
}
