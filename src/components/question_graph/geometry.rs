//! Plane geometry shared by hit-testing, layout and rendering.

use std::ops::{Add, Sub};

/// A point or vector in the plane.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	/// A point at `(x, y)`.
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	/// Squared length as a vector.
	pub fn length_sq(self) -> f64 {
		self.x * self.x + self.y * self.y
	}

	/// Squared distance to `other`.
	pub fn distance_sq(self, other: Point) -> f64 {
		(self - other).length_sq()
	}

	/// Dot product.
	pub fn dot(self, other: Point) -> f64 {
		self.x * other.x + self.y * other.y
	}

	/// Halfway between `self` and `other`.
	pub fn midpoint(self, other: Point) -> Point {
		Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
	}
}

impl Add for Point {
	type Output = Point;

	fn add(self, rhs: Point) -> Point {
		Point::new(self.x + rhs.x, self.y + rhs.y)
	}
}

impl Sub for Point {
	type Output = Point;

	fn sub(self, rhs: Point) -> Point {
		Point::new(self.x - rhs.x, self.y - rhs.y)
	}
}

/// Pan/zoom transform from graph space to screen space: `screen = graph * k + (x, y)`.
/// Pan and zoom from graph to screen coordinates: `screen = graph * k + (x, y)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	/// Scale factor.
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self::IDENTITY
	}
}

impl ViewTransform {
	/// No pan, unit scale.
	pub const IDENTITY: ViewTransform = ViewTransform { x: 0.0, y: 0.0, k: 1.0 };

	/// Graph to screen.
	pub fn apply(&self, p: Point) -> Point {
		Point::new(p.x * self.k + self.x, p.y * self.k + self.y)
	}

	/// Screen to graph.
	pub fn invert(&self, p: Point) -> Point {
		Point::new((p.x - self.x) / self.k, (p.y - self.y) / self.k)
	}

	/// Scale by `factor` keeping the screen point `anchor` fixed, with the
	/// resulting scale clamped to `[min, max]`.
	pub fn zoom_about(&self, anchor: Point, factor: f64, (min, max): (f64, f64)) -> ViewTransform {
		let k = (self.k * factor).clamp(min, max);
		let ratio = k / self.k;
		ViewTransform {
			x: anchor.x - (anchor.x - self.x) * ratio,
			y: anchor.y - (anchor.y - self.y) * ratio,
			k,
		}
	}
}

/// Strict containment: a point on the circle's border is outside.
pub fn point_in_circle(center: Point, radius: f64, p: Point) -> bool {
	center.distance_sq(p) < radius * radius
}

/// Squared distance from `p` to the segment `a`–`b`.
///
/// Projects `p` onto the line through `a` and `b`; a projection before `a`
/// measures to `a`, past `b` measures to `b`. A zero-length segment is a point.
pub fn segment_distance_sq(a: Point, b: Point, p: Point) -> f64 {
	let ab = b - a;
	let len_sq = ab.length_sq();
	if len_sq == 0.0 {
		return a.distance_sq(p);
	}
	let t = (p - a).dot(ab) / len_sq;
	if t < 0.0 {
		a.distance_sq(p)
	} else if t > 1.0 {
		b.distance_sq(p)
	} else {
		let foot = Point::new(a.x + ab.x * t, a.y + ab.y * t);
		foot.distance_sq(p)
	}
}
