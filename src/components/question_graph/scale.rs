//! Linear two-color scale used to tint bubble borders by vote balance.

/// Border color at the negative end of the scale.
pub const LOW: [u8; 3] = [0xd6, 0x27, 0x28];
/// Border color at the positive end of the scale.
pub const HIGH: [u8; 3] = [0x2c, 0xa0, 0x2c];

/// Map `value` linearly from `[min, max]` onto `LOW..HIGH` as `#rrggbb`.
///
/// An empty range (no votes) maps to the middle of the scale.
pub fn color_for_value(value: f64, min: f64, max: f64) -> String {
	let t = if max > min {
		((value - min) / (max - min)).clamp(0.0, 1.0)
	} else {
		0.5
	};
	let channel = |i: usize| {
		let (lo, hi) = (LOW[i] as f64, HIGH[i] as f64);
		(lo + (hi - lo) * t).round() as u8
	};
	format!("#{:02x}{:02x}{:02x}", channel(0), channel(1), channel(2))
}

/// Color for a node whose votes sum to `net` out of `count` votes cast.
pub fn vote_color(net: i32, count: usize) -> String {
	color_for_value(net as f64, -(count as f64), count as f64)
}
