//! Fitting a wrapped label inside a circle.
//!
//! The fitter tries successively larger integer radii until greedy word
//! packing over the circle's horizontal chords succeeds, then reports the
//! bubble radius that leaves a margin around the packed text.

/// Font metrics and bubble proportions used for every label.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelStyle {
	/// Font size in px.
	pub text_size: f64,
	/// Vertical advance between two label lines.
	pub line_height: f64,
	/// Expansion applied to the fitted radius so text keeps clear of the border.
	pub bubble_scale: f64,
}

impl Default for LabelStyle {
	fn default() -> Self {
		let text_size = 10.0;
		Self {
			text_size,
			line_height: text_size * 1.5,
			bubble_scale: 1.25,
		}
	}
}

impl LabelStyle {
	/// Canvas font string for this style.
	pub fn font(&self, italic: bool) -> String {
		if italic {
			format!("italic {}px sans-serif", self.text_size)
		} else {
			format!("{}px sans-serif", self.text_size)
		}
	}
}

/// Wrapped lines plus the radius of the bubble that contains them.
#[derive(Clone, Debug, PartialEq)]
pub struct TextLayout {
	pub lines: Vec<String>,
	pub radius: f64,
}

/// Wrap `"<author>: <text>"` into the smallest circle that holds it.
///
/// `measure` returns the rendered width of a string. The returned radius is
/// never smaller than half the width of the longest word.
pub fn fit<M>(author: &str, text: &str, measure: M, style: &LabelStyle) -> TextLayout
where
	M: Fn(&str) -> f64,
{
	let head = format!("{}:", author);
	let words: Vec<&str> = std::iter::once(head.as_str())
		.chain(text.split_whitespace())
		.collect();
	let lh = style.line_height;

	let total_width = measure(&words.join(" "));
	let longest = words.iter().map(|w| measure(w)).fold(0.0_f64, f64::max);
	let blank = measure(" ");

	let mut radius = (total_width * lh / 3.0).sqrt().max(longest / 2.0).ceil();
	loop {
		if let Some(lines) = pack(&words, &measure, blank, radius, lh) {
			return TextLayout {
				lines,
				radius: (radius + lh * 0.5) * style.bubble_scale,
			};
		}
		radius += 1.0;
	}
}

/// Width of the chord `offset` line heights away from the circle's center.
fn chord(radius: f64, line_height: f64, offset: f64) -> f64 {
	2.0 * (radius.powi(2) - (line_height * offset.abs()).powi(2))
		.max(0.0)
		.sqrt()
}

fn pack<M>(words: &[&str], measure: &M, blank: f64, radius: f64, lh: f64) -> Option<Vec<String>>
where
	M: Fn(&str) -> f64,
{
	let count = (2.0 * radius / lh).floor() as usize;
	if count == 0 {
		return None;
	}
	let offset = |line: usize| count as f64 / 2.0 - line as f64;

	let mut lines = vec![String::new()];
	let mut remaining = chord(radius, lh, offset(0));
	for word in words {
		let width = measure(word);
		while remaining < width {
			// this line is too short for the word, move down
			lines.push(String::new());
			if lines.len() > count {
				return None;
			}
			remaining = chord(radius, lh, offset(lines.len() - 1));
		}
		let line = lines.last_mut()?;
		line.push_str(word);
		line.push(' ');
		remaining -= width + blank;
	}

	for line in lines.iter_mut() {
		line.truncate(line.trim_end().len());
	}
	lines.resize(count, String::new());
	Some(lines)
}
