//! The 2D drawing surface the renderer paints on.

use web_sys::CanvasRenderingContext2d;

/// Width of rendered text, in display units.
pub trait TextMeasure {
	/// Width of `text` on a single line.
	fn text_width(&self, text: &str) -> f64;
}

impl<F> TextMeasure for F
where
	F: Fn(&str) -> f64,
{
	fn text_width(&self, text: &str) -> f64 {
		self(text)
	}
}

/// Minimal immediate-mode drawing API.
///
/// Text is drawn centered horizontally with its top edge at `y`.
pub trait Surface: TextMeasure {
	/// Push the transform and styles.
	fn save(&self);
	/// Pop what `save` pushed.
	fn restore(&self);
	/// Erase `[0, width] x [0, height]`.
	fn clear(&self, width: f64, height: f64);
	/// Shift the origin.
	fn translate(&self, x: f64, y: f64);
	/// Scale both axes by `k`.
	fn scale(&self, k: f64);
	/// Start a new path.
	fn begin_path(&self);
	/// Start a subpath at `(x, y)`.
	fn move_to(&self, x: f64, y: f64);
	/// Extend the subpath to `(x, y)`.
	fn line_to(&self, x: f64, y: f64);
	/// Clockwise arc between two angles, in radians.
	fn arc(&self, x: f64, y: f64, radius: f64, start: f64, end: f64);
	/// Dash pattern for later strokes; empty for solid lines.
	fn set_line_dash(&self, segments: &[f64]);
	/// Stroke the current path.
	fn stroke(&self, style: &str, width: f64);
	/// Fill the current path.
	fn fill(&self, style: &str);
	/// Draw one line of text.
	fn fill_text(&self, text: &str, x: f64, y: f64, font: &str, style: &str);
}

/// A browser canvas 2D context.
#[derive(Clone, Debug)]
pub struct CanvasSurface {
	ctx: CanvasRenderingContext2d,
	font: String,
}

impl CanvasSurface {
	/// `font` is the font text is measured with.
	pub fn new(ctx: CanvasRenderingContext2d, font: impl Into<String>) -> Self {
		Self {
			ctx,
			font: font.into(),
		}
	}
}

impl TextMeasure for CanvasSurface {
	fn text_width(&self, text: &str) -> f64 {
		self.ctx.set_font(&self.font);
		self.ctx.measure_text(text).map(|m| m.width()).unwrap_or(0.0)
	}
}

impl Surface for CanvasSurface {
	fn save(&self) {
		self.ctx.save();
	}

	fn restore(&self) {
		self.ctx.restore();
	}

	fn clear(&self, width: f64, height: f64) {
		self.ctx.clear_rect(0.0, 0.0, width, height);
	}

	fn translate(&self, x: f64, y: f64) {
		let _ = self.ctx.translate(x, y);
	}

	fn scale(&self, k: f64) {
		let _ = self.ctx.scale(k, k);
	}

	fn begin_path(&self) {
		self.ctx.begin_path();
	}

	fn move_to(&self, x: f64, y: f64) {
		self.ctx.move_to(x, y);
	}

	fn line_to(&self, x: f64, y: f64) {
		self.ctx.line_to(x, y);
	}

	fn arc(&self, x: f64, y: f64, radius: f64, start: f64, end: f64) {
		let _ = self.ctx.arc(x, y, radius, start, end);
	}

	fn set_line_dash(&self, segments: &[f64]) {
		let array = js_sys::Array::new();
		for s in segments {
			array.push(&wasm_bindgen::JsValue::from_f64(*s));
		}
		let _ = self.ctx.set_line_dash(&array);
	}

	fn stroke(&self, style: &str, width: f64) {
		self.ctx.set_stroke_style_str(style);
		self.ctx.set_line_width(width);
		self.ctx.stroke();
	}

	fn fill(&self, style: &str) {
		self.ctx.set_fill_style_str(style);
		self.ctx.fill();
	}

	fn fill_text(&self, text: &str, x: f64, y: f64, font: &str, style: &str) {
		self.ctx.set_font(font);
		self.ctx.set_fill_style_str(style);
		self.ctx.set_text_align("center");
		self.ctx.set_text_baseline("top");
		let _ = self.ctx.fill_text(text, x, y);
	}
}
