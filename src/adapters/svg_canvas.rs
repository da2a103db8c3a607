//! SVG drawing context: records canvas-style calls as SVG elements.

use crate::ports::canvas_port::{DrawingContext, ImageHandle, TextAlign, TextBaseline};
use std::fmt::Write;

pub struct SvgCanvas {
    width: f64,
    height: f64,
    fill: String,
    stroke: String,
    line_width: f64,
    alpha: f64,
    font: String,
    align: TextAlign,
    baseline: TextBaseline,
    path: String,
    elements: Vec<String>,
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

impl SvgCanvas {
    /// Canvas of `width` x `height` bitmap pixels.
    pub fn new(width: f64, height: f64) -> Self {
        SvgCanvas {
            width,
            height,
            fill: "#000000".to_string(),
            stroke: "#000000".to_string(),
            line_width: 1.0,
            alpha: 1.0,
            font: "10px sans-serif".to_string(),
            align: TextAlign::Left,
            baseline: TextBaseline::Top,
            path: String::new(),
            elements: Vec::new(),
        }
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Nests `pane` with its top-left corner at (`x`, `y`), clipped to the
    /// pane's own size.
    pub fn embed(&mut self, pane: &SvgCanvas, x: f64, y: f64) {
        let mut element = format!(
            r#"<svg x="{}" y="{}" width="{}" height="{}">"#,
            x, y, pane.width, pane.height
        );
        for child in &pane.elements {
            element.push_str(child);
        }
        element.push_str("</svg>");
        self.elements.push(element);
    }

    /// The complete SVG document.
    pub fn finish(&self) -> String {
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        );
        svg.push('\n');
        for element in &self.elements {
            svg.push_str("  ");
            svg.push_str(element);
            svg.push('\n');
        }
        svg.push_str("</svg>\n");
        svg
    }

    fn opacity(&self) -> String {
        if self.alpha < 1.0 {
            format!(r#" opacity="{}""#, self.alpha)
        } else {
            String::new()
        }
    }

    /// Pixel size from a CSS font shorthand such as `12px sans-serif`.
    fn font_size(&self) -> f64 {
        self.font
            .split_whitespace()
            .find_map(|part| part.strip_suffix("px")?.parse().ok())
            .unwrap_or(10.0)
    }
}

impl DrawingContext for SvgCanvas {
    fn set_fill_style(&mut self, color: &str) {
        self.fill = color.to_string();
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.stroke = color.to_string();
    }

    fn set_line_width(&mut self, width: f64) {
        self.line_width = width;
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let element = format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}"{}/>"#,
            x,
            y,
            width,
            height,
            escape(&self.fill),
            self.opacity()
        );
        self.elements.push(element);
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        let _ = write!(self.path, "M{} {} ", x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        let _ = write!(self.path, "L{} {} ", x, y);
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64) {
        let _ = write!(
            self.path,
            "M{} {} A{r} {r} 0 1 0 {} {} A{r} {r} 0 1 0 {} {} ",
            x - radius,
            y,
            x + radius,
            y,
            x - radius,
            y,
            r = radius
        );
    }

    fn close_path(&mut self) {
        self.path.push_str("Z ");
    }

    fn fill(&mut self) {
        let element = format!(
            r#"<path d="{}" fill="{}"{}/>"#,
            self.path.trim_end(),
            escape(&self.fill),
            self.opacity()
        );
        self.elements.push(element);
    }

    fn stroke(&mut self) {
        let element = format!(
            r#"<path d="{}" fill="none" stroke="{}" stroke-width="{}"{}/>"#,
            self.path.trim_end(),
            escape(&self.stroke),
            self.line_width,
            self.opacity()
        );
        self.elements.push(element);
    }

    fn set_font(&mut self, font: &str) {
        self.font = font.to_string();
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.align = align;
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.baseline = baseline;
    }

    /// Approximate: SVG output has no font metrics.
    fn measure_text(&self, text: &str) -> f64 {
        text.chars().count() as f64 * self.font_size() * 0.6
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        let anchor = match self.align {
            TextAlign::Left => "start",
            TextAlign::Center => "middle",
            TextAlign::Right => "end",
        };
        let baseline = match self.baseline {
            TextBaseline::Top => "hanging",
            TextBaseline::Middle => "middle",
            TextBaseline::Bottom => "text-after-edge",
        };
        let element = format!(
            r#"<text x="{}" y="{}" font-size="{}" text-anchor="{}" dominant-baseline="{}" fill="{}"{}>{}</text>"#,
            x,
            y,
            self.font_size(),
            anchor,
            baseline,
            escape(&self.fill),
            self.opacity(),
            escape(text)
        );
        self.elements.push(element);
    }

    fn draw_image(&mut self, image: &ImageHandle, x: f64, y: f64, width: f64, height: f64) {
        let element = format!(
            r#"<image href="{}" x="{}" y="{}" width="{}" height="{}"{}/>"#,
            escape(&image.source),
            x,
            y,
            width,
            height,
            self.opacity()
        );
        self.elements.push(element);
    }
}
