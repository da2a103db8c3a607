//! Text block pinned to a pane corner, edge or centre, independent of the
//! data coordinates.

use crate::domain::error::PlotlineError;
use crate::domain::render::PaneRenderer;
use crate::ports::canvas_port::{RenderTarget, TextAlign, TextBaseline};

#[derive(Debug, Clone, PartialEq)]
pub struct AnchoredTextOptions {
    pub horizontal: TextAlign,
    pub vertical: TextBaseline,
    pub color: String,
    pub font_size: f64,
    pub font_family: String,
    /// Multiple of the font size between line tops.
    pub line_height: f64,
    pub padding: f64,
}

impl Default for AnchoredTextOptions {
    fn default() -> Self {
        AnchoredTextOptions {
            horizontal: TextAlign::Left,
            vertical: TextBaseline::Top,
            color: "rgba(19, 23, 34, 0.6)".to_string(),
            font_size: 14.0,
            font_family: "sans-serif".to_string(),
            line_height: 1.2,
            padding: 8.0,
        }
    }
}

#[derive(Default)]
pub struct AnchoredTextRenderer {
    lines: Vec<String>,
    options: Option<AnchoredTextOptions>,
}

impl AnchoredTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, text: &str, options: AnchoredTextOptions) {
        self.lines = text.lines().map(str::to_string).collect();
        self.options = Some(options);
    }
}

impl PaneRenderer for AnchoredTextRenderer {
    fn draw(&self, target: &mut RenderTarget<'_>) -> Result<(), PlotlineError> {
        let Some(options) = &self.options else {
            return Ok(());
        };
        if self.lines.iter().all(|l| l.is_empty()) {
            return Ok(());
        }

        let (width, height) = target.space.pane_size();
        let step = options.font_size * options.line_height;
        let block = step * self.lines.len() as f64;

        let x = match options.horizontal {
            TextAlign::Left => options.padding,
            TextAlign::Center => width / 2.0,
            TextAlign::Right => width - options.padding,
        };
        let top = match options.vertical {
            TextBaseline::Top => options.padding,
            TextBaseline::Middle => (height - block) / 2.0,
            TextBaseline::Bottom => height - options.padding - block,
        };

        let hpr = target.scope.horizontal_pixel_ratio;
        let vpr = target.scope.vertical_pixel_ratio;
        target.context.set_font(&format!(
            "{}px {}",
            options.font_size * vpr,
            options.font_family
        ));
        target.context.set_fill_style(&options.color);
        target.context.set_text_align(options.horizontal);
        target.context.set_text_baseline(TextBaseline::Top);
        for (i, line) in self.lines.iter().enumerate() {
            target
                .context
                .fill_text(line, x * hpr, (top + i as f64 * step) * vpr);
        }
        Ok(())
    }
}
