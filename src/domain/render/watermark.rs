//! Image watermark centred in the pane.
//!
//! The image loads asynchronously through an [`ImageLoader`]. Until the
//! load callback fires nothing is drawn; once it does, a redraw is
//! requested. Detaching drops the image and invalidates any load still in
//! flight, so a late callback is ignored.

use crate::domain::error::PlotlineError;
use crate::domain::render::PaneRenderer;
use crate::ports::canvas_port::{ImageHandle, ImageLoader, RedrawRequester, RenderTarget};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct WatermarkOptions {
    /// Largest share of the pane width the image may take.
    pub max_width: f64,
    /// Largest share of the pane height the image may take.
    pub max_height: f64,
    /// Media pixels kept clear around the pane edge.
    pub padding: f64,
    pub alpha: f64,
}

impl Default for WatermarkOptions {
    fn default() -> Self {
        WatermarkOptions {
            max_width: 0.5,
            max_height: 0.5,
            padding: 0.0,
            alpha: 0.3,
        }
    }
}

#[derive(Default)]
struct WatermarkState {
    image: Option<ImageHandle>,
    /// Bumped on every new load and on detach; a callback only lands if its
    /// generation still matches.
    generation: u64,
}

struct Host {
    loader: Rc<dyn ImageLoader>,
    redraw: Rc<dyn RedrawRequester>,
}

#[derive(Default)]
pub struct WatermarkRenderer {
    state: Rc<RefCell<WatermarkState>>,
    host: Option<Host>,
    source: Option<String>,
    options: Option<WatermarkOptions>,
}

impl WatermarkRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, loader: Rc<dyn ImageLoader>, redraw: Rc<dyn RedrawRequester>) {
        self.host = Some(Host { loader, redraw });
        self.load();
    }

    /// Sets the image source and options. A changed source starts a new
    /// load when attached.
    pub fn update(&mut self, source: &str, options: WatermarkOptions) {
        let changed = self.source.as_deref() != Some(source);
        self.source = Some(source.to_string());
        self.options = Some(options);
        if changed {
            self.state.borrow_mut().image = None;
            self.load();
        }
    }

    pub fn detach(&mut self) {
        let mut state = self.state.borrow_mut();
        state.image = None;
        state.generation += 1;
        self.host = None;
    }

    pub fn has_image(&self) -> bool {
        self.state.borrow().image.is_some()
    }

    fn load(&self) {
        let (Some(host), Some(source)) = (&self.host, &self.source) else {
            return;
        };
        let generation = {
            let mut state = self.state.borrow_mut();
            state.generation += 1;
            state.generation
        };

        let weak: Weak<RefCell<WatermarkState>> = Rc::downgrade(&self.state);
        let redraw = Rc::clone(&host.redraw);
        debug!(source = %source, "loading watermark image");
        host.loader.load(
            source,
            Box::new(move |image: ImageHandle| {
                let Some(state) = weak.upgrade() else {
                    return;
                };
                {
                    let mut state = state.borrow_mut();
                    if state.generation != generation {
                        return;
                    }
                    state.image = Some(image);
                }
                redraw.request_redraw();
            }),
        );
    }
}

impl PaneRenderer for WatermarkRenderer {
    fn draw(&self, target: &mut RenderTarget<'_>) -> Result<(), PlotlineError> {
        let Some(options) = &self.options else {
            return Ok(());
        };
        let state = self.state.borrow();
        let Some(image) = &state.image else {
            return Ok(());
        };
        if !(image.width > 0.0 && image.height > 0.0) {
            return Err(PlotlineError::Render {
                reason: format!("watermark image {} has no dimensions", image.source),
            });
        }

        let (pane_width, pane_height) = target.space.pane_size();
        let max_width = (pane_width - 2.0 * options.padding).max(0.0) * options.max_width;
        let max_height = (pane_height - 2.0 * options.padding).max(0.0) * options.max_height;
        let scale = (max_width / image.width)
            .min(max_height / image.height)
            .min(1.0);
        if scale <= 0.0 {
            return Ok(());
        }

        let width = image.width * scale;
        let height = image.height * scale;
        let x = (pane_width - width) / 2.0;
        let y = (pane_height - height) / 2.0;

        let hpr = target.scope.horizontal_pixel_ratio;
        let vpr = target.scope.vertical_pixel_ratio;
        target.context.set_global_alpha(options.alpha);
        target
            .context
            .draw_image(image, x * hpr, y * vpr, width * hpr, height * vpr);
        target.context.set_global_alpha(1.0);
        Ok(())
    }
}
