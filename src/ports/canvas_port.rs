//! Drawing surface and coordinate collaborator traits for renderers.

/// Bitmap-space view of a pane: size in device pixels plus the ratios that
/// map media (CSS) coordinates onto it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BitmapScope {
    pub bitmap_width: f64,
    pub bitmap_height: f64,
    pub horizontal_pixel_ratio: f64,
    pub vertical_pixel_ratio: f64,
}

impl BitmapScope {
    pub fn new(media_width: f64, media_height: f64, pixel_ratio: f64) -> Self {
        BitmapScope {
            bitmap_width: (media_width * pixel_ratio).round(),
            bitmap_height: (media_height * pixel_ratio).round(),
            horizontal_pixel_ratio: pixel_ratio,
            vertical_pixel_ratio: pixel_ratio,
        }
    }
}

/// Converts data-space values into media coordinates. `None` means the
/// value cannot be placed (e.g. outside the loaded range).
pub trait CoordinateSpace {
    fn price_to_coordinate(&self, price: f64) -> Option<f64>;
    fn time_to_coordinate(&self, time: f64) -> Option<f64>;
    /// Media-space distance between adjacent bars.
    fn bar_spacing(&self) -> f64;
    /// Inclusive (from, to) time range currently on screen, if any.
    fn visible_range(&self) -> Option<(f64, f64)>;
    /// Media-space (width, height) of the pane.
    fn pane_size(&self) -> (f64, f64);
}

/// Opaque handle to a decoded image owned by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageHandle {
    pub source: String,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextBaseline {
    Top,
    Middle,
    Bottom,
}

/// Minimal 2D drawing context, mirroring a canvas API in bitmap space.
pub trait DrawingContext {
    fn set_fill_style(&mut self, color: &str);
    fn set_stroke_style(&mut self, color: &str);
    fn set_line_width(&mut self, width: f64);
    fn set_global_alpha(&mut self, alpha: f64);
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn arc(&mut self, x: f64, y: f64, radius: f64);
    fn close_path(&mut self);
    fn fill(&mut self);
    fn stroke(&mut self);
    fn set_font(&mut self, font: &str);
    fn set_text_align(&mut self, align: TextAlign);
    fn set_text_baseline(&mut self, baseline: TextBaseline);
    fn measure_text(&self, text: &str) -> f64;
    fn fill_text(&mut self, text: &str, x: f64, y: f64);
    fn draw_image(&mut self, image: &ImageHandle, x: f64, y: f64, width: f64, height: f64);
}

/// Everything a renderer needs for one frame.
pub struct RenderTarget<'a> {
    pub context: &'a mut dyn DrawingContext,
    pub scope: BitmapScope,
    pub space: &'a dyn CoordinateSpace,
}

/// Asks the host to schedule another frame.
pub trait RedrawRequester {
    fn request_redraw(&self);
}

/// Loads images asynchronously; `on_load` fires once the image decodes,
/// possibly after the requester has gone away.
pub trait ImageLoader {
    fn load(&self, source: &str, on_load: Box<dyn FnOnce(ImageHandle)>);
}
