//! Pixel-snapping helpers shared by the renderers.
//!
//! All results are whole bitmap pixels so strokes and bars stay crisp at any
//! device pixel ratio.

/// A whole-pixel run along one axis: starts at `position`, covers `length`
/// pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelSpan {
    pub position: i64,
    pub length: i64,
}

impl PixelSpan {
    pub fn end(&self) -> i64 {
        self.position + self.length
    }
}

/// Media width scaled to bitmap pixels, never thinner than one pixel.
pub fn media_to_bitmap_width(media_width: f64, pixel_ratio: f64) -> f64 {
    (media_width * pixel_ratio).round().max(1.0)
}

/// A run of `bitmap_width` pixels centred on the media coordinate `center`.
///
/// The length depends only on `bitmap_width`; the ratio only moves the
/// position.
pub fn centered_bar_geometry(center: f64, pixel_ratio: f64, bitmap_width: f64) -> PixelSpan {
    let length = bitmap_width.round().max(1.0) as i64;
    let scaled_center = (center * pixel_ratio).round() as i64;
    PixelSpan {
        position: scaled_center - length / 2,
        length,
    }
}

/// A run between two media coordinates in either order, inclusive of both
/// ends, so it is always at least one pixel long.
pub fn span_geometry(a: f64, b: f64, pixel_ratio: f64) -> PixelSpan {
    let a = (a * pixel_ratio).round() as i64;
    let b = (b * pixel_ratio).round() as i64;
    PixelSpan {
        position: a.min(b),
        length: (b - a).abs() + 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_length_ignores_ratio() {
        let at_1x = centered_bar_geometry(10.0, 1.0, 3.0);
        let at_2x = centered_bar_geometry(10.0, 2.0, 3.0);
        assert_eq!(at_1x.length, 3);
        assert_eq!(at_2x.length, 3);
        assert_eq!(at_1x.position, 9);
        assert_eq!(at_2x.position, 19);
    }

    #[test]
    fn centered_even_width_leans_left() {
        let span = centered_bar_geometry(10.0, 1.0, 4.0);
        assert_eq!(span, PixelSpan { position: 8, length: 4 });
    }

    #[test]
    fn centered_never_empty() {
        assert_eq!(centered_bar_geometry(5.0, 1.5, 0.2).length, 1);
    }

    #[test]
    fn span_normalizes_order() {
        let down = span_geometry(20.0, 10.0, 1.0);
        let up = span_geometry(10.0, 20.0, 1.0);
        assert_eq!(down, up);
        assert_eq!(up, PixelSpan { position: 10, length: 11 });
    }

    #[test]
    fn span_of_a_point_is_one_pixel() {
        assert_eq!(span_geometry(7.2, 7.2, 2.0).length, 1);
    }

    #[test]
    fn span_scales_with_ratio() {
        let span = span_geometry(10.0, 20.0, 2.0);
        assert_eq!(span, PixelSpan { position: 20, length: 21 });
        assert_eq!(span.end(), 41);
    }

    #[test]
    fn bitmap_width_rounds_and_floors_at_one() {
        assert_eq!(media_to_bitmap_width(1.0, 1.5), 2.0);
        assert_eq!(media_to_bitmap_width(0.1, 1.0), 1.0);
    }
}
