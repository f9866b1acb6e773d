//! # Path Rasterization
//!
//! Fills and strokes `kurbo` paths onto RGBA canvases.
//!
//! - **Coverage**: paths are converted to `tiny-skia` paths and filled into an
//!   8-bit [`Mask`] with anti-aliasing and the non-zero winding rule
//! - **Fill**: coverage scales the fill color's alpha and the result is
//!   composited source-over onto the straight-alpha canvas
//! - **Stroke**: the flattened outline is drawn as `embedded-graphics`
//!   polylines into a one-bit draw target that writes the stroke color

use embedded_graphics::{
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{Polyline, PrimitiveStyle},
};
use image::{Rgba, RgbaImage};
use kurbo::{BezPath, PathEl};
use tiny_skia::{FillRule, Mask, PathBuilder, Transform};

use crate::mask::TOLERANCE;

/// Convert a `kurbo` path to the `tiny-skia` representation.
///
/// Returns `None` for paths `tiny-skia` considers empty.
fn to_skia(path: &BezPath) -> Option<tiny_skia::Path> {
    let mut builder = PathBuilder::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => builder.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => builder.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(c, p) => builder.quad_to(c.x as f32, c.y as f32, p.x as f32, p.y as f32),
            PathEl::CurveTo(c1, c2, p) => builder.cubic_to(
                c1.x as f32,
                c1.y as f32,
                c2.x as f32,
                c2.y as f32,
                p.x as f32,
                p.y as f32,
            ),
            PathEl::ClosePath => builder.close(),
        }
    }
    builder.finish()
}

/// Per-pixel coverage of `path`, row-major, 0 (outside) to 255 (inside).
pub fn coverage(path: &BezPath, width: u32, height: u32) -> Vec<u8> {
    let (Some(path), Some(mut mask)) = (to_skia(path), Mask::new(width, height)) else {
        return vec![0; width as usize * height as usize];
    };
    mask.fill_path(&path, FillRule::Winding, true, Transform::identity());
    mask.data().to_vec()
}

/// Composite `src` over `dst` with its alpha scaled by `amount`.
///
/// Straight (non-premultiplied) alpha. An opaque source at full amount
/// replaces the destination exactly.
pub fn blend_over(dst: &mut Rgba<u8>, src: Rgba<u8>, amount: f32) {
    let sa = src[3] as f32 / 255.0 * amount.clamp(0.0, 1.0);
    if sa <= 0.0 {
        return;
    }
    if sa >= 1.0 {
        *dst = src;
        return;
    }
    let da = dst[3] as f32 / 255.0;
    let keep = da * (1.0 - sa);
    let out_alpha = sa + keep;
    for channel in 0..3 {
        let value = (src[channel] as f32 * sa + dst[channel] as f32 * keep) / out_alpha;
        dst[channel] = value.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_alpha * 255.0).round().clamp(0.0, 255.0) as u8;
}

/// Fill `path` onto `canvas` with `color`.
pub fn fill_path(canvas: &mut RgbaImage, path: &BezPath, color: Rgba<u8>) {
    let (width, height) = canvas.dimensions();
    let cover = coverage(path, width, height);
    for (pixel, amount) in canvas.pixels_mut().zip(cover) {
        if amount > 0 {
            blend_over(pixel, color, amount as f32 / 255.0);
        }
    }
}

/// One-bit draw target that paints "on" pixels of an RGBA canvas in a fixed color.
struct StrokeTarget<'a> {
    canvas: &'a mut RgbaImage,
    color: Rgba<u8>,
}

impl OriginDimensions for StrokeTarget<'_> {
    fn size(&self) -> Size {
        Size::new(self.canvas.width(), self.canvas.height())
    }
}

impl DrawTarget for StrokeTarget<'_> {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let (width, height) = self.canvas.dimensions();
        for Pixel(point, color) in pixels {
            if color.is_off() || point.x < 0 || point.y < 0 {
                continue;
            }
            let (x, y) = (point.x as u32, point.y as u32);
            if x < width && y < height {
                blend_over(self.canvas.get_pixel_mut(x, y), self.color, 1.0);
            }
        }
        Ok(())
    }
}

/// Snap a canvas coordinate to the pixel containing it.
fn to_pixel(p: kurbo::Point, width: u32, height: u32) -> Point {
    let x = (p.x.floor() as i32).clamp(0, width as i32 - 1);
    let y = (p.y.floor() as i32).clamp(0, height as i32 - 1);
    Point::new(x, y)
}

/// Flatten `path` into pixel polylines, one per subpath.
fn polylines(path: &BezPath, width: u32, height: u32) -> Vec<Vec<Point>> {
    let mut lines: Vec<Vec<Point>> = Vec::new();
    path.flatten(TOLERANCE, |el| match el {
        PathEl::MoveTo(p) => lines.push(vec![to_pixel(p, width, height)]),
        PathEl::LineTo(p) => {
            if let Some(line) = lines.last_mut() {
                line.push(to_pixel(p, width, height));
            }
        }
        PathEl::ClosePath => {
            if let Some(line) = lines.last_mut() {
                if let Some(&first) = line.first() {
                    line.push(first);
                }
            }
        }
        _ => {}
    });
    for line in &mut lines {
        line.dedup();
    }
    lines
}

/// Stroke the outline of `path` onto `canvas`.
pub fn stroke_path(canvas: &mut RgbaImage, path: &BezPath, color: Rgba<u8>, stroke_width: u32) {
    let (width, height) = canvas.dimensions();
    if width == 0 || height == 0 {
        return;
    }
    let style = PrimitiveStyle::with_stroke(BinaryColor::On, stroke_width);
    let lines = polylines(path, width, height);
    let mut target = StrokeTarget { canvas, color };

    for points in lines.iter().filter(|points| points.len() >= 2) {
        Polyline::new(points)
            .into_styled(style)
            .draw(&mut target)
            .ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Rect;
    use kurbo::Shape;

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> BezPath {
        Rect::new(x0, y0, x1, y1).to_path(TOLERANCE)
    }

    #[test]
    fn test_pixel_aligned_square_has_exact_coverage() {
        let cover = coverage(&square(2.0, 2.0, 6.0, 6.0), 8, 8);
        for y in 0..8 {
            for x in 0..8 {
                let inside = (2..6).contains(&x) && (2..6).contains(&y);
                let expected = if inside { 255 } else { 0 };
                assert_eq!(cover[y * 8 + x], expected, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_half_pixel_edge_is_antialiased() {
        let cover = coverage(&square(0.5, 0.0, 4.0, 4.0), 4, 4);
        assert!((120..=136).contains(&cover[0]), "edge coverage {}", cover[0]);
        assert_eq!(cover[1], 255);
    }

    #[test]
    fn test_reversed_overlap_cancels() {
        // Out and back along the same edge encloses nothing
        let mut path = BezPath::new();
        path.move_to((1.0, 1.0));
        path.line_to((7.0, 7.0));
        path.line_to((1.0, 1.0));
        path.close_path();
        assert!(coverage(&path, 8, 8).iter().all(|&c| c == 0));
    }

    #[test]
    fn test_empty_path_has_no_coverage() {
        assert!(coverage(&BezPath::new(), 4, 4).iter().all(|&c| c == 0));
    }

    #[test]
    fn test_blend_over() {
        let mut dst = Rgba([0, 0, 0, 255]);
        blend_over(&mut dst, Rgba([200, 100, 50, 255]), 1.0);
        assert_eq!(dst, Rgba([200, 100, 50, 255]));

        let mut dst = Rgba([0, 0, 0, 255]);
        blend_over(&mut dst, Rgba([200, 100, 50, 255]), 0.5);
        assert_eq!(dst, Rgba([100, 50, 25, 255]));

        let mut clear = Rgba([0, 0, 0, 0]);
        blend_over(&mut clear, Rgba([255, 255, 255, 84]), 1.0);
        assert_eq!(clear, Rgba([255, 255, 255, 84]));

        let mut untouched = Rgba([9, 9, 9, 9]);
        blend_over(&mut untouched, Rgba([255, 255, 255, 255]), 0.0);
        assert_eq!(untouched, Rgba([9, 9, 9, 9]));
    }

    #[test]
    fn test_fill_path_paints_inside_only() {
        let mut canvas = RgbaImage::new(8, 8);
        fill_path(&mut canvas, &square(2.0, 2.0, 6.0, 6.0), Rgba([255, 0, 0, 255]));
        assert_eq!(*canvas.get_pixel(3, 3), Rgba([255, 0, 0, 255]));
        assert_eq!(*canvas.get_pixel(0, 0), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_stroke_path_draws_outline() {
        let mut canvas = RgbaImage::new(10, 10);
        stroke_path(&mut canvas, &square(1.0, 1.0, 8.0, 8.0), Rgba([0, 255, 0, 255]), 1);
        assert_eq!(*canvas.get_pixel(1, 1), Rgba([0, 255, 0, 255]));
        assert_eq!(*canvas.get_pixel(8, 4), Rgba([0, 255, 0, 255]));
        // Interior stays untouched
        assert_eq!(*canvas.get_pixel(4, 4), Rgba([0, 0, 0, 0]));
    }
}
