//! # Phase Mask Generation
//!
//! Builds the closed outline of the illuminated part of the moon for a phase.
//!
//! The outline is two half-ellipses that meet at the top and bottom center of
//! the box:
//!
//! 1. **Limb**: half of the bounding ellipse on the lit side (right while
//!    waxing, left while waning). It never changes with phase.
//! 2. **Terminator**: a half-ellipse back from top to bottom whose horizontal
//!    semi-axis shrinks from the far limb (full moon) through zero (quarter,
//!    a straight centerline) onto the lit limb itself (new moon, zero area).
//!
//! The mask is centered at `(width/2, height/2)` and stays inside the box up
//! to [`TOLERANCE`]. Arcs are emitted as cubic Béziers by `kurbo`.

use std::f64::consts::{FRAC_PI_2, PI};

use kurbo::{Arc, BezPath, PathEl, Point, Vec2};

use crate::error::{MoonError, Result};
use crate::phase::{check_phase, Terminator};

/// Maximum distance, in pixels, between an arc and its Bézier approximation.
pub const TOLERANCE: f64 = 0.01;

/// Reject zero-sized canvases before any drawing happens.
pub fn check_dimensions(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(MoonError::InvalidDimensions { width, height });
    }
    Ok(())
}

/// Build the phase mask for a `width`×`height` box.
///
/// # Example
/// ```
/// use kurbo::{PathEl, Shape};
/// use moon_phase_lib::mask::phase_mask;
///
/// let full = phase_mask(64, 64, 1.0).unwrap();
/// assert_eq!(full.elements().last(), Some(&PathEl::ClosePath));
/// assert!((full.area().abs() - std::f64::consts::PI * 32.0 * 32.0).abs() < 1.0);
/// ```
pub fn phase_mask(width: u32, height: u32, phase: f64) -> Result<BezPath> {
    let mut path = BezPath::new();
    append_phase_mask(&mut path, width, height, phase)?;
    Ok(path)
}

/// Append the phase mask as a new closed subpath of `path`.
///
/// Only segments are added; filling or stroking is up to the caller.
pub fn append_phase_mask(path: &mut BezPath, width: u32, height: u32, phase: f64) -> Result<()> {
    check_dimensions(width, height)?;
    let phase = check_phase(phase)?;

    let cx = width as f64 / 2.0;
    let cy = height as f64 / 2.0;
    let terminator = Terminator::from_phase(phase);
    let s = terminator.side.sign();

    let bottom = Point::new(cx, cy * 2.0);
    // Limb: bottom → lit edge → top
    let limb = Arc {
        center: Point::new(cx, cy),
        radii: Vec2::new(cx, cy),
        start_angle: FRAC_PI_2,
        sweep_angle: -s * PI,
        x_rotation: 0.0,
    };
    // Same angular span, mirrored by `bulge`, walked back top → bottom
    let back = Arc {
        radii: Vec2::new(-terminator.bulge * cx, cy),
        ..limb
    };

    path.move_to(bottom);
    path.extend(limb.append_iter(TOLERANCE));
    append_reversed(path, bottom, back.append_iter(TOLERANCE));
    path.close_path();

    log::trace!(
        "phase mask {}x{} phase={} side={:?} bulge={}",
        width,
        height,
        phase,
        terminator.side,
        terminator.bulge
    );
    Ok(())
}

/// Append the cubic segments of `arc` (which starts at `start`) in reverse.
///
/// Tracing the terminator backwards with the limb's parameterization means a
/// terminator lying on the limb reproduces the limb's control points exactly,
/// so the two cancel under non-zero filling.
fn append_reversed(path: &mut BezPath, start: Point, arc: impl Iterator<Item = PathEl>) {
    let mut from = start;
    let mut segments = Vec::new();
    for el in arc {
        if let PathEl::CurveTo(c1, c2, to) = el {
            segments.push((from, c1, c2));
            from = to;
        }
    }
    for (to, c1, c2) in segments.into_iter().rev() {
        path.curve_to(c2, c1, to);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Shape;

    const SIZE: u32 = 128;
    const EPS: f64 = 2.0 * TOLERANCE;

    /// Flattened outline of a single closed subpath.
    fn polygon(phase: f64) -> Vec<Point> {
        let mut points = Vec::new();
        let mut subpaths = 0;
        phase_mask(SIZE, SIZE, phase).unwrap().flatten(TOLERANCE, |el| match el {
            PathEl::MoveTo(p) => {
                subpaths += 1;
                points.push(p);
            }
            PathEl::LineTo(p) => points.push(p),
            _ => {}
        });
        assert_eq!(subpaths, 1, "mask should be a single subpath");
        points
    }

    fn orientation(a: Point, b: Point, c: Point) -> f64 {
        (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
    }

    /// True when two segments cross at a single interior point.
    fn crosses(a: Point, b: Point, c: Point, d: Point) -> bool {
        let touching = [a, b]
            .iter()
            .any(|p| p.distance(c) < 1e-6 || p.distance(d) < 1e-6);
        if touching {
            return false;
        }
        let o1 = orientation(a, b, c);
        let o2 = orientation(a, b, d);
        let o3 = orientation(c, d, a);
        let o4 = orientation(c, d, b);
        o1 * o2 < 0.0 && o3 * o4 < 0.0
    }

    fn in_box(path: &BezPath, width: u32, height: u32) -> bool {
        let bounds = path.bounding_box();
        bounds.x0 >= -EPS
            && bounds.y0 >= -EPS
            && bounds.x1 <= width as f64 + EPS
            && bounds.y1 <= height as f64 + EPS
    }

    #[test]
    fn test_masks_are_closed_and_in_bounds() {
        for phase in [-1.0, -0.5, 0.0, 0.5, 1.0, -0.25, 0.8] {
            let path = phase_mask(SIZE, SIZE, phase).unwrap();
            assert_eq!(
                path.elements().last(),
                Some(&PathEl::ClosePath),
                "phase {phase} not closed"
            );
            assert!(in_box(&path, SIZE, SIZE), "phase {phase} leaves the box");
        }
    }

    #[test]
    fn test_masks_do_not_self_intersect() {
        // New moon retraces the limb and is covered separately
        for phase in [-1.0, -0.5, 0.5, 1.0, -0.25, 0.8] {
            let poly = polygon(phase);
            let n = poly.len();
            for i in 0..n {
                for j in (i + 2)..n {
                    if i == 0 && j == n - 1 {
                        continue;
                    }
                    assert!(
                        !crosses(poly[i], poly[(i + 1) % n], poly[j], poly[(j + 1) % n]),
                        "phase {phase} self-intersects at edges {i} and {j}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_full_moon_matches_bounding_circle() {
        let center = Point::new(64.0, 64.0);
        for phase in [1.0, -1.0] {
            for p in polygon(phase) {
                assert!(
                    (p.distance(center) - 64.0).abs() < EPS,
                    "phase {phase} point {p:?} off the circle"
                );
            }
            let area = phase_mask(SIZE, SIZE, phase).unwrap().area().abs();
            let disc = PI * 64.0 * 64.0;
            assert!((area - disc).abs() / disc < 0.001);
        }
    }

    #[test]
    fn test_new_moon_collapses_onto_limb() {
        let path = phase_mask(SIZE, SIZE, 0.0).unwrap();
        assert!(path.area().abs() < 1e-6, "new moon should enclose nothing");
        // Meets the vertical centerline only at the top and bottom
        assert!(path.bounding_box().x0 >= 64.0 - EPS);
    }

    #[test]
    fn test_quarter_terminator_is_centerline() {
        let disc = PI * 64.0 * 64.0;
        let waxing = phase_mask(SIZE, SIZE, -0.5).unwrap();
        assert!((waxing.area().abs() - disc / 2.0).abs() / disc < 0.001);
        assert!((waxing.bounding_box().x0 - 64.0).abs() < EPS);

        let waning = phase_mask(SIZE, SIZE, 0.5).unwrap();
        assert!((waning.area().abs() - disc / 2.0).abs() / disc < 0.001);
        assert!((waning.bounding_box().x1 - 64.0).abs() < EPS);
    }

    #[test]
    fn test_lit_side_follows_sign() {
        // Waxing crescent lives right of center, waning crescent left of it
        let waxing = phase_mask(SIZE, SIZE, -0.2).unwrap().bounding_box();
        assert!(waxing.x0 >= 64.0 - EPS);
        let waning = phase_mask(SIZE, SIZE, 0.2).unwrap().bounding_box();
        assert!(waning.x1 <= 64.0 + EPS);
    }

    #[test]
    fn test_area_tracks_illumination() {
        let disc = PI * 64.0 * 64.0;
        for phase in [-0.9, -0.3, 0.1, 0.6] {
            let area = phase_mask(SIZE, SIZE, phase).unwrap().area().abs();
            let expected = f64::abs(phase) * disc;
            assert!(
                (area - expected).abs() < 0.01 * disc,
                "phase {phase}: area {area} expected {expected}"
            );
        }
    }

    #[test]
    fn test_non_square_boxes() {
        for (width, height) in [(1, 1), (3, 7), (65, 33), (200, 50)] {
            let cx = width as f64 / 2.0;
            for phase in [-1.0, -0.3, 0.0, 0.7, 1.0] {
                let path = phase_mask(width, height, phase).unwrap();
                assert!(in_box(&path, width, height), "{width}x{height} phase {phase}");
            }
            let waxing = phase_mask(width, height, -0.3).unwrap().bounding_box();
            assert!(waxing.x0 >= cx - EPS, "{width}x{height} waxing left of center");
            let waning = phase_mask(width, height, 0.3).unwrap().bounding_box();
            assert!(waning.x1 <= cx + EPS, "{width}x{height} waning right of center");

            let ellipse = PI * cx * height as f64 / 2.0;
            let full = phase_mask(width, height, -1.0).unwrap().area().abs();
            assert!((full - ellipse).abs() / ellipse < 0.001);
        }
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            phase_mask(0, 10, 0.5),
            Err(MoonError::InvalidDimensions { width: 0, height: 10 })
        ));
        assert!(matches!(
            phase_mask(10, 10, -1.5),
            Err(MoonError::PhaseOutOfRange(_))
        ));
    }

    #[test]
    fn test_append_adds_subpath() {
        let mut path = BezPath::new();
        append_phase_mask(&mut path, 32, 32, 1.0).unwrap();
        append_phase_mask(&mut path, 32, 32, -0.4).unwrap();
        let closes = path
            .elements()
            .iter()
            .filter(|el| **el == PathEl::ClosePath)
            .count();
        assert_eq!(closes, 2);
    }
}
