//! Geometry for the decorative range-scan display.
//!
//! Purely cosmetic: points are random, not driven by telemetry. The random
//! source is passed in so the browser can use `Math.random` and tests can
//! use a fixed sequence.

use std::f64::consts::PI;

/// Points drawn per frame.
pub const POINTS_PER_FRAME: usize = 200;

/// Distance of the vehicle marker from the bottom edge.
const MARKER_OFFSET: f64 = 20.0;

/// Vehicle marker size (width, height).
pub const MARKER_SIZE: (f64, f64) = (20.0, 10.0);

/// Dot radius in pixels.
pub const POINT_RADIUS: f64 = 1.5;

/// A single scan return.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanPoint {
    pub x: f64,
    pub y: f64,
    /// Opacity in `[0, 1]`, fading with distance
    pub alpha: f64,
}

/// One frame of the scan.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanFrame {
    /// Vehicle marker center
    pub origin: (f64, f64),
    pub points: Vec<ScanPoint>,
}

/// Generate a frame for a `width` x `height` canvas.
///
/// `random` must yield values in `[0, 1)`.
pub fn scan_frame(width: f64, height: f64, mut random: impl FnMut() -> f64) -> ScanFrame {
    let center_x = width / 2.0;
    let center_y = height - MARKER_OFFSET;
    let max_dist = center_x.min(center_y).max(0.0);

    let points = (0..POINTS_PER_FRAME)
        .map(|_| {
            let angle = random() * PI;
            let mut distance = random() * max_dist;
            // a few returns cluster in a band, like an obstacle ahead
            if random() > 0.95 {
                distance = random() * (max_dist * 0.4) + max_dist * 0.2;
            }
            let alpha = if max_dist > 0.0 {
                (1.0 - distance / max_dist).clamp(0.0, 1.0)
            } else {
                0.0
            };
            ScanPoint {
                x: center_x - angle.cos() * distance,
                y: center_y - angle.sin() * distance,
                alpha,
            }
        })
        .collect();

    ScanFrame {
        origin: (center_x, center_y),
        points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Deterministic LCG in [0, 1).
    fn sequence(seed: u64) -> impl FnMut() -> f64 {
        let mut state = seed;
        move || {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            (state >> 11) as f64 / (1u64 << 53) as f64
        }
    }

    #[test]
    fn test_points_stay_in_upper_half_disc() {
        let frame = scan_frame(400.0, 300.0, sequence(7));
        assert_eq!(frame.points.len(), POINTS_PER_FRAME);
        assert_eq!(frame.origin, (200.0, 280.0));

        for point in &frame.points {
            let dx = point.x - frame.origin.0;
            let dy = point.y - frame.origin.1;
            assert!(dy <= 1e-9, "point below the marker: {point:?}");
            assert!((dx * dx + dy * dy).sqrt() <= 200.0 + 1e-9);
            assert!((0.0..=1.0).contains(&point.alpha));
        }
    }

    #[test]
    fn test_alpha_fades_with_distance() {
        // angle 0.5*PI, distance 0.5*max, no clustering
        let mut values = [0.5, 0.5, 0.0].into_iter().cycle();
        let frame = scan_frame(200.0, 120.0, move || values.next().unwrap_or(0.0));
        let point = frame.points[0];
        assert_relative_eq!(point.alpha, 0.5);
        assert_relative_eq!(point.x, 100.0, epsilon = 1e-9);
        assert_relative_eq!(point.y, 50.0, epsilon = 1e-9);
    }

    #[test]
    fn test_degenerate_canvas() {
        let frame = scan_frame(0.0, 0.0, sequence(1));
        assert!(frame.points.iter().all(|p| p.alpha == 0.0));
    }
}
