//! Interpolation helpers:
//! - lerp_f32 / lerp_point (straight-line blends)
//! - delay_fraction / effective_fraction (delay-aware step timing)
//! - sample_path (equal-duration segments through waypoints)
//! - catmull_rom_polyline (display-only smoothing of drawn paths)

use crate::data::Point;

/// Largest share of a step a delay may consume; the rest is left for motion.
pub const MAX_DELAY_FRACTION: f32 = 0.99;

/// Linear interpolation of scalars.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
pub fn lerp_point(a: Point, b: Point, t: f32) -> Point {
    Point::new(lerp_f32(a.x, b.x, t), lerp_f32(a.y, b.y, t))
}

/// Convert a delay in seconds into a fraction of one step at `speed` steps/s.
#[inline]
pub fn delay_fraction(delay_s: f32, speed: f32) -> f32 {
    let f = delay_s * speed;
    if f.is_nan() {
        return 0.0;
    }
    f.clamp(0.0, MAX_DELAY_FRACTION)
}

/// Motion fraction within a step once the delay has been served.
/// Zero while `step_frac < delay_frac`.
#[inline]
pub fn effective_fraction(step_frac: f32, delay_frac: f32) -> f32 {
    if step_frac < delay_frac {
        return 0.0;
    }
    ((step_frac - delay_frac) / (1.0 - delay_frac)).clamp(0.0, 1.0)
}

/// Position along `[from, waypoints.., to]` at fraction `t`, every segment
/// taking the same share of time regardless of its length.
pub fn sample_path(from: Point, waypoints: &[Point], to: Point, t: f32) -> Point {
    let t = t.clamp(0.0, 1.0);
    if waypoints.is_empty() {
        return lerp_point(from, to, t);
    }
    let segments = waypoints.len() + 1;
    let seg_progress = t * segments as f32;
    let idx = (seg_progress.floor() as usize).min(segments - 1);
    let local = (seg_progress - idx as f32).clamp(0.0, 1.0);

    let point_at = |i: usize| -> Point {
        if i == 0 {
            from
        } else if i == segments {
            to
        } else {
            waypoints[i - 1]
        }
    };
    lerp_point(point_at(idx), point_at(idx + 1), local)
}

/// Uniform Catmull-Rom spline through `points`, `samples_per_segment` samples
/// per span, endpoints included. Only for drawing; motion uses `sample_path`.
pub fn catmull_rom_polyline(points: &[Point], samples_per_segment: usize) -> Vec<Point> {
    if points.len() < 3 || samples_per_segment == 0 {
        return points.to_vec();
    }
    let n = points.len();
    let mut out = Vec::with_capacity((n - 1) * samples_per_segment + 1);
    for i in 0..(n - 1) {
        let p0 = points[i.saturating_sub(1)];
        let p1 = points[i];
        let p2 = points[i + 1];
        let p3 = points[(i + 2).min(n - 1)];
        for s in 0..samples_per_segment {
            let t = s as f32 / samples_per_segment as f32;
            out.push(catmull_rom(p0, p1, p2, p3, t));
        }
    }
    out.push(points[n - 1]);
    out
}

#[inline]
fn catmull_rom(p0: Point, p1: Point, p2: Point, p3: Point, t: f32) -> Point {
    let t2 = t * t;
    let t3 = t2 * t;
    let axis = |a: f32, b: f32, c: f32, d: f32| -> f32 {
        0.5 * ((2.0 * b)
            + (-a + c) * t
            + (2.0 * a - 5.0 * b + 4.0 * c - d) * t2
            + (-a + 3.0 * b - 3.0 * c + d) * t3)
    };
    Point::new(
        axis(p0.x, p1.x, p2.x, p3.x),
        axis(p0.y, p1.y, p2.y, p3.y),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        a.distance(b) < 1e-4
    }

    #[test]
    fn delay_fraction_is_clamped() {
        assert_eq!(delay_fraction(0.0, 1.0), 0.0);
        assert!((delay_fraction(0.25, 2.0) - 0.5).abs() < 1e-6);
        assert_eq!(delay_fraction(5.0, 1.0), MAX_DELAY_FRACTION);
        assert_eq!(delay_fraction(-1.0, 1.0), 0.0);
        assert_eq!(delay_fraction(f32::NAN, 1.0), 0.0);
    }

    #[test]
    fn effective_fraction_rescales_after_delay() {
        assert_eq!(effective_fraction(0.3, 0.5), 0.0);
        assert_eq!(effective_fraction(0.5, 0.5), 0.0);
        assert!((effective_fraction(0.75, 0.5) - 0.5).abs() < 1e-6);
        assert_eq!(effective_fraction(1.0, 0.5), 1.0);
        assert!((effective_fraction(0.4, 0.0) - 0.4).abs() < 1e-6);
    }

    #[test]
    fn path_without_waypoints_is_a_straight_lerp() {
        let p = sample_path(Point::new(0.0, 0.0), &[], Point::new(10.0, 20.0), 0.5);
        assert!(close(p, Point::new(5.0, 10.0)));
    }

    #[test]
    fn segments_share_time_equally_regardless_of_length() {
        // First segment is 10 long, second is 100 long; both take half the time.
        let from = Point::new(0.0, 0.0);
        let wp = [Point::new(10.0, 0.0)];
        let to = Point::new(10.0, 100.0);
        assert!(close(sample_path(from, &wp, to, 0.5), wp[0]));
        assert!(close(sample_path(from, &wp, to, 0.25), Point::new(5.0, 0.0)));
        assert!(close(sample_path(from, &wp, to, 0.75), Point::new(10.0, 50.0)));
        assert!(close(sample_path(from, &wp, to, 1.0), to));
    }

    #[test]
    fn catmull_rom_passes_through_control_points() {
        let pts = [
            Point::new(0.0, 0.0),
            Point::new(50.0, 40.0),
            Point::new(100.0, 0.0),
        ];
        let curve = catmull_rom_polyline(&pts, 8);
        assert_eq!(curve.len(), 17);
        assert!(close(curve[0], pts[0]));
        assert!(close(curve[8], pts[1]));
        assert!(close(curve[16], pts[2]));
    }
}
