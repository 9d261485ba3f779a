//! Path smoothing, kept outside the core pathfinding types: subdivide a
//! polyline, then relax it with iterative midpoint averaging. Optional
//! post-processing, not on the query hot path.

use crate::vec2::Vector;

const MIN_SEGMENT_LENGTH: f32 = 0.005;
const MAX_SUBDIVISION_POWER: u32 = 10;

fn lerp(a: Vector, b: Vector, t: f32) -> Vector {
    a + (b - a) * t
}

/// How a path is subdivided before relaxation.
pub enum Subdivision {
    /// Resample at roughly uniform arc length, clamped to a minimum segment
    /// length of 0.005.
    UniformLength { max_segment_length: f32 },
    /// Split every existing segment into `2^subdivisions` pieces, capped at
    /// `2^10`.
    PowerOfTwo { subdivisions: u32 },
}

fn subdivide_uniform(path: &[Vector], max_segment_length: f32) -> Vec<Vector> {
    let max_segment_length = max_segment_length.max(MIN_SEGMENT_LENGTH);

    let mut out = Vec::new();
    let mut distance_along = 0.0f32;
    for w in path.windows(2) {
        let (start, end) = (w[0], w[1]);
        let length = start.distance(end);
        while distance_along < length {
            out.push(lerp(start, end, distance_along / length));
            distance_along += max_segment_length;
        }
        distance_along -= length;
    }
    out.push(*path.last().unwrap());
    out
}

fn subdivide_power_of_two(path: &[Vector], subdivisions: u32) -> Vec<Vector> {
    let subdivisions = subdivisions.min(MAX_SUBDIVISION_POWER);
    let sub_segments = 1u32 << subdivisions;

    let mut out = Vec::new();
    for w in path.windows(2) {
        let (start, end) = (w[0], w[1]);
        for j in 0..sub_segments {
            out.push(lerp(start, end, j as f32 / sub_segments as f32));
        }
    }
    out.push(*path.last().unwrap());
    out
}

/// Relax `points` in place for `iterations` rounds, holding both endpoints
/// fixed: `p_i <- lerp(p_i, midpoint(p_{i-1}, p_{i+1}), strength)`.
fn relax(points: &mut [Vector], strength: f32, iterations: u32) {
    if strength <= 0.0 || points.len() < 3 {
        return;
    }
    for _ in 0..iterations {
        let mut prev = points[0];
        for i in 1..points.len() - 1 {
            let current = points[i];
            let midpoint = Vector::new(
                (prev.x + points[i + 1].x) / 2.0,
                (prev.y + points[i + 1].y) / 2.0,
            );
            points[i] = lerp(current, midpoint, strength);
            prev = current;
        }
    }
}

/// Subdivide then relax `path`. Paths shorter than two points are returned
/// unchanged.
pub fn smooth(path: &[Vector], subdivision: Subdivision, strength: f32, iterations: u32) -> Vec<Vector> {
    if path.len() < 2 {
        return path.to_vec();
    }

    let mut subdivided = match subdivision {
        Subdivision::UniformLength { max_segment_length } => {
            subdivide_uniform(path, max_segment_length)
        }
        Subdivision::PowerOfTwo { subdivisions } => subdivide_power_of_two(path, subdivisions),
    };

    relax(&mut subdivided, strength, iterations);
    subdivided
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_paths_pass_through_unchanged() {
        let path = vec![Vector::new(0.0, 0.0)];
        let out = smooth(&path, Subdivision::PowerOfTwo { subdivisions: 2 }, 0.5, 1);
        assert_eq!(out, path);
    }

    #[test]
    fn power_of_two_subdivision_preserves_endpoints() {
        let path = vec![Vector::new(0.0, 0.0), Vector::new(10.0, 0.0)];
        let out = smooth(&path, Subdivision::PowerOfTwo { subdivisions: 2 }, 0.0, 0);
        assert_eq!(out.first().copied(), Some(Vector::new(0.0, 0.0)));
        assert_eq!(out.last().copied(), Some(Vector::new(10.0, 0.0)));
        assert_eq!(out.len(), 5);
    }

    #[test]
    fn subdivision_power_is_capped_at_ten() {
        let path = vec![Vector::new(0.0, 0.0), Vector::new(1.0, 0.0)];
        let out = smooth(&path, Subdivision::PowerOfTwo { subdivisions: 99 }, 0.0, 0);
        assert_eq!(out.len(), (1usize << 10) + 1);
    }

    #[test]
    fn uniform_length_clamps_minimum_segment() {
        let path = vec![Vector::new(0.0, 0.0), Vector::new(1.0, 0.0)];
        let out = subdivide_uniform(&path, 0.0);
        assert!(out.len() > 1);
        assert_eq!(out.last().copied(), Some(Vector::new(1.0, 0.0)));
    }

    #[test]
    fn zero_strength_leaves_points_unmoved() {
        let path = vec![
            Vector::new(0.0, 0.0),
            Vector::new(5.0, 5.0),
            Vector::new(10.0, 0.0),
        ];
        let mut points = path.clone();
        relax(&mut points, 0.0, 5);
        assert_eq!(points, path);
    }

    #[test]
    fn relaxation_holds_endpoints_fixed() {
        let mut points = vec![
            Vector::new(0.0, 0.0),
            Vector::new(5.0, 10.0),
            Vector::new(10.0, 0.0),
        ];
        let ends = (points[0], *points.last().unwrap());
        relax(&mut points, 0.5, 3);
        assert_eq!((points[0], *points.last().unwrap()), ends);
    }
}
