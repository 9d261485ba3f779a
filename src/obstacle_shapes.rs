//! Obstacle shapes — the cut predicate contract the grid navigator relies on
//! to prune which squares need obstacle-cut work.
//!
//! Kept outside the core vertex/graph types, but the grid navigator's
//! aggregation step needs at least one concrete shape to exercise and test.

use crate::vec2::Vector;

/// A dynamic obstacle supplied per query.
pub trait DynamicObstacle {
    fn center(&self) -> Vector;

    /// CCW ring approximating the obstacle's footprint.
    fn polygon(&self) -> Vec<Vector>;

    fn translate(&mut self, delta: Vector);

    /// True if `p` is inside the obstacle, or within `edge_len` of it.
    fn is_point_around(&self, p: Vector, edge_len: f32) -> bool;

    /// Inflation margin applied to the obstacle's ring before it cuts a
    /// navmesh sub-polygon. Backends that only cut grid squares (no
    /// inflation) can ignore this and keep the default.
    fn offset(&self) -> f32 {
        0.0
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Circle {
    pub center: Vector,
    pub radius: f32,
    pub segments: usize,
}

impl Circle {
    pub fn new(center: Vector, radius: f32) -> Self {
        Self {
            center,
            radius,
            segments: 16,
        }
    }
}

impl DynamicObstacle for Circle {
    fn center(&self) -> Vector {
        self.center
    }

    fn polygon(&self) -> Vec<Vector> {
        let n = self.segments.max(3);
        (0..n)
            .map(|i| {
                let theta = (i as f32 / n as f32) * std::f32::consts::TAU;
                self.center + Vector::new(theta.cos(), theta.sin()) * self.radius
            })
            .collect()
    }

    fn translate(&mut self, delta: Vector) {
        self.center = self.center + delta;
    }

    fn is_point_around(&self, p: Vector, edge_len: f32) -> bool {
        // Euclidean distance to the center.
        self.center.distance(p) <= self.radius + edge_len.max(0.0)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Rectangle {
    pub center: Vector,
    pub half_extents: Vector,
}

impl Rectangle {
    pub fn new(center: Vector, width: f32, height: f32) -> Self {
        Self {
            center,
            half_extents: Vector::new(width * 0.5, height * 0.5),
        }
    }

    fn min(&self) -> Vector {
        self.center - self.half_extents
    }

    fn max(&self) -> Vector {
        self.center + self.half_extents
    }
}

impl DynamicObstacle for Rectangle {
    fn center(&self) -> Vector {
        self.center
    }

    fn polygon(&self) -> Vec<Vector> {
        let min = self.min();
        let max = self.max();
        vec![
            min,
            Vector::new(max.x, min.y),
            max,
            Vector::new(min.x, max.y),
        ]
    }

    fn translate(&mut self, delta: Vector) {
        self.center = self.center + delta;
    }

    fn is_point_around(&self, p: Vector, edge_len: f32) -> bool {
        // Axis-aligned-then-Euclidean: clamp to the box, then
        // measure the remaining Euclidean distance to that clamped point.
        let min = self.min();
        let max = self.max();
        let clamped = Vector::new(p.x.clamp(min.x, max.x), p.y.clamp(min.y, max.y));
        clamped.distance(p) <= edge_len.max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circle_is_point_around_inside_and_ring() {
        let c = Circle::new(Vector::new(0.0, 0.0), 10.0);
        assert!(c.is_point_around(Vector::new(0.0, 0.0), 0.0));
        assert!(c.is_point_around(Vector::new(15.0, 0.0), 5.0));
        assert!(!c.is_point_around(Vector::new(20.0, 0.0), 5.0));
    }

    #[test]
    fn rectangle_is_point_around_uses_clamped_distance() {
        let r = Rectangle::new(Vector::new(0.0, 0.0), 10.0, 10.0);
        assert!(r.is_point_around(Vector::new(0.0, 0.0), 0.0));
        assert!(r.is_point_around(Vector::new(5.0, 8.0), 0.0));
        assert!(r.is_point_around(Vector::new(8.0, 8.0), 3.0));
        assert!(!r.is_point_around(Vector::new(20.0, 20.0), 1.0));
    }

    #[test]
    fn translate_moves_center() {
        let mut c = Circle::new(Vector::new(0.0, 0.0), 1.0);
        c.translate(Vector::new(3.0, 4.0));
        assert_eq!(c.center(), Vector::new(3.0, 4.0));
    }

    #[test]
    fn circle_polygon_has_requested_vertex_count() {
        let c = Circle::new(Vector::ZERO, 5.0);
        assert_eq!(c.polygon().len(), 16);
    }
}
