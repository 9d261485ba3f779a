//! KD-tree over a snapshot of graph vertices, used for out-of-area
//! nearest-vertex queries.

use crate::vec2::Vector;

#[derive(Debug, Clone)]
struct Node {
    point: Vector,
    axis: u8,
    left: Option<Box<Node>>,
    right: Option<Box<Node>>,
}

#[derive(Debug, Clone, Default)]
pub struct KdTree {
    root: Option<Box<Node>>,
}

impl KdTree {
    pub fn build(points: &[Vector]) -> Self {
        let mut pts: Vec<Vector> = points.to_vec();
        let root = build_recursive(&mut pts, 0);
        Self { root }
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Nearest neighbor to `query`. Ties are broken by first-seen (the
    /// descent order below is deterministic given a fixed build).
    pub fn nearest(&self, query: Vector) -> Option<Vector> {
        let mut best: Option<(f32, Vector)> = None;
        if let Some(root) = &self.root {
            nearest_recursive(root, query, &mut best);
        }
        best.map(|(_, p)| p)
    }
}

fn build_recursive(points: &mut [Vector], depth: usize) -> Option<Box<Node>> {
    if points.is_empty() {
        return None;
    }
    let axis = (depth % 2) as u8;
    if axis == 0 {
        points.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap());
    } else {
        points.sort_by(|a, b| a.y.partial_cmp(&b.y).unwrap());
    }
    let mid = points.len() / 2;
    let point = points[mid];
    let (left_pts, rest) = points.split_at_mut(mid);
    let right_pts = &mut rest[1..];

    Some(Box::new(Node {
        point,
        axis,
        left: build_recursive(left_pts, depth + 1),
        right: build_recursive(right_pts, depth + 1),
    }))
}

fn nearest_recursive(node: &Node, query: Vector, best: &mut Option<(f32, Vector)>) {
    let d2 = (node.point - query).dot(node.point - query);
    if best.map(|(bd, _)| d2 < bd).unwrap_or(true) {
        *best = Some((d2, node.point));
    }

    let (query_coord, node_coord) = if node.axis == 0 {
        (query.x, node.point.x)
    } else {
        (query.y, node.point.y)
    };

    let (near, far) = if query_coord < node_coord {
        (&node.left, &node.right)
    } else {
        (&node.right, &node.left)
    };

    if let Some(near) = near {
        nearest_recursive(near, query, best);
    }

    let axis_dist = query_coord - node_coord;
    let within_plane = best.map(|(bd, _)| axis_dist * axis_dist < bd).unwrap_or(true);
    if within_plane {
        if let Some(far) = far {
            nearest_recursive(far, query, best);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_on_empty_tree_is_none() {
        let tree = KdTree::build(&[]);
        assert!(tree.is_empty());
        assert_eq!(tree.nearest(Vector::ZERO), None);
    }

    #[test]
    fn nearest_finds_closest_point() {
        let points = vec![
            Vector::new(0.0, 0.0),
            Vector::new(10.0, 10.0),
            Vector::new(5.0, 5.0),
            Vector::new(-3.0, 2.0),
        ];
        let tree = KdTree::build(&points);
        assert_eq!(tree.nearest(Vector::new(5.5, 5.4)), Some(Vector::new(5.0, 5.0)));
        assert_eq!(tree.nearest(Vector::new(-3.1, 2.1)), Some(Vector::new(-3.0, 2.0)));
    }

    #[test]
    fn nearest_matches_brute_force_on_random_set() {
        let mut points = Vec::new();
        let mut seed = 7u64;
        for _ in 0..200 {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
            let x = ((seed >> 33) % 1000) as f32;
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
            let y = ((seed >> 33) % 1000) as f32;
            points.push(Vector::new(x, y));
        }
        let tree = KdTree::build(&points);

        for i in 0..20 {
            let q = Vector::new((i * 37) as f32, (i * 53) as f32);
            let got = tree.nearest(q).unwrap();
            let got_d2 = (got - q).dot(got - q);

            let brute_d2 = points
                .iter()
                .map(|&p| (p - q).dot(p - q))
                .fold(f32::MAX, f32::min);

            assert!((got_d2 - brute_d2).abs() < 1e-3);
        }
    }
}
