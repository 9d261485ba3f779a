//! Grid navigator: axis-aligned square tiling of free space, with a
//! visibility graph over the corners of fully-visible squares.

use crate::error::{CancelToken, NavError, Result};
use crate::geometry::{point_in_polygon_with_holes, segments_intersect};
use crate::graph::Graph;
use crate::navigator::{NavGraph, QueryOptions};
use crate::obstacle_shapes::DynamicObstacle;
use crate::vec2::Vector;

/// Axis-aligned quad with corners `a, b, c, d` (CCW) and per-corner/-center
/// free-region flags.
#[derive(Debug, Clone, Copy)]
pub struct Square {
    pub a: Vector,
    pub b: Vector,
    pub c: Vector,
    pub d: Vector,
    pub center: Vector,
    pub is_a: bool,
    pub is_b: bool,
    pub is_c: bool,
    pub is_d: bool,
    pub is_center: bool,
}

impl Square {
    pub fn corners(&self) -> [Vector; 4] {
        [self.a, self.b, self.c, self.d]
    }

    /// A square is visible iff all five flags are true.
    pub fn is_visible(&self) -> bool {
        self.is_a && self.is_b && self.is_c && self.is_d && self.is_center
    }

    fn bbox_contains(&self, p: Vector) -> bool {
        p.x >= self.a.x.min(self.c.x)
            && p.x <= self.a.x.max(self.c.x)
            && p.y >= self.a.y.min(self.c.y)
            && p.y <= self.a.y.max(self.c.y)
    }
}

pub struct GridNavigator {
    outer: Vec<Vector>,
    holes: Vec<Vec<Vector>>,
    square_size: f32,
    lattice_offset: Vector,
    squares: Vec<Square>,
    graph: Graph,
    built: bool,
}

impl GridNavigator {
    pub fn new(outer: Vec<Vector>, holes: Vec<Vec<Vector>>, square_size: f32) -> Self {
        Self::with_offset(outer, holes, square_size, Vector::ZERO)
    }

    pub fn with_offset(
        outer: Vec<Vector>,
        holes: Vec<Vec<Vector>>,
        square_size: f32,
        lattice_offset: Vector,
    ) -> Self {
        Self {
            outer,
            holes,
            square_size,
            lattice_offset,
            squares: Vec::new(),
            graph: Graph::new(),
            built: false,
        }
    }

    pub fn squares(&self) -> &[Square] {
        &self.squares
    }

    pub fn visible_squares(&self) -> impl Iterator<Item = &Square> {
        self.squares.iter().filter(|s| s.is_visible())
    }

    /// Whether `generate` has completed at least once without error.
    pub fn is_built(&self) -> bool {
        self.built
    }

    fn is_free(&self, p: Vector) -> bool {
        point_in_polygon_with_holes(p, &self.outer, &self.holes)
    }

    fn free_region_segment_clear(&self, a: Vector, b: Vector) -> bool {
        !ring_crosses(a, b, &self.outer) && !self.holes.iter().any(|h| ring_crosses(a, b, h))
    }
}

fn ring_crosses(a: Vector, b: Vector, ring: &[Vector]) -> bool {
    let n = ring.len();
    if n < 2 {
        return false;
    }
    (0..n).any(|i| segments_intersect(a, b, ring[i], ring[(i + 1) % n]))
}

impl NavGraph for GridNavigator {
    fn generate(&mut self, cancel: &CancelToken) -> Result<()> {
        log::info!("begin grid generation, square_size={}", self.square_size);
        self.built = false;

        let bbox = crate::geometry::BoundingBox::of_ring(&self.outer).ok_or(NavError::BuildFailed {
            polygon_index: 0,
            reason: "outer ring is empty".to_string(),
        })?;
        if self.square_size <= 0.0 {
            return Err(NavError::BuildFailed {
                polygon_index: 0,
                reason: "square_size must be positive".to_string(),
            });
        }

        // Built locally so a mid-loop cancellation (checked once per row)
        // leaves `self.squares`/`self.graph` at their pre-build (empty)
        // values instead of a partial lattice from the rows already swept.
        let mut squares = Vec::new();
        let mut graph = Graph::new();

        let mut y = bbox.min.y + self.lattice_offset.y;
        while y < bbox.max.y {
            cancel.check()?;
            let mut x = bbox.min.x + self.lattice_offset.x;
            while x < bbox.max.x {
                let a = Vector::new(x, y);
                let b = Vector::new(x + self.square_size, y);
                let c = Vector::new(x + self.square_size, y + self.square_size);
                let d = Vector::new(x, y + self.square_size);
                let center = Vector::new(x + self.square_size / 2.0, y + self.square_size / 2.0);

                let square = Square {
                    a,
                    b,
                    c,
                    d,
                    center,
                    is_a: self.is_free(a),
                    is_b: self.is_free(b),
                    is_c: self.is_free(c),
                    is_d: self.is_free(d),
                    is_center: self.is_free(center),
                };
                squares.push(square);
                x += self.square_size;
            }
            y += self.square_size;
        }

        for square in squares.iter().filter(|s| s.is_visible()) {
            // Degenerate (zero-area) squares never reach this loop since
            // square_size is checked > 0 above; no edges from empty spans.
            graph.link_both(square.a, square.b);
            graph.link_both(square.b, square.c);
            graph.link_both(square.c, square.d);
            graph.link_both(square.d, square.a);
            graph.link_both(square.a, square.c);
            graph.link_both(square.b, square.d);
        }

        self.squares = squares;
        self.graph = graph;
        self.built = true;
        log::info!(
            "grid generation done: {} squares, {} graph vertices",
            self.squares.len(),
            self.graph.len()
        );
        Ok(())
    }

    fn visibility_graph(&self) -> &Graph {
        &self.graph
    }

    fn aggregation_graph(&self, start: Vector, dest: Vector, opts: &QueryOptions) -> Graph {
        let mut graph = self.graph.clone();
        graph.ensure_vertex(start);
        graph.ensure_vertex(dest);

        for square in self.visible_squares() {
            if square.bbox_contains(start) {
                for corner in square.corners() {
                    if self.free_region_segment_clear(start, corner) {
                        graph.link_both(start, corner);
                    }
                }
            }
            if square.bbox_contains(dest) {
                for corner in square.corners() {
                    if self.free_region_segment_clear(dest, corner) {
                        graph.link_both(dest, corner);
                    }
                }
            }
        }

        if !opts.obstacles.is_empty() {
            for obstacle in opts.obstacles {
                let obstacle_ring = obstacle.polygon();
                for square in self.visible_squares() {
                    let near = obstacle
                        .is_point_around(square.center, self.square_size + opts.agent_radius);
                    if !near {
                        continue;
                    }
                    for corner in square.corners() {
                        if crate::geometry::point_in_polygon_f(corner, &obstacle_ring) == 1 {
                            graph.remove_vertex(corner);
                            continue;
                        }
                        let neighbors: Vec<Vector> = graph.neighbors(corner).to_vec();
                        for neighbor in neighbors {
                            if ring_crosses(corner, neighbor, &obstacle_ring) {
                                graph.unlink_both(corner, neighbor);
                            }
                        }
                    }
                }
            }
        }

        graph
    }

    fn contains_point(&self, p: Vector) -> bool {
        self.is_free(p)
    }

    fn cost(&self, a: Vector, b: Vector) -> f32 {
        crate::astar::euclidean_cost(a, b)
    }

    fn closest_point(&self, p: Vector) -> Option<Vector> {
        let mut best: Option<(f32, Vector)> = None;
        for square in self.visible_squares() {
            for candidate in square.corners().into_iter().chain(std::iter::once(square.center)) {
                let d = candidate.distance(p);
                if best.map(|(bd, _)| d < bd).unwrap_or(true) {
                    best = Some((d, candidate));
                }
            }
        }
        best.map(|(_, v)| v)
    }
}
