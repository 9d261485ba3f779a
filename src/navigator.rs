//! A single capability set implemented by two backends. Modeled as a trait
//! (`NavGraph`), implemented by [`crate::grid::GridNavigator`] and
//! [`crate::mesh::MeshNavigator`] and dispatched statically through
//! [`crate::pathfinder::NavVariant`].

use crate::error::{CancelToken, Result};
use crate::graph::Graph;
use crate::obstacle_pool::ObstacleId;
use crate::obstacle_shapes::DynamicObstacle;
use crate::vec2::Vector;

/// Per-query options. Deliberately a closed, small struct rather than an
/// open config bag.
pub struct QueryOptions<'a> {
    pub obstacles: &'a [&'a dyn DynamicObstacle],
    pub agent_radius: f32,
}

impl<'a> Default for QueryOptions<'a> {
    fn default() -> Self {
        Self {
            obstacles: &[],
            agent_radius: 0.0,
        }
    }
}

/// The capability set shared by the grid and mesh navigators.
pub trait NavGraph {
    /// Build (or rebuild) the navigator's precomputed visibility graph and
    /// auxiliary indices. Must leave the navigator in its pre-build state on
    /// cancellation or failure.
    fn generate(&mut self, cancel: &CancelToken) -> Result<()>;

    /// The static, query-independent visibility graph.
    fn visibility_graph(&self) -> &Graph;

    /// Build the per-query aggregation graph: a copy of the visibility graph
    /// plus start/dest connections and obstacle cuts.
    fn aggregation_graph(&self, start: Vector, dest: Vector, opts: &QueryOptions) -> Graph;

    fn contains_point(&self, p: Vector) -> bool;

    /// Edge weight / admissible heuristic. Must be symmetric and satisfy
    /// the triangle inequality.
    fn cost(&self, a: Vector, b: Vector) -> f32;

    /// Closest point among the navigator's own vertex set. Backends that
    /// have no notion of "own vertices" may return `None`.
    fn closest_point(&self, _p: Vector) -> Option<Vector> {
        None
    }

    /// Line-of-sight predicate honoring only the outer and non-viewable
    /// obstacles. Backends without a raycast index may return `None`.
    fn is_raycast_hit(&self, _a: Vector, _b: Vector) -> Option<bool> {
        None
    }

    /// Add dynamic obstacles incrementally, returning their pool IDs.
    /// Backends without incremental support return an empty vec.
    fn add_obstacles(&mut self, _obstacles: &[Box<dyn DynamicObstacle>]) -> Vec<ObstacleId> {
        Vec::new()
    }

    /// Remove previously added dynamic obstacles by ID. No-op for backends
    /// without incremental support.
    fn remove_obstacles(&mut self, _ids: &[ObstacleId]) {}
}
