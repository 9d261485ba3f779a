//! Pathfinder facade: holds an ordered collection of navigators behind the
//! `NavGraph` capability set and dispatches queries by index.

use crate::error::{CancelToken, NavError, Result};
use crate::grid::GridNavigator;
use crate::mesh::MeshNavigator;
use crate::navigator::{NavGraph, QueryOptions};
use crate::obstacle_pool::ObstacleId;
use crate::obstacle_shapes::DynamicObstacle;
use crate::vec2::Vector;

/// Tagged-variant static dispatch over the two navigator backends.
pub enum NavVariant {
    Grid(GridNavigator),
    Mesh(MeshNavigator),
}

impl NavGraph for NavVariant {
    fn generate(&mut self, cancel: &CancelToken) -> Result<()> {
        match self {
            NavVariant::Grid(g) => g.generate(cancel),
            NavVariant::Mesh(m) => m.generate(cancel),
        }
    }

    fn visibility_graph(&self) -> &crate::graph::Graph {
        match self {
            NavVariant::Grid(g) => g.visibility_graph(),
            NavVariant::Mesh(m) => m.visibility_graph(),
        }
    }

    fn aggregation_graph(
        &self,
        start: Vector,
        dest: Vector,
        opts: &QueryOptions,
    ) -> crate::graph::Graph {
        match self {
            NavVariant::Grid(g) => g.aggregation_graph(start, dest, opts),
            NavVariant::Mesh(m) => m.aggregation_graph(start, dest, opts),
        }
    }

    fn contains_point(&self, p: Vector) -> bool {
        match self {
            NavVariant::Grid(g) => g.contains_point(p),
            NavVariant::Mesh(m) => m.contains_point(p),
        }
    }

    fn cost(&self, a: Vector, b: Vector) -> f32 {
        match self {
            NavVariant::Grid(g) => g.cost(a, b),
            NavVariant::Mesh(m) => m.cost(a, b),
        }
    }

    fn closest_point(&self, p: Vector) -> Option<Vector> {
        match self {
            NavVariant::Grid(g) => g.closest_point(p),
            NavVariant::Mesh(m) => m.closest_point(p),
        }
    }

    fn is_raycast_hit(&self, a: Vector, b: Vector) -> Option<bool> {
        match self {
            NavVariant::Grid(g) => g.is_raycast_hit(a, b),
            NavVariant::Mesh(m) => m.is_raycast_hit(a, b),
        }
    }

    fn add_obstacles(&mut self, obstacles: &[Box<dyn DynamicObstacle>]) -> Vec<ObstacleId> {
        match self {
            NavVariant::Grid(g) => g.add_obstacles(obstacles),
            NavVariant::Mesh(m) => m.add_obstacles(obstacles),
        }
    }

    fn remove_obstacles(&mut self, ids: &[ObstacleId]) {
        match self {
            NavVariant::Grid(g) => g.remove_obstacles(ids),
            NavVariant::Mesh(m) => m.remove_obstacles(ids),
        }
    }
}

/// Holds an ordered collection of navigators and dispatches queries by index.
#[derive(Default)]
pub struct Pathfinder {
    navigators: Vec<NavVariant>,
}

impl Pathfinder {
    pub fn new(navigators: Vec<NavVariant>) -> Self {
        Self { navigators }
    }

    /// Build every navigator in order, stopping at the first error. A
    /// `BuildFailed` already carries its own polygon index from the
    /// navigator that raised it; this just propagates it as-is.
    pub fn initialize(&mut self, cancel: &CancelToken) -> Result<()> {
        for (index, navigator) in self.navigators.iter_mut().enumerate() {
            navigator.generate(cancel).map_err(|e| {
                log::error!("navigator {index} failed to build: {e}");
                e
            })?;
        }
        Ok(())
    }

    fn navigator(&self, graph_id: usize) -> Result<&NavVariant> {
        self.navigators.get(graph_id).ok_or(NavError::InvalidGraphId(graph_id))
    }

    /// Build the aggregation graph and run A\*; fast-paths the exact
    /// two-node start↔dest graph without invoking search.
    pub fn path(
        &self,
        graph_id: usize,
        start: Vector,
        dest: Vector,
        opts: &QueryOptions,
    ) -> Result<Vec<Vector>> {
        let navigator = self.navigator(graph_id)?;
        let agg = navigator.aggregation_graph(start, dest, opts);

        if agg.len() == 2 && agg.neighbors(start) == [dest] && agg.neighbors(dest) == [start] {
            return Ok(vec![start, dest]);
        }

        Ok(crate::astar::find_path(&agg, start, dest, |a, b| {
            navigator.cost(a, b)
        }))
    }

    pub fn graph(&self, graph_id: usize) -> Result<&crate::graph::Graph> {
        Ok(self.navigator(graph_id)?.visibility_graph())
    }

    pub fn graph_with_search_path(
        &self,
        graph_id: usize,
        start: Vector,
        dest: Vector,
        opts: &QueryOptions,
    ) -> Result<crate::graph::Graph> {
        Ok(self.navigator(graph_id)?.aggregation_graph(start, dest, opts))
    }

    pub fn get_closest_point(&self, graph_id: usize, p: Vector) -> Result<Option<Vector>> {
        Ok(self.navigator(graph_id)?.closest_point(p))
    }

    pub fn is_raycast_hit(&self, graph_id: usize, a: Vector, b: Vector) -> Result<Option<bool>> {
        Ok(self.navigator(graph_id)?.is_raycast_hit(a, b))
    }

    pub fn add_obstacles(
        &mut self,
        graph_id: usize,
        obstacles: &[Box<dyn DynamicObstacle>],
    ) -> Result<Vec<ObstacleId>> {
        let navigator = self
            .navigators
            .get_mut(graph_id)
            .ok_or(NavError::InvalidGraphId(graph_id))?;
        Ok(navigator.add_obstacles(obstacles))
    }

    pub fn remove_obstacles(&mut self, graph_id: usize, ids: &[ObstacleId]) -> Result<()> {
        let navigator = self
            .navigators
            .get_mut(graph_id)
            .ok_or(NavError::InvalidGraphId(graph_id))?;
        navigator.remove_obstacles(ids);
        Ok(())
    }
}
