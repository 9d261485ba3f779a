//! 2D navigation: grid and navmesh backends behind a shared `NavGraph`
//! capability set, with A* pathfinding, dynamic obstacles, and a pathfinder
//! facade that dispatches queries across navigators.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod astar;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod grid;
pub mod kdtree;
pub mod mesh;
pub mod navigator;
pub mod obstacle_pool;
pub mod obstacle_shapes;
pub mod pathfinder;
pub mod smoothing;
pub mod vec2;

pub use error::{CancelToken, NavError, Result};
pub use graph::Graph;
pub use grid::{GridNavigator, Square};
pub use mesh::{CompositePolygon, InnerHole, MeshNavigator, Obstacle};
pub use navigator::{NavGraph, QueryOptions};
pub use obstacle_pool::{ObstacleId, ObstaclePool};
pub use obstacle_shapes::{Circle, DynamicObstacle, Rectangle};
pub use pathfinder::{NavVariant, Pathfinder};
pub use vec2::Vector;
