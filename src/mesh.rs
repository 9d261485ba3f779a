//! Mesh navigator: offset+union pipeline producing clipped sub-polygons,
//! constrained Delaunay triangulation, and an edge-adjacency visibility
//! graph.
//!
//! The offset/union step erodes the outer boundary, grows obstacles and
//! holes, and feeds every resulting edge to a `spade` CDT as a constraint.
//! The underlying "union of shrunk outer minus inflated obstacles and
//! holes" is expressed here as a sequence of `geo` `difference` calls
//! against the shrunk outer, which is equivalent for this pipeline's
//! non-self-overlapping inputs and is what `geo` actually exposes.

use std::collections::HashMap;

use geo::{BooleanOps, LineString, MultiPolygon, Polygon};
use geo_offset::Offset;
use spade::{ConstrainedDelaunayTriangulation, Point2, Triangulation};

use crate::error::{CancelToken, NavError, Result};
use crate::geometry::{
    closest_point_on_polygon_boundary, point_in_polygon, point_in_polygon_f,
    point_in_polygon_with_holes, point_in_triangle, point_on_segment_eps, segments_intersect,
    BoundingBox,
};
use crate::graph::Graph;
use crate::kdtree::KdTree;
use crate::navigator::{NavGraph, QueryOptions};
use crate::obstacle_pool::{ObstacleId, ObstaclePool};
use crate::obstacle_shapes::DynamicObstacle;
use crate::vec2::Vector;

const ARC_SEGMENTS: u32 = 8;

/// An impassable interior region baked into a [`CompositePolygon`].
#[derive(Debug, Clone)]
pub struct InnerHole {
    pub ring: Vec<Vector>,
    pub offset: f32,
}

/// Same geometry as an [`InnerHole`], plus a `viewable` flag controlling
/// whether it blocks raycast line-of-sight.
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub ring: Vec<Vector>,
    pub offset: f32,
    pub viewable: bool,
}

/// An outer ring plus its holes, obstacles, and offset distance.
#[derive(Debug, Clone)]
pub struct CompositePolygon {
    pub outer: Vec<Vector>,
    pub offset: f32,
    pub inner_holes: Vec<InnerHole>,
    pub obstacles: Vec<Obstacle>,
}

impl CompositePolygon {
    pub fn new(outer: Vec<Vector>, offset: f32) -> Self {
        Self {
            outer,
            offset,
            inner_holes: Vec::new(),
            obstacles: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
struct ClippedSubPolygon {
    outer: Vec<Vector>,
    holes: Vec<Vec<Vector>>,
}

struct RaycastIndex {
    outer: Vec<Vector>,
    outer_bbox: BoundingBox,
    blocking: Vec<(Vec<Vector>, BoundingBox)>,
}

struct DynamicAssignment {
    sub_index: usize,
    /// Already reversed (see `add_obstacles`), so it can be fed to
    /// `offset_ring` the same way `generate()` treats `composite.obstacles`.
    ring: Vec<Vector>,
    offset: f32,
}

pub struct MeshNavigator {
    composites: Vec<CompositePolygon>,
    base_clipped: Vec<ClippedSubPolygon>,
    clipped: Vec<ClippedSubPolygon>,
    triangles: Vec<[Vector; 3]>,
    graph: Graph,
    vertices: Vec<Vector>,
    kdtree: KdTree,
    raycast_index: Vec<RaycastIndex>,
    dynamic_obstacles: ObstaclePool<DynamicAssignment>,
    built: bool,
}

impl MeshNavigator {
    pub fn new(composites: Vec<CompositePolygon>) -> Self {
        Self {
            composites,
            base_clipped: Vec::new(),
            clipped: Vec::new(),
            triangles: Vec::new(),
            graph: Graph::new(),
            vertices: Vec::new(),
            kdtree: KdTree::default(),
            raycast_index: Vec::new(),
            dynamic_obstacles: ObstaclePool::new(),
            built: false,
        }
    }

    pub fn triangles(&self) -> &[[Vector; 3]] {
        &self.triangles
    }

    pub fn clipped_sub_polygon_count(&self) -> usize {
        self.clipped.len()
    }

    /// Whether `generate` has completed at least once without error.
    pub fn is_built(&self) -> bool {
        self.built
    }

    fn find_containing_triangle(&self, p: Vector) -> Option<usize> {
        self.triangles.iter().position(|&tri| point_in_triangle(p, tri))
    }

    fn closest_point_on_clipped_boundary(&self, p: Vector) -> Option<Vector> {
        let mut best: Option<(f32, Vector)> = None;
        for sub in &self.clipped {
            if let Some(q) = closest_point_on_polygon_boundary(p, &sub.outer, &sub.holes) {
                let d2 = (q - p).dot(q - p);
                if best.map(|(bd, _)| d2 < bd).unwrap_or(true) {
                    best = Some((d2, q));
                }
            }
        }
        best.map(|(_, q)| q)
    }

    /// The cheap "edge-coincidence" variant of the out-of-area visible-points
    /// proxy: binds a point to the endpoints of whichever clipped-polygon
    /// edge its closest point lies on, rather than the more accurate but
    /// costlier segment-vs-edge and segment-vs-ring variants.
    fn edge_coincidence_endpoints(&self, p: Vector) -> Vec<Vector> {
        let mut out = Vec::new();
        for sub in &self.clipped {
            for ring in std::iter::once(&sub.outer).chain(sub.holes.iter()) {
                let n = ring.len();
                for i in 0..n {
                    let a = ring[i];
                    let b = ring[(i + 1) % n];
                    if point_on_segment_eps(p, a, b) {
                        out.push(a);
                        out.push(b);
                    }
                }
            }
        }
        out
    }

    fn rebuild_clipped_and_graph(&mut self, cancel: &CancelToken) -> Result<()> {
        self.clipped.clear();
        for (sub_index, base) in self.base_clipped.iter().enumerate() {
            cancel.check()?;
            let mut region = ring_to_multipolygon(&base.outer, &base.holes);
            for (_, assignment) in self.dynamic_obstacles.list() {
                if assignment.sub_index != sub_index {
                    continue;
                }
                if let Some(inflated) = offset_ring(&assignment.ring, assignment.offset) {
                    region = region.difference(&inflated);
                }
            }
            self.clipped.extend(multipolygon_to_sub_polygons(&region));
        }

        self.triangles.clear();
        self.graph = Graph::new();
        for sub in &self.clipped {
            cancel.check()?;
            triangulate_sub_polygon(sub, &mut self.triangles)?;
        }
        for tri in &self.triangles {
            self.graph.link_both(tri[0], tri[1]);
            self.graph.link_both(tri[1], tri[2]);
            self.graph.link_both(tri[2], tri[0]);
        }
        self.vertices = self.graph.vertices().collect();
        Ok(())
    }
}

impl NavGraph for MeshNavigator {
    fn generate(&mut self, cancel: &CancelToken) -> Result<()> {
        log::info!("begin navmesh generation over {} composites", self.composites.len());
        self.built = false;

        // Accumulated locally so a mid-loop cancellation leaves
        // `self.base_clipped`/`self.raycast_index` at their pre-build (empty)
        // values instead of a partial result from the composites already
        // processed.
        let mut base_clipped = Vec::new();
        let mut raycast_index = Vec::new();

        for (index, composite) in self.composites.iter().enumerate() {
            cancel.check()?;
            if composite.outer.len() < 3 {
                return Err(NavError::BuildFailed {
                    polygon_index: index,
                    reason: "outer ring has fewer than 3 vertices".to_string(),
                });
            }

            let shrunk = offset_ring(&composite.outer, -composite.offset).ok_or_else(|| {
                NavError::BuildFailed {
                    polygon_index: index,
                    reason: "outer offset produced an empty region".to_string(),
                }
            })?;

            let mut region = shrunk;
            for obstacle in &composite.obstacles {
                let reversed: Vec<Vector> = obstacle.ring.iter().rev().copied().collect();
                if let Some(inflated) = offset_ring(&reversed, obstacle.offset) {
                    region = region.difference(&inflated);
                }
            }
            for hole in &composite.inner_holes {
                if let Some(inflated) = offset_ring(&hole.ring, hole.offset) {
                    region = region.difference(&inflated);
                }
            }

            base_clipped.extend(multipolygon_to_sub_polygons(&region));

            let outer_bbox = BoundingBox::of_ring(&composite.outer).ok_or_else(|| {
                NavError::BuildFailed {
                    polygon_index: index,
                    reason: "degenerate outer ring".to_string(),
                }
            })?;
            let blocking = composite
                .obstacles
                .iter()
                .filter(|o| !o.viewable)
                .filter_map(|o| BoundingBox::of_ring(&o.ring).map(|bbox| (o.ring.clone(), bbox)))
                .collect();
            raycast_index.push(RaycastIndex {
                outer: composite.outer.clone(),
                outer_bbox,
                blocking,
            });
        }

        self.base_clipped = base_clipped;
        self.raycast_index = raycast_index;

        if let Err(e) = self.rebuild_clipped_and_graph(cancel) {
            self.base_clipped.clear();
            self.raycast_index.clear();
            self.clipped.clear();
            self.triangles.clear();
            self.graph = Graph::new();
            self.vertices.clear();
            return Err(e);
        }
        self.kdtree = KdTree::build(&self.vertices);
        self.built = true;
        log::info!(
            "navmesh generation done: {} triangles, {} graph vertices",
            self.triangles.len(),
            self.graph.len()
        );
        Ok(())
    }

    fn visibility_graph(&self) -> &Graph {
        &self.graph
    }

    fn aggregation_graph(&self, start: Vector, dest: Vector, _opts: &QueryOptions) -> Graph {
        // Fast path: a single clipped sub-polygon containing both endpoints
        // with a clear line of sight between them collapses the whole query
        // to a two-node graph.
        for sub in &self.clipped {
            let start_in = point_in_polygon_with_holes(start, &sub.outer, &sub.holes);
            let dest_in = point_in_polygon_with_holes(dest, &sub.outer, &sub.holes);
            if start_in && dest_in && !ring_crosses(start, dest, &sub.outer)
                && !sub.holes.iter().any(|h| ring_crosses(start, dest, h))
            {
                let mut graph = Graph::new();
                graph.link_both(start, dest);
                return graph;
            }
        }

        let mut graph = self.graph.clone();
        let mut start_bound = false;
        let mut dest_bound = false;

        for &tri in &self.triangles {
            if point_in_triangle(start, tri) {
                graph.link_both(start, tri[0]);
                graph.link_both(start, tri[1]);
                graph.link_both(start, tri[2]);
                start_bound = true;
            }
            if point_in_triangle(dest, tri) {
                graph.link_both(dest, tri[0]);
                graph.link_both(dest, tri[1]);
                graph.link_both(dest, tri[2]);
                dest_bound = true;
            }
        }

        if !start_bound {
            if let Some(boundary_point) = self.closest_point_on_clipped_boundary(start) {
                graph.link_both(start, boundary_point);
                for endpoint in self.edge_coincidence_endpoints(boundary_point) {
                    graph.link_both(boundary_point, endpoint);
                }
            }
        }
        if !dest_bound {
            if let Some(boundary_point) = self.closest_point_on_clipped_boundary(dest) {
                graph.link_both(dest, boundary_point);
                for endpoint in self.edge_coincidence_endpoints(boundary_point) {
                    graph.link_both(boundary_point, endpoint);
                }
            }
        }

        graph
    }

    fn contains_point(&self, p: Vector) -> bool {
        self.composites.iter().any(|composite| {
            let mut holes: Vec<Vec<Vector>> =
                composite.inner_holes.iter().map(|h| h.ring.clone()).collect();
            holes.extend(composite.obstacles.iter().map(|o| o.ring.clone()));
            point_in_polygon_with_holes(p, &composite.outer, &holes)
        })
    }

    fn cost(&self, a: Vector, b: Vector) -> f32 {
        crate::astar::euclidean_cost(a, b)
    }

    fn closest_point(&self, p: Vector) -> Option<Vector> {
        self.kdtree.nearest(p)
    }

    fn is_raycast_hit(&self, a: Vector, b: Vector) -> Option<bool> {
        let segment_bbox = BoundingBox {
            min: Vector::new(a.x.min(b.x), a.y.min(b.y)),
            max: Vector::new(a.x.max(b.x), a.y.max(b.y)),
        };
        for index in &self.raycast_index {
            if index.outer_bbox.could_contain(&segment_bbox, 1e-6)
                || crate::geometry::line_intersects_aabb(a, b, index.outer_bbox)
            {
                if ring_crosses(a, b, &index.outer) {
                    return Some(true);
                }
            }
            for (ring, bbox) in &index.blocking {
                if crate::geometry::line_intersects_aabb(a, b, *bbox) && ring_crosses(a, b, ring) {
                    return Some(true);
                }
            }
        }
        Some(false)
    }

    fn add_obstacles(&mut self, obstacles: &[Box<dyn DynamicObstacle>]) -> Vec<ObstacleId> {
        let mut ids = Vec::new();
        for obstacle in obstacles {
            // Reversed the same way `generate()` reverses `composite.obstacles`
            // before inflating: the ring is wound CCW as a footprint, but
            // `offset_ring` needs it flipped to grow outward into a hole cut
            // out of `region` rather than shrink toward the obstacle's center.
            let reversed: Vec<Vector> = obstacle.polygon().into_iter().rev().collect();
            let sub_index = self.base_clipped.iter().position(|sub| {
                reversed.iter()
                    .any(|&v| point_in_polygon_with_holes(v, &sub.outer, &sub.holes))
            });
            if let Some(sub_index) = sub_index {
                ids.push(self.dynamic_obstacles.insert(DynamicAssignment {
                    sub_index,
                    ring: reversed,
                    offset: obstacle.offset(),
                }));
            } else {
                log::warn!("dynamic obstacle touches no clipped sub-polygon, dropped");
            }
        }
        if !ids.is_empty() {
            if let Err(e) = self.rebuild_clipped_and_graph(&CancelToken::new()) {
                log::error!("rebuild after add_obstacles failed: {e}");
            }
        }
        ids
    }

    fn remove_obstacles(&mut self, ids: &[ObstacleId]) {
        let mut removed_any = false;
        for &id in ids {
            if self.dynamic_obstacles.remove(id).is_some() {
                removed_any = true;
            }
        }
        if removed_any {
            if let Err(e) = self.rebuild_clipped_and_graph(&CancelToken::new()) {
                log::error!("rebuild after remove_obstacles failed: {e}");
            }
        }
    }
}

fn ring_crosses(a: Vector, b: Vector, ring: &[Vector]) -> bool {
    let n = ring.len();
    if n < 2 {
        return false;
    }
    (0..n).any(|i| segments_intersect(a, b, ring[i], ring[(i + 1) % n]))
}

fn ring_to_linestring(ring: &[Vector]) -> LineString<f64> {
    LineString::from(ring.iter().map(|v| (v.x as f64, v.y as f64)).collect::<Vec<_>>())
}

fn linestring_to_ring(ls: &LineString<f64>) -> Vec<Vector> {
    let mut pts: Vec<Vector> = ls.coords().map(|c| Vector::new(c.x as f32, c.y as f32)).collect();
    if pts.len() > 1 && pts.first() == pts.last() {
        pts.pop();
    }
    pts
}

fn offset_ring(ring: &[Vector], delta: f32) -> Option<MultiPolygon<f64>> {
    if ring.len() < 3 {
        return None;
    }
    let poly = Polygon::new(ring_to_linestring(ring), vec![]);
    poly.offset_with_arc_segments(delta as f64, ARC_SEGMENTS).ok()
}

fn ring_to_multipolygon(outer: &[Vector], holes: &[Vec<Vector>]) -> MultiPolygon<f64> {
    let interiors = holes.iter().map(|h| ring_to_linestring(h)).collect();
    MultiPolygon::new(vec![Polygon::new(ring_to_linestring(outer), interiors)])
}

fn multipolygon_to_sub_polygons(mp: &MultiPolygon<f64>) -> Vec<ClippedSubPolygon> {
    mp.0.iter()
        .map(|poly| ClippedSubPolygon {
            outer: linestring_to_ring(poly.exterior()),
            holes: poly.interiors().iter().map(linestring_to_ring).collect(),
        })
        .filter(|sub| sub.outer.len() >= 3)
        .collect()
}

fn triangulate_sub_polygon(sub: &ClippedSubPolygon, out: &mut Vec<[Vector; 3]>) -> Result<()> {
    let mut cdt = ConstrainedDelaunayTriangulation::<Point2<f32>>::new();
    add_constraint_ring(&mut cdt, &sub.outer)?;
    for hole in &sub.holes {
        add_constraint_ring(&mut cdt, hole)?;
    }

    for face in cdt.inner_faces() {
        let center = face.center();
        let centroid = Vector::new(center.x, center.y);
        if sub.holes.iter().any(|h| point_in_polygon(centroid, h)) {
            continue;
        }
        if !point_in_polygon(centroid, &sub.outer) {
            continue;
        }
        let mut verts = face.vertices().map(|v| {
            let p = v.position();
            Vector::new(p.x, p.y)
        });
        out.push([
            verts.next().unwrap(),
            verts.next().unwrap(),
            verts.next().unwrap(),
        ]);
    }
    Ok(())
}

fn add_constraint_ring(
    cdt: &mut ConstrainedDelaunayTriangulation<Point2<f32>>,
    ring: &[Vector],
) -> Result<()> {
    let n = ring.len();
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        if a == b {
            continue;
        }
        cdt.add_constraint_edge(Point2::new(a.x, a.y), Point2::new(b.x, b.y))
            .map_err(|e| NavError::BuildFailed {
                polygon_index: 0,
                reason: format!("degenerate constraint edge: {e:?}"),
            })?;
    }
    Ok(())
}
