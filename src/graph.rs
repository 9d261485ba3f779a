//! Graph: adjacency mapping keyed on [`Vector`] (bitwise equality).
//!
//! Edges are added symmetrically by [`Graph::link_both`]. Duplicate
//! neighbors are permitted by the builder but undesirable; consumers must
//! tolerate them. Cloning is deep enough that mutating a clone never touches
//! the original, because `Vec<Vector>` neighbor lists clone by value.

use std::collections::HashMap;

use crate::vec2::Vector;

#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Graph {
    adjacency: HashMap<Vector, Vec<Vector>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    pub fn contains(&self, v: Vector) -> bool {
        self.adjacency.contains_key(&v)
    }

    pub fn vertices(&self) -> impl Iterator<Item = Vector> + '_ {
        self.adjacency.keys().copied()
    }

    pub fn neighbors(&self, v: Vector) -> &[Vector] {
        self.adjacency.get(&v).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Ensure `v` has an (possibly empty) entry, without linking it to
    /// anything. Used to seed isolated start/dest nodes before aggregation.
    pub fn ensure_vertex(&mut self, v: Vector) {
        self.adjacency.entry(v).or_default();
    }

    /// Add `b` to `a`'s neighbor list and `a` to `b`'s, in both directions.
    pub fn link_both(&mut self, a: Vector, b: Vector) {
        self.adjacency.entry(a).or_default().push(b);
        self.adjacency.entry(b).or_default().push(a);
    }

    /// Remove a single directed edge `a -> b`. No-op if absent.
    pub fn unlink_directed(&mut self, a: Vector, b: Vector) {
        if let Some(neighbors) = self.adjacency.get_mut(&a) {
            neighbors.retain(|&n| n != b);
        }
    }

    /// Remove both directions of the edge between `a` and `b`.
    pub fn unlink_both(&mut self, a: Vector, b: Vector) {
        self.unlink_directed(a, b);
        self.unlink_directed(b, a);
    }

    /// Remove `v` entirely: its own entry and every reference to it from
    /// other vertices' neighbor lists.
    pub fn remove_vertex(&mut self, v: Vector) {
        self.adjacency.remove(&v);
        for neighbors in self.adjacency.values_mut() {
            neighbors.retain(|&n| n != v);
        }
    }

    /// Remove exact duplicate neighbor entries. Optional: callers may invoke
    /// it after a bulk rebuild to bound memory without changing A* results.
    pub fn dedup_neighbors(&mut self) {
        for neighbors in self.adjacency.values_mut() {
            neighbors.sort_by(|a, b| {
                (a.x.to_bits(), a.y.to_bits()).cmp(&(b.x.to_bits(), b.y.to_bits()))
            });
            neighbors.dedup();
        }
    }
}
