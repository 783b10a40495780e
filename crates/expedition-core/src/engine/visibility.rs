//! Visibility tracker - which tiles the raid occupied or observed.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::world::Coord;

/// Monotonically growing visited/scanned coordinate sets.
///
/// Visited tiles were physically occupied; scanned tiles were observed from
/// a distance. Ordered sets keep exports deterministic.
#[derive(Debug, Default, Clone)]
pub struct VisibilityTracker {
    visited: BTreeSet<Coord>,
    scanned: BTreeSet<Coord>,
}

/// Read-only view taken after the run terminates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilitySnapshot {
    pub visited: Vec<Coord>,
    pub scanned: Vec<Coord>,
}

impl VisibilityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_visited(&mut self, at: Coord) {
        self.visited.insert(at);
    }

    pub fn mark_scanned(&mut self, at: Coord) {
        self.scanned.insert(at);
    }

    pub fn visited(&self) -> &BTreeSet<Coord> {
        &self.visited
    }

    pub fn scanned(&self) -> &BTreeSet<Coord> {
        &self.scanned
    }

    pub fn snapshot(&self) -> VisibilitySnapshot {
        VisibilitySnapshot {
            visited: self.visited.iter().copied().collect(),
            scanned: self.scanned.iter().copied().collect(),
        }
    }
}
