//! World model - the static terrain an expedition explores.
//!
//! The engine treats the world as a read-only collaborator supplied fully
//! formed at run start. [`GridIsland`] is the in-memory implementation used
//! by the CLI and the tests; richer map formats live outside this crate and
//! only need to implement [`TerrainModel`].

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::protocol::{Decision, ResourceKind};

/// A map coordinate. `x` grows eastward, `y` grows southward.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Static tile queries the engine needs to validate and apply actions.
pub trait TerrainModel {
    /// Whether the coordinate lies on the map.
    fn contains(&self, at: Coord) -> bool;

    /// The resource deposit on a tile, if any.
    fn resource_at(&self, at: Coord) -> Option<&ResourceKind>;

    /// Whether the resource kind exists anywhere in this world's vocabulary.
    fn knows_resource(&self, kind: &ResourceKind) -> bool;

    /// The named landmark on a tile, if any.
    fn landmark_at(&self, at: Coord) -> Option<&str>;
}

/// Action pricing, supplied alongside the world.
///
/// Cost formulas are policy, not ledger logic: the ledger only enforces that
/// the budget never goes negative.
pub trait CostPolicy {
    /// Action-point cost of a decision for a crew of the given size.
    fn cost(&self, decision: &Decision, crew: u32) -> u64;

    /// Units gathered by one accepted collect on a tile that has the
    /// resource.
    fn collect_yield(&self, crew: u32) -> u64;

    /// How many tiles ahead a scout observes.
    fn scout_range(&self) -> i32 {
        3
    }
}

/// Default crew-weighted pricing.
///
/// Larger crews move and collect at a higher cost per action but gather
/// proportionally more per collect.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformCostPolicy;

impl CostPolicy for UniformCostPolicy {
    fn cost(&self, decision: &Decision, crew: u32) -> u64 {
        let crew = u64::from(crew);
        match decision {
            Decision::Move { .. } => 1 + crew / 10,
            Decision::Scout { .. } => 1,
            Decision::Explore => 2,
            Decision::Collect { .. } => 2 + crew / 10,
            Decision::Stop => 0,
        }
    }

    fn collect_yield(&self, crew: u32) -> u64 {
        u64::from(crew)
    }
}

/// A rectangular in-memory island: explicit deposits plus seed-placed
/// landmarks.
#[derive(Debug, Clone)]
pub struct GridIsland {
    width: i32,
    height: i32,
    deposits: BTreeMap<Coord, ResourceKind>,
    landmarks: BTreeMap<Coord, String>,
    vocabulary: BTreeSet<ResourceKind>,
}

impl GridIsland {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            deposits: BTreeMap::new(),
            landmarks: BTreeMap::new(),
            vocabulary: BTreeSet::new(),
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Place a resource deposit. Coordinates outside the map are ignored.
    pub fn add_deposit(&mut self, at: Coord, kind: ResourceKind) {
        if self.contains(at) {
            self.vocabulary.insert(kind.clone());
            self.deposits.insert(at, kind);
        }
    }

    /// Scatter `count` named landmarks over the map, deterministically from
    /// the run seed.
    pub fn scatter_landmarks(&mut self, seed: u64, count: usize) {
        let tiles = (self.width as u64) * (self.height as u64);
        for index in 0..count as u64 {
            let cell = mix(seed ^ mix(index.wrapping_add(1))) % tiles;
            let at = Coord::new((cell % self.width as u64) as i32, (cell / self.width as u64) as i32);
            self.landmarks
                .entry(at)
                .or_insert_with(|| format!("landmark-{index}"));
        }
    }

    pub fn landmarks(&self) -> impl Iterator<Item = (Coord, &str)> {
        self.landmarks.iter().map(|(at, name)| (*at, name.as_str()))
    }
}

impl TerrainModel for GridIsland {
    fn contains(&self, at: Coord) -> bool {
        at.x >= 0 && at.y >= 0 && at.x < self.width && at.y < self.height
    }

    fn resource_at(&self, at: Coord) -> Option<&ResourceKind> {
        self.deposits.get(&at)
    }

    fn knows_resource(&self, kind: &ResourceKind) -> bool {
        self.vocabulary.contains(kind)
    }

    fn landmark_at(&self, at: Coord) -> Option<&str> {
        self.landmarks.get(&at).map(String::as_str)
    }
}

/// SplitMix64-style finalizer used to derive landmark positions from the
/// run seed. Deterministic and stateless; not cryptographic.
fn mix(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D049BB133111EB);
    x ^ (x >> 31)
}
