//! Expedition core - turn-based evaluation engine for explorer raids.
//!
//! An explorer raid repeatedly proposes actions against a partially
//! observable island map, spending a shared action-point budget, until it
//! voluntarily withdraws, runs out of points, or takes an invalid decision.
//! This crate provides the decision codec, the resource ledger, the
//! visibility tracker, the per-call timeout guard, the turn engine, and the
//! append-only event log. Map generation and rendering are external; the
//! engine consumes a fully formed [`world::TerrainModel`] and hands the final
//! [`engine::RunReport`] to exporters.

#![forbid(unsafe_code)]

pub mod config;
pub mod engine;
pub mod events;
pub mod explorer;
pub mod export;
pub mod protocol;
pub mod world;

pub use config::RunConfig;
pub use engine::{FailureCause, InvalidReason, RunOutcome, RunReport, TurnEngine};
pub use events::{EventLog, ExplorationEvent, Validity};
pub use explorer::Explorer;
pub use protocol::{Decision, Heading, ResourceKind};
pub use world::{Coord, CostPolicy, GridIsland, TerrainModel, UniformCostPolicy};
