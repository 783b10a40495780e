//! Turn engine - drives the initialize → decide → apply → acknowledge loop.
//!
//! The engine is single-threaded and strictly sequential: turns never
//! overlap and no two explorer calls are ever in flight at once, which makes
//! a run fully replayable from its seed, configuration, and agent. The only
//! concurrency lives inside [`guard::TimeoutGuard`]. Ledger, tracker, and
//! log are owned here and mutate only between turns on this thread.

pub mod guard;
pub mod ledger;
pub mod visibility;

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};

use crate::config::RunConfig;
use crate::events::{EventLog, ExplorationEvent, Validity};
use crate::explorer::Explorer;
use crate::protocol::{self, Decision, Heading, ResourceKind};
use crate::world::{Coord, CostPolicy, TerrainModel};

use guard::{AgentCall, CallReply, GuardError, TimeoutGuard};
use ledger::{Receipt, Rejection, ResourceLedger};
use visibility::{VisibilitySnapshot, VisibilityTracker};

/// Why a decision was invalid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidReason {
    MalformedDecision(String),
    UnknownResource(ResourceKind),
    ContractUnmet,
}

/// Why the agent itself failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCause {
    Timeout { call: String, deadline_ms: u64 },
    Raised { call: String, cause: String },
}

impl From<GuardError> for FailureCause {
    fn from(error: GuardError) -> Self {
        match error {
            GuardError::Timeout { call, deadline_ms } => Self::Timeout {
                call: call.to_string(),
                deadline_ms,
            },
            GuardError::Raised { call, cause } => Self::Raised {
                call: call.to_string(),
                cause,
            },
        }
    }
}

/// The single terminal verdict of a run. Produced exactly once.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", content = "details", rename_all = "snake_case")]
pub enum RunOutcome {
    Success {
        remaining_budget: u64,
        collected: BTreeMap<ResourceKind, u64>,
        report: Option<String>,
    },
    BudgetExhausted,
    InvalidDecision(InvalidReason),
    AgentFailure(FailureCause),
}

/// Everything a run leaves behind for exporters and scoring.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub name: String,
    pub outcome: RunOutcome,
    pub events: EventLog,
    pub visibility: VisibilitySnapshot,
    pub collected: BTreeMap<ResourceKind, u64>,
    pub remaining_budget: u64,
}

impl RunReport {
    /// True only for a voluntary stop with the contract satisfied.
    pub fn is_ok(&self) -> bool {
        matches!(self.outcome, RunOutcome::Success { .. })
    }
}

/// The turn-based decision/execution loop.
pub struct TurnEngine<'a> {
    world: &'a dyn TerrainModel,
    policy: &'a dyn CostPolicy,
    config: &'a RunConfig,
}

impl<'a> TurnEngine<'a> {
    pub fn new(
        world: &'a dyn TerrainModel,
        policy: &'a dyn CostPolicy,
        config: &'a RunConfig,
    ) -> Self {
        Self {
            world,
            policy,
            config,
        }
    }

    /// Run one expedition to termination.
    ///
    /// Every agent-attributable error resolves to a [`RunOutcome`]; only
    /// infrastructure faults (invalid configuration, worker spawn failure)
    /// surface as `Err`.
    pub fn run(&self, explorer: Box<dyn Explorer + Send>) -> Result<RunReport> {
        self.config.validate().context("invalid run configuration")?;

        let contract = self.config.contract_kinds()?;
        let mut ledger = ResourceLedger::new(self.config.budget, self.config.crew, contract);
        let mut tracker = VisibilityTracker::new();
        let mut log = EventLog::new();
        let mut position = Coord::new(self.config.start.x, self.config.start.y);
        let mut heading = self.config.heading()?;
        tracker.mark_visited(position);

        let guard = TimeoutGuard::spawn(explorer, Duration::from_millis(self.config.timeout_ms))
            .context("failed to spawn explorer worker")?;

        tracing::info!(
            name = %self.config.name,
            seed = self.config.seed,
            budget = self.config.budget,
            crew = self.config.crew,
            "expedition started"
        );

        let context = protocol::initial_context(
            position.x,
            position.y,
            heading,
            ledger.budget(),
            ledger.crew(),
            ledger.contract(),
        );
        if let Err(error) = guard.call(AgentCall::Initialize(context)) {
            return Ok(self.finish(RunOutcome::AgentFailure(error.into()), ledger, tracker, log));
        }

        let mut turn: u32 = 0;
        let outcome = loop {
            let raw = match guard.call(AgentCall::TakeDecision) {
                Ok(CallReply::Decision(text)) => text,
                Ok(_) => {
                    break RunOutcome::AgentFailure(FailureCause::Raised {
                        call: "takeDecision".to_string(),
                        cause: "mismatched worker reply".to_string(),
                    })
                }
                Err(error) => break RunOutcome::AgentFailure(error.into()),
            };
            turn += 1;

            let decision = match protocol::decode(&raw) {
                Ok(decision) => decision,
                Err(error) => {
                    let reason = error.to_string();
                    log.append(event(
                        turn,
                        raw.trim().to_string(),
                        Validity::Rejected(reason.clone()),
                        json!({}),
                        ledger.budget(),
                    ));
                    break RunOutcome::InvalidDecision(InvalidReason::MalformedDecision(reason));
                }
            };
            let action = protocol::encode(&decision);

            if decision == Decision::Stop {
                if ledger.contract_satisfied() {
                    log.append(event(
                        turn,
                        action,
                        Validity::Accepted,
                        json!({ "contract": "satisfied" }),
                        ledger.budget(),
                    ));
                    // A failed debriefing does not demote a successful run.
                    let report = match guard.call(AgentCall::DeliverFinalReport) {
                        Ok(CallReply::Report(report)) => report,
                        _ => None,
                    };
                    break RunOutcome::Success {
                        remaining_budget: ledger.budget(),
                        collected: ledger.collected().clone(),
                        report,
                    };
                }
                log.append(event(
                    turn,
                    action,
                    Validity::Rejected("contract unmet".to_string()),
                    json!({}),
                    ledger.budget(),
                ));
                break RunOutcome::InvalidDecision(InvalidReason::ContractUnmet);
            }

            let receipt = match ledger.try_apply(&decision, self.policy, self.world, position) {
                Ok(receipt) => receipt,
                Err(rejection) => {
                    log.append(event(
                        turn,
                        action,
                        Validity::Rejected(rejection.to_string()),
                        json!({}),
                        ledger.budget(),
                    ));
                    break match rejection {
                        Rejection::InsufficientBudget { .. } => RunOutcome::BudgetExhausted,
                        Rejection::UnknownResource(kind) => {
                            RunOutcome::InvalidDecision(InvalidReason::UnknownResource(kind))
                        }
                    };
                }
            };

            let extras = self.apply_effects(
                &decision,
                &receipt,
                &ledger,
                &mut position,
                &mut heading,
                &mut tracker,
            );
            log.append(event(
                turn,
                action,
                Validity::Accepted,
                effect_with_cost(receipt.cost, &extras),
                ledger.budget(),
            ));

            tracing::debug!(
                turn,
                action = decision.name(),
                cost = receipt.cost,
                budget = ledger.budget(),
                "turn applied"
            );

            let results = protocol::turn_results(receipt.cost, ledger.budget(), &extras);
            if let Err(error) = guard.call(AgentCall::AcknowledgeResults(results)) {
                break RunOutcome::AgentFailure(error.into());
            }
        };

        tracing::info!(turns = log.len(), "expedition terminated");
        Ok(self.finish(outcome, ledger, tracker, log))
    }

    /// Mutate position/heading/visibility for an accepted action and return
    /// its effect summary.
    fn apply_effects(
        &self,
        decision: &Decision,
        receipt: &Receipt,
        ledger: &ResourceLedger,
        position: &mut Coord,
        heading: &mut Heading,
        tracker: &mut VisibilityTracker,
    ) -> Value {
        match decision {
            Decision::Move { direction } => {
                *heading = *direction;
                let (dx, dy) = direction.offset();
                let target = position.offset(dx, dy);
                if self.world.contains(target) {
                    *position = target;
                    tracker.mark_visited(target);
                    json!({ "position": target, "heading": direction.name() })
                } else {
                    json!({
                        "position": *position,
                        "heading": direction.name(),
                        "blocked": true,
                    })
                }
            }
            Decision::Scout { direction } => {
                let (dx, dy) = direction.offset();
                let mut tiles = Vec::new();
                let mut landmarks = Vec::new();
                for step in 1..=self.policy.scout_range() {
                    let tile = position.offset(dx * step, dy * step);
                    if !self.world.contains(tile) {
                        break;
                    }
                    tracker.mark_scanned(tile);
                    let mut entry = json!({ "x": tile.x, "y": tile.y });
                    if let Some(kind) = self.world.resource_at(tile) {
                        entry["resource"] = Value::from(kind.as_str());
                    }
                    if let Some(name) = self.world.landmark_at(tile) {
                        landmarks.push(name.to_string());
                    }
                    tiles.push(entry);
                }
                json!({
                    "direction": direction.name(),
                    "tiles": tiles,
                    "landmarks": landmarks,
                })
            }
            Decision::Explore => {
                let resources: Vec<&str> = self
                    .world
                    .resource_at(*position)
                    .map(|kind| vec![kind.as_str()])
                    .unwrap_or_default();
                json!({
                    "resources": resources,
                    "landmark": self.world.landmark_at(*position),
                })
            }
            Decision::Collect { resource } => {
                let amount = receipt
                    .gathered
                    .as_ref()
                    .map(|(_, amount)| *amount)
                    .unwrap_or(0);
                json!({
                    "resource": resource.as_str(),
                    "amount": amount,
                    "total": ledger.collected_amount(resource),
                })
            }
            // Stop never reaches the ledger.
            Decision::Stop => json!({}),
        }
    }

    fn finish(
        &self,
        outcome: RunOutcome,
        ledger: ResourceLedger,
        tracker: VisibilityTracker,
        log: EventLog,
    ) -> RunReport {
        RunReport {
            name: self.config.name.clone(),
            outcome,
            events: log,
            visibility: tracker.snapshot(),
            collected: ledger.collected().clone(),
            remaining_budget: ledger.budget(),
        }
    }
}

fn event(
    turn: u32,
    action: String,
    validity: Validity,
    effect: Value,
    budget_after: u64,
) -> ExplorationEvent {
    ExplorationEvent {
        turn,
        timestamp: Utc::now(),
        action,
        validity,
        effect,
        budget_after,
    }
}

fn effect_with_cost(cost: u64, extras: &Value) -> Value {
    let mut effect = json!({ "cost": cost });
    if let (Some(target), Some(source)) = (effect.as_object_mut(), extras.as_object()) {
        for (key, value) in source {
            target.insert(key.clone(), value.clone());
        }
    }
    effect
}
