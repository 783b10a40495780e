//! Resource ledger - budget, crew, contract, and collected totals.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::protocol::{Decision, ResourceKind};
use crate::world::{Coord, CostPolicy, TerrainModel};

/// Why the ledger refused an action. Each rejection maps to exactly one
/// terminal outcome in the turn engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("action costs {cost} with only {remaining} action points remaining")]
    InsufficientBudget { cost: u64, remaining: u64 },

    #[error("unknown resource {0}")]
    UnknownResource(ResourceKind),
}

/// What an accepted action cost and gathered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub cost: u64,
    /// `Some((kind, amount))` for collect actions; the amount is zero on a
    /// tile that lacks the deposit.
    pub gathered: Option<(ResourceKind, u64)>,
}

/// Tracks the remaining budget and collected resources against a contract.
///
/// Crew and contract are fixed at construction. The budget never goes
/// negative and the collected totals never decrease: all pricing happens
/// before any mutation, so a rejected action leaves no trace.
#[derive(Debug, Clone)]
pub struct ResourceLedger {
    budget: u64,
    crew: u32,
    contract: BTreeMap<ResourceKind, u64>,
    collected: BTreeMap<ResourceKind, u64>,
}

impl ResourceLedger {
    pub fn new(budget: u64, crew: u32, contract: BTreeMap<ResourceKind, u64>) -> Self {
        Self {
            budget,
            crew,
            contract,
            collected: BTreeMap::new(),
        }
    }

    pub fn budget(&self) -> u64 {
        self.budget
    }

    pub fn crew(&self) -> u32 {
        self.crew
    }

    pub fn contract(&self) -> &BTreeMap<ResourceKind, u64> {
        &self.contract
    }

    pub fn collected(&self) -> &BTreeMap<ResourceKind, u64> {
        &self.collected
    }

    pub fn collected_amount(&self, kind: &ResourceKind) -> u64 {
        self.collected.get(kind).copied().unwrap_or(0)
    }

    /// Price and apply a non-stop action.
    ///
    /// Rejects collects on kinds absent from both the world vocabulary and
    /// the contract, and any action whose cost exceeds the remaining budget.
    /// On acceptance, debits the budget and credits the gathered amount
    /// atomically with respect to the calling turn.
    pub fn try_apply(
        &mut self,
        decision: &Decision,
        policy: &dyn CostPolicy,
        world: &dyn TerrainModel,
        at: Coord,
    ) -> Result<Receipt, Rejection> {
        if let Decision::Collect { resource } = decision {
            if !world.knows_resource(resource) && !self.contract.contains_key(resource) {
                return Err(Rejection::UnknownResource(resource.clone()));
            }
        }

        let cost = policy.cost(decision, self.crew);
        if cost > self.budget {
            return Err(Rejection::InsufficientBudget {
                cost,
                remaining: self.budget,
            });
        }

        let gathered = match decision {
            Decision::Collect { resource } => {
                let amount = if world.resource_at(at) == Some(resource) {
                    policy.collect_yield(self.crew)
                } else {
                    0
                };
                Some((resource.clone(), amount))
            }
            _ => None,
        };

        self.budget -= cost;
        if let Some((kind, amount)) = &gathered {
            if *amount > 0 {
                *self.collected.entry(kind.clone()).or_insert(0) += amount;
            }
        }

        Ok(Receipt { cost, gathered })
    }

    /// True iff every contract entry is met by the collected totals.
    pub fn contract_satisfied(&self) -> bool {
        self.contract
            .iter()
            .all(|(kind, required)| self.collected_amount(kind) >= *required)
    }
}
