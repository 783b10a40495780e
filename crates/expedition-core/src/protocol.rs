//! Decision codec - the textual action protocol between engine and explorer.
//!
//! Decoding turns the raw text returned by `take_decision` into a
//! [`Decision`]; encoding builds the payloads the engine sends back
//! (initial context, per-turn results) and the canonical action text stored
//! in the event log. Pure transformations, no side effects.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

/// Compass heading, wire form `"NORTH"` / `"EAST"` / `"SOUTH"` / `"WEST"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Heading {
    North,
    East,
    South,
    West,
}

impl Heading {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_uppercase().as_str() {
            "NORTH" => Some(Self::North),
            "EAST" => Some(Self::East),
            "SOUTH" => Some(Self::South),
            "WEST" => Some(Self::West),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::North => "NORTH",
            Self::East => "EAST",
            Self::South => "SOUTH",
            Self::West => "WEST",
        }
    }

    /// Unit offset on the grid. North decreases `y`, east increases `x`.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A resource identifier: uppercase ASCII letters and underscores.
///
/// Only the lexical shape is validated here. Whether the kind actually
/// exists is the ledger's call, made against the world vocabulary and the
/// contract, so a well-formed but unknown kind decodes fine and is rejected
/// later as `UnknownResource`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceKind(String);

impl ResourceKind {
    pub fn parse(name: &str) -> Result<Self, DecisionError> {
        let upper = name.trim().to_uppercase();
        let well_formed =
            !upper.is_empty() && upper.chars().all(|c| c.is_ascii_uppercase() || c == '_');
        if well_formed {
            Ok(Self(upper))
        } else {
            Err(DecisionError::BadResourceName(name.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A decoded explorer decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Move { direction: Heading },
    Scout { direction: Heading },
    Explore,
    Collect { resource: ResourceKind },
    Stop,
}

impl Decision {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Move { .. } => "move",
            Self::Scout { .. } => "scout",
            Self::Explore => "explore",
            Self::Collect { .. } => "collect",
            Self::Stop => "stop",
        }
    }
}

/// Why a raw decision could not be decoded.
#[derive(Debug, Error)]
pub enum DecisionError {
    #[error("decision is not a JSON object: {0}")]
    NotAnObject(String),

    #[error("decision has no \"action\" string field")]
    MissingAction,

    #[error("unknown action {0:?}")]
    UnknownAction(String),

    #[error("action {action:?} requires parameter {parameter:?}")]
    MissingParameter {
        action: &'static str,
        parameter: &'static str,
    },

    #[error("unknown direction {0:?}")]
    UnknownDirection(String),

    #[error("resource name {0:?} is not a valid identifier")]
    BadResourceName(String),
}

/// Decode the raw text of a decision into a [`Decision`].
pub fn decode(text: &str) -> Result<Decision, DecisionError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| DecisionError::NotAnObject(e.to_string()))?;
    let object = value
        .as_object()
        .ok_or_else(|| DecisionError::NotAnObject("top level is not an object".to_string()))?;

    let action = object
        .get("action")
        .and_then(Value::as_str)
        .ok_or(DecisionError::MissingAction)?;

    match action.to_lowercase().as_str() {
        "move" => Ok(Decision::Move {
            direction: direction_parameter(&value, "move")?,
        }),
        "scout" => Ok(Decision::Scout {
            direction: direction_parameter(&value, "scout")?,
        }),
        "explore" => Ok(Decision::Explore),
        "collect" => {
            let raw = string_parameter(&value, "collect", "resource")?;
            Ok(Decision::Collect {
                resource: ResourceKind::parse(&raw)?,
            })
        }
        "stop" => Ok(Decision::Stop),
        other => Err(DecisionError::UnknownAction(other.to_string())),
    }
}

/// Canonical textual form of a decision, as stored in the event log.
pub fn encode(decision: &Decision) -> String {
    let value = match decision {
        Decision::Move { direction } => json!({
            "action": "move",
            "parameters": { "direction": direction.name() },
        }),
        Decision::Scout { direction } => json!({
            "action": "scout",
            "parameters": { "direction": direction.name() },
        }),
        Decision::Explore => json!({ "action": "explore" }),
        Decision::Collect { resource } => json!({
            "action": "collect",
            "parameters": { "resource": resource.as_str() },
        }),
        Decision::Stop => json!({ "action": "stop" }),
    };
    value.to_string()
}

/// The context payload handed to `initialize`.
pub fn initial_context(
    x: i32,
    y: i32,
    heading: Heading,
    budget: u64,
    crew: u32,
    contract: &BTreeMap<ResourceKind, u64>,
) -> String {
    let entries: Vec<Value> = contract
        .iter()
        .map(|(kind, amount)| json!({ "resource": kind.as_str(), "amount": amount }))
        .collect();
    json!({
        "position": { "x": x, "y": y },
        "heading": heading.name(),
        "budget": budget,
        "crew": crew,
        "contract": entries,
    })
    .to_string()
}

/// The results payload handed to `acknowledge_results` after an accepted
/// action.
pub fn turn_results(cost: u64, budget: u64, extras: &Value) -> String {
    json!({
        "status": "ok",
        "cost": cost,
        "budget": budget,
        "extras": extras,
    })
    .to_string()
}

fn parameters(value: &Value) -> Option<&Value> {
    value.get("parameters")
}

fn string_parameter(
    value: &Value,
    action: &'static str,
    parameter: &'static str,
) -> Result<String, DecisionError> {
    parameters(value)
        .and_then(|p| p.get(parameter))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(DecisionError::MissingParameter { action, parameter })
}

fn direction_parameter(value: &Value, action: &'static str) -> Result<Heading, DecisionError> {
    let raw = string_parameter(value, action, "direction")?;
    Heading::from_name(&raw).ok_or(DecisionError::UnknownDirection(raw))
}
