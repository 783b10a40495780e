//! Explorer handle - the three-call protocol an agent under evaluation implements.

use anyhow::Result;

/// An explorer raid under evaluation.
///
/// The engine owns the handle for exactly one run and drives it through
/// `initialize` once, then `take_decision` / `acknowledge_results` pairs
/// until the run terminates. All payloads are serialized JSON text; the
/// engine never hands an explorer a live reference to its own state.
///
/// Implementations are interchangeable strategies. Returning an `Err` from
/// any call (or panicking) ends the run with an agent failure; it never
/// propagates into the engine's own control flow.
pub trait Explorer: Send {
    /// Receive the initial context: starting position and heading, budget,
    /// crew size, and the contract to fulfil.
    fn initialize(&mut self, context: &str) -> Result<()>;

    /// Return the next decision as serialized text, minimally
    /// `{"action": "<name>"}`.
    fn take_decision(&mut self) -> Result<String>;

    /// Receive the serialized outcome of the previous decision.
    fn acknowledge_results(&mut self, results: &str) -> Result<()>;

    /// Optional debriefing, requested once after a successful run.
    fn deliver_final_report(&mut self) -> Result<Option<String>> {
        Ok(None)
    }
}
