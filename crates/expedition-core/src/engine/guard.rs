//! Timeout guard - runs each explorer call on an isolated worker thread
//! under a wall-clock deadline.
//!
//! The worker owns the boxed explorer for the whole run; the control thread
//! only ever exchanges serialized strings with it. Every call ships with its
//! own single-use reply channel, so a reply that arrives after the deadline
//! lands on a dropped receiver and can never be observed. Cancellation is
//! best-effort: a hung call keeps its thread until the process exits, but it
//! holds no reference to ledger, tracker, or log state.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use thiserror::Error;

use crate::explorer::Explorer;

/// One of the guarded protocol calls.
#[derive(Debug)]
pub enum AgentCall {
    Initialize(String),
    TakeDecision,
    AcknowledgeResults(String),
    DeliverFinalReport,
}

impl AgentCall {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Initialize(_) => "initialize",
            Self::TakeDecision => "takeDecision",
            Self::AcknowledgeResults(_) => "acknowledgeResults",
            Self::DeliverFinalReport => "deliverFinalReport",
        }
    }
}

/// A completed call's payload.
#[derive(Debug)]
pub enum CallReply {
    Done,
    Decision(String),
    Report(Option<String>),
}

/// How a guarded call failed. Both variants are attributable to the agent;
/// only failure to spawn the worker at all is an infrastructure fault.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuardError {
    #[error("{call} did not answer within {deadline_ms}ms")]
    Timeout { call: &'static str, deadline_ms: u64 },

    #[error("{call} raised: {cause}")]
    Raised { call: &'static str, cause: String },
}

type CallOutcome = Result<CallReply, String>;
type Request = (AgentCall, mpsc::Sender<CallOutcome>);

/// Executes explorer calls with a deadline, isolating hangs and panics from
/// the engine's control thread.
pub struct TimeoutGuard {
    requests: mpsc::Sender<Request>,
    deadline: Duration,
}

impl TimeoutGuard {
    /// Move the explorer onto its worker thread. Failing to spawn the thread
    /// is the one fault here that is fatal to the run rather than attributed
    /// to the agent.
    pub fn spawn(explorer: Box<dyn Explorer + Send>, deadline: Duration) -> std::io::Result<Self> {
        let (requests, incoming) = mpsc::channel::<Request>();
        thread::Builder::new()
            .name("explorer-worker".to_string())
            .spawn(move || worker_loop(explorer, incoming))?;
        Ok(Self { requests, deadline })
    }

    /// Run one call under the deadline.
    pub fn call(&self, call: AgentCall) -> Result<CallReply, GuardError> {
        let name = call.name();
        let deadline_ms = self.deadline.as_millis() as u64;

        let (reply_tx, reply_rx) = mpsc::channel();
        if self.requests.send((call, reply_tx)).is_err() {
            // Worker exited; only happens after an earlier failure.
            return Err(GuardError::Raised {
                call: name,
                cause: "explorer worker is gone".to_string(),
            });
        }

        match reply_rx.recv_timeout(self.deadline) {
            Ok(Ok(reply)) => Ok(reply),
            Ok(Err(cause)) => Err(GuardError::Raised { call: name, cause }),
            Err(mpsc::RecvTimeoutError::Timeout) => {
                tracing::warn!(call = name, deadline_ms, "explorer call abandoned on timeout");
                Err(GuardError::Timeout { call: name, deadline_ms })
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(GuardError::Raised {
                call: name,
                cause: "explorer worker terminated unexpectedly".to_string(),
            }),
        }
    }
}

fn worker_loop(mut explorer: Box<dyn Explorer + Send>, incoming: mpsc::Receiver<Request>) {
    for (call, reply_tx) in incoming {
        let outcome = catch_unwind(AssertUnwindSafe(|| dispatch(&mut explorer, call)));
        let outcome = match outcome {
            Ok(Ok(reply)) => Ok(reply),
            Ok(Err(error)) => Err(format!("{error:#}")),
            Err(panic) => Err(panic_message(panic)),
        };
        // A send error means the control thread stopped listening (deadline
        // passed or run over); the late reply is simply dropped.
        let _ = reply_tx.send(outcome);
    }
}

fn dispatch(explorer: &mut Box<dyn Explorer + Send>, call: AgentCall) -> Result<CallReply> {
    match call {
        AgentCall::Initialize(context) => {
            explorer.initialize(&context).map(|()| CallReply::Done)
        }
        AgentCall::TakeDecision => explorer.take_decision().map(CallReply::Decision),
        AgentCall::AcknowledgeResults(results) => {
            explorer.acknowledge_results(&results).map(|()| CallReply::Done)
        }
        AgentCall::DeliverFinalReport => {
            explorer.deliver_final_report().map(CallReply::Report)
        }
    }
}

fn panic_message(panic: Box<dyn std::any::Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        format!("panicked: {message}")
    } else if let Some(message) = panic.downcast_ref::<String>() {
        format!("panicked: {message}")
    } else {
        "panicked".to_string()
    }
}
