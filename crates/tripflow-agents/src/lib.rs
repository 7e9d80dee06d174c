//! Scripted agent runtime for Tripflow.
//!
//! Implements [`tripflow_core::AgentRuntime`] with deterministic, canned
//! behavior per vacation-planning role so the demo workflow runs without a
//! live provider.

mod scripted;

pub use scripted::ScriptedRuntime;
