//! Job result model shared by the workflow runner and the report renderer.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::AgentError;

/// Name of a workflow step, e.g. `planGoals` or `createBudget`.
pub type JobName = String;

/// Value produced by a single agent invocation.
///
/// The variant is decided by the producing runtime, so consumers never need
/// runtime type inspection to pick a serialization path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobResult {
    Text(String),
    Structured(Value),
}

impl JobResult {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn structured(value: Value) -> Self {
        Self::Structured(value)
    }

    /// View the result as a JSON value, for threading into downstream inputs.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Text(text) => Value::String(text.clone()),
            Self::Structured(value) => value.clone(),
        }
    }
}

/// Outcome recorded for a job once the runner has attempted it.
///
/// A failed invocation is a normal outcome, not an error path: downstream
/// jobs and the report both keep working from whatever this carries.
#[derive(Debug, Clone)]
pub enum JobOutcome {
    Completed(JobResult),
    Failed(AgentError),
}

impl JobOutcome {
    /// Materialize the value this job contributes to reports and to
    /// downstream job inputs. Failures surface as the structured sentinel
    /// `{"error": <message>}`.
    pub fn report_value(&self) -> JobResult {
        match self {
            Self::Completed(result) => result.clone(),
            Self::Failed(error) => JobResult::Structured(json!({ "error": error.to_string() })),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Mapping from job name to outcome, populated in execution order.
///
/// Iteration order is insertion order; the report's console header depends
/// on it, while HTML sections follow the declared workflow order instead.
#[derive(Debug, Clone, Default)]
pub struct ResultsTable {
    entries: IndexMap<JobName, JobOutcome>,
}

impl ResultsTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<JobName>, outcome: JobOutcome) {
        self.entries.insert(name.into(), outcome);
    }

    pub fn get(&self, name: &str) -> Option<&JobOutcome> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &JobName> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&JobName, &JobOutcome)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
