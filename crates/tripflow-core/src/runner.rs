//! Sequential workflow execution over an [`AgentRuntime`].
//!
//! Walks a team's declared workflow order, threads each job's declared input
//! dependencies through prior outcomes, and records a `Failed` sentinel for
//! any job whose invocation errors instead of aborting the run.

use std::sync::Arc;
use std::time::Instant;

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::config::WorkflowConfig;
use crate::error::{AgentError, TripflowError};
use crate::job::{JobOutcome, ResultsTable};
use crate::runtime::AgentRuntime;
use crate::trace::TraceCollector;

/// Results and trace of one complete workflow execution.
#[derive(Debug)]
pub struct WorkflowRun {
    pub results: ResultsTable,
    pub trace: TraceCollector,
}

/// Executes a named team's workflow against a named brief.
pub struct WorkflowRunner {
    runtime: Arc<dyn AgentRuntime>,
}

impl WorkflowRunner {
    pub fn new(runtime: Arc<dyn AgentRuntime>) -> Self {
        Self { runtime }
    }

    /// Run every step of the team's workflow, in declared order.
    ///
    /// Unknown team or brief identifiers are fatal. Everything after that
    /// degrades per step: a step without a job definition is skipped (no
    /// entry recorded), a job whose agent is missing or whose invocation
    /// fails is recorded as `Failed`, and execution continues either way.
    pub async fn execute(
        &self,
        config: &WorkflowConfig,
        team_name: &str,
        brief_id: &str,
    ) -> Result<WorkflowRun, TripflowError> {
        let team = config.team(team_name)?;
        let brief = config.brief(brief_id)?.clone();

        info!(
            team = %team_name,
            brief = %brief_id,
            steps = team.workflow.len(),
            "starting workflow execution"
        );

        let start_time = Instant::now();
        let mut results = ResultsTable::new();
        let mut trace = TraceCollector::new();

        for step in &team.workflow {
            let Some(job) = config.job(step) else {
                warn!(job = %step, "no job definition for workflow step; step not run");
                trace.record(step.clone(), "no job definition; step not run");
                continue;
            };

            let input = build_job_input(&brief, &job.inputs, &results);
            let serialized = serde_json::to_string(&input)
                .map_err(|err| TripflowError::Other(err.into()))?;

            let outcome = match config.agent(&job.agent) {
                None => {
                    let error = AgentError::MissingAgent(job.agent.clone());
                    warn!(job = %step, agent = %job.agent, "agent missing; recording failure");
                    trace.record(step.clone(), error.to_string());
                    JobOutcome::Failed(error)
                }
                Some(agent) => {
                    debug!(job = %step, agent = %agent.id, "invoking agent");
                    let job_start = Instant::now();
                    match self.runtime.invoke(agent, &serialized).await {
                        Ok(result) => {
                            let duration_ms = job_start.elapsed().as_millis() as u64;
                            info!(job = %step, agent = %agent.id, duration_ms, "job completed");
                            trace.record(step.clone(), format!("completed in {duration_ms}ms"));
                            JobOutcome::Completed(result)
                        }
                        Err(error) => {
                            warn!(
                                job = %step,
                                agent = %agent.id,
                                error = %error,
                                "job failed; continuing with error sentinel"
                            );
                            trace.record(step.clone(), format!("failed: {error}"));
                            JobOutcome::Failed(error)
                        }
                    }
                }
            };

            results.insert(step.clone(), outcome);
        }

        let failed = results.iter().filter(|(_, o)| o.is_failed()).count();
        info!(
            duration_ms = start_time.elapsed().as_millis() as u64,
            completed = results.len() - failed,
            failed,
            total = results.len(),
            "workflow execution complete"
        );

        Ok(WorkflowRun { results, trace })
    }
}

/// Assemble the serialized input for one job: the brief plus, under
/// `inputs`, the materialized value of each declared dependency. A failed
/// dependency contributes its `{"error": ...}` sentinel; a dependency that
/// never ran contributes nothing.
fn build_job_input(brief: &Value, dependencies: &[String], results: &ResultsTable) -> Value {
    let mut inputs = Map::new();
    for dep in dependencies {
        match results.get(dep) {
            Some(outcome) => {
                inputs.insert(dep.clone(), outcome.report_value().to_value());
            }
            None => {
                debug!(dependency = %dep, "declared input has no recorded outcome");
            }
        }
    }

    let mut input = Map::new();
    input.insert("brief".to_string(), brief.clone());
    input.insert("inputs".to_string(), Value::Object(inputs));
    Value::Object(input)
}
