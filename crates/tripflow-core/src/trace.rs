use std::fmt::Write as _;
use std::fs::{create_dir_all, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// One recorded step of a workflow run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceEvent {
    pub job: String,
    pub message: String,
    pub timestamp_ms: u128,
}

impl TraceEvent {
    pub fn new(job: impl Into<String>, message: impl Into<String>) -> Self {
        let timestamp_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        Self {
            job: job.into(),
            message: message.into(),
            timestamp_ms,
        }
    }
}

/// In-memory accumulator of run events, recorded by the workflow runner.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TraceCollector {
    events: Vec<TraceEvent>,
}

impl TraceCollector {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn record(&mut self, job: impl Into<String>, message: impl Into<String>) {
        self.events.push(TraceEvent::new(job, message));
    }

    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn render_markdown(&self) -> String {
        if self.events.is_empty() {
            return "No trace events recorded.".to_string();
        }
        let mut output = String::from("### Run Trace\n");
        for (idx, event) in self.events.iter().enumerate() {
            let _ = writeln!(output, "{}. {}: {}", idx + 1, event.job, event.message);
        }
        output
    }
}

/// Persist run events as pretty-printed JSON under `dir`, keyed by run id.
pub fn persist_trace<P: AsRef<Path>>(
    dir: P,
    run_id: &str,
    events: &[TraceEvent],
) -> Result<PathBuf> {
    let dir = dir.as_ref();
    create_dir_all(dir)
        .with_context(|| format!("failed to create trace directory {}", dir.display()))?;
    let path = dir.join(format!("{run_id}.json"));
    let payload = serde_json::to_vec_pretty(events)?;
    let mut file = File::create(&path)
        .with_context(|| format!("failed to create trace file {}", path.display()))?;
    file.write_all(&payload)
        .with_context(|| format!("failed to write trace file {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_lists_recorded_steps() {
        let mut collector = TraceCollector::new();
        collector.record("planGoals", "completed in 12ms");
        collector.record("createBudget", "agent failed: provider failure");

        let markdown = collector.render_markdown();
        assert!(markdown.contains("1. planGoals"));
        assert!(markdown.contains("2. createBudget"));
    }

    #[test]
    fn trace_persists_as_json() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let events = vec![TraceEvent::new("planGoals", "completed")];

        let path = persist_trace(dir.path(), "run-1", &events).expect("trace persists");
        let raw = std::fs::read_to_string(&path).expect("trace readable");
        let parsed: Vec<TraceEvent> = serde_json::from_str(&raw).expect("trace parses");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].job, "planGoals");
    }
}
