use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tripflow_core::{
    AgentError, AgentRuntime, AgentSpec, JobResult, JobSpec, ProviderConfig, ReportRenderer,
    TeamSpec, WorkflowConfig, WorkflowRunner,
};

/// Produces a structured value for budget agents, text for everything else,
/// and a provider failure for the dining agent.
struct CannedRuntime;

#[async_trait]
impl AgentRuntime for CannedRuntime {
    async fn invoke(&self, agent: &AgentSpec, _input: &str) -> Result<JobResult, AgentError> {
        match agent.role.as_str() {
            "budget" => Ok(JobResult::structured(
                json!({"lodging": 540, "transport": 220, "total": 760}),
            )),
            "dining" => Err(AgentError::Provider("menu service unreachable".into())),
            _ => Ok(JobResult::text(format!("notes from {}", agent.id))),
        }
    }
}

fn demo_config() -> WorkflowConfig {
    let agent = |id: &str, role: &str| AgentSpec {
        id: id.into(),
        role: role.into(),
        instructions: String::new(),
    };
    let job = |name: &str, agent: &str, inputs: &[&str]| JobSpec {
        name: name.into(),
        agent: agent.into(),
        description: String::new(),
        inputs: inputs.iter().map(|s| s.to_string()).collect(),
    };

    let mut briefs = indexmap::IndexMap::new();
    briefs.insert(
        "weekendGetaway".to_string(),
        json!({"destination": "Tampa", "nights": 2}),
    );

    WorkflowConfig {
        provider: ProviderConfig {
            model: "demo-model".into(),
            api_key_env: "TRIPFLOW_API_KEY".into(),
        },
        agents: vec![
            agent("goalPlanner", "goals"),
            agent("budgetAnalyst", "budget"),
            agent("diningScout", "dining"),
        ],
        jobs: vec![
            job("planGoals", "goalPlanner", &[]),
            job("createBudget", "budgetAnalyst", &["planGoals"]),
            job("recommendDining", "diningScout", &["planGoals"]),
        ],
        teams: vec![TeamSpec {
            name: "vacationPlanners".into(),
            // reviewPlan has no job definition: it must surface as a warning.
            workflow: vec![
                "planGoals".into(),
                "createBudget".into(),
                "recommendDining".into(),
                "reviewPlan".into(),
            ],
        }],
        briefs,
    }
}

#[tokio::test]
async fn full_run_renders_ordered_report_with_warnings() {
    let config = demo_config();
    let runner = WorkflowRunner::new(Arc::new(CannedRuntime));

    let run = runner
        .execute(&config, "vacationPlanners", "weekendGetaway")
        .await
        .expect("workflow executes");

    let workflow = &config.team("vacationPlanners").unwrap().workflow;
    let report = ReportRenderer::new("Vacation Plan").render(workflow, &run.results);

    // One section per declared step, in declared order.
    let titles: Vec<_> = report.sections.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["plan Goals", "create Budget", "recommend Dining", "review Plan"]
    );

    // Success sections carry stringified bodies with length annotations.
    let console = report.console_text();
    assert!(console.starts_with(
        "Results object contains keys: [ planGoals, createBudget, recommendDining ]"
    ));
    assert!(console.contains("create Budget (length:"));
    assert!(console.contains("\"total\": 760"));

    // The failed dining job renders as a present section with the sentinel.
    assert!(console.contains("menu service unreachable"));

    // The undefined reviewPlan step degrades to a warning.
    assert!(console.contains("WARNING: No review Plan"));
    let html = report.to_html();
    assert!(html.contains("<h2 class=\"missing\">review Plan</h2>"));
    assert!(html.contains("No results found for this step."));

    // The trace records every attempted step.
    assert_eq!(run.trace.events().len(), 4);
    assert!(run.trace.render_markdown().contains("recommendDining"));
}
