use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tokio::runtime::Runtime;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use tripflow_agents::ScriptedRuntime;
use tripflow_core::{
    launch_viewer, persist_report, persist_trace, ConfigLoader, ReportRenderer, WorkflowConfig,
    WorkflowRunner,
};

#[derive(Parser, Debug)]
#[command(name = "tripflow", version, about = "Multi-agent vacation planning")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a planning workflow and render the report.
    Run(RunArgs),
    /// Load the configuration and report dangling references.
    Validate(ValidateArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Workflow configuration file (falls back to TRIPFLOW_CONFIG, then ./workflow.json).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Team whose workflow to execute.
    #[arg(long, default_value = "vacationPlanners")]
    team: String,

    /// Brief identifier supplying the trip constraints.
    #[arg(long, default_value = "weekendGetaway")]
    brief: String,

    /// Output path for the HTML report (overwritten on each run).
    #[arg(long, default_value = "vacation_plan.html")]
    report: PathBuf,

    /// Directory to persist the run trace into (skipped when omitted).
    #[arg(long)]
    trace_dir: Option<PathBuf>,

    /// Skip launching the platform viewer on the written report.
    #[arg(long)]
    no_open: bool,
}

#[derive(Args, Debug)]
struct ValidateArgs {
    /// Workflow configuration file (falls back to TRIPFLOW_CONFIG, then ./workflow.json).
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tripflow_core=info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let rt = Runtime::new()?;
    rt.block_on(async move {
        match cli.command {
            Command::Run(args) => run_command(args).await?,
            Command::Validate(args) => validate_command(args).await?,
        }
        Ok::<(), anyhow::Error>(())
    })?;

    Ok(())
}

async fn run_command(args: RunArgs) -> Result<()> {
    let config = ConfigLoader::load(args.config)?;
    // The credential must resolve before any job executes.
    let _api_key = config.api_key()?;

    let run_id = Uuid::new_v4().to_string();
    info!(run_id = %run_id, team = %args.team, brief = %args.brief, "starting planning run");

    let runner = WorkflowRunner::new(Arc::new(ScriptedRuntime::new()));
    let run = runner.execute(&config, &args.team, &args.brief).await?;

    let workflow = &config.team(&args.team)?.workflow;
    let title = format!("Vacation Plan ({})", args.brief);
    let report = ReportRenderer::new(title)
        .render(workflow, &run.results)
        .with_generated_at(chrono::Utc::now().to_rfc3339());

    println!("{}", report.console_text());

    match persist_report(&args.report, &report.to_html()) {
        Ok(path) => {
            info!(path = %path.display(), "report written");
            if args.no_open {
                info!("viewer launch skipped");
            } else if let Err(err) = launch_viewer(&path) {
                warn!(error = %err, "could not open report in viewer");
            }
        }
        Err(err) => warn!(error = %err, "could not write report file"),
    }

    if let Some(trace_dir) = args.trace_dir {
        match persist_trace(&trace_dir, &run_id, run.trace.events()) {
            Ok(path) => info!(path = %path.display(), "trace written"),
            Err(err) => warn!(error = %err, "could not write trace file"),
        }
    }

    Ok(())
}

async fn validate_command(args: ValidateArgs) -> Result<()> {
    let config = ConfigLoader::load(args.config)?;

    println!(
        "Configuration valid: {} agents, {} jobs, {} teams, {} briefs",
        config.agents.len(),
        config.jobs.len(),
        config.teams.len(),
        config.briefs.len()
    );

    for warning in dangling_references(&config) {
        warn!("{warning}");
    }

    Ok(())
}

/// Collect references that will degrade at run time: jobs naming unknown
/// agents, workflow steps naming unknown jobs, inputs naming unknown jobs.
fn dangling_references(config: &WorkflowConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    for job in &config.jobs {
        if config.agent(&job.agent).is_none() {
            warnings.push(format!(
                "job '{}' names unknown agent '{}' (will record a failure sentinel)",
                job.name, job.agent
            ));
        }
        for input in &job.inputs {
            if config.job(input).is_none() {
                warnings.push(format!(
                    "job '{}' declares unknown input '{}'",
                    job.name, input
                ));
            }
        }
    }

    for team in &config.teams {
        for step in &team.workflow {
            if config.job(step).is_none() {
                warnings.push(format!(
                    "team '{}' workflow step '{}' has no job definition (will be skipped)",
                    team.name, step
                ));
            }
        }
    }

    warnings
}
