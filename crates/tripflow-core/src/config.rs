use std::{
    env, fs,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::error::TripflowError;

const DEFAULT_CONFIG_PATH: &str = "workflow.json";
const CONFIG_PATH_ENV: &str = "TRIPFLOW_CONFIG";

/// Top-level workflow configuration: agents, jobs, teams, and briefs.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowConfig {
    pub provider: ProviderConfig,
    pub agents: Vec<AgentSpec>,
    pub jobs: Vec<JobSpec>,
    pub teams: Vec<TeamSpec>,
    pub briefs: IndexMap<String, Value>,
}

impl WorkflowConfig {
    pub fn agent(&self, id: &str) -> Option<&AgentSpec> {
        self.agents.iter().find(|agent| agent.id == id)
    }

    pub fn job(&self, name: &str) -> Option<&JobSpec> {
        self.jobs.iter().find(|job| job.name == name)
    }

    pub fn team(&self, name: &str) -> Result<&TeamSpec, TripflowError> {
        self.teams
            .iter()
            .find(|team| team.name == name)
            .ok_or_else(|| TripflowError::UnknownTeam(name.to_string()))
    }

    pub fn brief(&self, id: &str) -> Result<&Value, TripflowError> {
        self.briefs
            .get(id)
            .ok_or_else(|| TripflowError::UnknownBrief(id.to_string()))
    }

    /// Resolve the provider credential from the environment only.
    pub fn api_key(&self) -> Result<SecretValue, TripflowError> {
        SecretValue::from_env(&self.provider.api_key_env)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    pub model: String,
    #[serde(default)]
    pub api_key_env: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgentSpec {
    pub id: String,
    pub role: String,
    #[serde(default)]
    pub instructions: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobSpec {
    pub name: String,
    pub agent: String,
    #[serde(default)]
    pub description: String,
    /// Names of jobs whose outputs feed this job's input.
    #[serde(default)]
    pub inputs: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamSpec {
    pub name: String,
    /// Ordered workflow: execution order and report section order.
    pub workflow: Vec<String>,
}

/// Wrapper around sensitive values to reduce accidental logging.
#[derive(Clone)]
pub struct SecretValue(String);

impl SecretValue {
    /// Require that the given environment variable is set and non-empty.
    pub fn from_env(var: &str) -> Result<Self, TripflowError> {
        match env::var(var) {
            Ok(value) if !value.trim().is_empty() => Ok(Self(value)),
            _ => Err(TripflowError::MissingSecret(var.to_string())),
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "***redacted***")
    }
}

/// Helper to load workflow configuration with fail-fast validation.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a provided path or discoverable defaults.
    ///
    /// Resolution order:
    /// 1. Explicit `path` argument.
    /// 2. `TRIPFLOW_CONFIG` environment variable.
    /// 3. `workflow.json` in the current working directory.
    pub fn load(path: Option<PathBuf>) -> Result<WorkflowConfig, TripflowError> {
        let candidate = resolve_path(path);
        let raw = fs::read_to_string(&candidate)
            .map_err(|err| TripflowError::config_io(candidate.clone(), err))?;
        let config: WorkflowConfig = serde_json::from_str(&raw)
            .map_err(|err| TripflowError::InvalidConfiguration(err.to_string()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    fn validate(config: &WorkflowConfig) -> Result<(), TripflowError> {
        if config.provider.api_key_env.trim().is_empty() {
            return Err(TripflowError::InvalidConfiguration(
                "provider.api_key_env must reference an environment variable".into(),
            ));
        }

        // The credential must exist before any job executes.
        config.api_key()?;
        Ok(())
    }
}

fn resolve_path(path: Option<PathBuf>) -> PathBuf {
    if let Some(path) = path {
        return path;
    }

    if let Ok(from_env) = env::var(CONFIG_PATH_ENV) {
        if !from_env.trim().is_empty() {
            return PathBuf::from(from_env);
        }
    }

    Path::new(DEFAULT_CONFIG_PATH).to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "provider": { "model": "demo-model", "api_key_env": "TRIPFLOW_TEST_KEY" },
        "agents": [
            { "id": "goalPlanner", "role": "goals", "instructions": "Outline trip goals" }
        ],
        "jobs": [
            { "name": "planGoals", "agent": "goalPlanner", "inputs": [] },
            { "name": "createBudget", "agent": "budgetAnalyst", "inputs": ["planGoals"] }
        ],
        "teams": [
            { "name": "vacationPlanners", "workflow": ["planGoals", "createBudget"] }
        ],
        "briefs": {
            "weekendGetaway": { "destination": "Tampa", "nights": 2 }
        }
    }"#;

    fn write_sample() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp config");
        file.write_all(SAMPLE.as_bytes()).expect("write config");
        file
    }

    #[test]
    fn loads_and_resolves_catalogues() {
        std::env::set_var("TRIPFLOW_TEST_KEY", "secret");
        let file = write_sample();

        let config = ConfigLoader::load(Some(file.path().to_path_buf())).expect("config loads");

        assert!(config.agent("goalPlanner").is_some());
        assert!(config.agent("budgetAnalyst").is_none());
        assert_eq!(config.job("createBudget").unwrap().inputs, vec!["planGoals"]);
        assert_eq!(
            config.team("vacationPlanners").unwrap().workflow,
            vec!["planGoals", "createBudget"]
        );
        assert_eq!(config.brief("weekendGetaway").unwrap()["destination"], "Tampa");
        assert!(matches!(
            config.brief("nope").unwrap_err(),
            TripflowError::UnknownBrief(_)
        ));
        assert!(matches!(
            config.team("nope").unwrap_err(),
            TripflowError::UnknownTeam(_)
        ));
    }

    #[test]
    fn missing_file_is_config_io() {
        let err = ConfigLoader::load(Some(PathBuf::from("/nonexistent/workflow.json"))).unwrap_err();
        assert!(matches!(err, TripflowError::ConfigIo { .. }));
    }

    #[test]
    fn unparseable_content_is_invalid_configuration() {
        let mut file = tempfile::NamedTempFile::new().expect("temp config");
        file.write_all(b"not json").expect("write config");

        let err = ConfigLoader::load(Some(file.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, TripflowError::InvalidConfiguration(_)));
    }

    #[test]
    fn missing_credential_fails_before_any_work() {
        std::env::remove_var("TRIPFLOW_TEST_KEY_ABSENT");
        let file = write_sample();
        let raw = SAMPLE.replace("TRIPFLOW_TEST_KEY", "TRIPFLOW_TEST_KEY_ABSENT");
        std::fs::write(file.path(), raw).expect("rewrite config");

        let err = ConfigLoader::load(Some(file.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, TripflowError::MissingSecret(_)));
    }

    #[test]
    fn secret_debug_is_redacted() {
        std::env::set_var("TRIPFLOW_TEST_REDACT", "hunter2");
        let secret = SecretValue::from_env("TRIPFLOW_TEST_REDACT").expect("secret loads");
        assert_eq!(secret.expose(), "hunter2");
        assert_eq!(format!("{:?}", secret), "***redacted***");
    }
}
