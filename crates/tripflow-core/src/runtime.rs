use async_trait::async_trait;

use crate::config::AgentSpec;
use crate::error::AgentError;
use crate::job::JobResult;

/// Narrow contract to the external agent framework.
///
/// Implementations own any provider, retry, and timeout policy; the workflow
/// runner only sees a serialized input going in and a [`JobResult`] or
/// [`AgentError`] coming back.
#[async_trait]
pub trait AgentRuntime: Send + Sync {
    async fn invoke(&self, agent: &AgentSpec, input: &str) -> Result<JobResult, AgentError>;
}
