pub mod classifier;
pub mod formatter;
pub mod registry;
pub mod steps;

pub use classifier::{Intent, classify};
pub use formatter::{ToolKind, format_result};
pub use registry::ToolRegistry;
pub use steps::{Step, StepKind, StepSequence};

use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::config::AgentConfig;
use crate::traits::Message;

/// One user conversation: configuration, the shared tool catalogue, and an
/// append-only message history. Each conversation gets its own instance.
pub struct Agent {
    config: AgentConfig,
    registry: Arc<ToolRegistry>,
    history: Vec<Message>,
}

impl Agent {
    pub fn new(config: AgentConfig, registry: Arc<ToolRegistry>) -> Self {
        Self {
            config,
            registry,
            history: Vec::new(),
        }
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// Start the step sequence for one request. The caller pulls steps one
    /// at a time and may stop pulling at any point; nothing is recorded in
    /// history by this path.
    pub fn run(&self, text: &str) -> StepSequence {
        StepSequence::new(
            self.registry.clone(),
            text,
            self.config.max_iterations,
        )
    }

    /// Drain a full run, record the exchange in history, and return the
    /// final answer text.
    pub async fn process(&mut self, text: &str) -> Result<String> {
        let mut sequence = self.run(text);
        let mut steps = Vec::new();
        while let Some(step) = sequence.next_step().await {
            debug!(user = %self.config.user_id, step = ?step.kind, "step produced");
            steps.push(step);
        }
        Ok(self.record_exchange(text, &steps))
    }

    /// Append one completed request/answer pair to history. Used by callers
    /// that pulled the step sequence themselves; returns the answer text.
    pub fn record_exchange(&mut self, text: &str, steps: &[Step]) -> String {
        self.history.push(Message::user(text));

        let tool_calls: Vec<_> = steps.iter().filter_map(|s| s.tool_call.clone()).collect();
        let tool_results: Vec<_> = steps.iter().filter_map(|s| s.tool_result.clone()).collect();

        // The sequence contract guarantees a terminal Answer.
        let answer = steps
            .iter()
            .rev()
            .find(|s| s.kind == StepKind::Answer)
            .map(|s| s.content.clone())
            .unwrap_or_default();

        if tool_calls.is_empty() {
            self.history.push(Message::assistant(answer.clone()));
        } else {
            self.history.push(Message::assistant_with_tools(
                answer.clone(),
                tool_calls,
                tool_results,
            ));
        }

        answer
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::register_builtin_tools;
    use crate::tools::testing::MockGateway;
    use crate::traits::Role;
    use serde_json::json;

    fn agent_with(gateway: Arc<MockGateway>) -> Agent {
        let mut registry = ToolRegistry::new();
        register_builtin_tools(&mut registry, gateway);
        Agent::new(AgentConfig::default(), Arc::new(registry))
    }

    #[tokio::test]
    async fn process_records_user_and_assistant_messages() {
        let gateway = Arc::new(MockGateway::replying(
            json!({"results": [{"name": "Java House"}]}),
        ));
        let mut agent = agent_with(gateway);

        let answer = agent.process("find coffee near me").await.unwrap();
        assert!(answer.contains("Java House"));

        let history = agent.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, Role::User);
        assert_eq!(history[0].content, "find coffee near me");
        assert_eq!(history[1].role, Role::Assistant);
        assert_eq!(
            history[1].tool_calls.as_ref().unwrap()[0].name,
            "places_search"
        );
    }

    #[tokio::test]
    async fn direct_answers_carry_no_tool_calls() {
        let gateway = Arc::new(MockGateway::replying(json!({})));
        let mut agent = agent_with(gateway);

        agent.process("hello").await.unwrap();
        assert!(agent.history()[1].tool_calls.is_none());
    }

    #[tokio::test]
    async fn history_is_append_only_until_cleared() {
        let gateway = Arc::new(MockGateway::replying(json!({"results": []})));
        let mut agent = agent_with(gateway);

        agent.process("hello").await.unwrap();
        agent.process("find tea near me").await.unwrap();
        assert_eq!(agent.history().len(), 4);
        assert_eq!(agent.history()[2].content, "find tea near me");

        agent.clear_history();
        assert!(agent.history().is_empty());
    }

    #[tokio::test]
    async fn failed_tool_still_produces_an_answer() {
        let gateway = Arc::new(MockGateway::failing("quota exceeded"));
        let mut agent = agent_with(gateway);

        let answer = agent.process("find coffee near me").await.unwrap();
        assert_eq!(answer, "Error executing places_search: quota exceeded");
    }
}
