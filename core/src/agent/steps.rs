use std::sync::Arc;

use futures_util::Stream;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::agent::classifier::{Intent, capability_summary, classify};
use crate::agent::formatter::format_result;
use crate::agent::registry::ToolRegistry;
use crate::traits::{ToolCall, ToolResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    Think,
    Act,
    Observe,
    Answer,
}

/// One unit of the agent's reasoning trace. Field names are a stable wire
/// shape consumed by the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    #[serde(rename = "type")]
    pub kind: StepKind,
    pub content: String,
    #[serde(rename = "toolCall", skip_serializing_if = "Option::is_none")]
    pub tool_call: Option<ToolCall>,
    #[serde(rename = "toolResult", skip_serializing_if = "Option::is_none")]
    pub tool_result: Option<ToolResult>,
}

impl Step {
    fn think(content: impl Into<String>) -> Self {
        Self {
            kind: StepKind::Think,
            content: content.into(),
            tool_call: None,
            tool_result: None,
        }
    }

    fn act(content: impl Into<String>, call: ToolCall) -> Self {
        Self {
            kind: StepKind::Act,
            content: content.into(),
            tool_call: Some(call),
            tool_result: None,
        }
    }

    fn observe(content: impl Into<String>, result: ToolResult) -> Self {
        Self {
            kind: StepKind::Observe,
            content: content.into(),
            tool_result: Some(result),
            tool_call: None,
        }
    }

    fn answer(content: impl Into<String>) -> Self {
        Self {
            kind: StepKind::Answer,
            content: content.into(),
            tool_call: None,
            tool_result: None,
        }
    }
}

enum LoopState {
    Think,
    PendingAct(ToolCall),
    Execute(ToolCall),
    PendingAnswer(String),
    Done,
}

/// Pull-based producer of the Think → Act → Observe → Answer trace for one
/// request. The tool call runs only when the step after Act is pulled, so
/// dropping the sequence early cancels any work not yet started.
pub struct StepSequence {
    registry: Arc<ToolRegistry>,
    request: String,
    max_iterations: usize,
    think_count: usize,
    state: LoopState,
}

impl StepSequence {
    pub fn new(registry: Arc<ToolRegistry>, request: impl Into<String>, max_iterations: usize) -> Self {
        Self {
            registry,
            request: request.into(),
            max_iterations,
            think_count: 0,
            state: LoopState::Think,
        }
    }

    /// Emit the next step, or `None` once the terminal Answer has been
    /// produced. Every run ends in exactly one Answer step.
    pub async fn next_step(&mut self) -> Option<Step> {
        match std::mem::replace(&mut self.state, LoopState::Done) {
            LoopState::Think => {
                if self.think_count >= self.max_iterations {
                    // Bound exhausted without an answer; terminate with an
                    // explicit fallback instead of ending the trace silently.
                    warn!(max_iterations = self.max_iterations, "iteration bound exhausted");
                    return Some(Step::answer(
                        "I could not work out an answer within my reasoning limit. \
                         Please rephrase your request.",
                    ));
                }
                self.think_count += 1;

                let step = Step::think(format!("Analyzing request: \"{}\"", self.request));
                match classify(&self.request) {
                    Intent::Call { tool, params } => {
                        debug!(tool = tool.as_str(), "classifier selected a tool");
                        self.state = LoopState::PendingAct(ToolCall::new(tool.as_str(), params));
                    }
                    Intent::Direct(text) => {
                        debug!("classifier produced a direct answer");
                        let text = if text.is_empty() { capability_summary() } else { text };
                        self.state = LoopState::PendingAnswer(text);
                    }
                }
                Some(step)
            }
            LoopState::PendingAct(call) => {
                let step = Step::act(format!("Calling {}", call.name), call.clone());
                self.state = LoopState::Execute(call);
                Some(step)
            }
            LoopState::Execute(call) => {
                let tool = match self.registry.lookup(&call.name) {
                    Some(tool) => tool,
                    None => {
                        warn!(tool = %call.name, "tool not found in registry");
                        return Some(Step::answer(format!(
                            "Error executing {}: tool not found",
                            call.name
                        )));
                    }
                };

                match tool.execute(call.arguments.clone()).await {
                    Ok(payload) => {
                        let answer = format_result(&call.name, &payload);
                        let result = ToolResult::new(call.id.clone(), payload);
                        let step =
                            Step::observe(format!("Received a result from {}", call.name), result);
                        self.state = LoopState::PendingAnswer(answer);
                        Some(step)
                    }
                    Err(e) => {
                        warn!(tool = %call.name, error = %e, "tool execution failed");
                        Some(Step::answer(format!(
                            "Error executing {}: {}",
                            call.name, e
                        )))
                    }
                }
            }
            LoopState::PendingAnswer(text) => Some(Step::answer(text)),
            LoopState::Done => None,
        }
    }

    /// Adapter for stream consumers; preserves the pull-one-at-a-time
    /// cancellation contract.
    pub fn into_stream(self) -> impl Stream<Item = Step> {
        futures_util::stream::unfold(self, |mut seq| async move {
            seq.next_step().await.map(|step| (step, seq))
        })
    }
}
