use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A single invocation of a tool, minted by the agent loop immediately
/// before dispatch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: Value,
}

impl ToolCall {
    pub fn new(name: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: format!("call_{}", Uuid::new_v4().simple()),
            name: name.into(),
            arguments,
        }
    }
}

/// The raw gateway payload answering one [`ToolCall`]. The loop treats the
/// payload as opaque; only the formatter interprets it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    pub call_id: String,
    pub payload: Value,
}

impl ToolResult {
    pub fn new(call_id: impl Into<String>, payload: Value) -> Self {
        Self {
            call_id: call_id.into(),
            payload,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters_schema: Value,
}

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn parameters_schema(&self) -> Value;

    /// Perform the external call and return the raw result payload.
    async fn execute(&self, args: Value) -> anyhow::Result<Value>;

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters_schema: self.parameters_schema(),
        }
    }
}
