pub mod agent;
pub mod config;
pub mod gateway;
pub mod tools;
pub mod traits;

pub use agent::{Agent, Intent, Step, StepKind, StepSequence, ToolKind, ToolRegistry};
pub use config::AgentConfig;
pub use gateway::{Gateway, GatewayAction, HttpGateway};
pub use tools::register_builtin_tools;
pub use traits::{Message, Role, Tool, ToolCall, ToolResult, ToolSpec};
