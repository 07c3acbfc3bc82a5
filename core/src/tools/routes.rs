use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::gateway::{Gateway, GatewayAction};
use crate::tools::{extract_string_arg, extract_string_arg_opt};
use crate::traits::Tool;

pub struct RoutesTool {
    gateway: Arc<dyn Gateway>,
}

impl RoutesTool {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl Tool for RoutesTool {
    fn name(&self) -> &str {
        "routes"
    }

    fn description(&self) -> &str {
        "Compute turn-by-turn directions between an origin and a destination"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "origin": { "type": "string", "description": "Start point" },
                "destination": { "type": "string", "description": "End point" },
                "mode": {
                    "type": "string",
                    "enum": ["driving", "walking", "transit"],
                    "description": "Travel mode, defaults to driving"
                }
            },
            "required": ["origin", "destination"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<Value> {
        let origin = extract_string_arg(&args, "origin")?;
        let destination = extract_string_arg(&args, "destination")?;
        let mode = extract_string_arg_opt(&args, "mode", "driving");

        self.gateway
            .call(
                GatewayAction::Directions,
                json!({
                    "origin": origin,
                    "destination": destination,
                    "mode": mode,
                }),
            )
            .await
    }
}
