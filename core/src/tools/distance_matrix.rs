use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::gateway::{Gateway, GatewayAction};
use crate::tools::{extract_string_arg_opt, extract_string_list_arg};
use crate::traits::Tool;

pub struct DistanceMatrixTool {
    gateway: Arc<dyn Gateway>,
}

impl DistanceMatrixTool {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl Tool for DistanceMatrixTool {
    fn name(&self) -> &str {
        "distance_matrix"
    }

    fn description(&self) -> &str {
        "Compute travel distance and duration between sets of origins and destinations"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "origins": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Origin place names or addresses"
                },
                "destinations": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Destination place names or addresses"
                },
                "mode": {
                    "type": "string",
                    "enum": ["driving", "walking", "transit"],
                    "description": "Travel mode, defaults to driving"
                }
            },
            "required": ["origins", "destinations"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<Value> {
        let origins = extract_string_list_arg(&args, "origins")?;
        let destinations = extract_string_list_arg(&args, "destinations")?;
        let mode = extract_string_arg_opt(&args, "mode", "driving");

        self.gateway
            .call(
                GatewayAction::DistanceMatrix,
                json!({
                    "origins": origins,
                    "destinations": destinations,
                    "mode": mode,
                }),
            )
            .await
    }
}
