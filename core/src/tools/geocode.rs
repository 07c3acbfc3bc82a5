use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::gateway::{Gateway, GatewayAction};
use crate::tools::extract_string_arg;
use crate::traits::Tool;

pub struct GeocodeTool {
    gateway: Arc<dyn Gateway>,
}

impl GeocodeTool {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl Tool for GeocodeTool {
    fn name(&self) -> &str {
        "geocode"
    }

    fn description(&self) -> &str {
        "Resolve a street address to geographic coordinates"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "address": {
                    "type": "string",
                    "description": "The address to geocode"
                }
            },
            "required": ["address"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<Value> {
        let address = extract_string_arg(&args, "address")?;

        self.gateway
            .call(GatewayAction::Geocode, json!({ "address": address }))
            .await
    }
}
