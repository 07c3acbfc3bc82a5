use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::gateway::{Gateway, GatewayAction};
use crate::tools::extract_string_arg;
use crate::traits::Tool;

pub struct PlacesSearchTool {
    gateway: Arc<dyn Gateway>,
}

impl PlacesSearchTool {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl Tool for PlacesSearchTool {
    fn name(&self) -> &str {
        "places_search"
    }

    fn description(&self) -> &str {
        "Search for places by free-text query, optionally biased to a location"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "What to search for, e.g. 'coffee'"
                },
                "location": {
                    "type": "string",
                    "description": "Optional location bias, e.g. a city name"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<Value> {
        let query = extract_string_arg(&args, "query")?;

        let mut params = json!({ "query": query });
        if let Some(location) = args.get("location").and_then(|v| v.as_str()) {
            params["location"] = json!(location);
        }

        self.gateway.call(GatewayAction::Search, params).await
    }
}
