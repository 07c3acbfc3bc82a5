use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::gateway::{Gateway, GatewayAction};
use crate::tools::extract_string_arg;
use crate::traits::Tool;

pub struct PlaceDetailsTool {
    gateway: Arc<dyn Gateway>,
}

impl PlaceDetailsTool {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl Tool for PlaceDetailsTool {
    fn name(&self) -> &str {
        "place_details"
    }

    fn description(&self) -> &str {
        "Fetch full details for a place previously returned by places_search"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "place_id": {
                    "type": "string",
                    "description": "The place identifier from a search result"
                }
            },
            "required": ["place_id"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<Value> {
        let place_id = extract_string_arg(&args, "place_id")?;

        self.gateway
            .call(GatewayAction::PlaceDetails, json!({ "placeId": place_id }))
            .await
    }
}
