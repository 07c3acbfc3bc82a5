use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::gateway::{Gateway, GatewayAction};
use crate::tools::extract_f64_arg;
use crate::traits::Tool;

pub struct ReverseGeocodeTool {
    gateway: Arc<dyn Gateway>,
}

impl ReverseGeocodeTool {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl Tool for ReverseGeocodeTool {
    fn name(&self) -> &str {
        "reverse_geocode"
    }

    fn description(&self) -> &str {
        "Resolve a latitude/longitude pair to a street address"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "lat": { "type": "number", "description": "Latitude" },
                "lng": { "type": "number", "description": "Longitude" }
            },
            "required": ["lat", "lng"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<Value> {
        let lat = extract_f64_arg(&args, "lat")?;
        let lng = extract_f64_arg(&args, "lng")?;

        self.gateway
            .call(
                GatewayAction::ReverseGeocode,
                json!({ "lat": lat, "lng": lng }),
            )
            .await
    }
}
