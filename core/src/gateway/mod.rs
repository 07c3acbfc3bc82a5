pub mod http;

pub use http::HttpGateway;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Action codes understood by the location gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GatewayAction {
    Search,
    PlaceDetails,
    Geocode,
    ReverseGeocode,
    Directions,
    DistanceMatrix,
}

impl GatewayAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            GatewayAction::Search => "search",
            GatewayAction::PlaceDetails => "placeDetails",
            GatewayAction::Geocode => "geocode",
            GatewayAction::ReverseGeocode => "reverseGeocode",
            GatewayAction::Directions => "directions",
            GatewayAction::DistanceMatrix => "distanceMatrix",
        }
    }
}

/// The external collaborator that performs the actual geocoding and routing
/// network calls. Tools forward their validated parameters here.
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn call(&self, action: GatewayAction, params: Value) -> anyhow::Result<Value>;
}
