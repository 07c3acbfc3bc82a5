use serde_json::Value;
use std::sync::Arc;

pub mod distance_matrix;
pub mod geocode;
pub mod place_details;
pub mod places_search;
pub mod reverse_geocode;
pub mod routes;

pub use distance_matrix::DistanceMatrixTool;
pub use geocode::GeocodeTool;
pub use place_details::PlaceDetailsTool;
pub use places_search::PlacesSearchTool;
pub use reverse_geocode::ReverseGeocodeTool;
pub use routes::RoutesTool;

use crate::agent::ToolRegistry;
use crate::gateway::Gateway;

pub fn extract_string_arg(args: &Value, key: &str) -> anyhow::Result<String> {
    args.get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| anyhow::anyhow!("Missing '{}' parameter", key))
        .map(|s| s.to_string())
}

pub fn extract_string_arg_opt(args: &Value, key: &str, default: &str) -> String {
    args.get(key)
        .and_then(|v| v.as_str())
        .unwrap_or(default)
        .to_string()
}

pub fn extract_f64_arg(args: &Value, key: &str) -> anyhow::Result<f64> {
    args.get(key)
        .and_then(|v| v.as_f64())
        .ok_or_else(|| anyhow::anyhow!("Missing or non-numeric '{}' parameter", key))
}

pub fn extract_string_list_arg(args: &Value, key: &str) -> anyhow::Result<Vec<String>> {
    let list = args
        .get(key)
        .and_then(|v| v.as_array())
        .ok_or_else(|| anyhow::anyhow!("Missing '{}' list parameter", key))?;

    let items: Vec<String> = list
        .iter()
        .filter_map(|v| v.as_str())
        .map(|s| s.to_string())
        .collect();

    if items.is_empty() {
        anyhow::bail!("'{}' must contain at least one entry", key);
    }

    Ok(items)
}

/// Register the full built-in catalogue against one shared gateway.
pub fn register_builtin_tools(registry: &mut ToolRegistry, gateway: Arc<dyn Gateway>) {
    registry.register(Arc::new(PlacesSearchTool::new(gateway.clone())));
    registry.register(Arc::new(PlaceDetailsTool::new(gateway.clone())));
    registry.register(Arc::new(GeocodeTool::new(gateway.clone())));
    registry.register(Arc::new(ReverseGeocodeTool::new(gateway.clone())));
    registry.register(Arc::new(RoutesTool::new(gateway.clone())));
    registry.register(Arc::new(DistanceMatrixTool::new(gateway)));
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::gateway::GatewayAction;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records the last forwarded action/params and replies with a canned
    /// payload, or fails with a canned message.
    pub struct MockGateway {
        pub response: Value,
        pub fail_with: Option<String>,
        pub calls: Mutex<Vec<(GatewayAction, Value)>>,
    }

    impl MockGateway {
        pub fn replying(response: Value) -> Self {
            Self {
                response,
                fail_with: None,
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(message: &str) -> Self {
            Self {
                response: Value::Null,
                fail_with: Some(message.to_string()),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn last_call(&self) -> Option<(GatewayAction, Value)> {
            self.calls.lock().unwrap().last().cloned()
        }
    }

    #[async_trait]
    impl Gateway for MockGateway {
        async fn call(&self, action: GatewayAction, params: Value) -> anyhow::Result<Value> {
            self.calls.lock().unwrap().push((action, params));
            match &self.fail_with {
                Some(message) => Err(anyhow::anyhow!("{}", message)),
                None => Ok(self.response.clone()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extract_string_arg_missing() {
        let err = extract_string_arg(&json!({}), "query").unwrap_err();
        assert!(err.to_string().contains("query"));
    }

    #[test]
    fn extract_string_list_rejects_empty() {
        let err = extract_string_list_arg(&json!({"origins": []}), "origins").unwrap_err();
        assert!(err.to_string().contains("origins"));
    }

    #[test]
    fn extract_string_list_keeps_order() {
        let args = json!({"origins": ["Delhi", "Agra"]});
        let items = extract_string_list_arg(&args, "origins").unwrap();
        assert_eq!(items, vec!["Delhi", "Agra"]);
    }
}
