use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::traits::{Tool, ToolSpec};

/// Catalogue of callable tools, keyed by unique name. Populated once at
/// startup, then frozen behind an `Arc` and shared read-only by every loop.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last registration for a given name wins.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        if self.tools.insert(name.clone(), tool).is_some() {
            debug!(tool = %name, "replaced existing tool registration");
        }
    }

    pub fn lookup(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Specs for every registered tool, sorted by name for stable output.
    pub fn list(&self) -> Vec<ToolSpec> {
        let mut specs: Vec<ToolSpec> = self.tools.values().map(|t| t.spec()).collect();
        specs.sort_by(|a, b| a.name.cmp(&b.name));
        specs
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
