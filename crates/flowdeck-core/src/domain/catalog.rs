//! Flow catalog trait and its in-memory implementation.
//!
//! The catalog is the collection surface the launcher works against.
//! External crates can implement [`FlowCatalog`] to provide different
//! persistence mechanisms; the in-memory one here backs the simulator
//! and the tests.

use async_trait::async_trait;
use std::sync::RwLock;

use super::flow::Flow;
use super::seed::seed_flows;
use crate::error::CoreError;

/// Suffix appended to a flow name when duplicating it.
pub const DUPLICATE_SUFFIX: &str = " (Copia)";

/// Repository of flows, keyed by name.
#[async_trait]
pub trait FlowCatalog: Send + Sync {
    /// All flows, in insertion order.
    async fn list(&self) -> Result<Vec<Flow>, CoreError>;

    /// Find a flow by exact name.
    async fn find(&self, name: &str) -> Result<Option<Flow>, CoreError>;

    /// Insert a flow, or replace the flow with the same name in place.
    async fn save(&self, flow: Flow) -> Result<(), CoreError>;

    /// Number of flows in the catalog.
    async fn count(&self) -> Result<usize, CoreError>;

    /// Copy an existing flow under a new name and store the copy.
    ///
    /// The copy carries the source name plus [`DUPLICATE_SUFFIX`] and a
    /// reset version. It shares no state with the source: editing one
    /// never affects the other.
    async fn duplicate(&self, name: &str) -> Result<Flow, CoreError> {
        let source = self
            .find(name)
            .await?
            .ok_or_else(|| CoreError::FlowNotFound(name.to_string()))?;

        let mut copy = source.clone();
        copy.name = format!("{}{}", source.name, DUPLICATE_SUFFIX);
        copy.version = super::flow::DEFAULT_VERSION.to_string();

        self.save(copy.clone()).await?;
        Ok(copy)
    }
}

/// In-memory implementation of the flow catalog.
///
/// Keeps flows in a plain vector so listing preserves insertion order,
/// which is the order the launcher surface displays them in.
pub struct MemoryFlowCatalog {
    flows: RwLock<Vec<Flow>>,
}

impl MemoryFlowCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self {
            flows: RwLock::new(Vec::new()),
        }
    }

    /// Create a catalog pre-populated with the stock flows.
    pub fn seeded() -> Self {
        Self {
            flows: RwLock::new(seed_flows()),
        }
    }
}

impl Default for MemoryFlowCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FlowCatalog for MemoryFlowCatalog {
    async fn list(&self) -> Result<Vec<Flow>, CoreError> {
        let flows = self.flows.read().map_err(|e| {
            CoreError::CatalogStore(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(flows.clone())
    }

    async fn find(&self, name: &str) -> Result<Option<Flow>, CoreError> {
        let flows = self.flows.read().map_err(|e| {
            CoreError::CatalogStore(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(flows.iter().find(|f| f.name == name).cloned())
    }

    async fn save(&self, flow: Flow) -> Result<(), CoreError> {
        if flow.name.trim().is_empty() {
            return Err(CoreError::Validation(
                "flow name must not be empty".to_string(),
            ));
        }

        let mut flows = self.flows.write().map_err(|e| {
            CoreError::CatalogStore(format!("Failed to acquire write lock: {}", e))
        })?;

        match flows.iter().position(|f| f.name == flow.name) {
            Some(index) => flows[index] = flow,
            None => flows.push(flow),
        }

        Ok(())
    }

    async fn count(&self) -> Result<usize, CoreError> {
        let flows = self.flows.read().map_err(|e| {
            CoreError::CatalogStore(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(flows.len())
    }
}
