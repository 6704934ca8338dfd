use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Raw key/value contents of one preferences node.
pub type PrefEntries = BTreeMap<String, String>;

/// Where a preferences node is persisted.
#[async_trait]
pub trait PrefsBackend: Send + Sync {
    /// Reads every entry of the node. A node that was never written is empty.
    async fn load(&self) -> Result<PrefEntries>;

    /// Replaces the persisted node with `entries`.
    async fn store(&self, entries: &PrefEntries) -> Result<()>;

    /// Human readable location, used in logs.
    fn location(&self) -> String;
}
