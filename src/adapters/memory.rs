use crate::domain::ports::{PrefEntries, PrefsBackend};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Process-local preferences node. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryPrefs {
    entries: Arc<RwLock<PrefEntries>>,
    writes: Arc<RwLock<usize>>,
}

impl MemoryPrefs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let entries = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            entries: Arc::new(RwLock::new(entries)),
            writes: Arc::new(RwLock::new(0)),
        }
    }

    pub async fn snapshot(&self) -> PrefEntries {
        self.entries.read().await.clone()
    }

    /// Number of completed `store` calls.
    pub async fn write_count(&self) -> usize {
        *self.writes.read().await
    }
}

#[async_trait]
impl PrefsBackend for MemoryPrefs {
    async fn load(&self) -> Result<PrefEntries> {
        Ok(self.entries.read().await.clone())
    }

    async fn store(&self, entries: &PrefEntries) -> Result<()> {
        *self.entries.write().await = entries.clone();
        *self.writes.write().await += 1;
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
