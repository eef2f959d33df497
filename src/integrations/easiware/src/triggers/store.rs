//! Key-value store the host lends to triggers between lifecycle calls

use crate::error::PieceResult;
use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;

/// Persistent storage scoped to one trigger instance
#[async_trait]
pub trait TriggerStore: Send + Sync {
    async fn get(&self, key: &str) -> PieceResult<Option<Value>>;

    async fn put(&self, key: &str, value: Value) -> PieceResult<()>;

    async fn delete(&self, key: &str) -> PieceResult<()>;
}

/// In-process store for embedding hosts and tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl TriggerStore for MemoryStore {
    async fn get(&self, key: &str) -> PieceResult<Option<Value>> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    async fn put(&self, key: &str, value: Value) -> PieceResult<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> PieceResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}
