use crate::domain::payment::SettlementEntry;
use crate::domain::ports::{SettlementLog, TableStore};
use crate::domain::table::Table;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory store for tables.
///
/// Uses `Arc<RwLock<HashMap<String, Table>>>` to allow shared concurrent access.
/// Clones share the same map.
#[derive(Default, Clone)]
pub struct InMemoryTableStore {
    tables: Arc<RwLock<HashMap<String, Table>>>,
}

impl InMemoryTableStore {
    /// Creates a new, empty in-memory table store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TableStore for InMemoryTableStore {
    async fn get(&self, table_id: &str) -> Result<Option<Table>> {
        let tables = self.tables.read().await;
        Ok(tables.get(table_id).cloned())
    }

    async fn put(&self, table: Table) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables.insert(table.id.clone(), table);
        Ok(())
    }

    async fn delete(&self, table_id: &str) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables.remove(table_id);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Table>> {
        let tables = self.tables.read().await;
        Ok(tables.values().cloned().collect())
    }
}

/// An append-only settlement log kept in memory.
#[derive(Default, Clone)]
pub struct InMemorySettlementLog {
    entries: Arc<RwLock<Vec<SettlementEntry>>>,
}

impl InMemorySettlementLog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettlementLog for InMemorySettlementLog {
    async fn append(&self, entry: SettlementEntry) -> Result<()> {
        self.entries.write().await.push(entry);
        Ok(())
    }

    async fn entries(&self) -> Result<Vec<SettlementEntry>> {
        Ok(self.entries.read().await.clone())
    }
}
