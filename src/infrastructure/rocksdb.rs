use crate::domain::payment::SettlementEntry;
use crate::domain::ports::{SettlementLog, TableStore};
use crate::domain::table::Table;
use crate::error::{LedgerError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, IteratorMode, Options};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Column Family for storing tables with their order lines.
pub const CF_TABLES: &str = "tables";
/// Column Family for the settlement log.
pub const CF_SETTLEMENTS: &str = "settlements";

/// A persistent store implementation using RocksDB.
///
/// Tables are keyed by their id, settlement entries by a big-endian sequence
/// number so iteration returns them in append order. Values are JSON.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    next_settlement: Arc<AtomicU64>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the required column families ("tables" and "settlements") exist
    /// and resumes the settlement sequence after the last stored entry.
    ///
    /// # Arguments
    ///
    /// * `path` - The filesystem path where the database will be stored.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_tables = ColumnFamilyDescriptor::new(CF_TABLES, Options::default());
        let cf_settlements = ColumnFamilyDescriptor::new(CF_SETTLEMENTS, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_tables, cf_settlements])?;

        let next = {
            let cf = column_family(&db, CF_SETTLEMENTS)?;
            match db.iterator_cf(cf, IteratorMode::End).next() {
                Some(item) => {
                    let (key, _) = item?;
                    sequence_from_key(&key)? + 1
                }
                None => 0,
            }
        };

        Ok(Self {
            db: Arc::new(db),
            next_settlement: Arc::new(AtomicU64::new(next)),
        })
    }

    fn values<T: DeserializeOwned>(&self, name: &str) -> Result<Vec<T>> {
        let cf = column_family(&self.db, name)?;
        let mut values = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) = item?;
            values.push(decode(&value)?);
        }
        Ok(values)
    }
}

#[async_trait]
impl TableStore for RocksDBStore {
    async fn get(&self, table_id: &str) -> Result<Option<Table>> {
        let cf = column_family(&self.db, CF_TABLES)?;
        match self.db.get_cf(cf, table_id.as_bytes())? {
            Some(bytes) => Ok(Some(decode(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn put(&self, table: Table) -> Result<()> {
        let cf = column_family(&self.db, CF_TABLES)?;
        self.db.put_cf(cf, table.id.as_bytes(), encode(&table)?)?;
        Ok(())
    }

    async fn delete(&self, table_id: &str) -> Result<()> {
        let cf = column_family(&self.db, CF_TABLES)?;
        self.db.delete_cf(cf, table_id.as_bytes())?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Table>> {
        self.values(CF_TABLES)
    }
}

#[async_trait]
impl SettlementLog for RocksDBStore {
    async fn append(&self, entry: SettlementEntry) -> Result<()> {
        let cf = column_family(&self.db, CF_SETTLEMENTS)?;
        let value = encode(&entry)?;
        let sequence = self.next_settlement.fetch_add(1, Ordering::SeqCst);
        self.db.put_cf(cf, sequence.to_be_bytes(), value)?;
        Ok(())
    }

    async fn entries(&self) -> Result<Vec<SettlementEntry>> {
        self.values(CF_SETTLEMENTS)
    }
}

fn column_family<'a>(db: &'a DB, name: &str) -> Result<&'a ColumnFamily> {
    db.cf_handle(name).ok_or_else(|| {
        LedgerError::InternalError(Box::new(std::io::Error::other(format!(
            "{name} column family not found"
        ))))
    })
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| {
        LedgerError::InternalError(Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("Serialization error: {}", e),
        )))
    })
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| {
        LedgerError::InternalError(Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("Deserialization error: {}", e),
        )))
    })
}

fn sequence_from_key(key: &[u8]) -> Result<u64> {
    let bytes: [u8; 8] = key.try_into().map_err(|_| {
        LedgerError::InternalError(Box::new(std::io::Error::other(
            "Malformed settlement key",
        )))
    })?;
    Ok(u64::from_be_bytes(bytes))
}
