use super::money::Amount;
use super::payment::{Authorization, CardCredentials, SettlementEntry};
use super::table::Table;
use crate::error::Result;
use async_trait::async_trait;

/// Persistence for tables and their order lines.
#[async_trait]
pub trait TableStore: Send + Sync {
    async fn get(&self, table_id: &str) -> Result<Option<Table>>;
    async fn put(&self, table: Table) -> Result<()>;
    async fn delete(&self, table_id: &str) -> Result<()>;
    async fn list(&self) -> Result<Vec<Table>>;
}

/// Card authorization. Implementations may block or be slow; the ledger bounds
/// every call with a timeout.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn authorize(&self, amount: Amount, credentials: &CardCredentials)
    -> Result<Authorization>;
}

/// Append-only record of accepted payments.
#[async_trait]
pub trait SettlementLog: Send + Sync {
    async fn append(&self, entry: SettlementEntry) -> Result<()>;
    async fn entries(&self) -> Result<Vec<SettlementEntry>>;
}

pub type TableStoreBox = Box<dyn TableStore>;
pub type PaymentGatewayBox = Box<dyn PaymentGateway>;
pub type SettlementLogBox = Box<dyn SettlementLog>;
