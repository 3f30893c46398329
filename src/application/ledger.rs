use crate::config::LedgerConfig;
use crate::domain::money::{Amount, Money};
use crate::domain::payment::{
    Authorization, CardCredentials, DeclineReason, PaymentResult, SettlementEntry,
};
use crate::domain::ports::{PaymentGatewayBox, SettlementLogBox, TableStoreBox};
use crate::domain::table::{BillDetail, BillState, OrderLine, Table, TableSummary};
use crate::error::{LedgerError, Result};
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, error, info, warn};

/// The billing ledger for every table in the venue.
///
/// `Ledger` owns the storage backends, the payment gateway and the settlement
/// log. Every mutating operation holds a per-table lock for its whole duration,
/// so a balance check and the update that depends on it can't interleave with
/// another mutation of the same table.
pub struct Ledger {
    store: TableStoreBox,
    gateway: PaymentGatewayBox,
    settlements: SettlementLogBox,
    config: LedgerConfig,
    locks: LockRegistry,
}

type LockRegistry = StdMutex<HashMap<String, Arc<Mutex<()>>>>;

/// Exclusive access to one table. Dropping it releases the table and removes
/// the registry entry when no other caller is holding or waiting on it.
struct TableGuard<'a> {
    locks: &'a LockRegistry,
    table_id: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for TableGuard<'_> {
    fn drop(&mut self) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        self.guard.take();
        if locks
            .get(&self.table_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&self.table_id);
        }
    }
}

impl Ledger {
    /// Creates a new `Ledger` with the default configuration.
    ///
    /// # Arguments
    ///
    /// * `store` - Persistence for tables and order lines.
    /// * `gateway` - Card authorization backend.
    /// * `settlements` - Log receiving one entry per accepted payment.
    pub fn new(
        store: TableStoreBox,
        gateway: PaymentGatewayBox,
        settlements: SettlementLogBox,
    ) -> Self {
        Self {
            store,
            gateway,
            settlements,
            config: LedgerConfig::default(),
            locks: StdMutex::new(HashMap::new()),
        }
    }

    pub fn with_config(mut self, config: LedgerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    async fn lock_table(&self, table_id: &str) -> TableGuard<'_> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            locks.entry(table_id.to_string()).or_default().clone()
        };
        TableGuard {
            locks: &self.locks,
            table_id: table_id.to_string(),
            guard: Some(lock.lock_owned().await),
        }
    }

    async fn load(&self, table_id: &str) -> Result<Table> {
        self.store
            .get(table_id)
            .await?
            .ok_or_else(|| LedgerError::NotFound(table_id.to_string()))
    }

    /// Registers a new, empty table.
    pub async fn create_table(&self, id: &str, name: &str) -> Result<Table> {
        let table = Table::new(id, name)?;

        let _guard = self.lock_table(&table.id).await;

        if self.store.get(&table.id).await?.is_some() {
            return Err(LedgerError::DuplicateKey(table.id));
        }
        self.store.put(table.clone()).await?;

        info!(table_id = %table.id, name = %table.name, "table created");
        Ok(table)
    }

    /// Summaries of every table, ordered by table id.
    pub async fn list_tables(&self) -> Result<Vec<TableSummary>> {
        let mut summaries: Vec<TableSummary> = self
            .store
            .list()
            .await?
            .iter()
            .map(TableSummary::from)
            .collect();
        summaries.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(summaries)
    }

    /// Appends an order line to a table's bill.
    pub async fn add_order(&self, table_id: &str, name: &str, amount: Decimal) -> Result<OrderLine> {
        let _guard = self.lock_table(table_id).await;

        let mut table = self.load(table_id).await?;
        let amount = Amount::new(amount)?;
        let line = table.add_order(name, amount)?;
        self.store.put(table).await?;

        debug!(table_id, line_id = line.id, amount = %amount.value(), "order added");
        Ok(line)
    }

    pub async fn get_bill(&self, table_id: &str) -> Result<BillDetail> {
        Ok(BillDetail::from(self.load(table_id).await?))
    }

    /// Takes a payment against a table.
    ///
    /// Amounts above the remaining balance are declined without contacting the
    /// gateway. A gateway error or timeout counts as a decline. On approval the
    /// paid amount and the settlement log are updated together: if the log
    /// append fails, the table is restored and the error returned.
    pub async fn accept_payment(
        &self,
        table_id: &str,
        amount: Decimal,
        credentials: &CardCredentials,
    ) -> Result<PaymentResult> {
        let _guard = self.lock_table(table_id).await;

        let mut table = self.load(table_id).await?;
        let amount = Amount::new(amount)?;
        credentials.validate()?;

        if Money::from(amount) > table.outstanding() {
            warn!(
                table_id,
                amount = %amount.value(),
                remaining = %table.remaining_balance().value(),
                "payment exceeds remaining balance"
            );
            return Ok(PaymentResult::Declined {
                reason: DeclineReason::OverpaymentRejected,
                remaining_balance: table.remaining_balance(),
            });
        }

        let reference = match self.authorize(table_id, amount, credentials).await {
            Some(reference) => reference,
            None => {
                return Ok(PaymentResult::Declined {
                    reason: DeclineReason::GatewayDeclined,
                    remaining_balance: table.remaining_balance(),
                });
            }
        };

        let previous = table.clone();
        table.apply_payment(amount)?;
        self.store.put(table.clone()).await?;

        let entry = SettlementEntry {
            table_id: table.id.clone(),
            amount,
            reference: reference.clone(),
            settled_at: Utc::now(),
        };
        if let Err(e) = self.settlements.append(entry).await {
            error!(table_id, error = %e, "settlement append failed, restoring table");
            if let Err(restore) = self.store.put(previous).await {
                error!(
                    table_id,
                    reference = %reference,
                    amount = %amount.value(),
                    append_error = %e,
                    restore_error = %restore,
                    "table restore failed, paid amount has no settlement entry"
                );
            }
            return Err(e);
        }

        info!(
            table_id,
            amount = %amount.value(),
            reference = %reference,
            remaining = %table.remaining_balance().value(),
            "payment accepted"
        );
        Ok(PaymentResult::Accepted {
            reference,
            remaining_balance: table.remaining_balance(),
        })
    }

    /// Asks the gateway once. Returns the reference token on approval.
    async fn authorize(
        &self,
        table_id: &str,
        amount: Amount,
        credentials: &CardCredentials,
    ) -> Option<String> {
        let call = self.gateway.authorize(amount, credentials);
        let authorization = match tokio::time::timeout(self.config.gateway_timeout, call).await {
            Ok(Ok(authorization)) => authorization,
            Ok(Err(e)) => {
                warn!(table_id, error = %e, "gateway call failed");
                Authorization::declined()
            }
            Err(_) => {
                warn!(
                    table_id,
                    timeout_ms = self.config.gateway_timeout.as_millis() as u64,
                    "gateway call timed out"
                );
                Authorization::declined()
            }
        };

        if !authorization.approved {
            warn!(table_id, amount = %amount.value(), "payment declined by gateway");
            return None;
        }
        match authorization.reference {
            Some(reference) if !reference.trim().is_empty() => Some(reference),
            _ => {
                error!(table_id, "gateway approved without a reference token");
                None
            }
        }
    }

    /// Clears a table for the next party. Resetting an empty table is a no-op.
    pub async fn reset_table(&self, table_id: &str) -> Result<()> {
        let _guard = self.lock_table(table_id).await;

        let mut table = self.load(table_id).await?;
        table.reset();
        self.store.put(table).await?;

        info!(table_id, "table reset");
        Ok(())
    }

    /// Deletes a table. Only empty tables can be removed.
    pub async fn remove_table(&self, table_id: &str) -> Result<()> {
        let _guard = self.lock_table(table_id).await;

        let table = self.load(table_id).await?;
        if table.state() != BillState::Empty {
            return Err(LedgerError::TableInUse(table.id));
        }
        self.store.delete(table_id).await?;

        info!(table_id, "table removed");
        Ok(())
    }

    /// Settlement log entries, optionally only those of one table.
    pub async fn settlements(&self, table_id: Option<&str>) -> Result<Vec<SettlementEntry>> {
        let entries = self.settlements.entries().await?;
        Ok(match table_id {
            Some(id) => entries.into_iter().filter(|e| e.table_id == id).collect(),
            None => entries,
        })
    }
}
