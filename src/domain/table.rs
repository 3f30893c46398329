use super::money::{Amount, Money};
use crate::error::{LedgerError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Position of a table in its billing lifecycle.
///
/// `Empty -> Occupied -> PartiallyPaid -> Settled -> Empty` (via reset). Adding an
/// order to a `Settled` table moves it back to `PartiallyPaid`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum BillState {
    Empty,
    Occupied,
    PartiallyPaid,
    Settled,
}

/// Coarse status shown in table listings.
///
/// A table is `Available` only while it has no orders at all. A settled table
/// stays `Occupied` until it is reset.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum TableStatus {
    Available,
    Occupied,
}

/// One priced item on a table's bill.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct OrderLine {
    pub id: u64,
    pub table_id: String,
    pub name: String,
    pub amount: Amount,
}

/// A billing unit: one physical table or tab.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct Table {
    pub id: String,
    pub name: String,
    /// Cumulative amount accepted from payments.
    pub paid_amount: Money,
    /// Lines in insertion order.
    pub orders: Vec<OrderLine>,
    /// Next order line id. Survives resets so ids are never reused.
    pub next_line_id: u64,
}

impl Table {
    pub fn new(id: &str, name: &str) -> Result<Self> {
        let id = required("table id", id)?;
        let name = required("table name", name)?;
        Ok(Self {
            id,
            name,
            paid_amount: Money::ZERO,
            orders: Vec::new(),
            next_line_id: 1,
        })
    }

    pub fn total_due(&self) -> Money {
        self.orders.iter().map(|line| Money::from(line.amount)).sum()
    }

    /// Unfloored difference between what is owed and what was paid.
    pub fn outstanding(&self) -> Money {
        self.total_due() - self.paid_amount
    }

    /// Outstanding amount, never negative.
    pub fn remaining_balance(&self) -> Money {
        self.outstanding().floored()
    }

    pub fn state(&self) -> BillState {
        let total = self.total_due();
        if self.orders.is_empty() {
            BillState::Empty
        } else if self.paid_amount == Money::ZERO {
            BillState::Occupied
        } else if self.paid_amount < total {
            BillState::PartiallyPaid
        } else {
            BillState::Settled
        }
    }

    pub fn status(&self) -> TableStatus {
        if self.outstanding().value() <= Decimal::ZERO && self.total_due() == Money::ZERO {
            TableStatus::Available
        } else {
            TableStatus::Occupied
        }
    }

    /// Appends an order line and returns a copy of it.
    ///
    /// Rejects a line that would push the total past what a `Decimal` can hold,
    /// so `total_due` never overflows on a stored table.
    pub fn add_order(&mut self, name: &str, amount: Amount) -> Result<OrderLine> {
        let name = required("order name", name)?;
        self.total_due().checked_add(Money::from(amount))?;
        let line = OrderLine {
            id: self.next_line_id,
            table_id: self.id.clone(),
            name,
            amount,
        };
        self.next_line_id += 1;
        self.orders.push(line.clone());
        Ok(line)
    }

    /// Records an accepted payment. Rejects anything above the outstanding amount.
    pub fn apply_payment(&mut self, amount: Amount) -> Result<()> {
        let payment = Money::from(amount);
        if payment > self.outstanding() {
            return Err(LedgerError::InvalidArgument(format!(
                "payment of {} exceeds remaining balance {} on table {}",
                payment.value(),
                self.outstanding().value(),
                self.id
            )));
        }
        self.paid_amount += payment;
        Ok(())
    }

    /// Clears every order and the paid amount.
    pub fn reset(&mut self) {
        self.orders.clear();
        self.paid_amount = Money::ZERO;
    }
}

/// Per-table totals as shown in listings.
#[derive(Debug, Serialize, PartialEq, Eq, Clone)]
pub struct TableSummary {
    pub id: String,
    pub name: String,
    pub total_due: Money,
    pub paid_amount: Money,
    pub remaining_balance: Money,
    pub status: TableStatus,
}

impl From<&Table> for TableSummary {
    fn from(table: &Table) -> Self {
        Self {
            id: table.id.clone(),
            name: table.name.clone(),
            total_due: table.total_due(),
            paid_amount: table.paid_amount,
            remaining_balance: table.remaining_balance(),
            status: table.status(),
        }
    }
}

/// Full bill for one table, lines included.
#[derive(Debug, Serialize, PartialEq, Eq, Clone)]
pub struct BillDetail {
    pub table_id: String,
    pub name: String,
    pub total_due: Money,
    pub paid_amount: Money,
    pub remaining_balance: Money,
    pub state: BillState,
    pub orders: Vec<OrderLine>,
}

impl From<Table> for BillDetail {
    fn from(table: Table) -> Self {
        Self {
            total_due: table.total_due(),
            remaining_balance: table.remaining_balance(),
            state: table.state(),
            paid_amount: table.paid_amount,
            table_id: table.id,
            name: table.name,
            orders: table.orders,
        }
    }
}

fn required(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        Err(LedgerError::InvalidArgument(format!("{field} must not be empty")))
    } else {
        Ok(value.to_string())
    }
}
