use crate::domain::money::Money;
use crate::domain::payment::SettlementEntry;
use crate::domain::table::{TableStatus, TableSummary};
use crate::error::{LedgerError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

/// A table summary with amounts rounded for display.
#[derive(Debug, Serialize, PartialEq)]
pub struct SummaryRow {
    pub table: String,
    pub name: String,
    pub total: Decimal,
    pub paid: Decimal,
    pub remaining: Decimal,
    pub status: TableStatus,
}

impl From<&TableSummary> for SummaryRow {
    fn from(summary: &TableSummary) -> Self {
        Self {
            table: summary.id.clone(),
            name: summary.name.clone(),
            total: summary.total_due.rounded(),
            paid: summary.paid_amount.rounded(),
            remaining: summary.remaining_balance.rounded(),
            status: summary.status,
        }
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct SettlementRow {
    pub table: String,
    pub amount: Decimal,
    pub reference: String,
    pub settled_at: DateTime<Utc>,
}

impl From<&SettlementEntry> for SettlementRow {
    fn from(entry: &SettlementEntry) -> Self {
        Self {
            table: entry.table_id.clone(),
            amount: Money::from(entry.amount).rounded(),
            reference: entry.reference.clone(),
            settled_at: entry.settled_at,
        }
    }
}

/// Writes table summaries as CSV or JSON.
pub struct SummaryWriter<W: Write> {
    writer: W,
}

impl<W: Write> SummaryWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Writes `table,name,total,paid,remaining,status` rows.
    pub fn write_csv(self, summaries: &[TableSummary]) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(self.writer);
        for summary in summaries {
            wtr.serialize(SummaryRow::from(summary))?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn write_json(mut self, summaries: &[TableSummary]) -> Result<()> {
        let rows: Vec<SummaryRow> = summaries.iter().map(SummaryRow::from).collect();
        serde_json::to_writer_pretty(&mut self.writer, &rows)
            .map_err(|e| LedgerError::InternalError(Box::new(e)))?;
        writeln!(self.writer)?;
        Ok(())
    }

    /// Writes `table,amount,reference,settled_at` rows.
    pub fn write_settlements(self, entries: &[SettlementEntry]) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(self.writer);
        for entry in entries {
            wtr.serialize(SettlementRow::from(entry))?;
        }
        wtr.flush()?;
        Ok(())
    }
}
