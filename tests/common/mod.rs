#![allow(dead_code)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::fs::File;
use std::io::{Error, Write};
use std::path::Path;
use tabledger::application::ledger::Ledger;
use tabledger::domain::payment::CardCredentials;
use tabledger::infrastructure::gateway::SimulatedGateway;
use tabledger::infrastructure::in_memory::{InMemorySettlementLog, InMemoryTableStore};
use tempfile::NamedTempFile;

pub const HEADER: &str = "type, table, name, amount, holder, card, exp_month, exp_year, cvc";

pub fn card(cvc: &str) -> CardCredentials {
    CardCredentials {
        holder_name: "Zeynep Kaya".to_string(),
        card_number: "1234-5678-9012-3456".to_string(),
        exp_month: 12,
        exp_year: 2028,
        cvc: cvc.to_string(),
    }
}

/// Ledger over in-memory storage. The returned log shares state with the ledger's.
pub fn ledger_with_log(gateway: SimulatedGateway) -> (Ledger, InMemorySettlementLog) {
    let log = InMemorySettlementLog::new();
    let ledger = Ledger::new(
        Box::new(InMemoryTableStore::new()),
        Box::new(gateway),
        Box::new(log.clone()),
    );
    (ledger, log)
}

pub fn ledger() -> Ledger {
    ledger_with_log(SimulatedGateway::new()).0
}

/// Writes a commands CSV with the standard header.
pub fn commands_file(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{HEADER}").unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    file
}

/// One table per block of `orders_per_table` one-unit orders, each settled in full.
pub fn generate_commands_csv(path: &Path, tables: usize, orders_per_table: usize) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(file);
    wtr.write_record(["type", "table", "name", "amount", "holder", "card", "exp_month", "exp_year", "cvc"])?;

    for t in 1..=tables {
        let table = format!("t{t}");
        wtr.write_record(["create", &table, &format!("Table {t}")])?;
        for o in 1..=orders_per_table {
            wtr.write_record(["order", &table, &format!("item {o}"), "1.10"])?;
        }
        let total = (dec!(1.10) * Decimal::from(orders_per_table)).to_string();
        wtr.write_record(["pay", &table, "", &total, "Guest", "4111", "1", "2030", "123"])?;
    }

    wtr.flush()?;
    Ok(())
}
