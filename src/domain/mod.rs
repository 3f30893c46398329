//! Domain types and the ports the ledger depends on.

pub mod money;
pub mod payment;
pub mod ports;
pub mod table;
