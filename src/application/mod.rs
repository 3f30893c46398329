//! Application layer containing the billing rules.
//!
//! This module defines the `Ledger`, the entry point for every table, order and
//! payment operation. Mutations are serialized per table so the paid amount can
//! never exceed the total due, even when payments race each other.

pub mod ledger;
