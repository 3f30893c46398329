//! Batch driver: CSV commands in, table summaries out.

pub mod command;
pub mod csv;
