//! Adapters implementing the domain ports.

pub mod gateway;
pub mod in_memory;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
