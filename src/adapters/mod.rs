// Adapters layer: concrete implementations for external systems (storage, csv tables, http).

pub mod csv_tables;
pub mod http;
pub mod storage;

pub use storage::LocalStorage;
