// handlers/mod.rs - route handlers, one file per endpoint

pub mod classes;
pub mod root;
pub mod transactions;
