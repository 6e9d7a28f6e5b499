pub mod btree;
pub mod config;
pub mod error;
pub mod harness;
