//! env-switch-import library
//!
//! Discovers Claude `.env` files, derives provider records from them and
//! merges those into one of two downstream stores. The binary is a thin
//! wrapper around [`pipeline::run_import`].

pub mod cli;
pub mod config;
pub mod db;
pub mod document;
pub mod env;
pub mod error;
pub mod identity;
pub mod pipeline;
pub mod report;
pub mod template;
pub mod types;
