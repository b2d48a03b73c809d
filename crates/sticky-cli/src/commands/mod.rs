//! Command handlers

pub mod config;
pub mod kv;
pub mod search;
