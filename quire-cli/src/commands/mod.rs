//! Command implementations for the quire CLI

pub mod articles;
pub mod serve;

// Re-export dispatcher functions for flat access from main.rs
pub use articles::{run_delete, run_list, run_new, run_show};
pub use serve::run_serve;
