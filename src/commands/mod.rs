// Physical domain reconciliation
pub mod domain;

// Configuration inspection
pub mod config;
