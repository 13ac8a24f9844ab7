pub mod auditor;
pub mod browser;
pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod pipeline;
pub mod translate;
pub mod utils;

#[cfg(feature = "api")]
pub mod api;
#[cfg(feature = "api")]
pub mod views;
#[cfg(feature = "cli")]
pub mod cli;
