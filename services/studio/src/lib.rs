pub mod adapters;
pub mod app;
pub mod config;
pub mod console;
pub mod error;
