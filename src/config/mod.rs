//! Tracker configuration loading.

pub mod loader;

pub use loader::load_config;
