//! CLI library for testing purposes

pub mod config;
pub mod convert;
pub mod edit;
pub mod merge;
pub mod query;
pub mod stats;
pub mod view;

pub use config::{Config, load_config};
pub use tmcodec::TmStore;
