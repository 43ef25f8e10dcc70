pub mod analyzer;
pub mod config;
pub mod embedding;
pub mod pipeline;
pub mod provider;
pub mod store;
pub mod synthesizer;
pub mod templates;
pub mod types;

pub use types::*;
