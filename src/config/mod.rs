//! Configuration module for Thread-Sieve
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Running without a file uses [`Config::default`], whose worklist is the
//! built-in set of UK communities and retail keyword searches.
//!
//! # Example
//!
//! ```no_run
//! use thread_sieve::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("worklist.toml")).unwrap();
//! println!("Search items: {}", config.searches.len());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    ClientConfig, Config, LimitsConfig, ListingItem, OutputConfig, PacingConfig, SearchItem,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
