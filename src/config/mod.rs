//! Configuration module for Sitemap-Ripple
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Every setting has a default, so `Config::default()`
//! is what a run without `--config` uses.
//!
//! # Example
//!
//! ```no_run
//! use sitemap_ripple::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sitemap.toml")).unwrap();
//! println!("Fetch timeout: {}ms", config.crawler.request_timeout_ms);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
