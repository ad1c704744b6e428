//! # Kanto
//!
//! An embedding-based similarity search library for Pokémon catalogs.
//!
//! ## Features
//!
//! - Pure Rust implementation
//! - Catalog loading from CSV with incremental text filtering
//! - Precomputed embedding store with atomic, awaitable install
//! - Exact top-K similarity search over unit-normalized embeddings

pub mod catalog;
pub mod cli;
pub mod embedding;
pub mod error;
pub mod similarity;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
