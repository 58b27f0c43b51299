//! # Screener Core
//!
//! Core types, errors, and traits for the OFAC SDN screening service.
//!
//! This crate provides the foundational building blocks used by all other
//! screener crates:
//!
//! - **Types**: Domain models for sanctioned-address records, lookup results,
//!   and list status
//! - **Errors**: Error types with context
//! - **Constants**: Source URL, refresh defaults, and matching labels
//! - **Traits**: The document-source seam used by the refresh pipeline
//!
//! ## Example
//!
//! ```rust
//! use screener_core::{normalize_address, MatchRecord};
//!
//! let key = normalize_address("  1A2B3c  ");
//! assert_eq!(key, "1a2b3c");
//!
//! let record = MatchRecord {
//!     entity: "Some Org".into(),
//!     currency_label: "Digital Currency Address - XBT".into(),
//! };
//! let json = serde_json::to_string(&record).unwrap();
//! assert!(json.contains("Some Org"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{Result, ScreenerError};
pub use traits::*;
pub use types::*;
