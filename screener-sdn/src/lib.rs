//! # Screener SDN
//!
//! Download and extraction of the OFAC Specially Designated Nationals list.
//!
//! Two pieces live here:
//!
//! - [`SdnFetcher`]: retrieves the raw SDN XML over HTTPS with a timeout
//! - [`extract_addresses`]: pulls every Digital Currency Address entry out of
//!   the document, regardless of which schema namespace OFAC published it under

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod fetch;
mod parse;

pub use fetch::{FetchConfig, SdnFetcher};
pub use parse::extract_addresses;
