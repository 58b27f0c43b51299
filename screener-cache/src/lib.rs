//! # Screener Cache
//!
//! In-memory cache of sanctioned crypto addresses.
//!
//! The cache is one immutable [`Snapshot`] published wholesale by the refresh
//! pipeline, plus refresh metadata, behind a single atomic store
//! ([`SanctionsStore`]). Lookups ([`AddressLookup`]) always read the last
//! published snapshot and are never blocked by a refresh in flight.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod lookup;
mod snapshot;
mod store;

pub use lookup::AddressLookup;
pub use snapshot::Snapshot;
pub use store::{CacheView, SanctionsStore};
