//! Common traits for the screener.
//!
//! These traits define the seams between the refresh pipeline and its
//! collaborators, enabling modularity and testing.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;

/// Source of the raw SDN document bytes.
///
/// The production implementation downloads over HTTPS with a timeout;
/// tests substitute in-memory or failing sources to drive the refresh
/// coordinator without a network.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Fetches the full document.
    ///
    /// Fails with [`ScreenerError::Network`](crate::ScreenerError::Network)
    /// on connection failure, timeout, or non-success HTTP status. No retries
    /// happen at this layer; retry policy belongs to the refresh schedule.
    async fn fetch(&self) -> Result<Bytes>;
}
