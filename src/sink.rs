use crate::error::SinkError;
use crate::record::RemotePayload;
use async_trait::async_trait;

/// Asynchronous destination for [`RemotePayload`]s produced by the
/// remote client.
///
/// Implementations are responsible for transporting payloads to a
/// concrete collector (Loggly, a test double, stdout, etc). The client
/// calls `send` from a detached Tokio task and never awaits it on the
/// caller's path.
#[async_trait]
pub trait LogSink: Send + Sync {
    /// Deliver a single payload.
    ///
    /// **Parameters**
    /// - `payload`: fully enriched [`RemotePayload`] built by the client.
    ///
    /// **Returns**
    /// - `Ok(())` if the collector accepted the payload.
    /// - `Err(..)` on network failure, serialization error or non-success
    ///   status. The client reports it once on the console and drops the
    ///   payload; there is no retry.
    async fn send(&self, payload: &RemotePayload) -> Result<(), SinkError>;
}
