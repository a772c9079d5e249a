use crate::error::SinkError;
use crate::record::RemotePayload;
use crate::sink::LogSink;
use async_trait::async_trait;

/// A sink that simply drops all payloads.
///
/// Useful for running services without a collector token and for tests
/// that only care about console output.
#[derive(Clone, Default)]
pub struct NoopSink;

#[async_trait]
impl LogSink for NoopSink {
    async fn send(&self, _payload: &RemotePayload) -> Result<(), SinkError> {
        Ok(())
    }
}
