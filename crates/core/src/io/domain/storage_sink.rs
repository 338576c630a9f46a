use crate::shared::error::PipelineError;

/// Accepts composited output bytes and returns a durable location
/// (URL or path) where they can be served from.
pub trait StorageSink: Send + Sync {
    fn store(&self, id: &str, bytes: &[u8]) -> Result<String, PipelineError>;
}
