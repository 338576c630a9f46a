use crate::shared::error::PipelineError;

/// Resolves an image identifier (typically a URL) to raw encoded bytes.
///
/// The pipeline treats retrieval as opaque; retry and backoff policy
/// belong to the caller.
pub trait ImageSource: Send + Sync {
    fn fetch(&self, id: &str) -> Result<Vec<u8>, PipelineError>;
}
