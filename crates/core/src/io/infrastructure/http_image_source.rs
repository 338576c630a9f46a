use std::time::Duration;

use crate::io::domain::image_source::ImageSource;
use crate::shared::error::PipelineError;

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Fetches source images over HTTP(S) with a bounded request timeout.
///
/// Non-success status codes are reported as fetch failures rather than
/// handing their bodies to the decoder.
pub struct HttpImageSource {
    client: reqwest::blocking::Client,
}

impl HttpImageSource {
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::blocking::Client::new());
        Self { client }
    }
}

impl Default for HttpImageSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageSource for HttpImageSource {
    fn fetch(&self, id: &str) -> Result<Vec<u8>, PipelineError> {
        let response = self
            .client
            .get(id)
            .send()
            .map_err(|e| PipelineError::Fetch {
                id: id.to_string(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::FetchStatus {
                id: id.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().map_err(|e| PipelineError::Fetch {
            id: id.to_string(),
            source: e,
        })?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_unresolvable_host_is_fetch_error() {
        let source = HttpImageSource::with_timeout(Duration::from_secs(2));
        let result = source.fetch("http://invalid.nonexistent.example.com/image.jpg");
        assert!(matches!(result, Err(PipelineError::Fetch { .. })));
    }

    #[test]
    fn test_fetch_success() {
        // Skip in CI — requires network access
        if std::env::var("CI").is_ok() {
            return;
        }
        let source = HttpImageSource::new();
        let result = source.fetch("https://www.google.com/robots.txt");
        match result {
            Ok(bytes) => assert!(!bytes.is_empty()),
            // Offline environments surface a fetch error, not a panic.
            Err(e) => assert!(matches!(e, PipelineError::Fetch { .. })),
        }
    }
}
