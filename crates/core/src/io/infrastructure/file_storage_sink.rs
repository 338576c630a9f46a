use std::fs;
use std::path::PathBuf;

use crate::io::domain::storage_sink::StorageSink;
use crate::shared::error::PipelineError;

/// Stores composited output as files under a base directory, returning
/// the written path. Stands in for the object-storage sink in local and
/// CLI use.
pub struct FileStorageSink {
    base_dir: PathBuf,
}

impl FileStorageSink {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Derive a stable output filename from an image id. URL separators
    /// and query characters are flattened so any id maps to one file.
    fn file_name(id: &str) -> String {
        let stem: String = id
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(id)
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            })
            .collect();
        if stem.rsplit('.').next().is_some_and(|ext| {
            crate::shared::constants::IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str())
        }) {
            stem
        } else {
            format!("{stem}.jpg")
        }
    }
}

impl StorageSink for FileStorageSink {
    fn store(&self, id: &str, bytes: &[u8]) -> Result<String, PipelineError> {
        let path = self.base_dir.join(Self::file_name(id));
        let write = || -> std::io::Result<()> {
            fs::create_dir_all(&self.base_dir)?;
            fs::write(&path, bytes)
        };
        write().map_err(|e| PipelineError::Store {
            id: id.to_string(),
            source: e,
        })?;
        Ok(path.to_string_lossy().into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_writes_file_and_returns_path() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileStorageSink::new(dir.path());
        let url = sink.store("sample-042.jpg", b"jpeg bytes").unwrap();
        assert!(url.ends_with("sample-042.jpg"));
        assert_eq!(fs::read(&url).unwrap(), b"jpeg bytes");
    }

    #[test]
    fn test_store_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("out").join("crops");
        let sink = FileStorageSink::new(&nested);
        sink.store("a.jpg", b"x").unwrap();
        assert!(nested.join("a.jpg").exists());
    }

    #[test]
    fn test_url_id_flattens_to_filename() {
        assert_eq!(
            FileStorageSink::file_name("https://cdn.example.com/samples/1234.jpg"),
            "1234.jpg"
        );
        assert_eq!(
            FileStorageSink::file_name("https://cdn.example.com/samples/1234?v=2"),
            "1234_v_2.jpg"
        );
    }

    #[test]
    fn test_unwritable_base_is_store_error() {
        let sink = FileStorageSink::new("/proc/does-not-exist");
        let result = sink.store("a.jpg", b"x");
        assert!(matches!(result, Err(PipelineError::Store { .. })));
    }
}
