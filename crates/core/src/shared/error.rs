use thiserror::Error;

/// Failures at the pipeline's I/O boundary and the one compositing
/// precondition. Per-pixel stages (classification, morphology,
/// labeling, selection) cannot fail; "no subject detected" is the
/// [`CropResult::sentinel`](crate::shared::crop_result::CropResult::sentinel)
/// value, not an error.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("failed to fetch {id}: {source}")]
    Fetch {
        id: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("fetch of {id} returned HTTP {status}")]
    FetchStatus { id: String, status: u16 },
    #[error("failed to read {path}: {source}")]
    Read {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),
    #[error("failed to encode output image: {0}")]
    Encode(#[source] image::ImageError),
    #[error("composite requested with a degenerate crop box")]
    DegenerateCrop,
    #[error("crop box ({x1},{y1})-({x2},{y2}) exceeds image bounds {width}x{height}")]
    CropOutOfBounds {
        x1: u32,
        y1: u32,
        x2: u32,
        y2: u32,
        width: u32,
        height: u32,
    },
    #[error("failed to store output for {id}: {source}")]
    Store {
        id: String,
        #[source]
        source: std::io::Error,
    },
}
