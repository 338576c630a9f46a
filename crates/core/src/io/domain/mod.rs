pub mod image_source;
pub mod storage_sink;
