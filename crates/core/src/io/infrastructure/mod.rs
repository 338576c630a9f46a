pub mod file_storage_sink;
pub mod http_image_source;
pub mod image_codec;
