pub mod constants;
pub mod crop_result;
pub mod error;
pub mod pixel_buffer;
