pub mod io;
pub mod pipeline;
pub mod segmentation;
pub mod shared;
