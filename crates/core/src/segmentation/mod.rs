pub mod classifier;
pub mod labeling;
pub mod mask;
pub mod morphology;
pub mod selector;
