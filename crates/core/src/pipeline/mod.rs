pub mod batch_process_use_case;
pub mod composite_crop_use_case;
pub mod detect_crop_use_case;

#[cfg(test)]
pub(crate) mod test_fixtures;
