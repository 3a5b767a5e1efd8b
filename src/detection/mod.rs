pub mod category;
pub mod profile_detection;
