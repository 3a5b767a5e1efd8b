pub mod detection_handler;
pub mod profile_handler;
pub mod quote_handler;
