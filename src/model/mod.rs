pub mod client;
pub mod color;
pub mod profile;
pub mod quote;
