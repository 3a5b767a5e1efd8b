pub mod profile_service;
pub mod quote_service;

pub use profile_service::{ProfileService, ProfileServiceImpl};
pub use quote_service::{QuoteService, QuoteServiceImpl};
