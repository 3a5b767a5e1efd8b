pub mod profile_repo;
pub mod quote_repo;
pub mod repository_error;

pub use profile_repo::{MongoProfileRepository, ProfileRepository};
pub use quote_repo::{MongoQuoteRepository, QuoteRepository};
pub use repository_error::{RepositoryError, RepositoryResult};
