use super::domain::{Provider, ProviderId};
use crate::requests::repository::RepositoryError;

/// Provider directory abstraction so the dispatch desk can be exercised in
/// isolation.
pub trait ProviderRepository: Send + Sync {
    fn list(&self) -> Result<Vec<Provider>, RepositoryError>;
    fn fetch(&self, id: &ProviderId) -> Result<Option<Provider>, RepositoryError>;
    fn update(&self, provider: Provider) -> Result<(), RepositoryError>;
}
