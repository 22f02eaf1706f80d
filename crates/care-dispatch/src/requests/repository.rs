use super::domain::{Request, RequestId};

/// Record source for the working set of requests.
pub trait RequestRepository: Send + Sync {
    /// All requests in source order.
    fn list(&self) -> Result<Vec<Request>, RepositoryError>;
    fn fetch(&self, id: &RequestId) -> Result<Option<Request>, RepositoryError>;
    fn update(&self, request: Request) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
