//! Support request records and the request list filter.

pub mod domain;
pub mod export;
pub mod filter;
pub mod import;
pub mod index;
pub mod repository;

pub use domain::{
    Request, RequestId, RequestPriority, RequestStatus, UnknownLabel, UNASSIGNED_PROVIDER,
};
pub use export::{to_csv_string, write_csv};
pub use filter::{filter_requests, FilterCriteria, Selector, WILDCARD};
pub use import::{CsvRequestSource, ImportError};
pub use index::RequestIndex;
pub use repository::{RepositoryError, RequestRepository};
