//! Manual dispatch controls: reassignment, provider availability, and the
//! auto-matching configuration.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;
pub mod settings;

#[cfg(test)]
mod tests;

pub use domain::{Assignment, Provider, ProviderId, ProviderStatus, ReassignmentSelection};
pub use repository::ProviderRepository;
pub use router::dispatch_router;
pub use service::{DispatchDesk, DispatchError};
pub use settings::{DispatchSettings, PriorityWeighting, SettingsError};
