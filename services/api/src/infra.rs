use care_dispatch::dispatch::{Provider, ProviderId, ProviderRepository};
use care_dispatch::error::AppError;
use care_dispatch::requests::{
    CsvRequestSource, RepositoryError, Request, RequestId, RequestRepository,
};
use care_dispatch::sample::{sample_providers, sample_requests};
use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Shared record stores handed to the request, overview and report routes.
#[derive(Clone)]
pub(crate) struct Records {
    pub(crate) requests: Arc<InMemoryRequestRepository>,
    pub(crate) providers: Arc<InMemoryProviderRepository>,
}

impl Records {
    pub(crate) fn new(requests: Vec<Request>, providers: Vec<Provider>) -> Self {
        Self {
            requests: Arc::new(InMemoryRequestRepository::new(requests)),
            providers: Arc::new(InMemoryProviderRepository::new(providers)),
        }
    }
}

fn lock<'a, T>(mutex: &'a Mutex<T>, name: &str) -> Result<MutexGuard<'a, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable(format!("{name} mutex poisoned")))
}

/// Request store that keeps source order so list views stay stable.
#[derive(Default)]
pub(crate) struct InMemoryRequestRepository {
    records: Mutex<Vec<Request>>,
}

impl InMemoryRequestRepository {
    pub(crate) fn new(records: Vec<Request>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }
}

impl RequestRepository for InMemoryRequestRepository {
    fn list(&self) -> Result<Vec<Request>, RepositoryError> {
        Ok(lock(&self.records, "request")?.clone())
    }

    fn fetch(&self, id: &RequestId) -> Result<Option<Request>, RepositoryError> {
        let guard = lock(&self.records, "request")?;
        Ok(guard.iter().find(|request| &request.id == id).cloned())
    }

    fn update(&self, request: Request) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.records, "request")?;
        match guard.iter_mut().find(|stored| stored.id == request.id) {
            Some(stored) => {
                *stored = request;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }
}

#[derive(Default)]
pub(crate) struct InMemoryProviderRepository {
    providers: Mutex<Vec<Provider>>,
}

impl InMemoryProviderRepository {
    pub(crate) fn new(providers: Vec<Provider>) -> Self {
        Self {
            providers: Mutex::new(providers),
        }
    }
}

impl ProviderRepository for InMemoryProviderRepository {
    fn list(&self) -> Result<Vec<Provider>, RepositoryError> {
        Ok(lock(&self.providers, "provider")?.clone())
    }

    fn fetch(&self, id: &ProviderId) -> Result<Option<Provider>, RepositoryError> {
        let guard = lock(&self.providers, "provider")?;
        Ok(guard.iter().find(|provider| &provider.id == id).cloned())
    }

    fn update(&self, provider: Provider) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.providers, "provider")?;
        match guard.iter_mut().find(|stored| stored.id == provider.id) {
            Some(stored) => {
                *stored = provider;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }
}

/// Loads requests from a CSV export, or the built-in sample set when no path
/// is configured.
pub(crate) fn load_requests(path: Option<&Path>) -> Result<Vec<Request>, AppError> {
    match path {
        Some(path) => {
            let requests = CsvRequestSource::from_path(path)?;
            info!(path = %path.display(), count = requests.len(), "loaded request export");
            Ok(requests)
        }
        None => Ok(sample_requests()),
    }
}

pub(crate) fn load_records(path: Option<&Path>) -> Result<Records, AppError> {
    Ok(Records::new(load_requests(path)?, sample_providers()))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

/// Query-string variant: blank values count as absent.
pub(crate) fn parse_optional_date(
    field: &str,
    raw: Option<&str>,
) -> Result<Option<NaiveDate>, AppError> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => parse_date(value)
            .map(Some)
            .map_err(|detail| AppError::InvalidQuery(format!("{field}: {detail}"))),
        None => Ok(None),
    }
}
