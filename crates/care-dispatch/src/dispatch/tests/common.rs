use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::dispatch::domain::{Provider, ProviderId};
use crate::dispatch::repository::ProviderRepository;
use crate::dispatch::{dispatch_router, DispatchDesk, DispatchSettings};
use crate::notify::{NotificationKind, NotificationMessage, Notifier, NotifyError};
use crate::requests::domain::{Request, RequestId};
use crate::requests::repository::{RepositoryError, RequestRepository};
use crate::sample::{sample_providers, sample_requests};

pub(super) type TestDesk = DispatchDesk<MemoryRequests, MemoryProviders, MemoryNotifier>;

pub(super) fn build_desk() -> (
    TestDesk,
    Arc<MemoryRequests>,
    Arc<MemoryProviders>,
    Arc<MemoryNotifier>,
) {
    let requests = Arc::new(MemoryRequests::seeded());
    let providers = Arc::new(MemoryProviders::seeded());
    let notifier = Arc::new(MemoryNotifier::default());
    let desk = DispatchDesk::new(
        requests.clone(),
        providers.clone(),
        notifier.clone(),
        DispatchSettings::default(),
    );
    (desk, requests, providers, notifier)
}

pub(super) fn dispatch_router_with_desk(desk: TestDesk) -> axum::Router {
    dispatch_router(Arc::new(desk))
}

#[derive(Default, Clone)]
pub(super) struct MemoryRequests {
    records: Arc<Mutex<Vec<Request>>>,
}

impl MemoryRequests {
    pub(super) fn seeded() -> Self {
        Self {
            records: Arc::new(Mutex::new(sample_requests())),
        }
    }
}

impl RequestRepository for MemoryRequests {
    fn list(&self) -> Result<Vec<Request>, RepositoryError> {
        Ok(self.records.lock().expect("repository mutex poisoned").clone())
    }

    fn fetch(&self, id: &RequestId) -> Result<Option<Request>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.iter().find(|request| &request.id == id).cloned())
    }

    fn update(&self, request: Request) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        match guard.iter_mut().find(|stored| stored.id == request.id) {
            Some(stored) => {
                *stored = request;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryProviders {
    records: Arc<Mutex<Vec<Provider>>>,
}

impl MemoryProviders {
    pub(super) fn seeded() -> Self {
        Self {
            records: Arc::new(Mutex::new(sample_providers())),
        }
    }
}

impl ProviderRepository for MemoryProviders {
    fn list(&self) -> Result<Vec<Provider>, RepositoryError> {
        Ok(self.records.lock().expect("repository mutex poisoned").clone())
    }

    fn fetch(&self, id: &ProviderId) -> Result<Option<Provider>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.iter().find(|provider| &provider.id == id).cloned())
    }

    fn update(&self, provider: Provider) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        match guard.iter_mut().find(|stored| stored.id == provider.id) {
            Some(stored) => {
                *stored = provider;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifier {
    events: Arc<Mutex<Vec<(NotificationKind, NotificationMessage)>>>,
}

impl MemoryNotifier {
    pub(super) fn events(&self) -> Vec<(NotificationKind, NotificationMessage)> {
        self.events.lock().expect("notifier mutex poisoned").clone()
    }

    pub(super) fn last(&self) -> (NotificationKind, NotificationMessage) {
        self.events()
            .pop()
            .expect("at least one notification emitted")
    }
}

impl Notifier for MemoryNotifier {
    fn notify(
        &self,
        kind: NotificationKind,
        message: NotificationMessage,
    ) -> Result<(), NotifyError> {
        self.events
            .lock()
            .expect("notifier mutex poisoned")
            .push((kind, message));
        Ok(())
    }
}

pub(super) struct FailingNotifier;

impl Notifier for FailingNotifier {
    fn notify(
        &self,
        _kind: NotificationKind,
        _message: NotificationMessage,
    ) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("toast channel closed".to_string()))
    }
}

pub(super) struct UnavailableRequests;

impl RequestRepository for UnavailableRequests {
    fn list(&self) -> Result<Vec<Request>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &RequestId) -> Result<Option<Request>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _request: Request) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
