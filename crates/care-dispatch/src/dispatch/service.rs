use std::sync::{Arc, Mutex, PoisonError};

use tracing::{info, warn};

use super::domain::{Assignment, Provider, ProviderId, ProviderStatus, ReassignmentSelection};
use super::repository::ProviderRepository;
use super::settings::{DispatchSettings, SettingsError};
use crate::notify::{NotificationKind, NotificationMessage, Notifier};
use crate::requests::domain::{Request, RequestId, RequestStatus};
use crate::requests::repository::{RepositoryError, RequestRepository};

/// Manual control panel: reassignment, provider availability, and system
/// settings. Every action reports its outcome through the notifier.
pub struct DispatchDesk<R, P, N> {
    requests: Arc<R>,
    providers: Arc<P>,
    notifier: Arc<N>,
    settings: Mutex<DispatchSettings>,
}

impl<R, P, N> DispatchDesk<R, P, N>
where
    R: RequestRepository + 'static,
    P: ProviderRepository + 'static,
    N: Notifier + 'static,
{
    pub fn new(
        requests: Arc<R>,
        providers: Arc<P>,
        notifier: Arc<N>,
        settings: DispatchSettings,
    ) -> Self {
        Self {
            requests,
            providers,
            notifier,
            settings: Mutex::new(settings),
        }
    }

    /// Requests still waiting for a provider, in source order.
    pub fn pending_requests(&self) -> Result<Vec<Request>, DispatchError> {
        let requests = self.requests.list()?;
        Ok(requests
            .into_iter()
            .filter(|request| request.status == RequestStatus::Pending)
            .collect())
    }

    pub fn providers(&self) -> Result<Vec<Provider>, DispatchError> {
        Ok(self.providers.list()?)
    }

    pub fn available_providers(&self) -> Result<Vec<Provider>, DispatchError> {
        Ok(self
            .providers
            .list()?
            .into_iter()
            .filter(|provider| provider.status == ProviderStatus::Available)
            .collect())
    }

    /// Assign the selected request to the selected provider.
    pub fn reassign(&self, selection: ReassignmentSelection) -> Result<Assignment, DispatchError> {
        match self.try_reassign(selection) {
            Ok(assignment) => {
                info!(
                    request = %assignment.request_id,
                    provider = %assignment.provider_id,
                    previous = %assignment.previous_provider,
                    "request reassigned"
                );
                self.announce(NotificationMessage::new(
                    "Request Reassigned",
                    format!(
                        "Successfully reassigned {} to {}",
                        assignment.request_id, assignment.provider_id
                    ),
                ));
                Ok(assignment)
            }
            Err(err) => Err(self.report_failure(err)),
        }
    }

    fn try_reassign(&self, selection: ReassignmentSelection) -> Result<Assignment, DispatchError> {
        if !selection.is_complete() {
            return Err(DispatchError::SelectionRequired);
        }

        let request_id = RequestId(selection.request_id.trim().to_string());
        let provider_id = ProviderId(selection.provider_id.trim().to_string());

        let mut request = self
            .requests
            .fetch(&request_id)?
            .ok_or_else(|| DispatchError::UnknownRequest(request_id.clone()))?;
        let provider = self
            .providers
            .fetch(&provider_id)?
            .ok_or_else(|| DispatchError::UnknownProvider(provider_id.clone()))?;

        if !request.status.is_open() {
            return Err(DispatchError::RequestClosed(request_id));
        }
        if provider.status != ProviderStatus::Available {
            return Err(DispatchError::ProviderUnavailable {
                provider: provider_id,
                status: provider.status,
            });
        }

        let previous_provider = std::mem::replace(&mut request.provider, provider.name.clone());
        if request.status == RequestStatus::Pending {
            request.status = RequestStatus::Assigned;
        }
        let priority = request.priority;
        self.requests.update(request)?;

        Ok(Assignment {
            request_id,
            provider_id,
            provider_name: provider.name,
            previous_provider,
            priority,
        })
    }

    /// Toggle a provider between available and offline.
    pub fn set_provider_availability(
        &self,
        provider_id: &ProviderId,
        available: bool,
    ) -> Result<Provider, DispatchError> {
        let mut provider = match self.providers.fetch(provider_id) {
            Ok(Some(provider)) => provider,
            Ok(None) => {
                let err = DispatchError::UnknownProvider(provider_id.clone());
                return Err(self.report_failure(err));
            }
            Err(err) => return Err(self.report_failure(err.into())),
        };

        provider.status = if available {
            ProviderStatus::Available
        } else {
            ProviderStatus::Offline
        };
        if let Err(err) = self.providers.update(provider.clone()) {
            return Err(self.report_failure(err.into()));
        }

        info!(
            provider = %provider.id,
            status = provider.status.label(),
            "provider availability changed"
        );
        self.announce(NotificationMessage::new(
            "Availability Updated",
            format!("Provider availability has been {}", enabled_label(available)),
        ));
        Ok(provider)
    }

    pub fn set_auto_matching(&self, enabled: bool) -> Result<DispatchSettings, DispatchError> {
        let updated = {
            let mut settings = self.lock_settings();
            settings.auto_matching_enabled = enabled;
            *settings
        };

        info!(enabled, "auto-matching toggled");
        self.announce(NotificationMessage::new(
            "Auto-matching Updated",
            format!("Auto-matching has been {}", enabled_label(enabled)),
        ));
        Ok(updated)
    }

    /// Validate and store a full settings snapshot.
    pub fn save_settings(
        &self,
        settings: DispatchSettings,
    ) -> Result<DispatchSettings, DispatchError> {
        if let Err(err) = settings.validate() {
            return Err(self.report_failure(err.into()));
        }

        *self.lock_settings() = settings;

        info!(
            auto_matching = settings.auto_matching_enabled,
            max_response_hours = settings.max_response_hours,
            max_distance_miles = settings.max_distance_miles,
            weighting = settings.priority_weighting.label(),
            "dispatch settings saved"
        );
        self.announce(NotificationMessage::new(
            "Configuration Saved",
            "System configuration has been updated",
        ));
        Ok(settings)
    }

    pub fn settings(&self) -> DispatchSettings {
        *self.lock_settings()
    }

    fn lock_settings(&self) -> std::sync::MutexGuard<'_, DispatchSettings> {
        self.settings.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Confirm a completed action. Delivery failures are logged; the action
    /// has already taken effect.
    fn announce(&self, message: NotificationMessage) {
        if let Err(err) = self.notifier.notify(NotificationKind::Default, message) {
            warn!(error = %err, "failed to deliver dispatch confirmation");
        }
    }

    /// Emit a destructive notification for `err` and hand it back.
    fn report_failure(&self, err: DispatchError) -> DispatchError {
        let message = NotificationMessage::new(err.title(), err.description());
        if let Err(notify_err) = self.notifier.notify(NotificationKind::Destructive, message) {
            warn!(error = %notify_err, "failed to deliver dispatch failure notification");
        }
        err
    }
}

fn enabled_label(enabled: bool) -> &'static str {
    if enabled {
        "enabled"
    } else {
        "disabled"
    }
}

/// Error raised by the dispatch desk.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("a request and a provider must both be selected")]
    SelectionRequired,
    #[error("request '{0}' does not exist")]
    UnknownRequest(RequestId),
    #[error("provider '{0}' does not exist")]
    UnknownProvider(ProviderId),
    #[error("request '{0}' is already completed")]
    RequestClosed(RequestId),
    #[error("provider '{provider}' is {} and cannot take requests", .status.label())]
    ProviderUnavailable {
        provider: ProviderId,
        status: ProviderStatus,
    },
    #[error(transparent)]
    InvalidSettings(#[from] SettingsError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl DispatchError {
    fn title(&self) -> &'static str {
        match self {
            Self::SelectionRequired => "Selection Required",
            Self::UnknownRequest(_) | Self::UnknownProvider(_) => "Not Found",
            Self::RequestClosed(_) | Self::ProviderUnavailable { .. } => "Assignment Rejected",
            Self::InvalidSettings(_) => "Invalid Configuration",
            Self::Repository(_) => "Dispatch Unavailable",
        }
    }

    fn description(&self) -> String {
        match self {
            Self::SelectionRequired => {
                "Please select both a request and provider to proceed.".to_string()
            }
            other => other.to_string(),
        }
    }
}
