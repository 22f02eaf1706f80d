use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::requests::domain::{RequestId, RequestPriority, UnknownLabel};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderId(pub String);

impl ProviderId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Clinician who can be assigned to support requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    pub id: ProviderId,
    pub name: String,
    pub specialty: String,
    pub status: ProviderStatus,
    pub location: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderStatus {
    Available,
    Busy,
    Offline,
}

impl ProviderStatus {
    pub const fn ordered() -> [Self; 3] {
        [Self::Available, Self::Busy, Self::Offline]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Busy => "busy",
            Self::Offline => "offline",
        }
    }
}

impl FromStr for ProviderStatus {
    type Err = UnknownLabel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ordered()
            .into_iter()
            .find(|status| status.label() == value.trim())
            .ok_or_else(|| UnknownLabel {
                field: "provider status",
                value: value.to_string(),
            })
    }
}

/// Operator selection from the manual assignment panel. Blank fields mean
/// nothing was picked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReassignmentSelection {
    pub request_id: String,
    pub provider_id: String,
}

impl ReassignmentSelection {
    pub fn new(request_id: impl Into<String>, provider_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            provider_id: provider_id.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.request_id.trim().is_empty() && !self.provider_id.trim().is_empty()
    }
}

/// Result of a manual reassignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment {
    pub request_id: RequestId,
    pub provider_id: ProviderId,
    pub provider_name: String,
    pub previous_provider: String,
    pub priority: RequestPriority,
}
