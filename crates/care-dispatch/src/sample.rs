//! Built-in working set used when no request export is supplied.

use chrono::NaiveDateTime;

use crate::dispatch::domain::{Provider, ProviderId, ProviderStatus};
use crate::requests::domain::{
    Request, RequestId, RequestPriority, RequestStatus, TIMESTAMP_FORMAT, UNASSIGNED_PROVIDER,
};

struct SeedRequest {
    id: &'static str,
    facility: &'static str,
    location: &'static str,
    provider: &'static str,
    request_type: &'static str,
    status: RequestStatus,
    priority: RequestPriority,
    created: &'static str,
    estimated: &'static str,
}

const SEED_REQUESTS: [SeedRequest; 5] = [
    SeedRequest {
        id: "REQ-001",
        facility: "General Hospital",
        location: "Downtown",
        provider: "Dr. Sarah Johnson",
        request_type: "Emergency",
        status: RequestStatus::Pending,
        priority: RequestPriority::High,
        created: "2024-01-15 09:30",
        estimated: "2024-01-15 11:00",
    },
    SeedRequest {
        id: "REQ-002",
        facility: "Care Center North",
        location: "Northside",
        provider: "Dr. Michael Chen",
        request_type: "Routine",
        status: RequestStatus::Assigned,
        priority: RequestPriority::Medium,
        created: "2024-01-15 08:45",
        estimated: "2024-01-15 14:00",
    },
    SeedRequest {
        id: "REQ-003",
        facility: "Wellness Clinic",
        location: "Westside",
        provider: "Dr. Emily Davis",
        request_type: "Consultation",
        status: RequestStatus::InProgress,
        priority: RequestPriority::Low,
        created: "2024-01-15 07:20",
        estimated: "2024-01-15 10:30",
    },
    SeedRequest {
        id: "REQ-004",
        facility: "Metro Health Center",
        location: "Central",
        provider: UNASSIGNED_PROVIDER,
        request_type: "Emergency",
        status: RequestStatus::Pending,
        priority: RequestPriority::High,
        created: "2024-01-15 09:45",
        estimated: "2024-01-15 11:30",
    },
    SeedRequest {
        id: "REQ-007",
        facility: "City Clinic",
        location: "Central",
        provider: UNASSIGNED_PROVIDER,
        request_type: "Routine",
        status: RequestStatus::Pending,
        priority: RequestPriority::Medium,
        created: "2024-01-15 10:05",
        estimated: "2024-01-15 13:00",
    },
];

struct SeedProvider {
    id: &'static str,
    name: &'static str,
    specialty: &'static str,
    status: ProviderStatus,
    location: &'static str,
}

const SEED_PROVIDERS: [SeedProvider; 4] = [
    SeedProvider {
        id: "PRV-001",
        name: "Dr. Sarah Johnson",
        specialty: "Emergency Medicine",
        status: ProviderStatus::Available,
        location: "Downtown",
    },
    SeedProvider {
        id: "PRV-002",
        name: "Dr. Michael Chen",
        specialty: "Internal Medicine",
        status: ProviderStatus::Available,
        location: "Northside",
    },
    SeedProvider {
        id: "PRV-003",
        name: "Dr. Emily Davis",
        specialty: "Family Medicine",
        status: ProviderStatus::Busy,
        location: "Westside",
    },
    SeedProvider {
        id: "PRV-004",
        name: "Dr. Robert Wilson",
        specialty: "Emergency Medicine",
        status: ProviderStatus::Available,
        location: "Central",
    },
];

pub fn sample_requests() -> Vec<Request> {
    SEED_REQUESTS
        .iter()
        .map(|seed| Request {
            id: RequestId(seed.id.to_string()),
            facility: seed.facility.to_string(),
            location: seed.location.to_string(),
            provider: seed.provider.to_string(),
            request_type: seed.request_type.to_string(),
            status: seed.status,
            priority: seed.priority,
            created: seed_timestamp(seed.created),
            estimated: seed_timestamp(seed.estimated),
        })
        .collect()
}

pub fn sample_providers() -> Vec<Provider> {
    SEED_PROVIDERS
        .iter()
        .map(|seed| Provider {
            id: ProviderId(seed.id.to_string()),
            name: seed.name.to_string(),
            specialty: seed.specialty.to_string(),
            status: seed.status,
            location: seed.location.to_string(),
        })
        .collect()
}

fn seed_timestamp(raw: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).unwrap_or_default()
}
