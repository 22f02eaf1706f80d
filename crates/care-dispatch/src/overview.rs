//! Headline numbers for the dashboard landing panel.

use serde::Serialize;

use crate::dispatch::domain::{Provider, ProviderStatus};
use crate::requests::domain::{Request, RequestStatus};

pub const DEFAULT_RECENT_LIMIT: usize = 3;

#[derive(Debug, Clone, Serialize)]
pub struct OverviewSnapshot {
    pub total_requests: usize,
    pub pending_requests: usize,
    pub active_providers: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_response_hours: Option<f32>,
    pub recent_requests: Vec<Request>,
}

impl OverviewSnapshot {
    pub fn build(requests: &[Request], providers: &[Provider], recent_limit: usize) -> Self {
        let pending_requests = requests
            .iter()
            .filter(|request| request.status == RequestStatus::Pending)
            .count();
        let active_providers = providers
            .iter()
            .filter(|provider| provider.status == ProviderStatus::Available)
            .count();

        let mut recent: Vec<&Request> = requests.iter().collect();
        // stable sort keeps input order among equal timestamps
        recent.sort_by(|a, b| b.created.cmp(&a.created));
        let recent_requests = recent
            .into_iter()
            .take(recent_limit)
            .cloned()
            .collect();

        Self {
            total_requests: requests.len(),
            pending_requests,
            active_providers,
            avg_response_hours: average_response_hours(requests.iter()),
            recent_requests,
        }
    }
}

/// Mean hours between creation and estimated response, `None` when empty.
pub fn average_response_hours<'a, I>(requests: I) -> Option<f32>
where
    I: IntoIterator<Item = &'a Request>,
{
    let (total, count) = requests
        .into_iter()
        .fold((0.0_f32, 0_usize), |(total, count), request| {
            (total + request.response_hours(), count + 1)
        });

    if count == 0 {
        None
    } else {
        Some(total / count as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::{sample_providers, sample_requests};

    #[test]
    fn snapshot_counts_sample_data() {
        let snapshot = OverviewSnapshot::build(
            &sample_requests(),
            &sample_providers(),
            DEFAULT_RECENT_LIMIT,
        );

        assert_eq!(snapshot.total_requests, 5);
        assert_eq!(snapshot.pending_requests, 3);
        assert_eq!(snapshot.active_providers, 3);

        let recent: Vec<_> = snapshot
            .recent_requests
            .iter()
            .map(|request| request.id.as_str())
            .collect();
        assert_eq!(recent, ["REQ-007", "REQ-004", "REQ-001"]);
    }

    #[test]
    fn average_response_hours_uses_estimates() {
        // 1.5h, 5.25h, 3.1667h, 1.75h, 2.9167h
        let average = average_response_hours(sample_requests().iter()).expect("non-empty");
        assert!((average - 2.9167).abs() < 0.01, "average was {average}");
        assert_eq!(average_response_hours(std::iter::empty()), None);
    }

    #[test]
    fn empty_snapshot_omits_average() {
        let snapshot = OverviewSnapshot::build(&[], &[], DEFAULT_RECENT_LIMIT);
        assert_eq!(snapshot.total_requests, 0);
        assert!(snapshot.recent_requests.is_empty());

        let value = serde_json::to_value(&snapshot).expect("serializes");
        assert!(value.get("avg_response_hours").is_none());
    }
}
