//! Request list filtering exercised through the public crate surface.
//!
//! Scenarios mirror how the request management view narrows the working set:
//! free-text search, categorical selectors, and the creation date range.

use care_dispatch::requests::{
    filter_requests, CsvRequestSource, FilterCriteria, Request, RequestIndex, RequestStatus,
    Selector, WILDCARD,
};
use care_dispatch::sample::sample_requests;
use chrono::NaiveDate;

const TWO_RECORDS: &str = "\
id,facility,location,provider,type,status,priority,created,estimated
REQ-001,General Hospital,Downtown,Dr. Sarah Johnson,Emergency,pending,high,2024-01-15 09:30,2024-01-15 11:00
REQ-002,Care Center North,Northside,Dr. Michael Chen,Routine,assigned,medium,2024-01-15 08:45,2024-01-15 14:00
";

fn two_records() -> Vec<Request> {
    CsvRequestSource::from_reader(TWO_RECORDS.as_bytes()).expect("fixture parses")
}

fn ids(requests: &[Request]) -> Vec<&str> {
    requests.iter().map(|request| request.id.as_str()).collect()
}

fn is_subsequence(output: &[Request], input: &[Request]) -> bool {
    let mut remaining = input.iter();
    output
        .iter()
        .all(|wanted| remaining.any(|candidate| candidate == wanted))
}

/// A spread of criteria covering each clause alone and in combination.
fn criteria_grid() -> Vec<FilterCriteria> {
    let day = |d| NaiveDate::from_ymd_opt(2024, 1, d);
    vec![
        FilterCriteria::default(),
        FilterCriteria::default().with_search("req"),
        FilterCriteria::default().with_search("CLINIC"),
        FilterCriteria::default().with_status("pending"),
        FilterCriteria::default().with_location("Central"),
        FilterCriteria::default().with_provider("Unassigned"),
        FilterCriteria::default()
            .with_search("center")
            .with_status("assigned"),
        FilterCriteria::default().with_date_range(day(15), day(15)),
        FilterCriteria::default().with_date_range(day(16), None),
        FilterCriteria::default().with_status("archived"),
    ]
}

#[test]
fn search_matches_facility_case_insensitively() {
    let criteria = FilterCriteria::default().with_search("gen");
    assert_eq!(ids(&filter_requests(&two_records(), &criteria)), ["REQ-001"]);
}

#[test]
fn status_selector_keeps_exact_matches() {
    let pending = FilterCriteria::default().with_status("pending");
    assert_eq!(ids(&filter_requests(&two_records(), &pending)), ["REQ-001"]);

    let completed = FilterCriteria::default().with_status("completed");
    assert!(filter_requests(&two_records(), &completed).is_empty());
}

#[test]
fn wildcard_criteria_return_input_unchanged() {
    let requests = sample_requests();
    let criteria = FilterCriteria::default()
        .with_status(WILDCARD)
        .with_location(WILDCARD)
        .with_provider(WILDCARD);
    assert!(criteria.is_unconstrained());
    assert_eq!(filter_requests(&requests, &criteria), requests);
    assert!(filter_requests(&[], &criteria).is_empty());
}

#[test]
fn searching_by_id_finds_the_record() {
    let requests = sample_requests();
    for request in &requests {
        let criteria = FilterCriteria::default().with_search(request.id.as_str());
        let found = filter_requests(&requests, &criteria);
        assert!(found.contains(request), "{} not found", request.id);

        let needle = request.id.as_str().to_lowercase();
        assert!(found.iter().all(|candidate| {
            candidate.id.as_str().to_lowercase().contains(&needle)
                || candidate.facility.to_lowercase().contains(&needle)
        }));
    }
}

#[test]
fn status_selectors_partition_the_working_set() {
    let requests = sample_requests();
    let mut covered = 0;

    for (position, status) in RequestStatus::ordered().into_iter().enumerate() {
        let matched = filter_requests(
            &requests,
            &FilterCriteria::default().with_status(status.label()),
        );
        assert!(matched.iter().all(|request| request.status == status));
        covered += matched.len();

        for other in RequestStatus::ordered().into_iter().skip(position + 1) {
            let others = filter_requests(
                &requests,
                &FilterCriteria::default().with_status(other.label()),
            );
            assert!(matched.iter().all(|request| !others.contains(request)));
        }
    }

    assert_eq!(covered, requests.len());
}

#[test]
fn filtering_is_idempotent_and_order_preserving() {
    let requests = sample_requests();
    for criteria in criteria_grid() {
        let once = filter_requests(&requests, &criteria);
        let twice = filter_requests(&once, &criteria);
        assert_eq!(once, twice, "criteria {criteria:?}");
        assert!(is_subsequence(&once, &requests), "criteria {criteria:?}");
    }
}

#[test]
fn filtering_leaves_input_untouched() {
    let requests = sample_requests();
    let snapshot = requests.clone();
    for criteria in criteria_grid() {
        let _ = filter_requests(&requests, &criteria);
    }
    assert_eq!(requests, snapshot);
}

#[test]
fn date_range_bounds_creation_day_inclusively() {
    let requests = sample_requests();
    let day = |d| NaiveDate::from_ymd_opt(2024, 1, d);

    let same_day = FilterCriteria::default().with_date_range(day(15), day(15));
    assert_eq!(filter_requests(&requests, &same_day).len(), requests.len());

    let later = FilterCriteria::default().with_date_range(day(16), None);
    assert!(filter_requests(&requests, &later).is_empty());

    let inverted = FilterCriteria::default().with_date_range(day(15), day(14));
    assert!(filter_requests(&requests, &inverted).is_empty());
}

#[test]
fn unknown_selector_values_yield_empty_results() {
    let requests = sample_requests();
    let criteria = FilterCriteria::default().with_location(Selector::exact("downtown"));
    assert!(filter_requests(&requests, &criteria).is_empty());
}

#[test]
fn index_agrees_with_linear_filter() {
    let requests = sample_requests();
    let index = RequestIndex::new(requests.clone());
    for criteria in criteria_grid() {
        let indexed: Vec<Request> = index.query(&criteria).into_iter().cloned().collect();
        assert_eq!(
            indexed,
            filter_requests(&requests, &criteria),
            "criteria {criteria:?}"
        );
    }
}
