use std::collections::HashMap;

use super::domain::Request;
use super::filter::{FilterCriteria, Selector};

/// Positional buckets over a working set that is queried repeatedly.
///
/// Categorical selectors narrow the candidate positions before the search
/// and date clauses run, so results are identical to a linear
/// [`filter_requests`](super::filter::filter_requests) pass.
#[derive(Debug, Default)]
pub struct RequestIndex {
    requests: Vec<Request>,
    by_status: HashMap<&'static str, Vec<usize>>,
    by_location: HashMap<String, Vec<usize>>,
    by_provider: HashMap<String, Vec<usize>>,
}

impl RequestIndex {
    pub fn new(requests: Vec<Request>) -> Self {
        let mut by_status: HashMap<&'static str, Vec<usize>> = HashMap::new();
        let mut by_location: HashMap<String, Vec<usize>> = HashMap::new();
        let mut by_provider: HashMap<String, Vec<usize>> = HashMap::new();

        for (position, request) in requests.iter().enumerate() {
            by_status
                .entry(request.status.label())
                .or_default()
                .push(position);
            by_location
                .entry(request.location.clone())
                .or_default()
                .push(position);
            by_provider
                .entry(request.provider.clone())
                .or_default()
                .push(position);
        }

        Self {
            requests,
            by_status,
            by_location,
            by_provider,
        }
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn requests(&self) -> &[Request] {
        &self.requests
    }

    pub fn query(&self, criteria: &FilterCriteria) -> Vec<&Request> {
        let prepared = criteria.prepare();
        let buckets = [
            bucket(&criteria.status, |value| self.by_status.get(value)),
            bucket(&criteria.location, |value| self.by_location.get(value)),
            bucket(&criteria.provider, |value| self.by_provider.get(value)),
        ];

        let mut constrained = Vec::new();
        for bucket in buckets {
            match bucket {
                Bucket::Unconstrained => {}
                Bucket::Missing => return Vec::new(),
                Bucket::Positions(positions) => constrained.push(positions),
            }
        }

        let Some(candidates) = intersect(constrained) else {
            return criteria.apply(&self.requests).collect();
        };

        candidates
            .into_iter()
            .map(|position| &self.requests[position])
            .filter(|request| prepared.matches_search(request) && prepared.matches_dates(request))
            .collect()
    }
}

enum Bucket<'a> {
    Unconstrained,
    Missing,
    Positions(&'a [usize]),
}

fn bucket<'a, F>(selector: &Selector, lookup: F) -> Bucket<'a>
where
    F: FnOnce(&str) -> Option<&'a Vec<usize>>,
{
    match selector.as_exact() {
        None => Bucket::Unconstrained,
        Some(value) => match lookup(value) {
            Some(positions) => Bucket::Positions(positions.as_slice()),
            None => Bucket::Missing,
        },
    }
}

/// Intersects ascending position lists, keeping ascending order. `None`
/// when no selector constrained the query.
fn intersect(mut lists: Vec<&[usize]>) -> Option<Vec<usize>> {
    lists.sort_by_key(|list| list.len());
    let (first, rest) = lists.split_first()?;

    Some(
        first
            .iter()
            .copied()
            .filter(|position| rest.iter().all(|list| list.binary_search(position).is_ok()))
            .collect(),
    )
}
