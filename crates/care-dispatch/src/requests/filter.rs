use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::Request;

/// Sentinel accepted by every categorical selector to mean "no constraint".
pub const WILDCARD: &str = "all";

/// A categorical constraint: either the `all` wildcard or an exact,
/// case-sensitive value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Selector {
    #[default]
    All,
    Exact(String),
}

impl Selector {
    pub fn exact(value: impl Into<String>) -> Self {
        Self::from(value.into())
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::All)
    }

    pub fn as_exact(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Exact(value) => Some(value),
        }
    }

    pub fn accepts(&self, candidate: &str) -> bool {
        match self {
            Self::All => true,
            Self::Exact(value) => value == candidate,
        }
    }
}

impl From<String> for Selector {
    fn from(value: String) -> Self {
        if value == WILDCARD {
            Self::All
        } else {
            Self::Exact(value)
        }
    }
}

impl From<&str> for Selector {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<Selector> for String {
    fn from(value: Selector) -> Self {
        match value {
            Selector::All => WILDCARD.to_string(),
            Selector::Exact(value) => value,
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(WILDCARD),
            Self::Exact(value) => f.write_str(value),
        }
    }
}

/// Immutable set of request list criteria. The default value is the
/// wildcard for every field and keeps all records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub search_text: String,
    pub status: Selector,
    pub location: Selector,
    pub provider: Selector,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl FilterCriteria {
    pub fn with_search(self, search_text: impl Into<String>) -> Self {
        Self {
            search_text: search_text.into(),
            ..self
        }
    }

    pub fn with_status(self, status: impl Into<Selector>) -> Self {
        Self {
            status: status.into(),
            ..self
        }
    }

    pub fn with_location(self, location: impl Into<Selector>) -> Self {
        Self {
            location: location.into(),
            ..self
        }
    }

    pub fn with_provider(self, provider: impl Into<Selector>) -> Self {
        Self {
            provider: provider.into(),
            ..self
        }
    }

    pub fn with_date_range(
        self,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> Self {
        Self {
            date_from,
            date_to,
            ..self
        }
    }

    /// True when no clause constrains the result.
    pub fn is_unconstrained(&self) -> bool {
        self.search_text.is_empty()
            && self.status.is_wildcard()
            && self.location.is_wildcard()
            && self.provider.is_wildcard()
            && self.date_from.is_none()
            && self.date_to.is_none()
    }

    pub fn matches(&self, request: &Request) -> bool {
        self.prepare().matches(request)
    }

    /// Lazily yields the matching records in input order.
    pub fn apply<'a, 'r: 'a>(
        &'a self,
        requests: &'r [Request],
    ) -> impl Iterator<Item = &'r Request> + 'a {
        let prepared = self.prepare();
        requests
            .iter()
            .filter(move |request| prepared.matches(request))
    }

    pub(crate) fn prepare(&self) -> PreparedFilter<'_> {
        PreparedFilter {
            needle: self.search_text.to_lowercase(),
            criteria: self,
        }
    }
}

/// Criteria with the search needle lowercased once per query.
#[derive(Debug)]
pub(crate) struct PreparedFilter<'a> {
    needle: String,
    criteria: &'a FilterCriteria,
}

impl PreparedFilter<'_> {
    pub(crate) fn matches(&self, request: &Request) -> bool {
        self.matches_search(request)
            && self.matches_selectors(request)
            && self.matches_dates(request)
    }

    pub(crate) fn matches_search(&self, request: &Request) -> bool {
        if self.needle.is_empty() {
            return true;
        }

        request.id.as_str().to_lowercase().contains(&self.needle)
            || request.facility.to_lowercase().contains(&self.needle)
    }

    pub(crate) fn matches_selectors(&self, request: &Request) -> bool {
        self.criteria.status.accepts(request.status.label())
            && self.criteria.location.accepts(&request.location)
            && self.criteria.provider.accepts(&request.provider)
    }

    pub(crate) fn matches_dates(&self, request: &Request) -> bool {
        let created_on = request.created_on();
        let after_start = self
            .criteria
            .date_from
            .map_or(true, |from| created_on >= from);
        let before_end = self.criteria.date_to.map_or(true, |to| created_on <= to);
        after_start && before_end
    }
}

/// Returns the records satisfying every active clause of `criteria`,
/// preserving their relative order.
pub fn filter_requests(requests: &[Request], criteria: &FilterCriteria) -> Vec<Request> {
    criteria.apply(requests).cloned().collect()
}
