use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Display name stored on requests that have no provider yet.
pub const UNASSIGNED_PROVIDER: &str = "Unassigned";

/// Wire format used for request timestamps (`2024-01-15 09:30`).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Identifier wrapper for support requests.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A support request raised by a facility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub id: RequestId,
    pub facility: String,
    pub location: String,
    pub provider: String,
    #[serde(rename = "type")]
    pub request_type: String,
    pub status: RequestStatus,
    pub priority: RequestPriority,
    #[serde(with = "timestamp")]
    pub created: NaiveDateTime,
    #[serde(with = "timestamp")]
    pub estimated: NaiveDateTime,
}

impl Request {
    pub fn is_unassigned(&self) -> bool {
        self.provider == UNASSIGNED_PROVIDER
    }

    pub fn created_on(&self) -> NaiveDate {
        self.created.date()
    }

    /// Hours between creation and the estimated response, clamped at zero.
    pub fn response_hours(&self) -> f32 {
        let minutes = (self.estimated - self.created).num_minutes().max(0);
        minutes as f32 / 60.0
    }
}

/// Lifecycle label used for display classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestStatus {
    Pending,
    Assigned,
    InProgress,
    Completed,
}

impl RequestStatus {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Pending,
            Self::Assigned,
            Self::InProgress,
            Self::Completed,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Assigned => "assigned",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }

    pub const fn is_open(self) -> bool {
        !matches!(self, Self::Completed)
    }
}

impl FromStr for RequestStatus {
    type Err = UnknownLabel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ordered()
            .into_iter()
            .find(|status| status.label() == value.trim())
            .ok_or_else(|| UnknownLabel::new("status", value))
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestPriority {
    High,
    Medium,
    Low,
}

impl RequestPriority {
    pub const fn ordered() -> [Self; 3] {
        [Self::High, Self::Medium, Self::Low]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl FromStr for RequestPriority {
    type Err = UnknownLabel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ordered()
            .into_iter()
            .find(|priority| priority.label() == value.trim())
            .ok_or_else(|| UnknownLabel::new("priority", value))
    }
}

impl fmt::Display for RequestPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raised when a categorical label does not match any known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {field} label '{value}'")]
pub struct UnknownLabel {
    pub field: &'static str,
    pub value: String,
}

impl UnknownLabel {
    fn new(field: &'static str, value: &str) -> Self {
        Self {
            field,
            value: value.to_string(),
        }
    }
}

pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(raw.trim(), TIMESTAMP_FORMAT)
}

pub(crate) mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{parse_timestamp, TIMESTAMP_FORMAT};

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&value.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_timestamp(&raw).map_err(|err| {
            serde::de::Error::custom(format!("failed to parse '{raw}' as YYYY-MM-DD HH:MM ({err})"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_labels_round_trip_through_from_str() {
        for status in RequestStatus::ordered() {
            assert_eq!(status.label().parse::<RequestStatus>(), Ok(status));
        }
        assert!("Pending".parse::<RequestStatus>().is_err());
    }

    #[test]
    fn request_serializes_with_wire_names() {
        let request = Request {
            id: RequestId("REQ-003".to_string()),
            facility: "Wellness Clinic".to_string(),
            location: "Westside".to_string(),
            provider: "Dr. Emily Davis".to_string(),
            request_type: "Consultation".to_string(),
            status: RequestStatus::InProgress,
            priority: RequestPriority::Low,
            created: parse_timestamp("2024-01-15 07:20").expect("valid"),
            estimated: parse_timestamp("2024-01-15 10:30").expect("valid"),
        };

        let value = serde_json::to_value(&request).expect("serializes");
        assert_eq!(value["id"], "REQ-003");
        assert_eq!(value["type"], "Consultation");
        assert_eq!(value["status"], "in-progress");
        assert_eq!(value["priority"], "low");
        assert_eq!(value["created"], "2024-01-15 07:20");

        let decoded: Request = serde_json::from_value(value).expect("deserializes");
        assert_eq!(decoded, request);
    }

    #[test]
    fn response_hours_never_negative() {
        let mut request = crate::sample::sample_requests().remove(0);
        assert!((request.response_hours() - 1.5).abs() < f32::EPSILON);

        request.estimated = request.created - chrono::Duration::hours(2);
        assert_eq!(request.response_hours(), 0.0);
    }
}
