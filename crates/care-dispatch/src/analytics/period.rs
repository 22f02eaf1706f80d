use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::requests::domain::UnknownLabel;

/// Look-back window offered by the reporting view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportPeriod {
    #[serde(rename = "7days")]
    Last7Days,
    #[default]
    #[serde(rename = "30days")]
    Last30Days,
    #[serde(rename = "90days")]
    Last90Days,
    #[serde(rename = "1year")]
    LastYear,
}

impl ReportPeriod {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Last7Days,
            Self::Last30Days,
            Self::Last90Days,
            Self::LastYear,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Last7Days => "7days",
            Self::Last30Days => "30days",
            Self::Last90Days => "90days",
            Self::LastYear => "1year",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Last7Days => "Last 7 days",
            Self::Last30Days => "Last 30 days",
            Self::Last90Days => "Last 90 days",
            Self::LastYear => "Last year",
        }
    }

    pub const fn days(self) -> i64 {
        match self {
            Self::Last7Days => 7,
            Self::Last30Days => 30,
            Self::Last90Days => 90,
            Self::LastYear => 365,
        }
    }

    /// First day of the window ending on `today`; both ends inclusive.
    pub fn window_start(self, today: NaiveDate) -> NaiveDate {
        today
            .checked_sub_signed(Duration::days(self.days() - 1))
            .unwrap_or(NaiveDate::MIN)
    }

    /// Last day of the window of equal length immediately before this one.
    pub fn previous_window_end(self, today: NaiveDate) -> NaiveDate {
        self.window_start(today).pred_opt().unwrap_or(NaiveDate::MIN)
    }

    pub fn contains(self, today: NaiveDate, day: NaiveDate) -> bool {
        day >= self.window_start(today) && day <= today
    }
}

impl FromStr for ReportPeriod {
    type Err = UnknownLabel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ordered()
            .into_iter()
            .find(|period| period.key() == value.trim())
            .ok_or_else(|| UnknownLabel {
                field: "report period",
                value: value.to_string(),
            })
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_includes_today_and_first_day() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 20).expect("valid");
        let start = ReportPeriod::Last7Days.window_start(today);
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 1, 14).expect("valid"));
        assert!(ReportPeriod::Last7Days.contains(today, start));
        assert!(ReportPeriod::Last7Days.contains(today, today));
        assert!(!ReportPeriod::Last7Days.contains(today, start.pred_opt().expect("valid")));
        assert!(!ReportPeriod::Last7Days.contains(today, today.succ_opt().expect("valid")));
    }

    #[test]
    fn previous_window_ends_the_day_before() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 20).expect("valid");
        let previous_end = ReportPeriod::Last7Days.previous_window_end(today);
        assert_eq!(previous_end, NaiveDate::from_ymd_opt(2024, 1, 13).expect("valid"));
        assert_eq!(
            ReportPeriod::Last7Days.window_start(previous_end),
            NaiveDate::from_ymd_opt(2024, 1, 7).expect("valid")
        );
    }

    #[test]
    fn keys_parse_and_serialize() {
        assert_eq!("90days".parse::<ReportPeriod>(), Ok(ReportPeriod::Last90Days));
        assert!("90 days".parse::<ReportPeriod>().is_err());
        assert_eq!(
            serde_json::to_string(&ReportPeriod::LastYear).expect("json"),
            "\"1year\""
        );
        assert_eq!(ReportPeriod::default(), ReportPeriod::Last30Days);
    }
}
