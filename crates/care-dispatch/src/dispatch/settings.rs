use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::requests::domain::UnknownLabel;

/// Strategy label the auto-matcher uses when ranking requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PriorityWeighting {
    #[default]
    Standard,
    EmergencyFirst,
    DistanceOptimized,
}

impl PriorityWeighting {
    pub const fn ordered() -> [Self; 3] {
        [Self::Standard, Self::EmergencyFirst, Self::DistanceOptimized]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::EmergencyFirst => "emergency-first",
            Self::DistanceOptimized => "distance-optimized",
        }
    }
}

impl FromStr for PriorityWeighting {
    type Err = UnknownLabel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ordered()
            .into_iter()
            .find(|weighting| weighting.label() == value.trim())
            .ok_or_else(|| UnknownLabel {
                field: "priority weighting",
                value: value.to_string(),
            })
    }
}

impl fmt::Display for PriorityWeighting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// System configuration edited from the settings panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchSettings {
    pub auto_matching_enabled: bool,
    pub max_response_hours: u32,
    pub max_distance_miles: u32,
    pub priority_weighting: PriorityWeighting,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            auto_matching_enabled: true,
            max_response_hours: 4,
            max_distance_miles: 25,
            priority_weighting: PriorityWeighting::Standard,
        }
    }
}

impl DispatchSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.max_response_hours == 0 {
            return Err(SettingsError::ZeroResponseWindow);
        }
        if self.max_distance_miles == 0 {
            return Err(SettingsError::ZeroDistance);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("maximum response time must be at least one hour")]
    ZeroResponseWindow,
    #[error("maximum distance must be at least one mile")]
    ZeroDistance,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_settings_panel() {
        let settings = DispatchSettings::default();
        assert!(settings.auto_matching_enabled);
        assert_eq!(settings.max_response_hours, 4);
        assert_eq!(settings.max_distance_miles, 25);
        assert_eq!(settings.priority_weighting, PriorityWeighting::Standard);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn zero_limits_are_rejected() {
        let settings = DispatchSettings {
            max_response_hours: 0,
            ..DispatchSettings::default()
        };
        assert_eq!(settings.validate(), Err(SettingsError::ZeroResponseWindow));

        let settings = DispatchSettings {
            max_distance_miles: 0,
            ..DispatchSettings::default()
        };
        assert_eq!(settings.validate(), Err(SettingsError::ZeroDistance));
    }

    #[test]
    fn weighting_uses_kebab_case_labels() {
        assert_eq!(
            "emergency-first".parse::<PriorityWeighting>(),
            Ok(PriorityWeighting::EmergencyFirst)
        );
        let json = serde_json::to_string(&PriorityWeighting::DistanceOptimized).expect("json");
        assert_eq!(json, "\"distance-optimized\"");
    }
}
