use serde::{Deserialize, Serialize};

use crate::error::{AppError, CONFIG_INVALID, CONFIG_PARSE_FAILED};

pub const DEFAULT_BUSINESS_HOURS_START: u8 = 9;
pub const DEFAULT_BUSINESS_HOURS_END: u8 = 18;

/// Label used when an alert has no resolvable team responder.
pub const UNKNOWN_TEAM_NAME: &str = "Unknown";

/// Daily hour range `[start, end)` counted as business hours; everything else is on-call.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BusinessHours {
    pub start: u8,
    pub end: u8,
}

impl Default for BusinessHours {
    fn default() -> Self {
        Self {
            start: DEFAULT_BUSINESS_HOURS_START,
            end: DEFAULT_BUSINESS_HOURS_END,
        }
    }
}

impl BusinessHours {
    pub fn new(start: u8, end: u8) -> Result<Self, AppError> {
        let hours = Self { start, end };
        hours.validate()?;
        Ok(hours)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.start > 23 || self.end > 23 {
            return Err(
                AppError::new(CONFIG_INVALID, "Business hours must be within 0..24")
                    .with_details(format!("start={}; end={}", self.start, self.end)),
            );
        }
        if self.start > self.end {
            return Err(AppError::new(
                CONFIG_INVALID,
                "Business hours start must not be after end",
            )
            .with_details(format!("start={}; end={}", self.start, self.end)));
        }
        Ok(())
    }

    pub fn contains(&self, hour: u8) -> bool {
        hour >= self.start && hour < self.end
    }
}

/// Process-wide analytics settings, read once per report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyticsConfig {
    pub business_hours: BusinessHours,
    pub unknown_team_label: String,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            business_hours: BusinessHours::default(),
            unknown_team_label: UNKNOWN_TEAM_NAME.to_string(),
        }
    }
}

impl AnalyticsConfig {
    /// Parse `{"businessHours": {"start": 8, "end": 17}}`; omitted keys keep their defaults.
    pub fn from_json_str(text: &str) -> Result<Self, AppError> {
        let config: AnalyticsConfig = serde_json::from_str(text).map_err(|e| {
            AppError::new(CONFIG_PARSE_FAILED, "Failed to parse analytics config")
                .with_details(e.to_string())
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        self.business_hours.validate()?;
        if self.unknown_team_label.trim().is_empty() {
            return Err(AppError::new(
                CONFIG_INVALID,
                "Unknown team label must not be empty",
            ));
        }
        Ok(())
    }
}
