use chrono::NaiveDate;
use serde::Deserialize;

use crate::core::{AppError, Result};

/// `?id=` query parameter used by delete and lookup endpoints
#[derive(Debug, Default, Deserialize)]
pub struct IdQuery {
    #[serde(default)]
    pub id: Option<String>,
}

impl IdQuery {
    /// The id, or a validation error naming the resource
    pub fn require(&self, resource: &str) -> Result<&str> {
        match self.id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => Ok(id),
            _ => Err(AppError::validation(format!("{} ID is required", resource))),
        }
    }
}

/// `?start=YYYY-MM-DD&end=YYYY-MM-DD`, both inclusive and optional
#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct DateRangeQuery {
    #[serde(default)]
    pub start: Option<NaiveDate>,
    #[serde(default)]
    pub end: Option<NaiveDate>,
}

impl DateRangeQuery {
    pub fn validate(&self) -> Result<()> {
        if let (Some(start), Some(end)) = (self.start, self.end) {
            if start > end {
                return Err(AppError::validation(format!(
                    "start ({}) must be before or equal to end ({})",
                    start, end
                )));
            }
        }
        Ok(())
    }

    /// Whether `date` falls inside the range
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |start| date >= start) && self.end.map_or(true, |end| date <= end)
    }
}

/// Comma separated `include=` list, e.g. `include=lpo,invoice`
pub fn parse_includes(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Trim an optional text field, treating blank input as absent
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
