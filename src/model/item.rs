use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A date-ranged item shown on the timeline (usually a client project).
///
/// Dates are optional because upstream records may be incomplete; items with
/// a missing or inverted range are simply not laid out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledItem {
    pub id: Uuid,
    pub name: String,
    /// Owning client, display only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default, rename = "startDate")]
    pub start: Option<NaiveDate>,
    #[serde(default, rename = "endDate")]
    pub end: Option<NaiveDate>,
}

impl ScheduledItem {
    pub fn new(name: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            client: None,
            status: String::new(),
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn with_client(mut self, client: impl Into<String>) -> Self {
        self.client = Some(client.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Both dates, if present and correctly ordered.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.start, self.end) {
            (Some(start), Some(end)) if end >= start => Some((start, end)),
            _ => None,
        }
    }

    /// Apply a partial date update, leaving omitted fields untouched.
    pub fn apply_patch(&mut self, patch: &DatePatch) {
        if let Some(start) = patch.start_date {
            self.start = Some(start);
        }
        if let Some(end) = patch.end_date {
            self.end = Some(end);
        }
    }
}

/// Partial date update sent to the commit gateway.
///
/// Absent fields are omitted from the serialized form so a backend can tell
/// "not sent" apart from "cleared".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl DatePatch {
    pub fn is_empty(&self) -> bool {
        self.start_date.is_none() && self.end_date.is_none()
    }
}
