//! CRM rows: newsletter leads and contact form messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{ContactMessageId, LeadId};
use super::status::ContactStatus;

/// A row of the `leads` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub id: LeadId,
    pub email: String,
    /// Where the lead came from (`newsletter`, `popup`, ...).
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Lead {
    /// Source tag of newsletter sign-ups.
    pub const NEWSLETTER: &'static str = "newsletter";
}

/// A row of the `contact_messages` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: ContactMessageId,
    #[serde(default)]
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<ContactStatus>,
    pub created_at: DateTime<Utc>,
}

impl ContactMessage {
    /// Triage status; rows without one are new.
    #[must_use]
    pub fn status(&self) -> ContactStatus {
        self.status.unwrap_or_default()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_status_is_new() {
        let msg: ContactMessage = serde_json::from_value(serde_json::json!({
            "id": "m1",
            "name": "Ploy",
            "email": "ploy@example.com",
            "message": "Do you ship to Chiang Mai?",
            "status": null,
            "created_at": "2025-04-02T08:00:00Z"
        }))
        .unwrap();
        assert_eq!(msg.status(), ContactStatus::New);
    }

    #[test]
    fn test_lead_row() {
        let lead: Lead = serde_json::from_value(serde_json::json!({
            "id": "l1",
            "email": "fan@example.com",
            "source": "newsletter",
            "created_at": "2025-04-02T08:00:00+07:00"
        }))
        .unwrap();
        assert_eq!(lead.source.as_deref(), Some(Lead::NEWSLETTER));
        assert!(lead.status.is_none());
    }
}
