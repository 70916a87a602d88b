//! Contact-form inquiries and their replies.

use chrono::{DateTime, Utc};
use goshen_core::{InquiryId, InquiryStatus};
use serde::{Deserialize, Serialize};

use super::order::deserialize_timestamp;

/// An inquiry the shopper sent through the contact form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inquiry {
    #[serde(rename = "_id")]
    pub id: InquiryId,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub reply: Option<String>,
    #[serde(default)]
    pub status: InquiryStatus,
    #[serde(default, rename = "isRead")]
    pub is_read: bool,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub date: Option<DateTime<Utc>>,
}

impl Inquiry {
    /// A reply the shopper has not seen yet.
    #[must_use]
    pub fn is_unread_reply(&self) -> bool {
        !self.is_read && self.status == InquiryStatus::Replied
    }
}
