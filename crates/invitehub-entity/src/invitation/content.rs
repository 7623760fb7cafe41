//! Editable content of an invitation page.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The couple, texts, images, events, and gifts shown on an invitation.
///
/// Stored as a single JSONB document. The six family names are required,
/// checked by [`missing_required_fields`](Self::missing_required_fields)
/// rather than by deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvitationContent {
    /// Groom's name.
    #[serde(default)]
    pub groom_name: String,
    /// Bride's name.
    #[serde(default)]
    pub bride_name: String,
    /// Groom's father.
    #[serde(default)]
    pub groom_father: String,
    /// Groom's mother.
    #[serde(default)]
    pub groom_mother: String,
    /// Bride's father.
    #[serde(default)]
    pub bride_father: String,
    /// Bride's mother.
    #[serde(default)]
    pub bride_mother: String,
    #[serde(default)]
    pub sentence_opening: String,
    #[serde(default)]
    pub sentence_greeting: String,
    /// Free-form HTML/Markdown block between the main sections.
    #[serde(default)]
    pub sentence_middle: String,
    #[serde(default)]
    pub sentence_closing: String,
    /// Cover image URL.
    #[serde(default)]
    pub img_cover: String,
    #[serde(default)]
    pub img_groom: String,
    #[serde(default)]
    pub img_bride: String,
    /// Gallery image URLs.
    #[serde(default)]
    pub img_gallery: Vec<String>,
    /// Ceremony and reception events.
    #[serde(default)]
    pub events: Vec<InvitationEvent>,
    /// Bank accounts for digital gifts.
    #[serde(default)]
    pub digital_gifts: Vec<DigitalGift>,
}

impl InvitationContent {
    /// Names that must be present before an invitation can be saved.
    pub fn missing_required_fields(&self) -> Vec<&'static str> {
        [
            ("groom_name", &self.groom_name),
            ("bride_name", &self.bride_name),
            ("groom_father", &self.groom_father),
            ("groom_mother", &self.groom_mother),
            ("bride_father", &self.bride_father),
            ("bride_mother", &self.bride_mother),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

/// A dated event on the invitation (akad, reception, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvitationEvent {
    pub event_name: String,
    pub address: String,
    /// Google Maps link to the venue.
    pub gmaps_link: String,
    pub date: NaiveDate,
    /// Start time as displayed, e.g. `"08:00"`.
    pub time: String,
    /// End time as displayed.
    pub time_end: String,
}

/// A bank account guests may send gifts to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigitalGift {
    pub bank_name: String,
    pub account_number: String,
    pub account_holder: String,
}
