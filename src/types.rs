use crate::constants::{BUFFET_EXPERIENCE_ID, BUFFET_LEGACY_EXPERIENCE_ID};
use serde::{Deserialize, Serialize};

/// Raw submission payload as received from the booking form.
pub type RawPayload = serde_json::Value;

/// Normalized view over an arbitrarily-shaped booking payload.
///
/// Constructed once per submission; every downstream stage reads this type,
/// never the raw payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRecord {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    /// Calendar date, "YYYY-MM-DD" when the upstream value parsed.
    pub date: String,
    /// "HH:MM" when the upstream value parsed.
    pub time: String,
    pub party_size: u32,
    pub special_requests: String,
    pub experience_id: String,
}

impl BookingRecord {
    /// First and last name trimmed and joined; "N/A" when both are empty.
    pub fn full_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string();
        if full.is_empty() {
            "N/A".to_string()
        } else {
            full
        }
    }

    /// Whether the experience id selects buffet-style grouping.
    pub fn is_buffet(&self) -> bool {
        let id = self.experience_id.trim().to_lowercase();
        id == BUFFET_EXPERIENCE_ID || id == BUFFET_LEGACY_EXPERIENCE_ID
    }
}

/// Course taxonomy for table-menu mode. Buffet selections carry no course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseType {
    Starter,
    Main,
    Side,
    Dessert,
}

impl CourseType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "starter" | "starters" => Some(Self::Starter),
            "main" | "mains" => Some(Self::Main),
            "side" | "sides" => Some(Self::Side),
            "dessert" | "desserts" => Some(Self::Dessert),
            _ => None,
        }
    }
}

/// One menu choice by one diner. Carries either an inline item name or a
/// menu item id that needs resolving against the menu collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Selection {
    pub course: Option<CourseType>,
    pub quantity: u32,
    pub item_name: Option<String>,
    pub menu_item_id: Option<String>,
}

/// One entry per diner in a preorder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreorderPerson {
    /// 1-based, stable ordering.
    pub person_number: u32,
    pub person_name: Option<String>,
    pub special_instructions: String,
    pub selections: Vec<Selection>,
}

impl PreorderPerson {
    /// Display label for course table rows.
    pub fn label(&self) -> String {
        match &self.person_name {
            Some(name) if !name.trim().is_empty() => name.trim().to_string(),
            _ => format!("Guest {}", self.person_number),
        }
    }
}

/// One row of a course table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRow {
    pub person: String,
    pub item: String,
    /// Side dish attached to a main row; empty elsewhere.
    pub side: String,
    pub notes: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CourseGroups {
    pub starters: Vec<CourseRow>,
    pub mains: Vec<CourseRow>,
    pub desserts: Vec<CourseRow>,
}

/// Aggregated buffet line: resolved item name and summed quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuffetLine {
    pub item: String,
    pub quantity: u32,
}

/// Output of the preorder grouper, shaped by the experience mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GroupedPreorder {
    /// Item name to total quantity, first-seen order preserved.
    Buffet(Vec<BuffetLine>),
    /// Course-partitioned rows, sides attached to mains.
    Courses(CourseGroups),
}

/// The generated printable preorder summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentArtifact {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Http,
    Smtp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    /// Restaurant copy with the preorder document attached.
    RestaurantPreorder,
    /// Restaurant summary without attachment.
    RestaurantSummary,
    /// Customer confirmation.
    CustomerConfirmation,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RestaurantPreorder => "restaurant_preorder",
            Self::RestaurantSummary => "restaurant_summary",
            Self::CustomerConfirmation => "customer_confirmation",
        }
    }
}

/// One discrete email-send operation with an independently tracked outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationAttempt {
    pub kind: NotificationKind,
    pub success: bool,
    pub provider: Provider,
    /// Provider message id on success, error message on failure.
    pub detail: String,
}

/// Aggregate result of one booking submission. Partial failure is data, not
/// an error: a failed notification or persist shows up here as a flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionOutcome {
    pub reference: String,
    pub booking_id: Option<i64>,
    pub attempts: Vec<NotificationAttempt>,
}
