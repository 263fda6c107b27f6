//! Normalization boundary: raw submission payloads in, typed records out.
//!
//! Two payload shapes are accepted and normalize identically: a wrapped
//! `{ bookingData, preorderData }` object, or a flat object carrying booking
//! fields directly with the preorder under `preorder` or `preorderData`.

pub mod fields;

use crate::constants::*;
use crate::error::{BookingError, Result};
use crate::types::{BookingRecord, CourseType, PreorderPerson, Selection};
use chrono::{NaiveDate, NaiveTime};
use fields::{resolve_str, resolve_u32, resolve_value};
use serde_json::Value;
use tracing::debug;

/// Normalizes a submission payload into a booking record and its preorder.
///
/// This is the only stage allowed to fail the pipeline: a payload that is
/// not a JSON object violates the structural assumption everything else
/// rests on.
pub fn normalize_submission(payload: &Value) -> Result<(BookingRecord, Vec<PreorderPerson>)> {
    if !payload.is_object() {
        return Err(BookingError::Normalization(
            "submission payload is not a JSON object".to_string(),
        ));
    }

    let booking_src = match payload.get("bookingData") {
        Some(inner) if inner.is_object() => inner,
        _ => payload,
    };

    let booking = normalize_booking(booking_src);

    let preorder_src = payload
        .get("preorderData")
        .or_else(|| payload.get("preorder"))
        .and_then(|v| v.as_array());
    let preorder = match preorder_src {
        Some(entries) => entries
            .iter()
            .enumerate()
            .map(|(i, entry)| normalize_person(i, entry))
            .collect(),
        None => Vec::new(),
    };

    debug!(
        party_size = booking.party_size,
        preorder_people = preorder.len(),
        "normalized submission payload"
    );
    Ok((booking, preorder))
}

fn normalize_booking(src: &Value) -> BookingRecord {
    BookingRecord {
        first_name: resolve_str(src, FIRST_NAME_ALIASES, ""),
        last_name: resolve_str(src, LAST_NAME_ALIASES, ""),
        email: resolve_str(src, EMAIL_ALIASES, ""),
        phone: resolve_str(src, PHONE_ALIASES, ""),
        date: normalize_date(&resolve_str(src, DATE_ALIASES, "")),
        time: normalize_time(&resolve_str(src, TIME_ALIASES, "")),
        party_size: resolve_u32(src, PARTY_SIZE_ALIASES, 1),
        special_requests: resolve_str(src, SPECIAL_REQUESTS_ALIASES, ""),
        experience_id: resolve_str(src, EXPERIENCE_ALIASES, ""),
    }
}

/// Reformats a date to "YYYY-MM-DD" when it parses; passes it through raw
/// otherwise so the document still shows what the customer entered.
fn normalize_date(raw: &str) -> String {
    let raw = raw.trim();
    // ISO datetime strings keep only the date part.
    let candidate = raw.split('T').next().unwrap_or(raw);
    for format in ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(candidate, format) {
            return date.format("%Y-%m-%d").to_string();
        }
    }
    raw.to_string()
}

/// Reformats a time to "HH:MM" when it parses; raw otherwise.
fn normalize_time(raw: &str) -> String {
    let raw = raw.trim();
    for format in ["%H:%M", "%H:%M:%S", "%I:%M %p"] {
        if let Ok(time) = NaiveTime::parse_from_str(raw, format) {
            return time.format("%H:%M").to_string();
        }
    }
    raw.to_string()
}

fn normalize_person(index: usize, entry: &Value) -> PreorderPerson {
    let person_number = resolve_u32(entry, PERSON_NUMBER_ALIASES, index as u32 + 1);
    let person_name = {
        let name = resolve_str(entry, PERSON_NAME_ALIASES, "");
        if name.trim().is_empty() { None } else { Some(name) }
    };
    let special_instructions = resolve_str(entry, PERSON_NOTES_ALIASES, "");

    let selections = resolve_value(entry, SELECTIONS_ALIASES)
        .and_then(|v| v.as_array())
        .map(|items| items.iter().map(normalize_selection).collect())
        .unwrap_or_default();

    PreorderPerson {
        person_number,
        person_name,
        special_instructions,
        selections,
    }
}

fn normalize_selection(entry: &Value) -> Selection {
    let course = {
        let raw = resolve_str(entry, COURSE_ALIASES, "");
        CourseType::parse(&raw)
    };
    let item_name = {
        let name = resolve_str(entry, ITEM_NAME_ALIASES, "");
        if name.trim().is_empty() { None } else { Some(name) }
    };
    let menu_item_id = {
        let id = resolve_str(entry, MENU_ITEM_ID_ALIASES, "");
        if id.trim().is_empty() { None } else { Some(id) }
    };
    Selection {
        course,
        quantity: resolve_u32(entry, QUANTITY_ALIASES, 1),
        item_name,
        menu_item_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn flat_payload() -> Value {
        json!({
            "firstName": "Jo",
            "last_name": "Bloggs",
            "contactEmail": "jo@x.com",
            "phone": "07700 900123",
            "bookingDate": "01/12/2025",
            "time": "7:00 PM",
            "guests": "4",
            "preorder": [
                {
                    "person": 1,
                    "selections": [
                        { "course": "main", "item_name": "Sirloin Steak - £24.95" }
                    ]
                }
            ]
        })
    }

    #[test]
    fn flat_and_wrapped_shapes_normalize_identically() {
        let flat = flat_payload();
        let mut booking_fields = flat.clone();
        booking_fields.as_object_mut().unwrap().remove("preorder");
        let wrapped = json!({
            "bookingData": booking_fields,
            "preorderData": flat["preorder"],
        });

        let (booking_a, preorder_a) = normalize_submission(&flat).unwrap();
        let (booking_b, preorder_b) = normalize_submission(&wrapped).unwrap();

        assert_eq!(booking_a.first_name, booking_b.first_name);
        assert_eq!(booking_a.email, "jo@x.com");
        assert_eq!(booking_a.date, "2025-12-01");
        assert_eq!(booking_a.time, "19:00");
        assert_eq!(booking_a.party_size, 4);
        assert_eq!(preorder_a.len(), 1);
        assert_eq!(preorder_b.len(), 1);
        assert_eq!(
            preorder_a[0].selections[0].item_name,
            preorder_b[0].selections[0].item_name
        );
    }

    #[test]
    fn unparseable_date_and_time_pass_through() {
        let (booking, _) = normalize_submission(&json!({
            "date": "sometime in December",
            "time": "evening"
        }))
        .unwrap();
        assert_eq!(booking.date, "sometime in December");
        assert_eq!(booking.time, "evening");
    }

    #[test]
    fn person_numbers_default_from_position() {
        let (_, preorder) = normalize_submission(&json!({
            "preorder": [
                { "selections": [] },
                { "selections": [] }
            ]
        }))
        .unwrap();
        assert_eq!(preorder[0].person_number, 1);
        assert_eq!(preorder[1].person_number, 2);
    }

    #[test]
    fn selection_quantity_defaults_to_one() {
        let (_, preorder) = normalize_submission(&json!({
            "preorder": [
                { "selections": [{ "itemName": "Chicken Wings" }] }
            ]
        }))
        .unwrap();
        assert_eq!(preorder[0].selections[0].quantity, 1);
        assert!(preorder[0].selections[0].course.is_none());
    }

    #[test]
    fn non_object_payload_is_the_only_error() {
        assert!(normalize_submission(&json!("just a string")).is_err());
        assert!(normalize_submission(&json!({})).is_ok());
    }
}
