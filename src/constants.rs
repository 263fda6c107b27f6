//! Field alias tables, the buffet sentinel, and document page geometry.
//!
//! Upstream booking payloads arrive with inconsistent key naming depending on
//! which form version produced them. Every logical field has a fixed alias
//! resolution order; reads of the same field must use the same table.

// Experience ids that select buffet-style grouping instead of course tables.
pub const BUFFET_EXPERIENCE_ID: &str = "buffet";
pub const BUFFET_LEGACY_EXPERIENCE_ID: &str = "3";

// Booking field aliases, in resolution priority order.
pub const FIRST_NAME_ALIASES: &[&str] = &["firstName", "first_name", "fname"];
pub const LAST_NAME_ALIASES: &[&str] = &["lastName", "last_name", "surname"];
pub const EMAIL_ALIASES: &[&str] = &["email", "contactEmail", "contact_email", "emailAddress"];
pub const PHONE_ALIASES: &[&str] = &["phone", "phoneNumber", "phone_number", "contactPhone"];
pub const DATE_ALIASES: &[&str] = &["date", "bookingDate", "booking_date"];
pub const TIME_ALIASES: &[&str] = &["time", "bookingTime", "booking_time"];
pub const PARTY_SIZE_ALIASES: &[&str] = &["partySize", "party_size", "guests", "covers"];
pub const SPECIAL_REQUESTS_ALIASES: &[&str] = &["specialRequests", "special_requests", "requests"];
pub const EXPERIENCE_ALIASES: &[&str] = &["experienceId", "experience_id", "menuId", "menu_id"];

// Preorder person/selection aliases.
pub const PERSON_NUMBER_ALIASES: &[&str] = &["personNumber", "person_number", "person"];
pub const PERSON_NAME_ALIASES: &[&str] = &["personName", "person_name", "name"];
pub const PERSON_NOTES_ALIASES: &[&str] = &["specialInstructions", "special_instructions", "notes"];
pub const SELECTIONS_ALIASES: &[&str] = &["selections", "items", "choices"];
pub const COURSE_ALIASES: &[&str] = &["courseType", "course_type", "course"];
pub const QUANTITY_ALIASES: &[&str] = &["quantity", "qty"];
pub const ITEM_NAME_ALIASES: &[&str] = &["itemName", "item_name", "name"];
pub const MENU_ITEM_ID_ALIASES: &[&str] = &["menuItemId", "menu_item_id", "itemId", "item_id"];

// Page geometry in millimetres (A4 portrait).
pub const PAGE_WIDTH: f32 = 210.0;
pub const PAGE_HEIGHT: f32 = 297.0;
pub const PAGE_MARGIN: f32 = 15.0;

// Table geometry. The item column takes whatever width remains.
pub const PERSON_COL_WIDTH: f32 = 28.0;
pub const NOTES_COL_WIDTH: f32 = 45.0;
pub const SIDE_COL_WIDTH: f32 = 35.0;
pub const QUANTITY_COL_WIDTH: f32 = 25.0;
pub const HEADER_ROW_HEIGHT: f32 = 8.0;
pub const MIN_ROW_HEIGHT: f32 = 8.0;
pub const CELL_PADDING: f32 = 2.0;
pub const TABLE_GAP: f32 = 10.0;
pub const TABLE_TITLE_HEIGHT: f32 = 7.0;
