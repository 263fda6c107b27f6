// Booking pipeline stages: normalization, grouping, layout, dispatch,
// submission orchestration.

pub mod dispatch;
pub mod grouping;
pub mod item_name;
pub mod layout;
pub mod normalize;
pub mod submit;

pub use submit::BookingSubmissionOrchestrator;
