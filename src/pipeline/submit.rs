//! Booking submission orchestration.
//!
//! Single pass, no retries: normalize, branch on preorder presence, generate
//! and dispatch, persist, confirm. Every notification attempt and the
//! persistence step are recorded independently; only normalization failures
//! propagate to the caller.

use crate::app::ports::{BookingStore, MenuItemLookup};
use crate::error::Result;
use crate::infra::text_sink::TextPageSink;
use crate::pipeline::dispatch::NotificationDispatcher;
use crate::pipeline::grouping::group;
use crate::pipeline::layout::DocumentLayoutEngine;
use crate::pipeline::normalize::normalize_submission;
use crate::types::{
    BookingRecord, DocumentArtifact, GroupedPreorder, NotificationKind, RawPayload,
    SubmissionOutcome,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

// Shape check only; deliverability is the transport's problem.
static EMAIL_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

pub struct BookingSubmissionOrchestrator {
    store: Arc<dyn BookingStore>,
    menu: Arc<dyn MenuItemLookup>,
    dispatcher: NotificationDispatcher,
    restaurant_address: String,
}

impl BookingSubmissionOrchestrator {
    pub fn new(
        store: Arc<dyn BookingStore>,
        menu: Arc<dyn MenuItemLookup>,
        dispatcher: NotificationDispatcher,
        restaurant_address: String,
    ) -> Self {
        Self { store, menu, dispatcher, restaurant_address }
    }

    /// Runs one submission end to end and returns the aggregate outcome.
    ///
    /// A failed notification, a failed persist or an invalid customer email
    /// all surface as flags in the outcome, never as an error return.
    #[instrument(skip(self, payload))]
    pub async fn submit(&self, payload: &RawPayload) -> Result<SubmissionOutcome> {
        let (booking, preorder) = normalize_submission(payload)?;
        let reference = generate_reference();
        let mut attempts = Vec::new();

        if preorder.is_empty() {
            attempts.push(
                self.dispatcher
                    .send(
                        NotificationKind::RestaurantSummary,
                        &self.restaurant_address,
                        &summary_subject(&booking),
                        &restaurant_summary_body(&booking, false),
                        None,
                    )
                    .await,
            );
        } else {
            let grouped = group(&preorder, booking.is_buffet(), self.menu.as_ref()).await;
            let artifact = render_document(&booking, &grouped);
            info!(
                bytes = artifact.bytes.len(),
                reference = %reference,
                "generated preorder document"
            );

            attempts.push(
                self.dispatcher
                    .send(
                        NotificationKind::RestaurantPreorder,
                        &self.restaurant_address,
                        &preorder_subject(&booking),
                        &restaurant_preorder_body(&booking),
                        Some(&artifact),
                    )
                    .await,
            );
            attempts.push(
                self.dispatcher
                    .send(
                        NotificationKind::RestaurantSummary,
                        &self.restaurant_address,
                        &summary_subject(&booking),
                        &restaurant_summary_body(&booking, true),
                        None,
                    )
                    .await,
            );
        }

        let booking_id = match self.store.persist(&booking, &preorder, &reference).await {
            Ok(persisted) => Some(persisted.id),
            Err(e) => {
                error!(reference = %reference, error = %e, "failed to persist booking");
                None
            }
        };

        if EMAIL_SHAPE.is_match(booking.email.trim()) {
            attempts.push(
                self.dispatcher
                    .send(
                        NotificationKind::CustomerConfirmation,
                        booking.email.trim(),
                        &confirmation_subject(&booking),
                        &customer_confirmation_body(&booking, &reference),
                        None,
                    )
                    .await,
            );
        } else {
            debug!(reference = %reference, "no valid customer email, skipping confirmation");
        }

        Ok(SubmissionOutcome { reference, booking_id, attempts })
    }
}

/// Renders the preorder document through the shipped text sink.
pub fn render_document(booking: &BookingRecord, grouped: &GroupedPreorder) -> DocumentArtifact {
    let mut sink = TextPageSink::new();
    DocumentLayoutEngine::new(&mut sink).render(booking, Some(grouped));
    sink.finish()
}

fn generate_reference() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("BK-{}", &id[..8].to_uppercase())
}

fn booking_details_block(booking: &BookingRecord) -> String {
    format!(
        "Name: {}\nDate: {}\nTime: {}\nParty size: {}\nEmail: {}\nPhone: {}",
        booking.full_name(),
        booking.date,
        booking.time,
        booking.party_size,
        booking.email,
        booking.phone,
    )
}

fn preorder_subject(booking: &BookingRecord) -> String {
    format!("Preorder: {} on {} at {}", booking.full_name(), booking.date, booking.time)
}

fn summary_subject(booking: &BookingRecord) -> String {
    format!("New booking: {} on {} at {}", booking.full_name(), booking.date, booking.time)
}

fn confirmation_subject(booking: &BookingRecord) -> String {
    format!("Your booking for {} at {}", booking.date, booking.time)
}

fn restaurant_preorder_body(booking: &BookingRecord) -> String {
    format!(
        "A preorder summary for the booking below is attached.\n\n{}",
        booking_details_block(booking)
    )
}

fn restaurant_summary_body(booking: &BookingRecord, has_preorder: bool) -> String {
    let preorder_line = if has_preorder {
        "Preorder included: yes (document sent separately)"
    } else {
        "Preorder included: no"
    };
    let mut body = format!("{}\n{}", booking_details_block(booking), preorder_line);
    let requests = booking.special_requests.trim();
    if !requests.is_empty() {
        body.push_str("\nSpecial requests: ");
        body.push_str(requests);
    }
    body
}

fn customer_confirmation_body(booking: &BookingRecord, reference: &str) -> String {
    format!(
        "Thank you for your booking, {}.\n\n{}\n\nYour booking reference is {}. \
         If anything changes, reply to this email quoting the reference.",
        booking.full_name(),
        booking_details_block(booking),
        reference,
    )
}
