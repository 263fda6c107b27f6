use crate::types::{BookingRecord, DocumentArtifact, PreorderPerson, Provider};
use async_trait::async_trait;

/// A menu item as seen by the pipeline.
#[derive(Debug, Clone)]
pub struct MenuItemRef {
    pub name: String,
}

/// Lookup of menu items by id. Not-found is `None`, never an error.
#[async_trait]
pub trait MenuItemLookup: Send + Sync {
    async fn find_item(&self, id: &str) -> Option<MenuItemRef>;
}

#[derive(Debug, Clone)]
pub struct PersistedBooking {
    pub id: i64,
    pub reference: String,
}

/// Persistence of accepted bookings.
#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn persist(
        &self,
        booking: &BookingRecord,
        preorder: &[PreorderPerson],
        reference: &str,
    ) -> Result<PersistedBooking, String>;
}

/// One outbound message handed to a transport.
#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
    pub attachment: Option<DocumentArtifact>,
}

/// An email delivery transport. The dispatcher picks exactly one per
/// deployment; transport errors are stringified so the dispatcher can fold
/// them into attempt records.
#[async_trait]
pub trait EmailTransport: Send + Sync {
    fn provider(&self) -> Provider;

    /// Connectivity/auth check performed before the first send. Transports
    /// without a handshake accept by default.
    async fn verify(&self) -> Result<(), String> {
        Ok(())
    }

    /// Sends one message, returning the provider message id.
    async fn send(&self, email: &OutboundEmail) -> Result<String, String>;
}
