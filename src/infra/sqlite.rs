//! SQLite adapter: booking persistence and menu item lookup.

use crate::app::ports::{BookingStore, MenuItemLookup, MenuItemRef, PersistedBooking};
use crate::error::Result;
use crate::types::{BookingRecord, PreorderPerson};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS bookings (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    reference TEXT NOT NULL UNIQUE,
    first_name TEXT NOT NULL DEFAULT '',
    last_name TEXT NOT NULL DEFAULT '',
    email TEXT NOT NULL DEFAULT '',
    phone TEXT NOT NULL DEFAULT '',
    booking_date TEXT NOT NULL DEFAULT '',
    booking_time TEXT NOT NULL DEFAULT '',
    party_size INTEGER NOT NULL DEFAULT 1,
    special_requests TEXT NOT NULL DEFAULT '',
    experience_id TEXT NOT NULL DEFAULT '',
    preorder_json TEXT NOT NULL DEFAULT '[]',
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);
CREATE TABLE IF NOT EXISTS menu_items (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT,
    price REAL
);
";

/// Single-connection store; queries are short and serialized by a mutex.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Inserts or replaces one menu item row.
    pub fn upsert_menu_item(&self, id: &str, name: &str, description: Option<&str>, price: Option<f64>) -> Result<()> {
        let conn = self.conn.lock().expect("sqlite mutex poisoned");
        conn.execute(
            "INSERT OR REPLACE INTO menu_items (id, name, description, price) VALUES (?1, ?2, ?3, ?4)",
            params![id, name, description, price],
        )?;
        Ok(())
    }
}

#[async_trait]
impl BookingStore for SqliteStore {
    async fn persist(
        &self,
        booking: &BookingRecord,
        preorder: &[PreorderPerson],
        reference: &str,
    ) -> std::result::Result<PersistedBooking, String> {
        let preorder_json = serde_json::to_string(preorder).map_err(|e| e.to_string())?;
        let conn = self.conn.lock().map_err(|_| "sqlite mutex poisoned".to_string())?;
        conn.execute(
            "INSERT INTO bookings (reference, first_name, last_name, email, phone, booking_date, \
             booking_time, party_size, special_requests, experience_id, preorder_json) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                reference,
                booking.first_name,
                booking.last_name,
                booking.email,
                booking.phone,
                booking.date,
                booking.time,
                booking.party_size,
                booking.special_requests,
                booking.experience_id,
                preorder_json,
            ],
        )
        .map_err(|e| e.to_string())?;
        let id = conn.last_insert_rowid();
        info!(reference = %reference, id, "booking persisted");
        Ok(PersistedBooking { id, reference: reference.to_string() })
    }
}

#[async_trait]
impl MenuItemLookup for SqliteStore {
    async fn find_item(&self, id: &str) -> Option<MenuItemRef> {
        let conn = self.conn.lock().ok()?;
        conn.query_row(
            "SELECT name FROM menu_items WHERE id = ?1",
            params![id],
            |row| row.get::<_, String>(0),
        )
        .optional()
        .ok()
        .flatten()
        .map(|name| MenuItemRef { name })
    }
}
