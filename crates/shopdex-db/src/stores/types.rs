//! Row and input types for the `stores` table.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A row from the `stores` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StoreRow {
    pub id: Uuid,
    /// External place id from the remote provider; `None` for local-only
    /// stores. Unique when present.
    pub place_id: Option<String>,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub services_text: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub rating: Option<f64>,
    pub rating_count: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Discovery fields from a remote text-search hit.
///
/// Search-sync reconciliation overwrites exactly these fields and never
/// touches phone/website/services — those belong to [`PlaceDetailsSync`].
#[derive(Debug, Clone)]
pub struct PlaceSync {
    pub place_id: String,
    pub name: String,
    pub address: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub rating: Option<f64>,
    pub rating_count: Option<i32>,
}

/// Full payload from a remote place-details lookup.
#[derive(Debug, Clone)]
pub struct PlaceDetailsSync {
    pub place_id: String,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub services_text: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub rating: Option<f64>,
    pub rating_count: Option<i32>,
}

/// Input record for creating a local-only store (`place_id` stays NULL).
#[derive(Debug, Clone, Default)]
pub struct NewStore {
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub services_text: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}
