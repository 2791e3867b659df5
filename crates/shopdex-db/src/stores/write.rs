//! Write operations for the `stores` table.
//!
//! Reconciliation is expressed as single-statement
//! `INSERT … ON CONFLICT (place_id) DO UPDATE` upserts: the unique index on
//! `place_id` turns a concurrent duplicate insert into an update, so a
//! uniqueness race is absorbed rather than surfaced, and a partially
//! populated row is never observable.

use sqlx::PgPool;

use super::types::{NewStore, PlaceDetailsSync, PlaceSync, StoreRow};
use super::STORE_COLUMNS;

/// Reconcile a remote text-search hit into the `stores` table.
///
/// Inserts a new row keyed by `place_id`, or overwrites the discovery fields
/// (name, address, lat, lng, rating, rating_count) of the existing one.
/// Phone, website, and services are never touched on this path — only
/// [`upsert_from_details`] may write them.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn upsert_from_search(pool: &PgPool, sync: &PlaceSync) -> Result<StoreRow, sqlx::Error> {
    let sql = format!(
        "INSERT INTO stores (place_id, name, address, lat, lng, rating, rating_count) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         ON CONFLICT (place_id) DO UPDATE SET \
             name         = EXCLUDED.name, \
             address      = EXCLUDED.address, \
             lat          = EXCLUDED.lat, \
             lng          = EXCLUDED.lng, \
             rating       = EXCLUDED.rating, \
             rating_count = EXCLUDED.rating_count, \
             updated_at   = NOW() \
         RETURNING {STORE_COLUMNS}"
    );
    sqlx::query_as::<_, StoreRow>(&sql)
        .bind(&sync.place_id)
        .bind(&sync.name)
        .bind(sync.address.as_deref())
        .bind(sync.lat)
        .bind(sync.lng)
        .bind(sync.rating)
        .bind(sync.rating_count)
        .fetch_one(pool)
        .await
}

/// Reconcile a remote place-details payload into the `stores` table.
///
/// Same discovery-field behavior as [`upsert_from_search`]; additionally,
/// phone, website, and services_text are overwritten only when the payload
/// carries a non-empty value — `COALESCE(NULLIF(EXCLUDED.x, ''), stores.x)`
/// keeps the stored value otherwise.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn upsert_from_details(
    pool: &PgPool,
    sync: &PlaceDetailsSync,
) -> Result<StoreRow, sqlx::Error> {
    let sql = format!(
        "INSERT INTO stores \
             (place_id, name, address, phone, website, services_text, \
              lat, lng, rating, rating_count) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
         ON CONFLICT (place_id) DO UPDATE SET \
             name          = EXCLUDED.name, \
             address       = EXCLUDED.address, \
             phone         = COALESCE(NULLIF(EXCLUDED.phone, ''), stores.phone), \
             website       = COALESCE(NULLIF(EXCLUDED.website, ''), stores.website), \
             services_text = COALESCE(NULLIF(EXCLUDED.services_text, ''), stores.services_text), \
             lat           = EXCLUDED.lat, \
             lng           = EXCLUDED.lng, \
             rating        = EXCLUDED.rating, \
             rating_count  = EXCLUDED.rating_count, \
             updated_at    = NOW() \
         RETURNING {STORE_COLUMNS}"
    );
    sqlx::query_as::<_, StoreRow>(&sql)
        .bind(&sync.place_id)
        .bind(&sync.name)
        .bind(sync.address.as_deref())
        .bind(sync.phone.as_deref())
        .bind(sync.website.as_deref())
        .bind(sync.services_text.as_deref())
        .bind(sync.lat)
        .bind(sync.lng)
        .bind(sync.rating)
        .bind(sync.rating_count)
        .fetch_one(pool)
        .await
}

/// Create a local-only store; `place_id` stays NULL so the row is never
/// targeted by reconciliation.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn create_store(pool: &PgPool, store: &NewStore) -> Result<StoreRow, sqlx::Error> {
    let sql = format!(
        "INSERT INTO stores \
             (name, address, city, state, postal_code, country, \
              phone, website, services_text, lat, lng) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
         RETURNING {STORE_COLUMNS}"
    );
    sqlx::query_as::<_, StoreRow>(&sql)
        .bind(&store.name)
        .bind(store.address.as_deref())
        .bind(store.city.as_deref())
        .bind(store.state.as_deref())
        .bind(store.postal_code.as_deref())
        .bind(store.country.as_deref())
        .bind(store.phone.as_deref())
        .bind(store.website.as_deref())
        .bind(store.services_text.as_deref())
        .bind(store.lat)
        .bind(store.lng)
        .fetch_one(pool)
        .await
}
