//! Database operations for the `stores` table.

mod read;
mod types;
mod write;

pub use read::{
    count_radius, count_stores, count_text, get_store, get_store_by_place_id, list_stores,
    list_stores_by_ids, list_stores_by_place_ids, search_radius, search_text,
};
pub use types::{NewStore, PlaceDetailsSync, PlaceSync, StoreRow};
pub use write::{create_store, upsert_from_details, upsert_from_search};

/// Column list shared by every `stores` read-back query. The generated
/// `search_vector` column is deliberately omitted.
pub(crate) const STORE_COLUMNS: &str = "id, place_id, name, address, city, state, postal_code, \
     country, phone, website, services_text, lat, lng, rating, rating_count, \
     created_at, updated_at";
