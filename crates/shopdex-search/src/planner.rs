//! Orchestration: execute the planned strategy against the local index
//! and/or the remote gateway, reconciling remote hits into local storage.

use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use shopdex_core::{OffsetLimit, SearchCriteria, SearchResult};
use shopdex_db::{NewStore, PlaceDetailsSync, PlaceSync, StoreRow};
use shopdex_places::{PlaceHit, PlaceProfile, PlacesError, PlacesGateway};

use crate::error::SearchError;
use crate::filter::apply_filters;
use crate::strategy::SearchStrategy;

/// Trigram similarity a store name must exceed to match a query without a
/// text-vector hit.
pub const TRGM_SIMILARITY_FLOOR: f64 = 0.25;

/// The discovery engine's entry point.
///
/// Holds the local store table and, when the provider is enabled, the remote
/// gateway. The gateway is an explicit dependency — `None` means every text
/// query runs against the local index — so tests exercise both paths
/// deterministically.
pub struct SearchPlanner<G> {
    pool: PgPool,
    gateway: Option<G>,
}

impl<G: PlacesGateway> SearchPlanner<G> {
    #[must_use]
    pub fn new(pool: PgPool, gateway: Option<G>) -> Self {
        Self { pool, gateway }
    }

    #[must_use]
    pub fn provider_enabled(&self) -> bool {
        self.gateway.is_some()
    }

    /// Execute one search request end to end.
    ///
    /// Criteria are corrected (clamped limit/offset, geo-mode gating, sort
    /// fallback) before a strategy is selected; exactly one strategy runs.
    ///
    /// # Errors
    ///
    /// - [`SearchError::Upstream`] if the remote-first path hits a gateway
    ///   timeout or a bad provider status. The request is not downgraded to
    ///   local data.
    /// - [`SearchError::Db`] on any storage failure.
    pub async fn search(
        &self,
        criteria: SearchCriteria,
    ) -> Result<SearchResult<StoreRow>, SearchError> {
        let criteria = criteria.normalized();
        let page = OffsetLimit::new(criteria.limit, criteria.offset)?;
        let strategy = SearchStrategy::plan(&criteria, self.provider_enabled());
        tracing::debug!(?strategy, limit = criteria.limit, offset = criteria.offset, "planned search");

        let (items, total) = match strategy {
            SearchStrategy::Listing => {
                let rows = shopdex_db::list_stores(
                    &self.pool,
                    &criteria.filters,
                    criteria.effective_sort(),
                    criteria.direction,
                    page,
                )
                .await?;
                let total = shopdex_db::count_stores(&self.pool, &criteria.filters).await?;
                (rows, total)
            }
            SearchStrategy::Radius(geo) => {
                let rows =
                    shopdex_db::search_radius(&self.pool, geo, &criteria.filters, page).await?;
                let total = shopdex_db::count_radius(&self.pool, geo, &criteria.filters).await?;
                (rows, total)
            }
            SearchStrategy::RemoteFirst => self.search_remote_first(&criteria).await?,
            SearchStrategy::HybridText { geo } => {
                let query = criteria.query.as_deref().unwrap_or_default();
                let rows = shopdex_db::search_text(
                    &self.pool,
                    query,
                    TRGM_SIMILARITY_FLOOR,
                    geo,
                    &criteria.filters,
                    page,
                )
                .await?;
                let total = shopdex_db::count_text(
                    &self.pool,
                    query,
                    TRGM_SIMILARITY_FLOOR,
                    geo,
                    &criteria.filters,
                )
                .await?;
                (rows, total)
            }
        };

        Ok(SearchResult {
            items,
            limit: criteria.limit,
            offset: criteria.offset,
            total,
        })
    }

    /// Strategy C: provider text search, reconciliation, post-filter.
    ///
    /// Gateway ordering is preserved; the total is the filtered-set size.
    /// Paging beyond the provider's returned page is intentionally not
    /// attempted.
    async fn search_remote_first(
        &self,
        criteria: &SearchCriteria,
    ) -> Result<(Vec<StoreRow>, i64), SearchError> {
        let gateway = self
            .gateway
            .as_ref()
            .ok_or(SearchError::Upstream(PlacesError::Disabled))?;

        let query = criteria.query.as_deref().unwrap_or_default();
        let open_now = criteria.filters.open_now.unwrap_or(false);
        let hits = gateway.search(query, criteria.limit, open_now).await?;
        tracing::debug!(hit_count = hits.len(), "provider search returned");

        let mut place_ids = Vec::with_capacity(hits.len());
        for hit in hits {
            place_ids.push(hit.place_id.clone());
            shopdex_db::upsert_from_search(&self.pool, &hit_to_sync(hit)).await?;
        }
        if place_ids.is_empty() {
            return Ok((Vec::new(), 0));
        }

        let matched = shopdex_db::list_stores_by_place_ids(&self.pool, &place_ids).await?;
        let ordered = order_by_place_ids(matched, &place_ids);
        let filtered = apply_filters(ordered, &criteria.filters);
        let total = i64::try_from(filtered.len()).unwrap_or(i64::MAX);
        Ok((filtered, total))
    }

    /// Fetch a store by primary key.
    ///
    /// # Errors
    ///
    /// [`SearchError::NotFound`] on a miss; [`SearchError::Db`] otherwise.
    pub async fn get_store(&self, id: Uuid) -> Result<StoreRow, SearchError> {
        Ok(shopdex_db::get_store(&self.pool, id).await?)
    }

    /// Fetch a store by external place id, falling back to a details sync
    /// when no local row exists yet.
    ///
    /// # Errors
    ///
    /// [`SearchError::NotFound`] when neither local storage nor the provider
    /// knows the id (a disabled provider counts as not knowing it).
    pub async fn get_by_place_id(&self, place_id: &str) -> Result<StoreRow, SearchError> {
        match shopdex_db::get_store_by_place_id(&self.pool, place_id).await {
            Ok(row) => Ok(row),
            Err(shopdex_db::DbError::NotFound) => match self.sync_details(place_id).await {
                Err(SearchError::Upstream(PlacesError::Disabled)) => Err(SearchError::NotFound),
                other => other,
            },
            Err(err) => Err(err.into()),
        }
    }

    /// Pull full details for a place from the provider and reconcile them
    /// into local storage.
    ///
    /// # Errors
    ///
    /// [`SearchError::Upstream`] when the provider is disabled or fails;
    /// [`SearchError::NotFound`] when the provider has no such place.
    pub async fn sync_details(&self, place_id: &str) -> Result<StoreRow, SearchError> {
        let gateway = self
            .gateway
            .as_ref()
            .ok_or(SearchError::Upstream(PlacesError::Disabled))?;

        let profile = gateway
            .details(place_id)
            .await?
            .ok_or(SearchError::NotFound)?;
        tracing::info!(place_id, "reconciling place details");
        let row = shopdex_db::upsert_from_details(&self.pool, &profile_to_sync(profile)).await?;
        Ok(row)
    }

    /// Fetch a batch of stores and return them in caller order, silently
    /// skipping ids that miss.
    ///
    /// # Errors
    ///
    /// [`SearchError::Db`] on storage failure.
    pub async fn get_by_ids_ordered(&self, ids: &[Uuid]) -> Result<Vec<StoreRow>, SearchError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = shopdex_db::list_stores_by_ids(&self.pool, ids).await?;
        let mut by_id: HashMap<Uuid, StoreRow> =
            rows.into_iter().map(|row| (row.id, row)).collect();
        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    /// Create a local-only store (no external place id).
    ///
    /// # Errors
    ///
    /// [`SearchError::Db`] on storage failure.
    pub async fn create_store(&self, store: &NewStore) -> Result<StoreRow, SearchError> {
        Ok(shopdex_db::create_store(&self.pool, store).await?)
    }
}

fn hit_to_sync(hit: PlaceHit) -> PlaceSync {
    PlaceSync {
        place_id: hit.place_id,
        name: hit.name,
        address: hit.address,
        lat: hit.lat,
        lng: hit.lng,
        rating: hit.rating,
        rating_count: hit.rating_count,
    }
}

fn profile_to_sync(profile: PlaceProfile) -> PlaceDetailsSync {
    let services_text = if profile.services.is_empty() {
        None
    } else {
        Some(profile.services.join(", "))
    };
    PlaceDetailsSync {
        place_id: profile.place_id,
        name: profile.name,
        address: profile.address,
        phone: profile.phone,
        website: profile.website,
        services_text,
        lat: profile.lat,
        lng: profile.lng,
        rating: profile.rating,
        rating_count: profile.rating_count,
    }
}

/// Re-order reconciled rows to the provider's ranking. Duplicated place ids
/// in the input surface at most once.
fn order_by_place_ids(rows: Vec<StoreRow>, place_ids: &[String]) -> Vec<StoreRow> {
    let mut by_place_id: HashMap<String, StoreRow> = rows
        .into_iter()
        .filter_map(|row| row.place_id.clone().map(|pid| (pid, row)))
        .collect();
    place_ids
        .iter()
        .filter_map(|pid| by_place_id.remove(pid))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn store_with_place_id(place_id: &str) -> StoreRow {
        StoreRow {
            id: Uuid::new_v4(),
            place_id: Some(place_id.to_string()),
            name: format!("store {place_id}"),
            address: None,
            city: None,
            state: None,
            postal_code: None,
            country: None,
            phone: None,
            website: None,
            services_text: None,
            lat: None,
            lng: None,
            rating: None,
            rating_count: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn ordering_follows_the_provider_ranking() {
        let rows = vec![
            store_with_place_id("b"),
            store_with_place_id("c"),
            store_with_place_id("a"),
        ];
        let order = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let ordered = order_by_place_ids(rows, &order);

        let ids: Vec<_> = ordered
            .iter()
            .map(|r| r.place_id.clone().unwrap_or_default())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn ordering_drops_ids_with_no_reconciled_row() {
        let rows = vec![store_with_place_id("a")];
        let order = vec!["missing".to_string(), "a".to_string()];
        let ordered = order_by_place_ids(rows, &order);

        assert_eq!(ordered.len(), 1);
        assert_eq!(ordered[0].place_id.as_deref(), Some("a"));
    }

    #[test]
    fn duplicate_place_ids_surface_once() {
        let rows = vec![store_with_place_id("a")];
        let order = vec!["a".to_string(), "a".to_string()];
        assert_eq!(order_by_place_ids(rows, &order).len(), 1);
    }

    #[test]
    fn empty_services_list_never_writes_services_text() {
        let profile = PlaceProfile {
            place_id: "p".to_string(),
            name: "n".to_string(),
            address: None,
            phone: None,
            website: None,
            lat: None,
            lng: None,
            rating: None,
            rating_count: None,
            services: vec![],
        };
        assert!(profile_to_sync(profile).services_text.is_none());

        let profile = PlaceProfile {
            place_id: "p".to_string(),
            name: "n".to_string(),
            address: None,
            phone: None,
            website: None,
            lat: None,
            lng: None,
            rating: None,
            rating_count: None,
            services: vec!["tires".to_string(), "brakes".to_string()],
        };
        assert_eq!(
            profile_to_sync(profile).services_text.as_deref(),
            Some("tires, brakes")
        );
    }
}
