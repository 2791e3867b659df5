use crate::error::PlacesError;
use crate::types::{PlaceHit, PlaceProfile};

/// The provider seam the search planner depends on.
///
/// The concrete [`GooglePlacesClient`](crate::GooglePlacesClient) implements
/// this against the real API; planner tests implement it with scripted
/// responses so both provider-enabled paths run deterministically.
pub trait PlacesGateway: Send + Sync {
    /// Text search, bounded to at most `limit` hits, in provider ranking
    /// order. `open_now` restricts to currently open places.
    fn search(
        &self,
        query: &str,
        limit: i64,
        open_now: bool,
    ) -> impl std::future::Future<Output = Result<Vec<PlaceHit>, PlacesError>> + Send;

    /// Full details for one place. `Ok(None)` means the provider does not
    /// know the id (a terminal not-found, not an error).
    fn details(
        &self,
        place_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<PlaceProfile>, PlacesError>> + Send;
}
