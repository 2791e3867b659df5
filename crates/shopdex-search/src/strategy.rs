//! Strategy selection: a closed set of four execution plans, chosen from
//! the criteria shape and provider availability.

use shopdex_core::criteria::GeoBounds;
use shopdex_core::SearchCriteria;

/// The execution plan for one search request. Exactly one strategy handles
/// each request, so each variant's query and ordering can be tested on its
/// own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchStrategy {
    /// No query text, no geo mode: paginate the whole filtered table.
    Listing,
    /// No query text, geo mode on: distance-bounded, distance-ordered.
    Radius(GeoBounds),
    /// Query text, no geo mode, provider enabled: provider search plus
    /// reconciliation and a local post-filter pass.
    RemoteFirst,
    /// Query text with geo mode, or provider disabled: local full-text with
    /// trigram fallback, optionally distance-bounded.
    HybridText { geo: Option<GeoBounds> },
}

impl SearchStrategy {
    /// Select the strategy for `criteria`, which must already be normalized.
    #[must_use]
    pub fn plan(criteria: &SearchCriteria, provider_enabled: bool) -> Self {
        let geo = criteria.geo();
        if !criteria.has_query() {
            return match geo {
                Some(bounds) => SearchStrategy::Radius(bounds),
                None => SearchStrategy::Listing,
            };
        }
        if geo.is_none() && provider_enabled {
            return SearchStrategy::RemoteFirst;
        }
        SearchStrategy::HybridText { geo }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geo_criteria() -> SearchCriteria {
        SearchCriteria {
            lat: Some(30.2672),
            lng: Some(-97.7431),
            radius_km: Some(25.0),
            ..SearchCriteria::default()
        }
    }

    #[test]
    fn no_query_no_geo_is_listing() {
        let criteria = SearchCriteria::default();
        assert_eq!(SearchStrategy::plan(&criteria, true), SearchStrategy::Listing);
        assert_eq!(SearchStrategy::plan(&criteria, false), SearchStrategy::Listing);
    }

    #[test]
    fn no_query_with_geo_is_radius() {
        let criteria = geo_criteria();
        let planned = SearchStrategy::plan(&criteria, true);
        match planned {
            SearchStrategy::Radius(bounds) => {
                assert!((bounds.radius_km - 25.0).abs() < f64::EPSILON);
            }
            other => panic!("expected Radius, got {other:?}"),
        }
    }

    #[test]
    fn query_without_geo_prefers_the_provider() {
        let criteria = SearchCriteria {
            query: Some("brake repair".to_string()),
            ..SearchCriteria::default()
        };
        assert_eq!(
            SearchStrategy::plan(&criteria, true),
            SearchStrategy::RemoteFirst
        );
    }

    #[test]
    fn query_with_provider_disabled_runs_locally() {
        let criteria = SearchCriteria {
            query: Some("brake repair".to_string()),
            ..SearchCriteria::default()
        };
        assert_eq!(
            SearchStrategy::plan(&criteria, false),
            SearchStrategy::HybridText { geo: None }
        );
    }

    #[test]
    fn query_with_geo_runs_locally_even_when_provider_is_enabled() {
        let criteria = SearchCriteria {
            query: Some("brake repair".to_string()),
            ..geo_criteria()
        };
        match SearchStrategy::plan(&criteria, true) {
            SearchStrategy::HybridText { geo: Some(_) } => {}
            other => panic!("expected HybridText with geo, got {other:?}"),
        }
    }

    #[test]
    fn incomplete_geo_triple_never_reaches_radius() {
        let criteria = SearchCriteria {
            lat: Some(30.0),
            lng: Some(-97.0),
            radius_km: None,
            ..SearchCriteria::default()
        }
        .normalized();
        assert_eq!(SearchStrategy::plan(&criteria, true), SearchStrategy::Listing);
    }
}
