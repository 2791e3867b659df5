//! Value objects describing a store search request and its paged result.

use serde::{Deserialize, Serialize};

/// Hard cap on page size, applied by [`SearchCriteria::normalized`].
pub const MAX_LIMIT: i64 = 100;
/// Page size used when the caller does not supply one.
pub const DEFAULT_LIMIT: i64 = 20;
/// Largest radius a geo search will honor, in kilometers.
pub const MAX_RADIUS_KM: f64 = 500.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StoreSort {
    #[default]
    Rating,
    Name,
    ReviewCount,
    Distance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// Attribute filters shared by every search strategy.
///
/// Blank strings are treated as absent; [`StoreFilters::normalized`] folds
/// them to `None` so SQL null-guards and the post-filter pass agree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreFilters {
    pub min_rating: Option<f64>,
    pub services_contains: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub has_website: Option<bool>,
    pub has_phone: Option<bool>,
    pub open_now: Option<bool>,
}

impl StoreFilters {
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            min_rating: self.min_rating.filter(|r| r.is_finite()),
            services_contains: normalize_text(self.services_contains),
            city: normalize_text(self.city),
            state: normalize_text(self.state),
            has_website: self.has_website,
            has_phone: self.has_phone,
            open_now: self.open_now,
        }
    }
}

/// A validated center-plus-radius restriction for geo-mode searches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub lat: f64,
    pub lng: f64,
    pub radius_km: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchCriteria {
    pub query: Option<String>,
    pub limit: i64,
    pub offset: i64,
    pub sort: StoreSort,
    pub direction: SortDirection,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub radius_km: Option<f64>,
    pub filters: StoreFilters,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self {
            query: None,
            limit: DEFAULT_LIMIT,
            offset: 0,
            sort: StoreSort::default(),
            direction: SortDirection::default(),
            lat: None,
            lng: None,
            radius_km: None,
            filters: StoreFilters::default(),
        }
    }
}

impl SearchCriteria {
    /// Correct the criteria into their executable form.
    ///
    /// Out-of-range limit/offset are clamped, never rejected. A geo triple
    /// that is incomplete or out of range (lat beyond ±90, lng beyond ±180,
    /// radius outside (0, 500]) is cleared entirely, silently disabling geo
    /// mode rather than erroring.
    #[must_use]
    pub fn normalized(self) -> Self {
        let geo = validate_geo(self.lat, self.lng, self.radius_km);
        Self {
            query: normalize_text(self.query),
            limit: self.limit.clamp(1, MAX_LIMIT),
            offset: self.offset.max(0),
            sort: self.sort,
            direction: self.direction,
            lat: geo.map(|g| g.lat),
            lng: geo.map(|g| g.lng),
            radius_km: geo.map(|g| g.radius_km),
            filters: self.filters.normalized(),
        }
    }

    /// The active geo restriction, if geo mode is enabled.
    #[must_use]
    pub fn geo(&self) -> Option<GeoBounds> {
        validate_geo(self.lat, self.lng, self.radius_km)
    }

    #[must_use]
    pub fn has_query(&self) -> bool {
        self.query.as_deref().is_some_and(|q| !q.trim().is_empty())
    }

    /// The sort actually applied: Distance without geo mode downgrades to
    /// Rating.
    #[must_use]
    pub fn effective_sort(&self) -> StoreSort {
        if self.sort == StoreSort::Distance && self.geo().is_none() {
            StoreSort::Rating
        } else {
            self.sort
        }
    }
}

fn validate_geo(lat: Option<f64>, lng: Option<f64>, radius_km: Option<f64>) -> Option<GeoBounds> {
    let (lat, lng, radius_km) = (lat?, lng?, radius_km?);
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return None;
    }
    if !(radius_km > 0.0 && radius_km <= MAX_RADIUS_KM) {
        return None;
    }
    Some(GeoBounds {
        lat,
        lng,
        radius_km,
    })
}

fn normalize_text(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// A single page of search output, with the echoed paging descriptor and the
/// total match count (exact for local strategies, best-effort for
/// remote-first).
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult<T> {
    pub items: Vec<T>,
    pub limit: i64,
    pub offset: i64,
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_and_offset_are_clamped_not_rejected() {
        let criteria = SearchCriteria {
            limit: 500,
            offset: -5,
            ..SearchCriteria::default()
        }
        .normalized();

        assert_eq!(criteria.limit, 100);
        assert_eq!(criteria.offset, 0);

        let criteria = SearchCriteria {
            limit: 0,
            ..SearchCriteria::default()
        }
        .normalized();
        assert_eq!(criteria.limit, 1);
    }

    #[test]
    fn blank_query_and_filters_normalize_to_none() {
        let criteria = SearchCriteria {
            query: Some("   ".to_string()),
            filters: StoreFilters {
                city: Some("".to_string()),
                state: Some("  TX ".to_string()),
                ..StoreFilters::default()
            },
            ..SearchCriteria::default()
        }
        .normalized();

        assert!(!criteria.has_query());
        assert!(criteria.filters.city.is_none());
        assert_eq!(criteria.filters.state.as_deref(), Some("TX"));
    }

    #[test]
    fn partial_geo_triple_disables_geo_mode() {
        let criteria = SearchCriteria {
            lat: Some(30.27),
            lng: Some(-97.74),
            radius_km: None,
            ..SearchCriteria::default()
        };
        assert!(criteria.geo().is_none());

        let normalized = criteria.normalized();
        assert!(normalized.lat.is_none());
        assert!(normalized.lng.is_none());
    }

    #[test]
    fn out_of_range_geo_values_disable_geo_mode() {
        let base = SearchCriteria {
            lat: Some(30.0),
            lng: Some(-97.0),
            radius_km: Some(25.0),
            ..SearchCriteria::default()
        };
        assert!(base.geo().is_some());

        let bad_lat = SearchCriteria {
            lat: Some(91.0),
            ..base.clone()
        };
        assert!(bad_lat.geo().is_none());

        let bad_radius = SearchCriteria {
            radius_km: Some(0.0),
            ..base.clone()
        };
        assert!(bad_radius.geo().is_none());

        let huge_radius = SearchCriteria {
            radius_km: Some(501.0),
            ..base
        };
        assert!(huge_radius.geo().is_none());
    }

    #[test]
    fn distance_sort_without_geo_falls_back_to_rating() {
        let criteria = SearchCriteria {
            sort: StoreSort::Distance,
            ..SearchCriteria::default()
        };
        assert_eq!(criteria.effective_sort(), StoreSort::Rating);

        let with_geo = SearchCriteria {
            sort: StoreSort::Distance,
            lat: Some(30.0),
            lng: Some(-97.0),
            radius_km: Some(10.0),
            ..SearchCriteria::default()
        };
        assert_eq!(with_geo.effective_sort(), StoreSort::Distance);
    }

    #[test]
    fn sort_enums_use_wire_names() {
        let sort: StoreSort = serde_json::from_str("\"REVIEW_COUNT\"").expect("should parse");
        assert_eq!(sort, StoreSort::ReviewCount);
        let dir: SortDirection = serde_json::from_str("\"ASC\"").expect("should parse");
        assert_eq!(dir, SortDirection::Asc);
    }
}
