//! Post-filter pass for the remote-first path: predicates the provider
//! cannot express, applied over the reconciled, gateway-ordered list.

use shopdex_core::StoreFilters;
use shopdex_db::StoreRow;

/// Whether `store` survives every active filter.
#[must_use]
pub fn matches_filters(store: &StoreRow, filters: &StoreFilters) -> bool {
    if let Some(min_rating) = filters.min_rating {
        if store.rating.is_none_or(|r| r < min_rating) {
            return false;
        }
    }
    if let Some(needle) = filters.services_contains.as_deref() {
        let haystack = store.services_text.as_deref().unwrap_or_default();
        if !haystack.to_lowercase().contains(&needle.to_lowercase()) {
            return false;
        }
    }
    if let Some(city) = filters.city.as_deref() {
        if !store
            .city
            .as_deref()
            .is_some_and(|c| c.eq_ignore_ascii_case(city))
        {
            return false;
        }
    }
    if let Some(state) = filters.state.as_deref() {
        if !store
            .state
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case(state))
        {
            return false;
        }
    }
    if let Some(wants_website) = filters.has_website {
        let has = store.website.as_deref().is_some_and(|w| !w.trim().is_empty());
        if wants_website != has {
            return false;
        }
    }
    if let Some(wants_phone) = filters.has_phone {
        let has = store.phone.as_deref().is_some_and(|p| !p.trim().is_empty());
        if wants_phone != has {
            return false;
        }
    }
    true
}

/// Drop stores failing the active filters. Input order is preserved among
/// survivors.
#[must_use]
pub fn apply_filters(stores: Vec<StoreRow>, filters: &StoreFilters) -> Vec<StoreRow> {
    stores
        .into_iter()
        .filter(|store| matches_filters(store, filters))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn store(name: &str) -> StoreRow {
        StoreRow {
            id: Uuid::new_v4(),
            place_id: None,
            name: name.to_string(),
            address: None,
            city: Some("Austin".to_string()),
            state: Some("TX".to_string()),
            postal_code: None,
            country: None,
            phone: Some("+1 512-555-0100".to_string()),
            website: Some("https://example.com".to_string()),
            services_text: Some("Oil Change, Brake Repair".to_string()),
            lat: None,
            lng: None,
            rating: Some(4.2),
            rating_count: Some(31),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn empty_filters_keep_everything() {
        assert!(matches_filters(&store("a"), &StoreFilters::default()));
    }

    #[test]
    fn min_rating_drops_low_and_unrated_stores() {
        let filters = StoreFilters {
            min_rating: Some(4.5),
            ..StoreFilters::default()
        };
        assert!(!matches_filters(&store("a"), &filters));

        let mut unrated = store("b");
        unrated.rating = None;
        assert!(!matches_filters(&unrated, &filters));

        let relaxed = StoreFilters {
            min_rating: Some(4.0),
            ..StoreFilters::default()
        };
        assert!(matches_filters(&store("c"), &relaxed));
    }

    #[test]
    fn services_filter_is_a_case_insensitive_substring() {
        let filters = StoreFilters {
            services_contains: Some("brake".to_string()),
            ..StoreFilters::default()
        };
        assert!(matches_filters(&store("a"), &filters));

        let missing = StoreFilters {
            services_contains: Some("transmission".to_string()),
            ..StoreFilters::default()
        };
        assert!(!matches_filters(&store("b"), &missing));
    }

    #[test]
    fn services_filter_treats_like_metacharacters_literally() {
        let wildcard = StoreFilters {
            services_contains: Some("%".to_string()),
            ..StoreFilters::default()
        };
        assert!(!matches_filters(&store("a"), &wildcard));

        let mut discount = store("b");
        discount.services_text = Some("100% synthetic oil".to_string());
        let literal = StoreFilters {
            services_contains: Some("100%".to_string()),
            ..StoreFilters::default()
        };
        assert!(matches_filters(&discount, &literal));
        assert!(!matches_filters(&store("c"), &literal));
    }

    #[test]
    fn city_and_state_compare_case_insensitively() {
        let filters = StoreFilters {
            city: Some("AUSTIN".to_string()),
            state: Some("tx".to_string()),
            ..StoreFilters::default()
        };
        assert!(matches_filters(&store("a"), &filters));

        let elsewhere = StoreFilters {
            city: Some("Dallas".to_string()),
            ..StoreFilters::default()
        };
        assert!(!matches_filters(&store("b"), &elsewhere));
    }

    #[test]
    fn has_website_matches_blankness_both_ways() {
        let wants = StoreFilters {
            has_website: Some(true),
            ..StoreFilters::default()
        };
        assert!(matches_filters(&store("a"), &wants));

        let mut blank = store("b");
        blank.website = Some("   ".to_string());
        assert!(!matches_filters(&blank, &wants));

        let wants_none = StoreFilters {
            has_website: Some(false),
            ..StoreFilters::default()
        };
        let mut none = store("c");
        none.website = None;
        assert!(matches_filters(&none, &wants_none));
        assert!(!matches_filters(&store("d"), &wants_none));
    }

    #[test]
    fn apply_filters_preserves_input_order() {
        let mut low = store("low");
        low.rating = Some(3.0);
        let first = store("first");
        let second = store("second");
        let first_id = first.id;
        let second_id = second.id;

        let filters = StoreFilters {
            min_rating: Some(4.0),
            ..StoreFilters::default()
        };
        let out = apply_filters(vec![first, low, second], &filters);

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].id, first_id);
        assert_eq!(out[1].id, second_id);
    }
}
