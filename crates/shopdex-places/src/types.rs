//! Domain types handed to callers, plus the provider wire shapes.

use serde::Deserialize;

/// One hit from the provider's text search. Carries discovery fields only;
/// contact details require a follow-up [`details`](crate::PlacesGateway::details) call.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceHit {
    pub place_id: String,
    pub name: String,
    pub address: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub rating: Option<f64>,
    pub rating_count: Option<i32>,
}

/// Full place details from the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceProfile {
    pub place_id: String,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub rating: Option<f64>,
    pub rating_count: Option<i32>,
    pub services: Vec<String>,
}

// Wire shapes below mirror the provider's JSON field names verbatim.

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub results: Vec<SearchResultItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResultItem {
    pub place_id: String,
    pub name: String,
    pub formatted_address: Option<String>,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<i32>,
    pub geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DetailsResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    pub result: Option<DetailsResultItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DetailsResultItem {
    pub place_id: String,
    pub name: String,
    pub formatted_address: Option<String>,
    pub formatted_phone_number: Option<String>,
    pub website: Option<String>,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<i32>,
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub types: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Geometry {
    pub location: Option<Location>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Location {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl SearchResultItem {
    pub(crate) fn into_hit(self) -> PlaceHit {
        let (lat, lng) = split_location(self.geometry);
        PlaceHit {
            place_id: self.place_id,
            name: self.name,
            address: self.formatted_address,
            lat,
            lng,
            rating: self.rating,
            rating_count: self.user_ratings_total,
        }
    }
}

impl DetailsResultItem {
    pub(crate) fn into_profile(self) -> PlaceProfile {
        let (lat, lng) = split_location(self.geometry);
        PlaceProfile {
            place_id: self.place_id,
            name: self.name,
            address: self.formatted_address,
            phone: self.formatted_phone_number,
            website: self.website,
            lat,
            lng,
            rating: self.rating,
            rating_count: self.user_ratings_total,
            services: self.types,
        }
    }
}

fn split_location(geometry: Option<Geometry>) -> (Option<f64>, Option<f64>) {
    match geometry.and_then(|g| g.location) {
        Some(loc) => (loc.lat, loc.lng),
        None => (None, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_item_maps_provider_field_names() {
        let json = serde_json::json!({
            "place_id": "ChIJx",
            "name": "Bob's Garage",
            "formatted_address": "1 Main St, Austin, TX",
            "rating": 4.5,
            "user_ratings_total": 321,
            "geometry": { "location": { "lat": 30.1, "lng": -97.7 } }
        });
        let item: SearchResultItem = serde_json::from_value(json).expect("should parse");
        let hit = item.into_hit();

        assert_eq!(hit.place_id, "ChIJx");
        assert_eq!(hit.lat, Some(30.1));
        assert_eq!(hit.rating_count, Some(321));
    }

    #[test]
    fn missing_geometry_yields_no_coordinates() {
        let json = serde_json::json!({ "place_id": "p", "name": "n" });
        let item: SearchResultItem = serde_json::from_value(json).expect("should parse");
        let hit = item.into_hit();

        assert!(hit.lat.is_none());
        assert!(hit.lng.is_none());
        assert!(hit.address.is_none());
    }

    #[test]
    fn details_item_carries_contact_fields_and_types() {
        let json = serde_json::json!({
            "place_id": "p",
            "name": "n",
            "formatted_phone_number": "+1 512-555-0100",
            "website": "https://example.com",
            "types": ["car_repair", "establishment"]
        });
        let item: DetailsResultItem = serde_json::from_value(json).expect("should parse");
        let profile = item.into_profile();

        assert_eq!(profile.phone.as_deref(), Some("+1 512-555-0100"));
        assert_eq!(profile.services, vec!["car_repair", "establishment"]);
    }
}
