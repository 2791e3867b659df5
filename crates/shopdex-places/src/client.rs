//! HTTP client for the Google-Places-style provider REST API.
//!
//! Wraps `reqwest` with provider-specific error handling, API key
//! management, and typed response deserialization. Every endpoint checks the
//! `"status"` field in the JSON envelope: anything outside
//! {OK, ZERO_RESULTS} is surfaced as [`PlacesError::Provider`].

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::PlacesError;
use crate::gateway::PlacesGateway;
use crate::types::{DetailsResponse, PlaceHit, PlaceProfile, SearchResponse};

const STATUS_OK: &str = "OK";
const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";

const DETAILS_FIELDS: &str = "place_id,name,formatted_address,formatted_phone_number,website,geometry,rating,user_ratings_total,types";

/// Client for the remote places provider.
///
/// Use [`GooglePlacesClient::new`] for production or
/// [`GooglePlacesClient::with_base_url`] to point at a mock server in tests.
pub struct GooglePlacesClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl GooglePlacesClient {
    const DEFAULT_BASE_URL: &'static str = "https://maps.googleapis.com/maps/api/place";

    /// Creates a new client pointed at the production provider API.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, PlacesError> {
        Self::with_base_url(api_key, timeout_secs, Self::DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`PlacesError::Provider`] if `base_url` is
    /// not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("shopdex/0.1 (store-directory)")
            .build()?;

        // Normalise: the base URL must end with exactly one slash so that
        // Url::join appends the endpoint path instead of replacing the last
        // path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| PlacesError::Provider {
            status: "INVALID_BASE_URL".to_string(),
            message: format!("invalid base URL '{base_url}': {e}"),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Builds the full endpoint URL with percent-encoded query parameters.
    fn build_url(&self, endpoint: &str, extra: &[(&str, &str)]) -> Result<Url, PlacesError> {
        let mut url = self
            .base_url
            .join(endpoint)
            .map_err(|e| PlacesError::Provider {
                status: "INVALID_BASE_URL".to_string(),
                message: format!("cannot join endpoint '{endpoint}': {e}"),
            })?;
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in extra {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("key", &self.api_key);
        }
        Ok(url)
    }

    /// Sends a GET request, asserts a 2xx HTTP status, and parses the body
    /// as JSON.
    async fn request_json(&self, url: &Url) -> Result<serde_json::Value, PlacesError> {
        let response = self.client.get(url.clone()).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| PlacesError::Deserialize {
            context: url.path().to_string(),
            source: e,
        })
    }

    /// Rejects any provider status outside {OK, ZERO_RESULTS}.
    fn check_status(status: &str, error_message: Option<&str>) -> Result<(), PlacesError> {
        if status.eq_ignore_ascii_case(STATUS_OK)
            || status.eq_ignore_ascii_case(STATUS_ZERO_RESULTS)
        {
            return Ok(());
        }
        Err(PlacesError::Provider {
            status: status.to_string(),
            message: error_message.unwrap_or("no error message").to_string(),
        })
    }
}

impl PlacesGateway for GooglePlacesClient {
    /// Text search against `/textsearch/json`, truncated client-side to
    /// `limit` hits in provider ranking order.
    async fn search(
        &self,
        query: &str,
        limit: i64,
        open_now: bool,
    ) -> Result<Vec<PlaceHit>, PlacesError> {
        let mut params = vec![("query", query)];
        if open_now {
            params.push(("opennow", "true"));
        }
        let url = self.build_url("textsearch/json", &params)?;
        let body = self.request_json(&url).await?;

        let response: SearchResponse =
            serde_json::from_value(body).map_err(|e| PlacesError::Deserialize {
                context: format!("textsearch(query={query})"),
                source: e,
            })?;
        Self::check_status(&response.status, response.error_message.as_deref())?;
        tracing::debug!(
            status = %response.status,
            result_count = response.results.len(),
            "places text search answered"
        );

        let take = usize::try_from(limit.max(0)).unwrap_or(0);
        Ok(response
            .results
            .into_iter()
            .take(take)
            .map(crate::types::SearchResultItem::into_hit)
            .collect())
    }

    /// Place details from `/details/json`. `Ok(None)` when the provider
    /// reports ZERO_RESULTS or omits the result object.
    async fn details(&self, place_id: &str) -> Result<Option<PlaceProfile>, PlacesError> {
        let url = self.build_url(
            "details/json",
            &[("place_id", place_id), ("fields", DETAILS_FIELDS)],
        )?;
        let body = self.request_json(&url).await?;

        let response: DetailsResponse =
            serde_json::from_value(body).map_err(|e| PlacesError::Deserialize {
                context: format!("details(place_id={place_id})"),
                source: e,
            })?;
        Self::check_status(&response.status, response.error_message.as_deref())?;
        tracing::debug!(
            status = %response.status,
            found = response.result.is_some(),
            place_id,
            "places details answered"
        );

        Ok(response
            .result
            .map(crate::types::DetailsResultItem::into_profile))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> GooglePlacesClient {
        GooglePlacesClient::with_base_url("test-key", 10, base_url)
            .expect("client construction should not fail")
    }

    #[test]
    fn build_url_appends_endpoint_and_key() {
        let client = test_client("https://maps.googleapis.com/maps/api/place");
        let url = client
            .build_url("textsearch/json", &[("query", "brakes")])
            .expect("should build");
        assert_eq!(
            url.as_str(),
            "https://maps.googleapis.com/maps/api/place/textsearch/json?query=brakes&key=test-key"
        );
    }

    #[test]
    fn build_url_tolerates_trailing_slash() {
        let client = test_client("http://127.0.0.1:9000/");
        let url = client
            .build_url("details/json", &[("place_id", "p1")])
            .expect("should build");
        assert!(url.as_str().starts_with("http://127.0.0.1:9000/details/json?"));
    }

    #[test]
    fn build_url_encodes_special_characters() {
        let client = test_client("http://127.0.0.1:9000");
        let url = client
            .build_url("textsearch/json", &[("query", "Bob's Garage & Sons")])
            .expect("should build");
        // The ampersand inside the value must not split the pair.
        assert_eq!(url.query_pairs().count(), 2, "got {url}");
        let (_, value) = url
            .query_pairs()
            .find(|(k, _)| k == "query")
            .expect("query pair present");
        assert_eq!(value, "Bob's Garage & Sons");
    }

    #[test]
    fn status_check_accepts_ok_and_zero_results_only() {
        assert!(GooglePlacesClient::check_status("OK", None).is_ok());
        assert!(GooglePlacesClient::check_status("ZERO_RESULTS", None).is_ok());

        let err = GooglePlacesClient::check_status("OVER_QUERY_LIMIT", Some("quota"))
            .expect_err("should fail");
        assert!(
            matches!(err, PlacesError::Provider { status, .. } if status == "OVER_QUERY_LIMIT")
        );
    }
}
