//! Store endpoints: search, lookups, provider sync, compare, and creation.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shopdex_core::{SearchCriteria, SortDirection, StoreFilters, StoreSort};
use shopdex_db::{NewStore, StoreRow};

use super::{map_search_error, ApiError, ApiResponse, AppState, ResponseMeta};
use crate::middleware::RequestId;

/// Query parameters accepted by `GET /api/stores/search`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(super) struct SearchParams {
    q: Option<String>,
    limit: Option<i64>,
    offset: Option<i64>,
    sort: Option<StoreSort>,
    direction: Option<SortDirection>,
    lat: Option<f64>,
    lng: Option<f64>,
    radius_km: Option<f64>,
    min_rating: Option<f64>,
    services: Option<String>,
    city: Option<String>,
    state: Option<String>,
    has_website: Option<bool>,
    has_phone: Option<bool>,
    open_now: Option<bool>,
}

impl SearchParams {
    fn into_criteria(self) -> SearchCriteria {
        let defaults = SearchCriteria::default();
        SearchCriteria {
            query: self.q,
            limit: self.limit.unwrap_or(defaults.limit),
            offset: self.offset.unwrap_or(defaults.offset),
            sort: self.sort.unwrap_or_default(),
            direction: self.direction.unwrap_or_default(),
            lat: self.lat,
            lng: self.lng,
            radius_km: self.radius_km,
            filters: StoreFilters {
                min_rating: self.min_rating,
                services_contains: self.services,
                city: self.city,
                state: self.state,
                has_website: self.has_website,
                has_phone: self.has_phone,
                open_now: self.open_now,
            },
        }
    }
}

/// One store in an API response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct StoreItem {
    pub id: Uuid,
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

impl From<StoreRow> for StoreItem {
    fn from(row: StoreRow) -> Self {
        Self {
            id: row.id,
            place_id: row.place_id,
            name: row.name,
            address: row.address,
            city: row.city,
            state: row.state,
            postal_code: row.postal_code,
            country: row.country,
            phone: row.phone,
            website: row.website,
            services_text: row.services_text,
            lat: row.lat,
            lng: row.lng,
            rating: row.rating,
            rating_count: row.rating_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SearchPage {
    pub items: Vec<StoreItem>,
    pub limit: i64,
    pub offset: i64,
    pub total: i64,
}

/// `GET /api/stores/search`
pub(super) async fn search_stores(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .planner
        .search(params.into_criteria())
        .await
        .map_err(|e| map_search_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: SearchPage {
            items: result.items.into_iter().map(StoreItem::from).collect(),
            limit: result.limit,
            offset: result.offset,
            total: result.total,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// `GET /api/stores/{id}`
pub(super) async fn get_store(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let row = state
        .planner
        .get_store(id)
        .await
        .map_err(|e| map_search_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: StoreItem::from(row),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// `GET /api/stores/place/{place_id}`
pub(super) async fn get_store_by_place_id(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(place_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let row = state
        .planner
        .get_by_place_id(&place_id)
        .await
        .map_err(|e| map_search_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: StoreItem::from(row),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// `POST /api/stores/place/{place_id}/sync`
pub(super) async fn sync_store_details(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(place_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let row = state
        .planner
        .sync_details(&place_id)
        .await
        .map_err(|e| map_search_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: StoreItem::from(row),
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[derive(Debug, Deserialize)]
pub(super) struct CompareParams {
    ids: String,
}

/// `GET /api/stores/compare?ids=a,b,c`
///
/// Response order follows the requested id order; unknown ids are skipped.
pub(super) async fn compare_stores(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<CompareParams>,
) -> Result<impl IntoResponse, ApiError> {
    let mut ids = Vec::new();
    for raw in params.ids.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let id = Uuid::parse_str(raw).map_err(|_| {
            ApiError::new(
                req_id.0.clone(),
                "bad_request",
                format!("'{raw}' is not a valid store id"),
            )
        })?;
        ids.push(id);
    }

    let rows = state
        .planner
        .get_by_ids_ordered(&ids)
        .await
        .map_err(|e| map_search_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(StoreItem::from).collect::<Vec<_>>(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Body accepted by `POST /api/stores`. Locally created stores carry no
/// external place id.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CreateStoreBody {
    name: String,
    address: Option<String>,
    city: Option<String>,
    state: Option<String>,
    postal_code: Option<String>,
    country: Option<String>,
    phone: Option<String>,
    website: Option<String>,
    services_text: Option<String>,
    lat: Option<f64>,
    lng: Option<f64>,
}

/// `POST /api/stores`
pub(super) async fn create_store(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<CreateStoreBody>,
) -> Result<impl IntoResponse, ApiError> {
    if body.name.trim().is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "name must not be blank",
        ));
    }

    let new_store = NewStore {
        name: body.name,
        address: body.address,
        city: body.city,
        state: body.state,
        postal_code: body.postal_code,
        country: body.country,
        phone: body.phone,
        website: body.website,
        services_text: body.services_text,
        lat: body.lat,
        lng: body.lng,
    };
    let row = state
        .planner
        .create_store(&new_store)
        .await
        .map_err(|e| map_search_error(req_id.0.clone(), &e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: StoreItem::from(row),
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}
