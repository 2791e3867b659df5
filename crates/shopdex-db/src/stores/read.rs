//! Read queries for the `stores` table: listing, radius, and hybrid
//! full-text/trigram search, each with a matching exact-count query.

use sqlx::postgres::PgArguments;
use sqlx::query::{QueryAs, QueryScalar};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use shopdex_core::criteria::GeoBounds;
use shopdex_core::{OffsetLimit, SortDirection, StoreFilters, StoreSort};

use super::types::StoreRow;
use super::STORE_COLUMNS;
use crate::DbError;

/// Attribute filter clause. Always bound as `$1..$6` (min_rating,
/// services_contains, city, state, has_website, has_phone); a NULL bind
/// disables the corresponding predicate, mirroring the post-filter pass on
/// the remote-first path. The services predicate is a literal
/// case-insensitive substring match; `%`/`_` in the bound value carry no
/// wildcard meaning, same as the post-filter.
const FILTER_SQL: &str = "($1::float8 IS NULL OR rating >= $1) \
     AND ($2::text IS NULL \
          OR position(lower($2) in lower(coalesce(services_text, ''))) > 0) \
     AND ($3::text IS NULL OR LOWER(city) = LOWER($3)) \
     AND ($4::text IS NULL OR LOWER(state) = LOWER($4)) \
     AND ($5::bool IS NULL \
          OR ($5 AND website IS NOT NULL AND website <> '') \
          OR (NOT $5 AND (website IS NULL OR website = ''))) \
     AND ($6::bool IS NULL \
          OR ($6 AND phone IS NOT NULL AND phone <> '') \
          OR (NOT $6 AND (phone IS NULL OR phone = '')))";

/// Haversine great-circle distance in km between a row's coordinates and the
/// bound center point. `lat_ph`/`lng_ph` are the placeholder numbers for the
/// center latitude and longitude.
fn distance_sql(lat_ph: u8, lng_ph: u8) -> String {
    format!(
        "(2 * 6371 * asin(sqrt( \
             power(sin((radians(lat) - radians(${lat_ph})) / 2), 2) \
             + cos(radians(${lat_ph})) * cos(radians(lat)) \
             * power(sin((radians(lng) - radians(${lng_ph})) / 2), 2))))"
    )
}

fn bind_filters<'q>(
    query: QueryAs<'q, Postgres, StoreRow, PgArguments>,
    filters: &'q StoreFilters,
) -> QueryAs<'q, Postgres, StoreRow, PgArguments> {
    query
        .bind(filters.min_rating)
        .bind(filters.services_contains.as_deref())
        .bind(filters.city.as_deref())
        .bind(filters.state.as_deref())
        .bind(filters.has_website)
        .bind(filters.has_phone)
}

fn bind_filters_scalar<'q>(
    query: QueryScalar<'q, Postgres, i64, PgArguments>,
    filters: &'q StoreFilters,
) -> QueryScalar<'q, Postgres, i64, PgArguments> {
    query
        .bind(filters.min_rating)
        .bind(filters.services_contains.as_deref())
        .bind(filters.city.as_deref())
        .bind(filters.state.as_deref())
        .bind(filters.has_website)
        .bind(filters.has_phone)
}

fn sort_column(sort: StoreSort) -> &'static str {
    match sort {
        StoreSort::Rating | StoreSort::Distance => "rating",
        StoreSort::Name => "name",
        StoreSort::ReviewCount => "rating_count",
    }
}

fn direction_sql(direction: SortDirection) -> &'static str {
    match direction {
        SortDirection::Asc => "ASC",
        SortDirection::Desc => "DESC",
    }
}

/// Fetch a store by primary key.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row exists, [`DbError::Sqlx`] on
/// query failure.
pub async fn get_store(pool: &PgPool, id: Uuid) -> Result<StoreRow, DbError> {
    let sql = format!("SELECT {STORE_COLUMNS} FROM stores WHERE id = $1");
    sqlx::query_as::<_, StoreRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(DbError::NotFound)
}

/// Fetch a store by its external place id.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row carries the id, [`DbError::Sqlx`]
/// on query failure.
pub async fn get_store_by_place_id(pool: &PgPool, place_id: &str) -> Result<StoreRow, DbError> {
    let sql = format!("SELECT {STORE_COLUMNS} FROM stores WHERE place_id = $1");
    sqlx::query_as::<_, StoreRow>(&sql)
        .bind(place_id)
        .fetch_optional(pool)
        .await?
        .ok_or(DbError::NotFound)
}

/// Fetch stores whose ids are in `ids`. Row order is unspecified; callers
/// needing the input order re-sort on their side.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn list_stores_by_ids(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<StoreRow>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let sql = format!("SELECT {STORE_COLUMNS} FROM stores WHERE id = ANY($1)");
    sqlx::query_as::<_, StoreRow>(&sql)
        .bind(ids)
        .fetch_all(pool)
        .await
}

/// Fetch stores whose external place ids are in `place_ids`. Row order is
/// unspecified.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn list_stores_by_place_ids(
    pool: &PgPool,
    place_ids: &[String],
) -> Result<Vec<StoreRow>, sqlx::Error> {
    if place_ids.is_empty() {
        return Ok(Vec::new());
    }
    let sql = format!("SELECT {STORE_COLUMNS} FROM stores WHERE place_id = ANY($1)");
    sqlx::query_as::<_, StoreRow>(&sql)
        .bind(place_ids)
        .fetch_all(pool)
        .await
}

/// Filtered listing over the whole table, ordered by the requested sort.
///
/// Distance sort is not meaningful here; the planner downgrades it to
/// rating before calling.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn list_stores(
    pool: &PgPool,
    filters: &StoreFilters,
    sort: StoreSort,
    direction: SortDirection,
    page: OffsetLimit,
) -> Result<Vec<StoreRow>, sqlx::Error> {
    let sql = format!(
        "SELECT {STORE_COLUMNS} FROM stores \
         WHERE {FILTER_SQL} \
         ORDER BY {col} {dir} NULLS LAST, id ASC \
         LIMIT $7 OFFSET $8",
        col = sort_column(sort),
        dir = direction_sql(direction),
    );
    bind_filters(sqlx::query_as::<_, StoreRow>(&sql), filters)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(pool)
        .await
}

/// Exact row count matching [`list_stores`].
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn count_stores(pool: &PgPool, filters: &StoreFilters) -> Result<i64, sqlx::Error> {
    let sql = format!("SELECT COUNT(*) FROM stores WHERE {FILTER_SQL}");
    bind_filters_scalar(sqlx::query_scalar::<_, i64>(&sql), filters)
        .fetch_one(pool)
        .await
}

/// Stores with non-null coordinates within `geo.radius_km` of the center,
/// ordered by distance ascending.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn search_radius(
    pool: &PgPool,
    geo: GeoBounds,
    filters: &StoreFilters,
    page: OffsetLimit,
) -> Result<Vec<StoreRow>, sqlx::Error> {
    let dist = distance_sql(7, 8);
    let sql = format!(
        "SELECT {STORE_COLUMNS} FROM stores \
         WHERE lat IS NOT NULL AND lng IS NOT NULL \
           AND {FILTER_SQL} \
           AND {dist} <= $9 \
         ORDER BY {dist} ASC, id ASC \
         LIMIT $10 OFFSET $11"
    );
    bind_filters(sqlx::query_as::<_, StoreRow>(&sql), filters)
        .bind(geo.lat)
        .bind(geo.lng)
        .bind(geo.radius_km)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(pool)
        .await
}

/// Exact row count matching [`search_radius`].
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn count_radius(
    pool: &PgPool,
    geo: GeoBounds,
    filters: &StoreFilters,
) -> Result<i64, sqlx::Error> {
    let dist = distance_sql(7, 8);
    let sql = format!(
        "SELECT COUNT(*) FROM stores \
         WHERE lat IS NOT NULL AND lng IS NOT NULL \
           AND {FILTER_SQL} \
           AND {dist} <= $9"
    );
    bind_filters_scalar(sqlx::query_scalar::<_, i64>(&sql), filters)
        .bind(geo.lat)
        .bind(geo.lng)
        .bind(geo.radius_km)
        .fetch_one(pool)
        .await
}

/// Hybrid text search: a row matches when its indexed text vector matches
/// the query OR its name's trigram similarity exceeds `min_similarity`.
/// Ranked by the greater of text rank and similarity, descending; rating
/// then id break ties. With `geo` present, the radius bound from
/// [`search_radius`] additionally applies.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn search_text(
    pool: &PgPool,
    query: &str,
    min_similarity: f64,
    geo: Option<GeoBounds>,
    filters: &StoreFilters,
    page: OffsetLimit,
) -> Result<Vec<StoreRow>, sqlx::Error> {
    let rank = "GREATEST(ts_rank(search_vector, plainto_tsquery('english', $7)), \
         similarity(name, $7))";
    let sql = if geo.is_some() {
        let dist = distance_sql(9, 10);
        format!(
            "SELECT {STORE_COLUMNS} FROM stores \
             WHERE (search_vector @@ plainto_tsquery('english', $7) \
                    OR similarity(name, $7) > $8) \
               AND {FILTER_SQL} \
               AND lat IS NOT NULL AND lng IS NOT NULL \
               AND {dist} <= $11 \
             ORDER BY {rank} DESC, rating DESC NULLS LAST, id ASC \
             LIMIT $12 OFFSET $13"
        )
    } else {
        format!(
            "SELECT {STORE_COLUMNS} FROM stores \
             WHERE (search_vector @@ plainto_tsquery('english', $7) \
                    OR similarity(name, $7) > $8) \
               AND {FILTER_SQL} \
             ORDER BY {rank} DESC, rating DESC NULLS LAST, id ASC \
             LIMIT $9 OFFSET $10"
        )
    };

    let mut q = bind_filters(sqlx::query_as::<_, StoreRow>(&sql), filters)
        .bind(query)
        .bind(min_similarity);
    if let Some(geo) = geo {
        q = q.bind(geo.lat).bind(geo.lng).bind(geo.radius_km);
    }
    q.bind(page.limit()).bind(page.offset()).fetch_all(pool).await
}

/// Exact row count matching [`search_text`].
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn count_text(
    pool: &PgPool,
    query: &str,
    min_similarity: f64,
    geo: Option<GeoBounds>,
    filters: &StoreFilters,
) -> Result<i64, sqlx::Error> {
    let sql = if geo.is_some() {
        let dist = distance_sql(9, 10);
        format!(
            "SELECT COUNT(*) FROM stores \
             WHERE (search_vector @@ plainto_tsquery('english', $7) \
                    OR similarity(name, $7) > $8) \
               AND {FILTER_SQL} \
               AND lat IS NOT NULL AND lng IS NOT NULL \
               AND {dist} <= $11"
        )
    } else {
        format!(
            "SELECT COUNT(*) FROM stores \
             WHERE (search_vector @@ plainto_tsquery('english', $7) \
                    OR similarity(name, $7) > $8) \
               AND {FILTER_SQL}"
        )
    };

    let mut q = bind_filters_scalar(sqlx::query_scalar::<_, i64>(&sql), filters)
        .bind(query)
        .bind(min_similarity);
    if let Some(geo) = geo {
        q = q.bind(geo.lat).bind(geo.lng).bind(geo.radius_km);
    }
    q.fetch_one(pool).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_sql_embeds_placeholders() {
        let dist = distance_sql(7, 8);
        assert!(dist.contains("$7"));
        assert!(dist.contains("$8"));
        assert!(dist.contains("6371"));
    }

    #[test]
    fn sort_column_covers_every_variant() {
        assert_eq!(sort_column(StoreSort::Rating), "rating");
        assert_eq!(sort_column(StoreSort::Name), "name");
        assert_eq!(sort_column(StoreSort::ReviewCount), "rating_count");
        // Distance never reaches the listing query; rating is the fallback.
        assert_eq!(sort_column(StoreSort::Distance), "rating");
    }
}
