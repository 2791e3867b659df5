use shopdex_core::PageError;
use shopdex_db::DbError;
use shopdex_places::PlacesError;
use thiserror::Error;

/// Failure modes of a discovery-engine operation.
#[derive(Debug, Error)]
pub enum SearchError {
    /// A lookup by store id or external place id missed. Terminal; the
    /// engine does not retry.
    #[error("store not found")]
    NotFound,

    /// The remote provider timed out or answered with a bad status. The
    /// whole request fails; there is no fallback to stale local data.
    #[error("places provider unavailable: {0}")]
    Upstream(#[from] PlacesError),

    /// Local storage failure. Fatal for the request.
    #[error(transparent)]
    Db(DbError),

    #[error(transparent)]
    Page(#[from] PageError),
}

impl From<DbError> for SearchError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound => SearchError::NotFound,
            other => SearchError::Db(other),
        }
    }
}

impl From<sqlx::Error> for SearchError {
    fn from(err: sqlx::Error) -> Self {
        SearchError::Db(DbError::Sqlx(err))
    }
}
