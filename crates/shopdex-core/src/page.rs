//! Offset/limit pagination descriptor.
//!
//! Unlike the criteria-level clamp, which corrects out-of-range values,
//! this primitive is strict: construction rejects invalid input. The
//! planner clamps before constructing one.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PageError {
    #[error("limit must be greater than 0, got {0}")]
    InvalidLimit(i64),
    #[error("offset must be >= 0, got {0}")]
    InvalidOffset(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetLimit {
    limit: i64,
    offset: i64,
}

impl OffsetLimit {
    /// # Errors
    ///
    /// Returns [`PageError`] if `limit < 1` or `offset < 0`.
    pub fn new(limit: i64, offset: i64) -> Result<Self, PageError> {
        if limit < 1 {
            return Err(PageError::InvalidLimit(limit));
        }
        if offset < 0 {
            return Err(PageError::InvalidOffset(offset));
        }
        Ok(Self { limit, offset })
    }

    #[must_use]
    pub fn limit(&self) -> i64 {
        self.limit
    }

    #[must_use]
    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Equivalent page-number view, for backing queries that need one.
    #[must_use]
    pub fn page_number(&self) -> i64 {
        self.offset / self.limit
    }

    #[must_use]
    pub fn next(&self) -> Self {
        Self {
            limit: self.limit,
            offset: self.offset + self.limit,
        }
    }

    #[must_use]
    pub fn previous_or_first(&self) -> Self {
        Self {
            limit: self.limit,
            offset: (self.offset - self.limit).max(0),
        }
    }

    #[must_use]
    pub fn first(&self) -> Self {
        Self {
            limit: self.limit,
            offset: 0,
        }
    }

    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.offset > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_limit_and_offset() {
        assert_eq!(OffsetLimit::new(0, 0), Err(PageError::InvalidLimit(0)));
        assert_eq!(OffsetLimit::new(-3, 0), Err(PageError::InvalidLimit(-3)));
        assert_eq!(OffsetLimit::new(10, -1), Err(PageError::InvalidOffset(-1)));
    }

    #[test]
    fn next_and_previous_step_by_limit() {
        let page = OffsetLimit::new(20, 40).expect("valid page");
        assert_eq!(page.next().offset(), 60);
        assert_eq!(page.previous_or_first().offset(), 20);
        assert!(page.has_previous());
    }

    #[test]
    fn previous_clamps_at_zero() {
        let page = OffsetLimit::new(20, 10).expect("valid page");
        assert_eq!(page.previous_or_first().offset(), 0);

        let first = OffsetLimit::new(20, 0).expect("valid page");
        assert_eq!(first.previous_or_first(), first);
        assert!(!first.has_previous());
    }

    #[test]
    fn page_number_is_offset_over_limit() {
        assert_eq!(OffsetLimit::new(20, 0).expect("valid").page_number(), 0);
        assert_eq!(OffsetLimit::new(20, 40).expect("valid").page_number(), 2);
        // Non-aligned offsets truncate toward the containing page.
        assert_eq!(OffsetLimit::new(20, 50).expect("valid").page_number(), 2);
    }
}
