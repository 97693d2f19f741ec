//! # Paging Queries
//!
//! [`PageQuery`] is the validated cursor/order/limit triple consumed by
//! list-style endpoints. Handlers build one from raw request parameters via
//! [`PageQuery::new`] (or [`PageQuery::with_config`] when page-size bounds
//! come from configuration).
//!
//! ## Rules
//!
//! - An empty order means ascending.
//! - A zero limit means the configured default page size.
//! - Negative limits and limits above the configured maximum are rejected.
//! - The cursor is opaque here; [`PageQuery::cursor_i64`] interprets it for
//!   integer-keyed tables.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PageQueryError;

/// Default page size when the request does not specify a limit.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Largest page size a request may ask for.
pub const MAX_PAGE_SIZE: u32 = 200;

/// Sort direction of a paged listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    /// Oldest first.
    #[default]
    Asc,
    /// Newest first.
    Desc,
}

impl Order {
    /// Return the query-string representation of this order.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Order {
    type Err = PageQueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(PageQueryError::InvalidOrder(other.to_string())),
        }
    }
}

/// Page-size bounds applied when building a [`PageQuery`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingConfig {
    /// Page size used when the request passes no limit (or zero).
    pub default_limit: u32,
    /// Largest accepted limit.
    pub max_limit: u32,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_PAGE_SIZE,
            max_limit: MAX_PAGE_SIZE,
        }
    }
}

impl PagingConfig {
    /// Build paging bounds from the process environment.
    ///
    /// Reads `HORIZON_DEFAULT_PAGE_SIZE` and `HORIZON_MAX_PAGE_SIZE`.
    /// Missing or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build paging bounds from an arbitrary key lookup.
    ///
    /// The default limit is clamped to the maximum, and a zero maximum is
    /// treated as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str, fallback: u32| {
            lookup(key)
                .and_then(|s| s.trim().parse::<u32>().ok())
                .filter(|&v| v > 0)
                .unwrap_or(fallback)
        };

        let max_limit = read("HORIZON_MAX_PAGE_SIZE", MAX_PAGE_SIZE);
        let default_limit = read("HORIZON_DEFAULT_PAGE_SIZE", DEFAULT_PAGE_SIZE).min(max_limit);

        Self {
            default_limit,
            max_limit,
        }
    }
}

/// A validated cursor/order/limit triple.
///
/// `PageQuery::default()` is the zero value returned by request extractors
/// after a failure; it is never produced by a successful constructor call
/// because a successful call always resolves the limit to a positive value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageQuery {
    /// Opaque position marker; empty means "from the start".
    pub cursor: String,
    /// Sort direction.
    pub order: Order,
    /// Page size.
    pub limit: u32,
}

impl PageQuery {
    /// Build a page query with the default page-size bounds.
    ///
    /// # Errors
    ///
    /// Returns [`PageQueryError::InvalidOrder`] for an order other than
    /// `""`, `"asc"`, `"desc"`, and [`PageQueryError::InvalidLimit`] for a
    /// negative limit or one above [`MAX_PAGE_SIZE`].
    pub fn new(
        cursor: impl Into<String>,
        order: &str,
        limit: i32,
    ) -> Result<Self, PageQueryError> {
        Self::with_config(cursor, order, limit, &PagingConfig::default())
    }

    /// Build a page query with explicit page-size bounds.
    ///
    /// # Errors
    ///
    /// See [`PageQuery::new`]; the maximum is `config.max_limit`.
    pub fn with_config(
        cursor: impl Into<String>,
        order: &str,
        limit: i32,
        config: &PagingConfig,
    ) -> Result<Self, PageQueryError> {
        let order = if order.is_empty() {
            Order::Asc
        } else {
            order.parse()?
        };

        let limit = match u32::try_from(limit) {
            Ok(0) => config.default_limit,
            Ok(n) if n <= config.max_limit => n,
            _ => {
                return Err(PageQueryError::InvalidLimit {
                    limit: i64::from(limit),
                    max: config.max_limit,
                })
            }
        };

        Ok(Self {
            cursor: cursor.into(),
            order,
            limit,
        })
    }

    /// Interpret the cursor as an integer paging token.
    ///
    /// An empty cursor starts from the beginning of the ordering: `0` when
    /// ascending and `i64::MAX` when descending.
    ///
    /// # Errors
    ///
    /// Returns [`PageQueryError::InvalidCursor`] if the cursor is not a
    /// non-negative base-10 integer.
    pub fn cursor_i64(&self) -> Result<i64, PageQueryError> {
        if self.cursor.is_empty() {
            return Ok(match self.order {
                Order::Asc => 0,
                Order::Desc => i64::MAX,
            });
        }

        match self.cursor.parse::<i64>() {
            Ok(n) if n >= 0 => Ok(n),
            _ => Err(PageQueryError::InvalidCursor(self.cursor.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_order_defaults_to_asc() {
        let q = PageQuery::new("", "", 5).unwrap();
        assert_eq!(q.order, Order::Asc);
        assert_eq!(q.limit, 5);
    }

    #[test]
    fn zero_limit_uses_default() {
        let q = PageQuery::new("abc", "desc", 0).unwrap();
        assert_eq!(q.cursor, "abc");
        assert_eq!(q.order, Order::Desc);
        assert_eq!(q.limit, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn unknown_order_rejected() {
        assert_eq!(
            PageQuery::new("", "sideways", 10),
            Err(PageQueryError::InvalidOrder("sideways".to_string()))
        );
    }

    #[test]
    fn order_is_case_sensitive() {
        assert!(PageQuery::new("", "ASC", 10).is_err());
    }

    #[test]
    fn negative_limit_rejected() {
        assert_eq!(
            PageQuery::new("", "asc", -1),
            Err(PageQueryError::InvalidLimit { limit: -1, max: 200 })
        );
    }

    #[test]
    fn limit_above_max_rejected() {
        assert!(PageQuery::new("", "asc", 200).is_ok());
        assert!(PageQuery::new("", "asc", 201).is_err());
    }

    #[test]
    fn with_config_applies_custom_bounds() {
        let config = PagingConfig {
            default_limit: 25,
            max_limit: 50,
        };
        assert_eq!(PageQuery::with_config("", "", 0, &config).unwrap().limit, 25);
        assert!(PageQuery::with_config("", "", 51, &config).is_err());
    }

    #[test]
    fn default_is_zero_value() {
        let q = PageQuery::default();
        assert_eq!(q.cursor, "");
        assert_eq!(q.order, Order::Asc);
        assert_eq!(q.limit, 0);
    }

    #[test]
    fn cursor_i64_empty_depends_on_order() {
        assert_eq!(PageQuery::new("", "asc", 0).unwrap().cursor_i64(), Ok(0));
        assert_eq!(
            PageQuery::new("", "desc", 0).unwrap().cursor_i64(),
            Ok(i64::MAX)
        );
    }

    #[test]
    fn cursor_i64_parses_and_rejects() {
        assert_eq!(PageQuery::new("1234", "", 0).unwrap().cursor_i64(), Ok(1234));
        assert_eq!(
            PageQuery::new("-5", "", 0).unwrap().cursor_i64(),
            Err(PageQueryError::InvalidCursor("-5".to_string()))
        );
        assert!(PageQuery::new("now", "", 0).unwrap().cursor_i64().is_err());
    }

    #[test]
    fn order_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Order::Desc).unwrap(), "\"desc\"");
        let order: Order = serde_json::from_str("\"asc\"").unwrap();
        assert_eq!(order, Order::Asc);
    }

    #[test]
    fn config_from_lookup_defaults() {
        let config = PagingConfig::from_lookup(|_| None);
        assert_eq!(config, PagingConfig::default());
    }

    #[test]
    fn config_from_lookup_reads_and_clamps() {
        let config = PagingConfig::from_lookup(|key| match key {
            "HORIZON_DEFAULT_PAGE_SIZE" => Some("80".to_string()),
            "HORIZON_MAX_PAGE_SIZE" => Some("50".to_string()),
            _ => None,
        });
        assert_eq!(config.max_limit, 50);
        assert_eq!(config.default_limit, 50);
    }

    #[test]
    fn config_from_lookup_ignores_garbage() {
        let config = PagingConfig::from_lookup(|key| match key {
            "HORIZON_MAX_PAGE_SIZE" => Some("lots".to_string()),
            "HORIZON_DEFAULT_PAGE_SIZE" => Some("0".to_string()),
            _ => None,
        });
        assert_eq!(config, PagingConfig::default());
    }

    proptest! {
        #[test]
        fn accepted_limits_stay_in_bounds(limit in any::<i32>()) {
            match PageQuery::new("", "", limit) {
                Ok(q) => prop_assert!(q.limit >= 1 && q.limit <= MAX_PAGE_SIZE),
                Err(e) => {
                    let rejected_limit = matches!(e, PageQueryError::InvalidLimit { .. });
                    prop_assert!(rejected_limit, "unexpected error {:?}", e);
                }
            }
        }

        #[test]
        fn cursor_is_carried_verbatim(cursor in ".*") {
            let q = PageQuery::new(cursor.clone(), "desc", 1).unwrap();
            prop_assert_eq!(q.cursor, cursor);
        }
    }
}
