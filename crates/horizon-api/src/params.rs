//! # Request Parameter Extraction
//!
//! [`ParamExtractor`] gives handlers typed, fail-fast access to path and
//! query parameters. The first failure is latched: every later getter call
//! returns its type's zero value without parsing anything, so a handler can
//! run a batch of extractions and check once.
//!
//! ```ignore
//! async fn list_payments(mut params: ParamExtractor) -> Result<Json<Page>, AppError> {
//!     let account = params.get_address("account_id");
//!     let page = params.get_page_query();
//!     params.finish()?;
//!     // use account, page...
//! }
//! ```
//!
//! Absence is never an error for plain strings and integers: a missing
//! parameter reads as `""` or `0`. Addresses are different; a missing
//! address fails validation like any other malformed one.

use std::num::ParseIntError;
use std::str::FromStr;

use axum::extract::rejection::RawPathParamsRejection;
use axum::extract::{FromRequestParts, RawPathParams};
use axum::http::request::Parts;
use horizon_core::{AccountAddress, AddressError, PageQuery, PageQueryError, PagingConfig};
use thiserror::Error;

use crate::error::AppError;
use crate::source::RequestSource;

/// Header that overrides the `cursor` parameter for resumable event streams.
pub const LAST_EVENT_ID: &str = "Last-Event-ID";

/// The first failure observed by a [`ParamExtractor`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParamError {
    /// A parameter was present but is not an integer in range.
    #[error("parameter {name:?} is not a valid integer: {value:?} ({source})")]
    InvalidInteger {
        /// Parameter name.
        name: String,
        /// Raw value as received.
        value: String,
        /// Underlying parse failure.
        source: ParseIntError,
    },

    /// A parameter is missing or is not a valid account address.
    #[error("parameter {name:?} is not a valid account address: {value:?} ({source})")]
    InvalidAddress {
        /// Parameter name.
        name: String,
        /// Raw value as received.
        value: String,
        /// Underlying codec failure.
        source: AddressError,
    },

    /// The cursor/order/limit triple was rejected by the paging query.
    #[error(transparent)]
    PageQuery(#[from] PageQueryError),
}

impl ParamError {
    /// Name of the offending parameter, when the failure is tied to one.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::InvalidInteger { name, .. } | Self::InvalidAddress { name, .. } => Some(name),
            Self::PageQuery(_) => None,
        }
    }
}

/// Typed accessors over one request's parameters with a sticky first error.
///
/// One extractor is created per request and owned by the handler; it is
/// never shared. Once [`err`](Self::err) is set it is never cleared or
/// replaced.
#[derive(Debug)]
pub struct ParamExtractor {
    source: RequestSource,
    paging: PagingConfig,
    err: Option<ParamError>,
}

impl ParamExtractor {
    /// Create an extractor over `source` with default paging bounds.
    pub fn new(source: RequestSource) -> Self {
        Self {
            source,
            paging: PagingConfig::default(),
            err: None,
        }
    }

    /// Use `paging` when building page queries.
    pub fn with_paging_config(mut self, paging: PagingConfig) -> Self {
        self.paging = paging;
        self
    }

    /// The latched error, if any getter has failed.
    pub fn err(&self) -> Option<&ParamError> {
        self.err.as_ref()
    }

    /// True while no getter has failed.
    pub fn is_ok(&self) -> bool {
        self.err.is_none()
    }

    /// Consume the extractor, returning the latched error as a `Result`.
    ///
    /// # Errors
    ///
    /// Returns the first [`ParamError`] recorded, if any.
    pub fn finish(self) -> Result<(), ParamError> {
        match self.err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Consume the extractor, returning the latched error.
    pub fn into_err(self) -> Option<ParamError> {
        self.err
    }

    fn latch(&mut self, err: ParamError) {
        if self.err.is_some() {
            return;
        }
        tracing::debug!(parameter = err.name(), error = %err, "request parameter rejected");
        self.err = Some(err);
    }

    /// Read a parameter as a string.
    ///
    /// Path parameters take precedence over the query string; only the
    /// first query value is consulted. Missing in both reads as `""`.
    pub fn get_string(&self, name: &str) -> String {
        if self.err.is_some() {
            return String::new();
        }

        self.source
            .path_param(name)
            .or_else(|| self.source.query_first(name))
            .unwrap_or_default()
            .to_string()
    }

    /// Read a parameter as a base-10 `i64`. Missing reads as `0`.
    pub fn get_i64(&mut self, name: &str) -> i64 {
        self.get_int(name)
    }

    /// Read a parameter as a base-10 `i32`. Missing reads as `0`; values
    /// outside the 32-bit range fail.
    pub fn get_i32(&mut self, name: &str) -> i32 {
        self.get_int(name)
    }

    fn get_int<T>(&mut self, name: &str) -> T
    where
        T: FromStr<Err = ParseIntError> + Default,
    {
        if self.err.is_some() {
            return T::default();
        }

        let value = self.get_string(name);
        if value.is_empty() {
            return T::default();
        }

        match value.parse::<T>() {
            Ok(n) => n,
            Err(source) => {
                self.latch(ParamError::InvalidInteger {
                    name: name.to_string(),
                    value,
                    source,
                });
                T::default()
            }
        }
    }

    /// Read the raw `(cursor, order, limit)` triple.
    ///
    /// A non-empty `Last-Event-ID` header replaces the `cursor` parameter.
    pub fn get_paging_params(&mut self) -> (String, String, i32) {
        if self.err.is_some() {
            return (String::new(), String::new(), 0);
        }

        let mut cursor = self.get_string("cursor");
        let order = self.get_string("order");
        let limit = self.get_i32("limit");

        if let Some(last_event_id) = self.source.header(LAST_EVENT_ID) {
            if !last_event_id.is_empty() {
                cursor = last_event_id.to_string();
            }
        }

        (cursor, order, limit)
    }

    /// Build a validated [`PageQuery`] from the paging parameters.
    ///
    /// Returns `PageQuery::default()` if reading or validation fails.
    pub fn get_page_query(&mut self) -> PageQuery {
        if self.err.is_some() {
            return PageQuery::default();
        }

        let (cursor, order, limit) = self.get_paging_params();
        if self.err.is_some() {
            return PageQuery::default();
        }

        match PageQuery::with_config(cursor, &order, limit, &self.paging) {
            Ok(query) => query,
            Err(err) => {
                self.latch(err.into());
                PageQuery::default()
            }
        }
    }

    /// Read a parameter that must be an account address.
    ///
    /// The raw value is returned whether or not it validates, so callers
    /// can echo it back; check [`err`](Self::err) before trusting it.
    ///
    /// Validation goes through [`AccountAddress::parse`], so beyond a good
    /// checksum and account version byte the payload must be a 32-byte key.
    pub fn get_address(&mut self, name: &str) -> String {
        if self.err.is_some() {
            return String::new();
        }

        let address = self.get_string(name);
        if let Err(source) = AccountAddress::parse(address.as_str()) {
            self.latch(ParamError::InvalidAddress {
                name: name.to_string(),
                value: address.clone(),
                source,
            });
        }
        address
    }

    /// Read a parameter as a decoded [`AccountAddress`].
    pub fn get_account(&mut self, name: &str) -> Option<AccountAddress> {
        if self.err.is_some() {
            return None;
        }

        let address = self.get_string(name);
        match AccountAddress::parse(address.as_str()) {
            Ok(account) => Some(account),
            Err(source) => {
                self.latch(ParamError::InvalidAddress {
                    name: name.to_string(),
                    value: address,
                    source,
                });
                None
            }
        }
    }
}

/// Axum `FromRequestParts` implementation for `ParamExtractor`.
///
/// Path parameters come from the matched route (none when the route has no
/// template segments). Paging bounds come from a `PagingConfig` request
/// extension when one is installed. Only undecodable path segments reject.
#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for ParamExtractor {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let path: Vec<(String, String)> = match RawPathParams::from_request_parts(parts, state).await
        {
            Ok(params) => params
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
            Err(RawPathParamsRejection::MissingPathParams(_)) => Vec::new(),
            Err(rejection) => return Err(AppError::BadRequest(rejection.body_text())),
        };

        let paging = parts
            .extensions
            .get::<PagingConfig>()
            .copied()
            .unwrap_or_default();

        Ok(Self::new(RequestSource::from_parts(parts, path)).with_paging_config(paging))
    }
}
