//! # horizon-api — Request Parameter Extraction for Axum Handlers
//!
//! Typed access to path and query parameters with a sticky first error,
//! plus the Axum glue around it.
//!
//! ## Modules
//!
//! | Module                  | Contents                                           |
//! |-------------------------|----------------------------------------------------|
//! | [`params`]              | [`ParamExtractor`] and [`ParamError`]              |
//! | [`source`]              | [`RequestSource`]: path, query, headers of a request |
//! | [`error`]               | [`AppError`] → JSON error responses                |
//! | [`telemetry`]           | Subscriber setup and request `TraceLayer`          |
//!
//! ## Usage
//!
//! `ParamExtractor` is an Axum extractor. Install a [`PagingConfig`] as a
//! request extension to override the default page-size bounds:
//!
//! ```ignore
//! let app = Router::new()
//!     .route("/accounts/:account_id/payments", get(list_payments))
//!     .layer(Extension(PagingConfig::from_env()))
//!     .layer(telemetry::trace_layer());
//! ```
//!
//! The crate owns no routes; hosts define their own routing tree.
//!
//! [`PagingConfig`]: horizon_core::PagingConfig

pub mod error;
pub mod params;
pub mod source;
pub mod telemetry;

pub use error::AppError;
pub use params::{ParamError, ParamExtractor, LAST_EVENT_ID};
pub use source::RequestSource;
