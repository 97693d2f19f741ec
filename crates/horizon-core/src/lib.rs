#![deny(missing_docs)]

//! # horizon-core — Domain Collaborators for Horizon Request Handling
//!
//! Types that request extractors validate against but that carry no HTTP
//! dependency of their own. Only `serde`, `thiserror` and `sha2` from the
//! external ecosystem.
//!
//! ## Contents
//!
//! 1. **[`AccountAddress`] and the Base58Check codec.** Addresses are
//!    checksummed and version-tagged; a secret seed never validates as an
//!    account.
//!
//! 2. **[`PageQuery`].** The validated cursor/order/limit triple behind every
//!    list endpoint, with page-size bounds from [`PagingConfig`].
//!
//! 3. **Structured errors.** [`AddressError`] and [`PageQueryError`] with
//!    `thiserror`, each carrying the offending input.

pub mod address;
pub mod error;
pub mod paging;

pub use address::{
    decode_base58_check, encode_base58_check, AccountAddress, VersionByte, MAX_ENCODED_LEN,
};
pub use error::{AddressError, PageQueryError};
pub use paging::{Order, PageQuery, PagingConfig, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
