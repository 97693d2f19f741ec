//! # Error Hierarchy
//!
//! Structured error types for the Horizon core collaborators, built with
//! `thiserror`. No `Box<dyn Error>`, no `.unwrap()` outside tests.
//!
//! Each error carries the offending input so that handlers can echo it back
//! to the client and operators can diagnose bad requests from logs alone.

use thiserror::Error;

/// Errors produced by the Base58Check address codec.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// The input string was empty.
    #[error("address is empty")]
    Empty,

    /// The input contained a character outside the ledger alphabet.
    #[error("invalid base58 character {character:?} at position {position}")]
    InvalidCharacter {
        /// The rejected character.
        character: char,
        /// Byte offset of the character in the input.
        position: usize,
    },

    /// The input is longer than any address the codec produces.
    #[error("address is {length} bytes long (at most {max} allowed)")]
    TooLong {
        /// Length of the input in bytes.
        length: usize,
        /// Longest accepted input.
        max: usize,
    },

    /// The decoded payload is too short to hold a version byte and checksum.
    #[error("decoded payload is {0} bytes, need at least 5")]
    TooShort(usize),

    /// The trailing four checksum bytes do not match the payload.
    #[error("checksum mismatch")]
    InvalidChecksum,

    /// The payload decoded correctly but carries a different address class.
    #[error("unexpected version byte {found} (expected {expected})")]
    InvalidVersion {
        /// Version byte the caller asked for.
        expected: u8,
        /// Version byte found in the payload.
        found: u8,
    },

    /// The payload decoded correctly but the key is the wrong length.
    #[error("account key is {0} bytes (expected 32)")]
    InvalidKeyLength(usize),
}

/// Errors produced when building a [`PageQuery`](crate::paging::PageQuery).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PageQueryError {
    /// The `order` parameter is neither `asc` nor `desc`.
    #[error("invalid order {0:?} (expected \"asc\" or \"desc\")")]
    InvalidOrder(String),

    /// The `limit` parameter is negative or above the configured maximum.
    #[error("invalid limit {limit} (expected 0..={max})")]
    InvalidLimit {
        /// The requested limit.
        limit: i64,
        /// The configured maximum page size.
        max: u32,
    },

    /// The cursor is not usable as an integer paging token.
    #[error("invalid cursor {0:?}")]
    InvalidCursor(String),
}
