//! # Account Addresses
//!
//! Base58Check codec for ledger addresses and the [`AccountAddress`] newtype.
//!
//! ## Encoding
//!
//! ```text
//! base58( version ‖ payload ‖ checksum )
//! checksum = SHA-256(SHA-256(version ‖ payload))[..4]
//! ```
//!
//! The alphabet is the ledger alphabet (not Bitcoin's), so the zero digit is
//! `g` and an account address with version byte 0 always starts with `g`.
//! Secret seeds use version byte 33 and start with `s`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::AddressError;

/// The ledger's base58 alphabet.
const ALPHABET: &[u8; 58] = b"gsphnaf39wBUDNEGHJKLM4PQRST7VWXYZ2bcdeCr65jkm8oFqi1tuvAxyz";

const CHECKSUM_LEN: usize = 4;

/// Longest input, in bytes, [`decode_base58_check`] will attempt to decode.
///
/// An account address or seed encodes 37 bytes, which is at most 51
/// characters. Decoding is quadratic in the input length, so longer inputs
/// are rejected before any arithmetic.
pub const MAX_ENCODED_LEN: usize = 64;

/// Length of the public key carried by an account address.
pub const ACCOUNT_KEY_LEN: usize = 32;

/// Address-class marker prepended to every encoded payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum VersionByte {
    /// Public account identifier.
    AccountId = 0,
    /// Secret seed (private key material).
    Seed = 33,
}

impl VersionByte {
    /// The raw byte value.
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Decode `input` and verify its checksum and version byte.
///
/// Returns the payload with version byte and checksum stripped.
///
/// # Errors
///
/// Returns [`AddressError`] when the input is empty or longer than
/// [`MAX_ENCODED_LEN`], contains characters outside the alphabet, is too
/// short, fails the checksum, or carries a version byte other than `version`.
pub fn decode_base58_check(version: VersionByte, input: &str) -> Result<Vec<u8>, AddressError> {
    if input.is_empty() {
        return Err(AddressError::Empty);
    }
    if input.len() > MAX_ENCODED_LEN {
        return Err(AddressError::TooLong {
            length: input.len(),
            max: MAX_ENCODED_LEN,
        });
    }

    let raw = decode_base58(input)?;
    if raw.len() < 1 + CHECKSUM_LEN {
        return Err(AddressError::TooShort(raw.len()));
    }

    let (body, checksum) = raw.split_at(raw.len() - CHECKSUM_LEN);
    if checksum != &double_sha256(body)[..CHECKSUM_LEN] {
        return Err(AddressError::InvalidChecksum);
    }

    let found = body[0];
    if found != version.as_u8() {
        return Err(AddressError::InvalidVersion {
            expected: version.as_u8(),
            found,
        });
    }

    Ok(body[1..].to_vec())
}

/// Encode `payload` under `version` with a trailing checksum.
pub fn encode_base58_check(version: VersionByte, payload: &[u8]) -> String {
    let mut raw = Vec::with_capacity(1 + payload.len() + CHECKSUM_LEN);
    raw.push(version.as_u8());
    raw.extend_from_slice(payload);
    let checksum = double_sha256(&raw);
    raw.extend_from_slice(&checksum[..CHECKSUM_LEN]);
    encode_base58(&raw)
}

fn double_sha256(data: &[u8]) -> [u8; 32] {
    let first = Sha256::digest(data);
    Sha256::digest(first).into()
}

fn digit_value(character: char) -> Option<u32> {
    if !character.is_ascii() {
        return None;
    }
    ALPHABET
        .iter()
        .position(|&b| b == character as u8)
        .map(|index| index as u32)
}

fn decode_base58(input: &str) -> Result<Vec<u8>, AddressError> {
    // Little-endian accumulator; reversed at the end.
    let mut bytes: Vec<u8> = Vec::with_capacity(input.len());
    for (position, character) in input.char_indices() {
        let mut carry = digit_value(character).ok_or(AddressError::InvalidCharacter {
            character,
            position,
        })?;
        for byte in bytes.iter_mut() {
            carry += u32::from(*byte) * 58;
            *byte = (carry & 0xff) as u8;
            carry >>= 8;
        }
        while carry > 0 {
            bytes.push((carry & 0xff) as u8);
            carry >>= 8;
        }
    }

    let leading_zeros = input.bytes().take_while(|&b| b == ALPHABET[0]).count();
    bytes.extend(std::iter::repeat(0).take(leading_zeros));
    bytes.reverse();
    Ok(bytes)
}

fn encode_base58(data: &[u8]) -> String {
    let mut digits: Vec<u8> = Vec::with_capacity(data.len() * 138 / 100 + 1);
    for &byte in data {
        let mut carry = u32::from(byte);
        for digit in digits.iter_mut() {
            carry += u32::from(*digit) << 8;
            *digit = (carry % 58) as u8;
            carry /= 58;
        }
        while carry > 0 {
            digits.push((carry % 58) as u8);
            carry /= 58;
        }
    }

    let leading_zeros = data.iter().take_while(|&&b| b == 0).count();
    let mut out = String::with_capacity(leading_zeros + digits.len());
    out.extend(std::iter::repeat(ALPHABET[0] as char).take(leading_zeros));
    out.extend(digits.iter().rev().map(|&d| ALPHABET[d as usize] as char));
    out
}

/// A validated account address.
///
/// Holds the address exactly as supplied together with the decoded public
/// key. Construction is the only validation point: an `AccountAddress` value
/// is always well formed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountAddress {
    address: String,
    key: [u8; ACCOUNT_KEY_LEN],
}

impl AccountAddress {
    /// Parse and validate an account address.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError`] if the string is not a Base58Check account
    /// address carrying a 32-byte key. Secret seeds are rejected with
    /// [`AddressError::InvalidVersion`].
    pub fn parse(address: impl Into<String>) -> Result<Self, AddressError> {
        let address = address.into();
        let payload = decode_base58_check(VersionByte::AccountId, &address)?;
        let key: [u8; ACCOUNT_KEY_LEN] = payload
            .as_slice()
            .try_into()
            .map_err(|_| AddressError::InvalidKeyLength(payload.len()))?;
        Ok(Self { address, key })
    }

    /// Build the address for a raw public key.
    pub fn from_public_key(key: [u8; ACCOUNT_KEY_LEN]) -> Self {
        Self {
            address: encode_base58_check(VersionByte::AccountId, &key),
            key,
        }
    }

    /// The encoded address.
    pub fn as_str(&self) -> &str {
        &self.address
    }

    /// The decoded public key.
    pub fn public_key(&self) -> &[u8; ACCOUNT_KEY_LEN] {
        &self.key
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address)
    }
}

impl FromStr for AccountAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for AccountAddress {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<AccountAddress> for String {
    fn from(value: AccountAddress) -> Self {
        value.address
    }
}
