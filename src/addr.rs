//! Parsing of dotted-quad IPv4 addresses and CIDR blocks into `u32` form.
//!
//! These are pure functions with no state; every mutating entry point of
//! [`crate::RangeUnion`] over `u32` goes through them.

use std::error::Error;
use std::fmt;

/// Enum describing how a textual address may be invalid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AddressError {
    /// Input is not a well-formed dotted quad, or a CIDR suffix is not a
    /// decimal prefix length in `[0, 32]`.
    InvalidAddress,
}
impl fmt::Display for AddressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description_str = match self {
            AddressError::InvalidAddress =>
                "IP address or mask was invalid",
        };
        write!(f, "{}", description_str)
    }
}
impl Error for AddressError {}

// Folds the accumulated octet into the running value. Overflow cannot occur
// for a well-formed dotted quad (at most four folds of values <= 255), but
// the arithmetic is checked anyway so malformed input fails here instead of
// wrapping.
#[inline]
fn fold_octet(value: u32, octet: u32) -> Result<u32, AddressError> {
    value.checked_mul(256)
        .and_then(|shifted| shifted.checked_add(octet))
        .ok_or(AddressError::InvalidAddress)
}

/// Parses a dotted-quad IPv4 address into its 32-bit integer form.
///
/// Exactly four decimal octet groups separated by exactly three `.` bytes,
/// each octet in `[0, 255]`. No whitespace, sign characters, or hex digits
/// are accepted.
///
/// # Example
///
/// ```
/// # use ipv4_range_union::addr::parse_address;
/// assert_eq!(parse_address("192.168.1.0"), Ok(3232235776));
/// assert!(parse_address("1.2.256.4").is_err());
/// ```
///
/// # Errors
///
/// Returns [`AddressError::InvalidAddress`] on a wrong dot count, an octet
/// above 255, or any disallowed byte.
pub fn parse_address(text: &str) -> Result<u32, AddressError> {
    let mut value: u32 = 0;
    let mut octet: u32 = 0;
    let mut dots: u32 = 0;
    for byte in text.bytes() {
        match byte {
            b'.' => {
                dots += 1;
                value = fold_octet(value, octet)?;
                octet = 0;
            }
            b'0'..=b'9' => {
                octet = octet * 10 + u32::from(byte - b'0');
                if octet > 255 {
                    return Err(AddressError::InvalidAddress);
                }
            }
            _ => return Err(AddressError::InvalidAddress),
        }
    }
    if dots != 3 {
        return Err(AddressError::InvalidAddress);
    }
    fold_octet(value, octet)
}

/// Parses a CIDR block into the inclusive `(start, end)` pair of its network
/// range.
///
/// The input is `<dotted-quad>[/<prefix-length>]`. A `/` is only treated as
/// a prefix separator when it appears strictly after the first byte;
/// otherwise the whole input is parsed as a single address with an implied
/// `/32`. The prefix length must be all decimal digits and lie in `[0, 32]`.
///
/// Host bits below the prefix are masked off, so the returned pair is
/// `(address & mask, (address & mask) | !mask)`.
///
/// # Example
///
/// ```
/// # use ipv4_range_union::addr::parse_cidr;
/// assert_eq!(parse_cidr("192.168.1.0/24"), Ok((3232235776, 3232236031)));
/// assert_eq!(parse_cidr("10.0.0.7"), Ok((167772167, 167772167)));
/// assert!(parse_cidr("10.0.0.0/33").is_err());
/// ```
///
/// # Errors
///
/// Returns [`AddressError::InvalidAddress`] if the address portion is not a
/// valid dotted quad or the prefix length is missing its digits, contains a
/// non-digit, or exceeds 32.
pub fn parse_cidr(text: &str) -> Result<(u32, u32), AddressError> {
    let (addr_text, prefix_len) = match text.find('/') {
        Some(pos) if pos > 0 => {
            (&text[..pos], parse_prefix_len(&text[pos + 1..])?)
        }
        _ => (text, 32),
    };
    let mask: u32 = match prefix_len {
        // `u32::MAX << 32` is not a defined shift
        0 => 0,
        len => u32::MAX << (32 - len),
    };
    let network = parse_address(addr_text)? & mask;
    Ok((network, network | !mask))
}

fn parse_prefix_len(suffix: &str) -> Result<u32, AddressError> {
    if suffix.is_empty() {
        return Err(AddressError::InvalidAddress);
    }
    let mut len: u32 = 0;
    for byte in suffix.bytes() {
        if !byte.is_ascii_digit() {
            return Err(AddressError::InvalidAddress);
        }
        len = len.checked_mul(10)
            .and_then(|v| v.checked_add(u32::from(byte - b'0')))
            .ok_or(AddressError::InvalidAddress)?;
    }
    if len > 32 {
        return Err(AddressError::InvalidAddress);
    }
    Ok(len)
}
