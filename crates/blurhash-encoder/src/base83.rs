//! Base83 digit packing used by the BlurHash format.
//!
//! Every field of a hash is a fixed-width group of big-endian base83
//! digits drawn from the alphabet below. The encoder only ever appends;
//! [`decode`] exists so callers and tests can read fields back out of a
//! produced hash.

use crate::error::BlurhashError;

/// The 83-character alphabet used by BlurHash base83 encoding.
pub const ALPHABET: &[u8; 83] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz#$%*+,-.:;=?@[]^_{|}~";

/// Lookup table mapping ASCII byte values to their base83 digit value.
/// Invalid characters map to `255`.
const fn build_decode_lut() -> [u8; 128] {
    let mut lut = [255u8; 128];
    let mut i = 0;
    while i < 83 {
        lut[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    lut
}

/// Precomputed decode lookup table (computed at compile time).
static DECODE_LUT: [u8; 128] = build_decode_lut();

/// Append `value` to `dst` as exactly `digits` base83 digits, most
/// significant first.
///
/// # Errors
///
/// Returns [`BlurhashError::DigitOverflow`] if `value >= 83^digits`. Nothing
/// is written in that case.
///
/// # Examples
///
/// ```
/// use blurhash_encoder::base83::encode_into;
/// let mut s = String::from("x");
/// encode_into(&mut s, 83, 2).unwrap();
/// assert_eq!(s, "x10");
/// ```
pub fn encode_into(dst: &mut String, value: u64, digits: usize) -> Result<(), BlurhashError> {
    // 83^10 < u64::MAX < 83^11, so any u64 has at most 11 significant digits.
    let mut buf = [ALPHABET[0]; 11];
    let mut start = buf.len();
    let mut remaining = value;
    while remaining > 0 {
        start -= 1;
        buf[start] = ALPHABET[(remaining % 83) as usize];
        remaining /= 83;
    }
    if buf.len() - start > digits {
        return Err(BlurhashError::DigitOverflow { value, digits });
    }

    dst.reserve(digits);
    for _ in buf.len()..digits {
        dst.push(ALPHABET[0] as char);
    }
    let take = digits.min(buf.len());
    for &b in &buf[buf.len() - take..] {
        dst.push(b as char);
    }
    Ok(())
}

/// Encode an integer into a base83 string of the specified length.
///
/// # Errors
///
/// Returns [`BlurhashError::DigitOverflow`] if the value is too large to
/// be represented in the given number of digits.
///
/// # Examples
///
/// ```
/// use blurhash_encoder::base83::encode;
/// assert_eq!(encode(0, 1).unwrap(), "0");
/// assert_eq!(encode(82, 1).unwrap(), "~");
/// assert_eq!(encode(1, 4).unwrap(), "0001");
/// ```
pub fn encode(value: u64, digits: usize) -> Result<String, BlurhashError> {
    let mut out = String::with_capacity(digits);
    encode_into(&mut out, value, digits)?;
    Ok(out)
}

/// Decode a base83 string into an integer.
///
/// # Errors
///
/// Returns [`BlurhashError::InvalidBase83Character`] if the string contains
/// a character not in the base83 alphabet, and
/// [`BlurhashError::Base83Overflow`] if the value exceeds `u64`.
///
/// # Examples
///
/// ```
/// use blurhash_encoder::base83::decode;
/// assert_eq!(decode("0").unwrap(), 0);
/// assert_eq!(decode("~").unwrap(), 82);
/// ```
pub fn decode(digits: &str) -> Result<u64, BlurhashError> {
    let mut value: u64 = 0;
    for ch in digits.chars() {
        let digit = match u8::try_from(ch) {
            Ok(b) if b < 128 => DECODE_LUT[b as usize],
            _ => 255,
        };
        if digit == 255 {
            return Err(BlurhashError::InvalidBase83Character(ch));
        }
        value = value
            .checked_mul(83)
            .and_then(|v| v.checked_add(digit as u64))
            .ok_or(BlurhashError::Base83Overflow)?;
    }
    Ok(value)
}
