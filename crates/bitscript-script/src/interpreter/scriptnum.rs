//! Script number encoding with Bitcoin consensus rules.
//!
//! Numbers on the script stack are byte arrays holding a little-endian
//! magnitude with a sign bit in the most significant bit of the last byte.
//! Numeric opcodes accept at most 4-byte operands (5 for the locktime
//! check), but results may grow beyond that and remain valid as long as
//! they are not reinterpreted as numbers.

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};

use super::error::{InterpreterError, ScriptErrorCode};

/// A script number backed by an arbitrary-precision integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptNum {
    /// The numeric value.
    pub val: BigInt,
}

impl ScriptNum {
    /// Create a ScriptNum from an i64 value.
    pub fn new(val: i64) -> Self {
        ScriptNum {
            val: BigInt::from(val),
        }
    }

    /// Wrap an existing big integer.
    pub fn from_bigint(val: BigInt) -> Self {
        ScriptNum { val }
    }

    /// Decode a byte array into a ScriptNum.
    ///
    /// `max_len` is the maximum allowed byte length (4 for arithmetic
    /// operands, 5 for the locktime check). When `require_minimal` is set,
    /// the encoding must not carry redundant zero bytes: the most
    /// significant byte may have only its sign bit set when the byte below
    /// it needs the full eight bits.
    pub fn from_bytes(
        bytes: &[u8],
        max_len: usize,
        require_minimal: bool,
    ) -> Result<Self, InterpreterError> {
        if bytes.len() > max_len {
            return Err(InterpreterError::new(
                ScriptErrorCode::UnknownError,
                format!(
                    "script attempted to use an integer larger than {} bytes",
                    max_len
                ),
            ));
        }

        if require_minimal && !bytes.is_empty() {
            // If the top byte minus its sign bit is zero, the encoding is
            // redundant unless the sign bit disambiguates the byte below
            // (e.g. +-255 encode to ff00 and ff80).
            if bytes[bytes.len() - 1] & 0x7f == 0
                && (bytes.len() <= 1 || bytes[bytes.len() - 2] & 0x80 == 0)
            {
                return Err(InterpreterError::new(
                    ScriptErrorCode::UnknownError,
                    "non-minimally encoded script number",
                ));
            }
        }

        if bytes.is_empty() {
            return Ok(ScriptNum::new(0));
        }

        let mut v = BigInt::zero();
        for (i, &b) in bytes.iter().enumerate() {
            v |= BigInt::from(b) << (8 * i);
        }

        // The most significant bit of the last byte carries the sign.
        if bytes[bytes.len() - 1] & 0x80 != 0 {
            let mask = !(BigInt::from(0x80u8) << (8 * (bytes.len() - 1)));
            v &= mask;
            v = -v;
        }

        Ok(ScriptNum { val: v })
    }

    /// Serialize the number as minimal little-endian sign-magnitude bytes.
    ///
    /// Zero is the empty vector.
    pub fn to_bytes(&self) -> Vec<u8> {
        if self.val.is_zero() {
            return vec![];
        }

        let is_negative = self.val.is_negative();
        let mut magnitude = self.val.abs();

        let mut result: Vec<u8> = Vec::new();
        while magnitude > BigInt::zero() {
            result.push((&magnitude & BigInt::from(0xffu8)).to_u8().unwrap_or(0));
            magnitude >>= 8;
        }

        // If the top magnitude byte would collide with the sign bit, an
        // extra byte carries the sign.
        if result[result.len() - 1] & 0x80 != 0 {
            result.push(if is_negative { 0x80 } else { 0x00 });
        } else if is_negative {
            let last = result.len() - 1;
            result[last] |= 0x80;
        }

        result
    }

    /// Return true if this number is zero.
    pub fn is_zero(&self) -> bool {
        self.val.is_zero()
    }

    /// Return true if this number is negative.
    pub fn is_negative(&self) -> bool {
        self.val.is_negative()
    }

    /// Convert to i64, saturating at the i64 boundaries.
    pub fn to_i64(&self) -> i64 {
        match self.val.to_i64() {
            Some(v) => v,
            None => {
                if self.val.is_positive() {
                    i64::MAX
                } else {
                    i64::MIN
                }
            }
        }
    }
}

/// Reduce a byte array to its minimal numeric encoding (OP_BIN2NUM).
///
/// Strips redundant zero bytes below the sign bit, preserving the sign.
/// Negative zero and all-zero inputs reduce to the empty vector.
pub fn minimally_encode(data: &[u8]) -> Vec<u8> {
    if data.is_empty() {
        return vec![];
    }

    let last = data[data.len() - 1];

    // Top byte carries payload bits; nothing to strip.
    if last & 0x7f != 0 {
        return data.to_vec();
    }

    if data.len() == 1 {
        return vec![];
    }

    // The byte below the sign byte already needs its high bit.
    if data[data.len() - 2] & 0x80 != 0 {
        return data.to_vec();
    }

    let mut data = data.to_vec();
    let mut i = data.len() - 1;
    while i > 0 {
        if data[i - 1] != 0 {
            if data[i - 1] & 0x80 != 0 {
                // Keep an explicit sign byte.
                data[i] = last;
                return data[..=i].to_vec();
            }
            data[i - 1] |= last;
            return data[..i].to_vec();
        }
        i -= 1;
    }

    vec![]
}
