//! Transaction signature codec.
//!
//! A transaction signature on the wire is a DER-encoded ECDSA (R, S) pair
//! followed by a single byte of raw sighash flags. Signatures parsed off
//! the wire may carry flag bytes that are not "normal" serializations of
//! the defined modes; the exact byte must be preserved when round-tripping
//! or signature hashes will not reproduce.

use bitscript_primitives::ec::Signature;

use crate::sighash::{SIGHASH_ALL, SIGHASH_ANYONECANPAY, SIGHASH_FORKID, SIGHASH_MASK, SIGHASH_NONE, SIGHASH_SINGLE};
use crate::TransactionError;

/// A decoded transaction signature: an ECDSA signature plus the raw
/// sighash flag byte.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionSignature {
    /// The ECDSA (R, S) pair.
    pub signature: Signature,
    /// The raw sighash flags exactly as found on the wire.
    pub sighash_flags: u32,
}

impl TransactionSignature {
    /// Construct a signature with the given components and flags.
    pub fn new(signature: Signature, sighash_flags: u32) -> Self {
        TransactionSignature {
            signature,
            sighash_flags,
        }
    }

    /// Calculate the flag byte representing a mode plus the anyone-can-pay
    /// bit.
    pub fn calc_sighash_value(mode: u32, anyone_can_pay: bool) -> u32 {
        debug_assert!(mode == SIGHASH_ALL || mode == SIGHASH_NONE || mode == SIGHASH_SINGLE);
        let mut flags = mode;
        if anyone_can_pay {
            flags |= SIGHASH_ANYONECANPAY;
        }
        flags
    }

    /// Decode a wire-format signature without canonicality requirements.
    pub fn from_tx_format(bytes: &[u8]) -> Result<Self, TransactionError> {
        Self::decode_from_bitcoin(bytes, false, false)
    }

    /// Decode a wire-format signature.
    ///
    /// `require_canonical_encoding` demands the canonical DER+hashtype
    /// shape of [`is_encoding_canonical`]; `require_canonical_s` demands
    /// an S value in the lower half of the curve order. The final byte is
    /// stored verbatim in `sighash_flags`.
    pub fn decode_from_bitcoin(
        bytes: &[u8],
        require_canonical_encoding: bool,
        require_canonical_s: bool,
    ) -> Result<Self, TransactionError> {
        if require_canonical_encoding && !is_encoding_canonical(bytes) {
            return Err(TransactionError::SignatureError(
                "signature encoding is not canonical".to_string(),
            ));
        }
        if bytes.is_empty() {
            return Err(TransactionError::SignatureError(
                "signature bytes are empty".to_string(),
            ));
        }

        // The DER parser reads the length it finds in the header, which
        // leaves the trailing sighash byte alone.
        let signature = Signature::from_der(bytes)?;

        if require_canonical_s && !signature.has_low_s() {
            return Err(TransactionError::SignatureError(
                "S-value is not canonical".to_string(),
            ));
        }

        Ok(TransactionSignature {
            signature,
            sighash_flags: bytes[bytes.len() - 1] as u32,
        })
    }

    /// The base sighash mode (ALL, NONE, or SINGLE). Unrecognized modes
    /// fall back to ALL for digest purposes.
    pub fn sighash_mode(&self) -> u32 {
        match self.sighash_flags & SIGHASH_MASK {
            SIGHASH_NONE => SIGHASH_NONE,
            SIGHASH_SINGLE => SIGHASH_SINGLE,
            _ => SIGHASH_ALL,
        }
    }

    /// Whether the anyone-can-pay bit is set.
    pub fn anyone_can_pay(&self) -> bool {
        self.sighash_flags & SIGHASH_ANYONECANPAY != 0
    }

    /// Whether the FORKID bit is set, selecting the value-committing
    /// digest algorithm.
    pub fn use_fork_id(&self) -> bool {
        self.sighash_flags & SIGHASH_FORKID != 0
    }

    /// Serialize to wire format: DER signature followed by the flag byte.
    pub fn to_tx_format(&self) -> Vec<u8> {
        let mut out = self.signature.to_der();
        out.push(self.sighash_flags as u8);
        out
    }
}

/// Whether a whole sig+hashtype byte string has canonical encoding.
///
/// A canonical signature is `30 <len> 02 <lenR> <R> 02 <lenS> <S>
/// <hashtype>` where R and S are not negative (their first byte has the
/// high bit clear) and not excessively padded (no leading zero byte unless
/// an otherwise-negative value follows). The hash type, with the
/// anyone-can-pay bit masked off, must be one of the defined modes.
///
/// Empty signatures, while not strictly DER, are accepted.
pub fn is_encoding_canonical(signature: &[u8]) -> bool {
    if signature.is_empty() {
        return true;
    }

    if signature.len() < 9 || signature.len() > 73 {
        return false;
    }

    let hash_type = (signature[signature.len() - 1] as u32) & !SIGHASH_ANYONECANPAY;
    if !(SIGHASH_ALL..=SIGHASH_SINGLE).contains(&hash_type) {
        return false;
    }

    if signature[0] != 0x30 || signature[1] as usize != signature.len() - 3 {
        return false;
    }

    let len_r = signature[3] as usize;
    if 5 + len_r >= signature.len() || len_r == 0 {
        return false;
    }
    let len_s = signature[5 + len_r] as usize;
    if len_r + len_s + 7 != signature.len() || len_s == 0 {
        return false;
    }

    // R marker and sign.
    if signature[2] != 0x02 || signature[4] & 0x80 != 0 {
        return false;
    }
    if len_r > 1 && signature[4] == 0x00 && signature[5] & 0x80 == 0 {
        return false;
    }

    // S marker and sign.
    if signature[4 + len_r] != 0x02 || signature[6 + len_r] & 0x80 != 0 {
        return false;
    }
    if len_s > 1 && signature[6 + len_r] == 0x00 && signature[6 + len_r + 1] & 0x80 == 0 {
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitscript_primitives::ec::PrivateKey;
    use bitscript_primitives::hash::sha256;

    fn sample_sig_with_flags(flags: u8) -> Vec<u8> {
        let key = PrivateKey::from_hex(
            "cca9fbcc1b41e5a95d369eaa6ddcff73b61a4efaa279cfc6567e8daa39cbaf50",
        )
        .unwrap();
        let sig = key.sign(&sha256(b"sample")).unwrap();
        let mut bytes = sig.to_der();
        bytes.push(flags);
        bytes
    }

    #[test]
    fn test_canonical_roundtrip_preserves_flag_byte() {
        for flags in [0x01u8, 0x02, 0x03, 0x81, 0x82, 0x83] {
            let bytes = sample_sig_with_flags(flags);
            assert!(is_encoding_canonical(&bytes), "flags {:#04x}", flags);
            let sig = TransactionSignature::decode_from_bitcoin(&bytes, true, false).unwrap();
            assert_eq!(sig.sighash_flags, flags as u32);
            assert_eq!(sig.to_tx_format(), bytes);
        }
    }

    #[test]
    fn test_empty_is_canonical_but_undecodable() {
        assert!(is_encoding_canonical(&[]));
        assert!(TransactionSignature::decode_from_bitcoin(&[], true, false).is_err());
    }

    #[test]
    fn test_noncanonical_hash_type() {
        // Hash type 0 and 4 are outside ALL..=SINGLE.
        assert!(!is_encoding_canonical(&sample_sig_with_flags(0x00)));
        assert!(!is_encoding_canonical(&sample_sig_with_flags(0x04)));
        // The FORKID bit is not masked, so 0x41 reads as mode 0x41.
        assert!(!is_encoding_canonical(&sample_sig_with_flags(0x41)));
    }

    #[test]
    fn test_noncanonical_shapes_rejected() {
        let good = sample_sig_with_flags(0x01);

        let mut bad_header = good.clone();
        bad_header[0] = 0x31;
        assert!(!is_encoding_canonical(&bad_header));

        let mut bad_len = good.clone();
        bad_len[1] ^= 0x01;
        assert!(!is_encoding_canonical(&bad_len));

        let mut bad_r_marker = good.clone();
        bad_r_marker[2] = 0x03;
        assert!(!is_encoding_canonical(&bad_r_marker));

        // Too short / too long.
        assert!(!is_encoding_canonical(&[0x30; 8]));
        assert!(!is_encoding_canonical(&[0x30; 74]));

        // Canonical gate enforced by decode_from_bitcoin.
        assert!(TransactionSignature::decode_from_bitcoin(&bad_header, true, false).is_err());
    }

    #[test]
    fn test_mode_accessors() {
        let bytes = sample_sig_with_flags(0xC2);
        let sig = TransactionSignature::from_tx_format(&bytes).unwrap();
        assert_eq!(sig.sighash_flags, 0xC2);
        assert_eq!(sig.sighash_mode(), SIGHASH_NONE);
        assert!(sig.anyone_can_pay());
        assert!(sig.use_fork_id());
    }

    #[test]
    fn test_low_s_requirement() {
        // Signatures produced by our signer are already low-S, so the
        // requirement passes.
        let bytes = sample_sig_with_flags(0x01);
        assert!(TransactionSignature::decode_from_bitcoin(&bytes, true, true).is_ok());
    }

    #[test]
    fn test_calc_sighash_value() {
        assert_eq!(TransactionSignature::calc_sighash_value(SIGHASH_ALL, false), 0x01);
        assert_eq!(TransactionSignature::calc_sighash_value(SIGHASH_SINGLE, true), 0x83);
    }
}
