//! Script verification flags (bitmask).

use std::ops::{BitAnd, BitOr, BitOrAssign};

/// Script verification flags controlling interpreter behavior.
///
/// Each flag enables one independent validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VerifyFlags(pub u32);

impl VerifyFlags {
    /// No flags set; accept all scripts the base rules accept.
    pub const NONE: VerifyFlags = VerifyFlags(0);
    /// Evaluate the pay-to-script-hash template and re-run the redeem script.
    pub const P2SH: VerifyFlags = VerifyFlags(1 << 0);
    /// Require strict signature and hash-type encoding.
    pub const STRICTENC: VerifyFlags = VerifyFlags(1 << 1);
    /// Require strict DER encoding for signatures.
    pub const DERSIG: VerifyFlags = VerifyFlags(1 << 2);
    /// Require the S value in signatures to be in the lower half of the
    /// curve order.
    pub const LOW_S: VerifyFlags = VerifyFlags(1 << 3);
    /// Require shortest-possible pushes and minimal numeric encoding.
    pub const MINIMALDATA: VerifyFlags = VerifyFlags(1 << 4);
    /// Reject the unallocated NOP opcodes reserved for soft-fork upgrades.
    pub const DISCOURAGE_UPGRADABLE_NOPS: VerifyFlags = VerifyFlags(1 << 5);
    /// Enforce OP_CHECKLOCKTIMEVERIFY; otherwise it behaves as a NOP.
    pub const CHECKLOCKTIMEVERIFY: VerifyFlags = VerifyFlags(1 << 6);
    /// Require the extra multisig dummy element to be empty.
    pub const NULLDUMMY: VerifyFlags = VerifyFlags(1 << 7);
    /// Enable the restored byte-string and arithmetic opcodes
    /// (OP_CAT, OP_SPLIT, OP_AND, OP_OR, OP_XOR, OP_DIV, OP_MOD,
    /// OP_NUM2BIN, OP_BIN2NUM).
    pub const MONOLITH_OPCODES: VerifyFlags = VerifyFlags(1 << 8);
    /// Caller policy marker for accepting FORKID-style signatures. The
    /// digest algorithm itself follows the FORKID bit of each signature's
    /// hash-type byte.
    pub const SIGHASH_FORKID: VerifyFlags = VerifyFlags(1 << 9);

    /// Return true if every bit of `flag` is set in this value.
    pub fn has_flag(self, flag: VerifyFlags) -> bool {
        self.0 & flag.0 == flag.0
    }

    /// Return true if any of the given flags are set in this value.
    pub fn has_any(self, flags: &[VerifyFlags]) -> bool {
        flags.iter().any(|f| self.has_flag(*f))
    }

    /// Set the given flag bits in this value.
    pub fn add_flag(&mut self, flag: VerifyFlags) {
        self.0 |= flag.0;
    }
}

impl BitOr for VerifyFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        VerifyFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for VerifyFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for VerifyFlags {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        VerifyFlags(self.0 & rhs.0)
    }
}
