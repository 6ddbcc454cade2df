//! Consensus script interpreter.
//!
//! Evaluates scripts chunk by chunk against a pair of byte-vector stacks,
//! enforcing the resource limits and verification flags that make script
//! validation consensus-critical.
//!
//! # Architecture
//!
//! The interpreter does not depend on the transaction crate directly.
//! Signature and locktime opcodes reach transaction data through the
//! [`TxContext`] trait, which the transaction crate implements. The main
//! stack is owned by the caller so that it carries over from the unlocking
//! script to the locking script, and so the pay-to-script-hash phase can
//! snapshot it.
//!
//! # Example
//!
//! ```ignore
//! use bitscript_script::interpreter::{execute_script, Stack, VerifyFlags};
//!
//! let mut stack = Stack::new(false);
//! execute_script(None, 0, &unlocking_script, &mut stack, VerifyFlags::NONE)?;
//! execute_script(None, 0, &locking_script, &mut stack, VerifyFlags::NONE)?;
//! ```

pub mod error;
pub mod flags;
pub mod scriptnum;
pub mod stack;
pub mod thread;

mod ops_arithmetic;
mod ops_crypto;
mod ops_data;
mod ops_flow;
mod ops_stack;

pub use error::{InterpreterError, ScriptErrorCode};
pub use flags::VerifyFlags;
pub use scriptnum::ScriptNum;
pub use stack::Stack;
pub use thread::execute_script;

use crate::Script;

/// Maximum size of a pushed data element in bytes.
pub const MAX_SCRIPT_ELEMENT_SIZE: usize = 520;
/// Maximum number of non-push opcodes per script.
pub const MAX_OPS_PER_SCRIPT: usize = 201;
/// Maximum combined depth of the main and alternate stacks.
pub const MAX_STACK_SIZE: usize = 1000;
/// Maximum script size in bytes.
pub const MAX_SCRIPT_SIZE: usize = 10000;
/// Maximum number of public keys in a multisig operation.
pub const MAX_PUBKEYS_PER_MULTISIG: i64 = 20;
/// Locktime values at or above this are unix timestamps, below are block
/// heights.
pub const LOCKTIME_THRESHOLD: i64 = 500_000_000;

/// Transaction context for the signature and locktime opcodes.
///
/// Implementors supply signature verification over the containing
/// transaction without the interpreter depending on the transaction model.
pub trait TxContext {
    /// Verify a transaction signature against a public key.
    ///
    /// `sig_with_hash_type` is the wire-format signature: DER bytes with
    /// the raw sighash byte appended. `sub_script` is the connected script
    /// the signature commits to. `require_canonical` demands canonical
    /// DER+hashtype shape, `require_low_s` demands S at most half the curve
    /// order.
    ///
    /// Returns Ok(true) when the signature verifies, Ok(false) when it does
    /// not, and Err when the signature or key cannot be decoded under the
    /// given requirements. The interpreter treats Err as a false result.
    fn check_sig(
        &self,
        sig_with_hash_type: &[u8],
        pub_key: &[u8],
        sub_script: &Script,
        input_index: usize,
        require_canonical: bool,
        require_low_s: bool,
    ) -> Result<bool, InterpreterError>;

    /// The containing transaction's lock time.
    fn lock_time(&self) -> u32;

    /// The sequence number of the given input.
    fn input_sequence(&self, input_index: usize) -> u32;
}

#[cfg(test)]
mod tests {
    use super::stack::as_bool;
    use super::*;
    use crate::opcodes::*;

    /// Run an unlocking and a locking script through a shared stack and
    /// apply the final truth check, the way the top-level verifier does.
    fn eval(
        unlock: &[u8],
        lock: &[u8],
        flags: VerifyFlags,
    ) -> Result<(), InterpreterError> {
        let unlock = Script::from_bytes(unlock);
        let lock = Script::from_bytes(lock);
        let mut stack = Stack::new(flags.has_flag(VerifyFlags::MINIMALDATA));
        execute_script(None, 0, &unlock, &mut stack, flags)?;
        execute_script(None, 0, &lock, &mut stack, flags)?;
        if stack.is_empty() {
            return Err(InterpreterError::new(
                ScriptErrorCode::CleanStack,
                "stack empty at end of script execution",
            ));
        }
        let top = stack.pop_bytes()?;
        if !as_bool(&top) {
            return Err(InterpreterError::new(
                ScriptErrorCode::EvalFalse,
                "script resulted in a non-true stack",
            ));
        }
        Ok(())
    }

    fn assert_code(result: Result<(), InterpreterError>, code: ScriptErrorCode) {
        match result {
            Ok(()) => panic!("expected {:?}, script succeeded", code),
            Err(e) => assert_eq!(e.code, code, "unexpected error: {}", e),
        }
    }

    #[test]
    fn test_op_1_op_1_op_equal() {
        assert!(eval(&[OP_1], &[OP_1, OP_EQUAL], VerifyFlags::NONE).is_ok());
    }

    #[test]
    fn test_op_1_op_2_op_equal_fails() {
        assert_code(
            eval(&[OP_1], &[OP_2, OP_EQUAL], VerifyFlags::NONE),
            ScriptErrorCode::EvalFalse,
        );
    }

    #[test]
    fn test_op_add() {
        assert!(eval(&[OP_2, OP_3], &[OP_ADD, OP_5, OP_EQUAL], VerifyFlags::NONE).is_ok());
    }

    #[test]
    fn test_op_sub() {
        assert!(eval(&[OP_5, OP_3], &[OP_SUB, OP_2, OP_EQUAL], VerifyFlags::NONE).is_ok());
    }

    #[test]
    fn test_hash160_equalverify() {
        use bitscript_primitives::hash::hash160;

        let preimage = vec![0x04; 33];
        let digest = hash160(&preimage);

        let mut unlock = vec![preimage.len() as u8];
        unlock.extend_from_slice(&preimage);

        let mut lock = vec![OP_DUP, OP_HASH160, digest.len() as u8];
        lock.extend_from_slice(&digest);
        lock.extend_from_slice(&[OP_EQUALVERIFY, OP_SIZE]);

        assert!(eval(&unlock, &lock, VerifyFlags::NONE).is_ok());
    }

    #[test]
    fn test_op_if_else_endif() {
        assert!(eval(&[], &[OP_1, OP_IF, OP_2, OP_ELSE, OP_3, OP_ENDIF], VerifyFlags::NONE).is_ok());
    }

    #[test]
    fn test_op_notif() {
        assert!(eval(&[], &[OP_0, OP_NOTIF, OP_1, OP_ELSE, OP_0, OP_ENDIF], VerifyFlags::NONE).is_ok());
    }

    #[test]
    fn test_nested_if() {
        assert!(eval(&[], &[OP_1, OP_IF, OP_1, OP_IF, OP_2, OP_ENDIF, OP_ENDIF], VerifyFlags::NONE).is_ok());
    }

    #[test]
    fn test_dead_branch_skips_body() {
        // OP_0 OP_IF OP_RETURN OP_ENDIF OP_1: the return never executes.
        assert!(eval(&[], &[OP_0, OP_IF, OP_RETURN, OP_ENDIF, OP_1], VerifyFlags::NONE).is_ok());
    }

    #[test]
    fn test_unbalanced_if() {
        assert_code(
            eval(&[OP_1], &[OP_IF], VerifyFlags::NONE),
            ScriptErrorCode::UnbalancedConditional,
        );
    }

    #[test]
    fn test_else_without_if() {
        assert_code(
            eval(&[OP_1], &[OP_ELSE, OP_1, OP_ENDIF], VerifyFlags::NONE),
            ScriptErrorCode::UnbalancedConditional,
        );
    }

    #[test]
    fn test_if_on_empty_stack() {
        assert_code(
            eval(&[], &[OP_IF, OP_1, OP_ENDIF], VerifyFlags::NONE),
            ScriptErrorCode::UnbalancedConditional,
        );
    }

    #[test]
    fn test_op_return() {
        assert_code(
            eval(&[OP_1], &[OP_RETURN], VerifyFlags::NONE),
            ScriptErrorCode::OpReturn,
        );
    }

    #[test]
    fn test_op_verify() {
        assert!(eval(&[OP_1], &[OP_VERIFY, OP_1], VerifyFlags::NONE).is_ok());
        assert_code(
            eval(&[OP_0], &[OP_VERIFY], VerifyFlags::NONE),
            ScriptErrorCode::Verify,
        );
    }

    #[test]
    fn test_op_depth() {
        assert!(eval(&[OP_1, OP_2, OP_3], &[OP_DEPTH, OP_3, OP_EQUAL], VerifyFlags::NONE).is_ok());
    }

    #[test]
    fn test_op_size() {
        assert!(eval(
            &[0x03, 0xaa, 0xbb, 0xcc],
            &[OP_SIZE, OP_3, OP_EQUALVERIFY, OP_1],
            VerifyFlags::NONE
        )
        .is_ok());
    }

    #[test]
    fn test_alt_stack() {
        assert!(eval(
            &[OP_5],
            &[OP_TOALTSTACK, OP_FROMALTSTACK, OP_5, OP_EQUAL],
            VerifyFlags::NONE
        )
        .is_ok());
    }

    #[test]
    fn test_from_alt_stack_empty() {
        assert_code(
            eval(&[OP_1], &[OP_FROMALTSTACK], VerifyFlags::NONE),
            ScriptErrorCode::InvalidAltstackOperation,
        );
    }

    #[test]
    fn test_op_pick_roll() {
        // PICK copies: [1 2 3] 2 PICK -> [1 2 3 1]
        assert!(eval(
            &[OP_1, OP_2, OP_3, OP_2],
            &[OP_PICK, OP_1, OP_EQUALVERIFY, OP_3, OP_EQUALVERIFY, OP_2, OP_EQUALVERIFY, OP_1, OP_EQUAL],
            VerifyFlags::NONE
        )
        .is_ok());

        // ROLL moves: [1 2 3] 2 ROLL -> [2 3 1]
        assert!(eval(
            &[OP_1, OP_2, OP_3, OP_2],
            &[OP_ROLL, OP_1, OP_EQUALVERIFY, OP_3, OP_EQUALVERIFY, OP_2, OP_EQUAL],
            VerifyFlags::NONE
        )
        .is_ok());
    }

    #[test]
    fn test_op_pick_out_of_range() {
        assert_code(
            eval(&[OP_1, OP_5], &[OP_PICK], VerifyFlags::NONE),
            ScriptErrorCode::InvalidStackOperation,
        );
    }

    #[test]
    fn test_op_rot() {
        // [1 2 3] ROT -> [2 3 1]
        assert!(eval(
            &[OP_1, OP_2, OP_3],
            &[OP_ROT, OP_1, OP_EQUALVERIFY, OP_3, OP_EQUALVERIFY, OP_2, OP_EQUAL],
            VerifyFlags::NONE
        )
        .is_ok());
    }

    #[test]
    fn test_op_tuck() {
        // [1 2] TUCK -> [2 1 2]
        assert!(eval(
            &[OP_1, OP_2],
            &[OP_TUCK, OP_2, OP_EQUALVERIFY, OP_1, OP_EQUALVERIFY, OP_2, OP_EQUAL],
            VerifyFlags::NONE
        )
        .is_ok());
    }

    #[test]
    fn test_op_2dup() {
        assert!(eval(
            &[OP_1, OP_2],
            &[OP_2DUP, OP_2, OP_EQUALVERIFY, OP_1, OP_EQUALVERIFY, OP_2, OP_EQUALVERIFY, OP_1, OP_EQUAL],
            VerifyFlags::NONE
        )
        .is_ok());
    }

    #[test]
    fn test_op_2rot() {
        // [1 2 3 4 5 6] 2ROT -> [3 4 5 6 1 2]
        assert!(eval(
            &[OP_1, OP_2, OP_3, OP_4, OP_5, OP_6],
            &[
                OP_2ROT, OP_2, OP_EQUALVERIFY, OP_1, OP_EQUALVERIFY, OP_6, OP_EQUALVERIFY,
                OP_5, OP_EQUALVERIFY, OP_4, OP_EQUALVERIFY, OP_3, OP_EQUAL,
            ],
            VerifyFlags::NONE
        )
        .is_ok());
    }

    #[test]
    fn test_op_ifdup() {
        assert!(eval(&[OP_1], &[OP_IFDUP, OP_EQUAL], VerifyFlags::NONE).is_ok());
        // Falsy top is not duplicated.
        assert!(eval(&[OP_1, OP_0], &[OP_IFDUP, OP_DROP], VerifyFlags::NONE).is_ok());
    }

    #[test]
    fn test_disabled_opcodes_always_fail() {
        for op in [OP_INVERT, OP_LSHIFT, OP_RSHIFT, OP_2MUL, OP_2DIV, OP_MUL] {
            assert_code(
                eval(&[OP_1, OP_1], &[op], VerifyFlags::NONE),
                ScriptErrorCode::DisabledOpcode,
            );
        }
    }

    #[test]
    fn test_disabled_opcode_in_dead_branch() {
        // Disabled opcodes abort even when the surrounding branch is dead.
        assert_code(
            eval(&[], &[OP_0, OP_IF, OP_MUL, OP_ENDIF], VerifyFlags::NONE),
            ScriptErrorCode::DisabledOpcode,
        );
    }

    #[test]
    fn test_monolith_gated_opcodes() {
        // Without the flag, OP_CAT is disabled.
        assert_code(
            eval(&[0x01, 0xaa, 0x01, 0xbb], &[OP_CAT], VerifyFlags::NONE),
            ScriptErrorCode::DisabledOpcode,
        );
        // With the flag it concatenates.
        assert!(eval(
            &[0x01, 0xaa, 0x01, 0xbb],
            &[OP_CAT, 0x02, 0xaa, 0xbb, OP_EQUAL],
            VerifyFlags::MONOLITH_OPCODES
        )
        .is_ok());
    }

    #[test]
    fn test_op_split() {
        assert!(eval(
            &[0x02, 0xaa, 0xbb, OP_1],
            &[OP_SPLIT, 0x01, 0xbb, OP_EQUALVERIFY, 0x01, 0xaa, OP_EQUAL],
            VerifyFlags::MONOLITH_OPCODES
        )
        .is_ok());

        // Split at zero and at the full length are legal.
        assert!(eval(
            &[0x02, 0xaa, 0xbb, OP_0],
            &[OP_SPLIT, 0x02, 0xaa, 0xbb, OP_EQUALVERIFY, OP_0, OP_EQUAL],
            VerifyFlags::MONOLITH_OPCODES
        )
        .is_ok());

        // Out of range.
        assert_code(
            eval(&[0x02, 0xaa, 0xbb, OP_3], &[OP_SPLIT], VerifyFlags::MONOLITH_OPCODES),
            ScriptErrorCode::UnknownError,
        );
    }

    #[test]
    fn test_op_and_or_xor() {
        let flags = VerifyFlags::MONOLITH_OPCODES;
        assert!(eval(&[0x01, 0xff, 0x01, 0x0f], &[OP_AND, 0x01, 0x0f, OP_EQUAL], flags).is_ok());
        assert!(eval(&[0x01, 0xf0, 0x01, 0x0f], &[OP_OR, 0x01, 0xff, OP_EQUAL], flags).is_ok());
        assert!(eval(&[0x01, 0xff, 0x01, 0xf0], &[OP_XOR, 0x01, 0x0f, OP_EQUAL], flags).is_ok());

        // Operand length mismatch.
        assert_code(
            eval(&[0x01, 0xff, 0x02, 0x0f, 0x00], &[OP_AND], flags),
            ScriptErrorCode::UnknownError,
        );
    }

    #[test]
    fn test_op_num2bin_bin2num() {
        let flags = VerifyFlags::MONOLITH_OPCODES;
        // 1 padded into 4 bytes and back.
        assert!(eval(
            &[OP_1, OP_4],
            &[OP_NUM2BIN, 0x04, 0x01, 0x00, 0x00, 0x00, OP_EQUAL],
            flags
        )
        .is_ok());
        assert!(eval(
            &[0x04, 0x01, 0x00, 0x00, 0x00],
            &[OP_BIN2NUM, OP_1, OP_EQUAL],
            flags
        )
        .is_ok());

        // Negative number keeps its sign through padding.
        assert!(eval(
            &[OP_1NEGATE, OP_3],
            &[OP_NUM2BIN, 0x03, 0x01, 0x00, 0x80, OP_EQUAL],
            flags
        )
        .is_ok());

        // Impossible resize.
        assert_code(
            eval(&[0x02, 0xff, 0x7f, OP_1], &[OP_NUM2BIN], flags),
            ScriptErrorCode::UnknownError,
        );

        // BIN2NUM result exceeding 4 bytes is rejected.
        assert_code(
            eval(&[0x05, 0xff, 0xff, 0xff, 0xff, 0x7f], &[OP_BIN2NUM], flags),
            ScriptErrorCode::InvalidStackOperation,
        );
    }

    #[test]
    fn test_arithmetic_unary() {
        assert!(eval(&[OP_1], &[OP_NEGATE, OP_1NEGATE, OP_EQUAL], VerifyFlags::NONE).is_ok());
        assert!(eval(&[OP_1NEGATE], &[OP_ABS, OP_1, OP_EQUAL], VerifyFlags::NONE).is_ok());
        assert!(eval(&[OP_0], &[OP_NOT], VerifyFlags::NONE).is_ok());
        assert!(eval(&[OP_2], &[OP_0NOTEQUAL], VerifyFlags::NONE).is_ok());
        assert!(eval(&[OP_2], &[OP_1ADD, OP_3, OP_EQUAL], VerifyFlags::NONE).is_ok());
        assert!(eval(&[OP_2], &[OP_1SUB, OP_1, OP_EQUAL], VerifyFlags::NONE).is_ok());
    }

    #[test]
    fn test_op_div_mod() {
        let flags = VerifyFlags::MONOLITH_OPCODES;
        assert!(eval(&[OP_6, OP_3], &[OP_DIV, OP_2, OP_EQUAL], flags).is_ok());
        assert!(eval(&[OP_7, OP_3], &[OP_MOD, OP_1, OP_EQUAL], flags).is_ok());

        // Truncated division and remainder keep the dividend's sign.
        assert!(eval(&[OP_7, OP_3], &[OP_NEGATE, OP_DIV, 0x01, 0x82, OP_EQUAL], flags).is_ok());
        assert!(eval(
            &[0x01, 0x87, OP_3],
            &[OP_MOD, 0x01, 0x81, OP_EQUAL],
            flags
        )
        .is_ok());

        assert_code(
            eval(&[OP_6, OP_0], &[OP_DIV], flags),
            ScriptErrorCode::UnknownError,
        );
        assert_code(
            eval(&[OP_6, OP_0], &[OP_MOD], flags),
            ScriptErrorCode::UnknownError,
        );
    }

    #[test]
    fn test_comparisons() {
        assert!(eval(&[OP_3, OP_5], &[OP_LESSTHAN], VerifyFlags::NONE).is_ok());
        assert!(eval(&[OP_5, OP_3], &[OP_GREATERTHAN], VerifyFlags::NONE).is_ok());
        assert!(eval(&[OP_3, OP_3], &[OP_LESSTHANOREQUAL], VerifyFlags::NONE).is_ok());
        assert!(eval(&[OP_3, OP_3], &[OP_GREATERTHANOREQUAL], VerifyFlags::NONE).is_ok());
        assert!(eval(&[OP_5, OP_5], &[OP_NUMEQUAL], VerifyFlags::NONE).is_ok());
        assert!(eval(&[OP_5, OP_4], &[OP_NUMNOTEQUAL], VerifyFlags::NONE).is_ok());
        assert!(eval(&[OP_3, OP_5], &[OP_MIN, OP_3, OP_EQUAL], VerifyFlags::NONE).is_ok());
        assert!(eval(&[OP_3, OP_5], &[OP_MAX, OP_5, OP_EQUAL], VerifyFlags::NONE).is_ok());
        assert!(eval(&[OP_1, OP_1], &[OP_BOOLAND], VerifyFlags::NONE).is_ok());
        assert!(eval(&[OP_0, OP_1], &[OP_BOOLOR], VerifyFlags::NONE).is_ok());
    }

    #[test]
    fn test_op_within() {
        // 3 is within [2, 5).
        assert!(eval(&[OP_3, OP_2, OP_5], &[OP_WITHIN], VerifyFlags::NONE).is_ok());
        // 5 is not within [2, 5).
        assert_code(
            eval(&[OP_5, OP_2, OP_5], &[OP_WITHIN], VerifyFlags::NONE),
            ScriptErrorCode::EvalFalse,
        );
    }

    #[test]
    fn test_op_numequalverify() {
        assert!(eval(&[OP_5, OP_5], &[OP_NUMEQUALVERIFY, OP_1], VerifyFlags::NONE).is_ok());
        assert_code(
            eval(&[OP_5, OP_4], &[OP_NUMEQUALVERIFY, OP_1], VerifyFlags::NONE),
            ScriptErrorCode::NumEqualVerify,
        );
    }

    #[test]
    fn test_op_equalverify_failure() {
        assert_code(
            eval(&[OP_1, OP_2], &[OP_EQUALVERIFY, OP_1], VerifyFlags::NONE),
            ScriptErrorCode::EqualVerify,
        );
    }

    #[test]
    fn test_hash_opcode_sizes() {
        assert!(eval(&[OP_0], &[OP_SHA256, OP_SIZE, 0x01, 0x20, OP_EQUALVERIFY, OP_1], VerifyFlags::NONE).is_ok());
        assert!(eval(&[OP_0], &[OP_SHA1, OP_SIZE, 0x01, 0x14, OP_EQUALVERIFY, OP_1], VerifyFlags::NONE).is_ok());
        assert!(eval(&[OP_0], &[OP_RIPEMD160, OP_SIZE, 0x01, 0x14, OP_EQUALVERIFY, OP_1], VerifyFlags::NONE).is_ok());
        assert!(eval(&[OP_0], &[OP_HASH160, OP_SIZE, 0x01, 0x14, OP_EQUALVERIFY, OP_1], VerifyFlags::NONE).is_ok());
        assert!(eval(&[OP_0], &[OP_HASH256, OP_SIZE, 0x01, 0x20, OP_EQUALVERIFY, OP_1], VerifyFlags::NONE).is_ok());
    }

    #[test]
    fn test_minimal_data_push() {
        // Pushing 5 as a direct one-byte push violates minimal data.
        assert_code(
            eval(&[0x01, 0x05], &[OP_5, OP_EQUAL], VerifyFlags::MINIMALDATA),
            ScriptErrorCode::MinimalData,
        );
        assert!(eval(&[0x01, 0x05], &[OP_5, OP_EQUAL], VerifyFlags::NONE).is_ok());
    }

    #[test]
    fn test_minimal_number_operand() {
        // 0x0100 decodes as 1 only without the minimal rule; with it, the
        // numeric decode itself rejects the operand.
        assert!(eval(&[0x02, 0x01, 0x00], &[OP_1ADD, OP_2, OP_EQUAL], VerifyFlags::NONE).is_ok());
        assert_code(
            eval(&[0x02, 0x01, 0x00], &[OP_1ADD, OP_2, OP_EQUAL], VerifyFlags::MINIMALDATA),
            ScriptErrorCode::UnknownError,
        );
    }

    #[test]
    fn test_upgradable_nops() {
        for op in [OP_NOP1, OP_NOP3, OP_NOP4, OP_NOP5, OP_NOP6, OP_NOP7, OP_NOP8, OP_NOP9, OP_NOP10] {
            assert!(eval(&[OP_1], &[op], VerifyFlags::NONE).is_ok());
            assert_code(
                eval(&[OP_1], &[op], VerifyFlags::DISCOURAGE_UPGRADABLE_NOPS),
                ScriptErrorCode::DiscourageUpgradableNops,
            );
        }
    }

    #[test]
    fn test_cltv_nop_when_flag_unset() {
        assert!(eval(&[OP_1], &[OP_CHECKLOCKTIMEVERIFY], VerifyFlags::NONE).is_ok());
        assert_code(
            eval(&[OP_1], &[OP_CHECKLOCKTIMEVERIFY], VerifyFlags::DISCOURAGE_UPGRADABLE_NOPS),
            ScriptErrorCode::DiscourageUpgradableNops,
        );
    }

    #[test]
    fn test_bad_opcode() {
        assert_code(
            eval(&[OP_1], &[0xff], VerifyFlags::NONE),
            ScriptErrorCode::BadOpcode,
        );
        assert_code(
            eval(&[OP_1], &[OP_RESERVED], VerifyFlags::NONE),
            ScriptErrorCode::BadOpcode,
        );
    }

    #[test]
    fn test_push_size_limit() {
        // A 521-byte push exceeds the element size limit.
        let mut lock = vec![OP_PUSHDATA2, 0x09, 0x02];
        lock.extend_from_slice(&[0xaa; 521]);
        assert_code(
            eval(&[OP_1], &lock, VerifyFlags::NONE),
            ScriptErrorCode::PushSize,
        );
    }

    #[test]
    fn test_op_count_limit() {
        // 202 OP_NOPs exceed the operation limit.
        let mut lock = vec![OP_1];
        lock.extend_from_slice(&[OP_NOP; 202]);
        assert_code(
            eval(&[], &lock, VerifyFlags::NONE),
            ScriptErrorCode::OpCount,
        );

        // 201 is right at the limit.
        let mut lock = vec![OP_1];
        lock.extend_from_slice(&[OP_NOP; 201]);
        assert!(eval(&[], &lock, VerifyFlags::NONE).is_ok());
    }

    #[test]
    fn test_stack_size_limit() {
        // 1001 pushes overflow the combined stack limit. Pushes carry no
        // op-count cost, so only the stack rule can trip.
        let unlock = vec![OP_1; 1001];
        assert_code(
            eval(&unlock, &[OP_1], VerifyFlags::NONE),
            ScriptErrorCode::StackSize,
        );

        // Exactly 1000 at the high-water mark is fine.
        let unlock = vec![OP_1; 999];
        assert!(eval(&unlock, &[OP_1, OP_EQUAL], VerifyFlags::NONE).is_ok());
    }

    #[test]
    fn test_checksig_without_tx_context() {
        let result = eval(&[OP_0, OP_0], &[OP_CHECKSIG], VerifyFlags::NONE);
        assert_code(result, ScriptErrorCode::InvalidParams);
    }
}
