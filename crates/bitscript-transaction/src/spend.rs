//! Top-level spend verifier.
//!
//! Drives the script interpreter over an input's unlocking and locking
//! scripts, applies the final truth check, and re-evaluates the redeem
//! script for pay-to-script-hash outputs.

use bitscript_primitives::ec::PublicKey;
use bitscript_script::interpreter::stack::as_bool;
use bitscript_script::interpreter::{
    execute_script, InterpreterError, ScriptErrorCode, Stack, TxContext, VerifyFlags,
    MAX_SCRIPT_SIZE,
};
use bitscript_script::opcodes::OP_16;
use bitscript_script::Script;

use crate::input::DEFAULT_SEQUENCE_NUMBER;
use crate::sighash::signature_hash;
use crate::signature::TransactionSignature;
use crate::transaction::Transaction;

/// The [`TxContext`] implementation backed by a transaction and the value
/// of the output being spent.
pub struct TxSigContext<'a> {
    /// The transaction containing the input under verification.
    pub tx: &'a Transaction,
    /// Satoshi value of the output being spent. Committed to by
    /// FORKID-style signatures.
    pub satoshis: u64,
}

impl<'a> TxContext for TxSigContext<'a> {
    fn check_sig(
        &self,
        sig_with_hash_type: &[u8],
        pub_key: &[u8],
        sub_script: &Script,
        input_index: usize,
        require_canonical: bool,
        require_low_s: bool,
    ) -> Result<bool, InterpreterError> {
        let sig = TransactionSignature::decode_from_bitcoin(
            sig_with_hash_type,
            require_canonical,
            require_low_s,
        )
        .map_err(|e| InterpreterError::new(ScriptErrorCode::UnknownError, e.to_string()))?;

        let digest = signature_hash(
            self.tx,
            input_index,
            sub_script,
            sig.sighash_flags,
            self.satoshis,
        )
        .map_err(|e| InterpreterError::new(ScriptErrorCode::UnknownError, e.to_string()))?;

        let key = PublicKey::from_bytes(pub_key)
            .map_err(|e| InterpreterError::new(ScriptErrorCode::UnknownError, e.to_string()))?;

        Ok(sig.signature.verify(&digest, &key))
    }

    fn lock_time(&self) -> u32 {
        self.tx.lock_time
    }

    fn input_sequence(&self, input_index: usize) -> u32 {
        self.tx
            .inputs
            .get(input_index)
            .map(|input| input.sequence)
            .unwrap_or(DEFAULT_SEQUENCE_NUMBER)
    }
}

/// Verify that `script_sig` correctly spends `script_pub_key` for the
/// given input of `tx`.
///
/// The transaction is defensively cloned through a serialize/reparse
/// round-trip so that no aliasing caller can mutate it mid-evaluation.
/// `satoshis` is the value of the output being spent, needed when
/// FORKID-style signatures are used.
pub fn correctly_spends(
    script_sig: &Script,
    script_pub_key: &Script,
    tx: &Transaction,
    input_index: usize,
    flags: VerifyFlags,
    satoshis: u64,
) -> Result<(), InterpreterError> {
    let tx = Transaction::from_bytes(&tx.to_bytes()).map_err(|e| {
        InterpreterError::new(
            ScriptErrorCode::UnknownError,
            format!("transaction does not reserialize: {}", e),
        )
    })?;

    if script_sig.len() > MAX_SCRIPT_SIZE || script_pub_key.len() > MAX_SCRIPT_SIZE {
        return Err(InterpreterError::new(
            ScriptErrorCode::ScriptSize,
            "script larger than 10,000 bytes",
        ));
    }

    let ctx = TxSigContext {
        tx: &tx,
        satoshis,
    };

    let mut stack = Stack::new(flags.has_flag(VerifyFlags::MINIMALDATA));

    // The unlocking script primes the stack the locking script runs on.
    execute_script(Some(&ctx), input_index, script_sig, &mut stack, flags)?;

    let p2sh_snapshot = if flags.has_flag(VerifyFlags::P2SH) {
        Some(stack.snapshot())
    } else {
        None
    };

    execute_script(Some(&ctx), input_index, script_pub_key, &mut stack, flags)?;

    if stack.is_empty() {
        return Err(InterpreterError::new(
            ScriptErrorCode::CleanStack,
            "stack empty at end of script execution",
        ));
    }
    if !as_bool(&stack.pop_bytes()?) {
        return Err(InterpreterError::new(
            ScriptErrorCode::EvalFalse,
            "script resulted in a non-true stack",
        ));
    }

    // A P2SH locking script commits to a hash of the real locking script,
    // which the unlocking script supplies as its final push. Re-run it
    // against the rest of the primed stack.
    if flags.has_flag(VerifyFlags::P2SH) && script_pub_key.is_p2sh() {
        let chunks = script_sig.chunks().map_err(|e| {
            InterpreterError::new(
                ScriptErrorCode::UnknownError,
                format!("malformed script: {}", e),
            )
        })?;
        for chunk in &chunks {
            if chunk.op > OP_16 {
                return Err(InterpreterError::new(
                    ScriptErrorCode::UnknownError,
                    "attempted to spend a P2SH output with a non-push unlocking script",
                ));
            }
        }

        let mut p2sh_stack = Stack::new(flags.has_flag(VerifyFlags::MINIMALDATA));
        p2sh_stack.restore(p2sh_snapshot.unwrap_or_default());

        let redeem_bytes = p2sh_stack.pop_bytes()?;
        let redeem_script = Script::from_bytes(&redeem_bytes);

        execute_script(Some(&ctx), input_index, &redeem_script, &mut p2sh_stack, flags)?;

        if p2sh_stack.is_empty() {
            return Err(InterpreterError::new(
                ScriptErrorCode::CleanStack,
                "P2SH stack empty at end of script execution",
            ));
        }
        if !as_bool(&p2sh_stack.pop_bytes()?) {
            return Err(InterpreterError::new(
                ScriptErrorCode::EvalFalse,
                "P2SH script execution resulted in a non-true stack",
            ));
        }
    }

    Ok(())
}
