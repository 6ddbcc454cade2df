//! Hashing and signature-check operations.

use bitscript_primitives::hash::{hash160, ripemd160, sha1, sha256, sha256d};

use crate::chunk::{decode_script, push_data_prefix};
use crate::opcodes::*;
use crate::Script;

use super::error::{InterpreterError, ScriptErrorCode};
use super::flags::VerifyFlags;
use super::thread::Thread;
use super::{MAX_OPS_PER_SCRIPT, MAX_PUBKEYS_PER_MULTISIG};

impl<'a> Thread<'a> {
    pub(crate) fn op_hash(&mut self, opcode: u8) -> Result<(), InterpreterError> {
        let data = self.stack.pop_bytes()?;
        let result: Vec<u8> = match opcode {
            OP_RIPEMD160 => ripemd160(&data).to_vec(),
            OP_SHA1 => sha1(&data).to_vec(),
            OP_SHA256 => sha256(&data).to_vec(),
            OP_HASH160 => hash160(&data).to_vec(),
            _ => sha256d(&data).to_vec(),
        };
        self.stack.push_bytes(result);
        Ok(())
    }

    /// Whether the active flags demand canonical signature encoding.
    fn require_canonical_sig(&self) -> bool {
        self.flags.has_any(&[
            VerifyFlags::STRICTENC,
            VerifyFlags::DERSIG,
            VerifyFlags::LOW_S,
        ])
    }

    pub(crate) fn op_checksig(&mut self, opcode: u8) -> Result<(), InterpreterError> {
        let ctx = self.require_ctx()?;

        if self.stack.depth() < 2 {
            return Err(InterpreterError::new(
                ScriptErrorCode::StackSize,
                "attempted OP_CHECKSIG(VERIFY) on a stack with size < 2",
            ));
        }
        let pub_key = self.stack.pop_bytes()?;
        let sig_bytes = self.stack.pop_bytes()?;

        // The signature cannot commit to itself, so any push of it inside
        // the connected script is stripped before hashing.
        let connected = remove_pushes_of(self.sub_script(), &sig_bytes);
        let connected = Script::from_bytes(&connected);

        // Decode or verification failures count as an unverified signature,
        // never as a script abort. Partially-signed scripts are executed
        // during signing flows to find out what is still missing.
        let valid = ctx
            .check_sig(
                &sig_bytes,
                &pub_key,
                &connected,
                self.input_index,
                self.require_canonical_sig(),
                self.has_flag(VerifyFlags::LOW_S),
            )
            .unwrap_or(false);

        if opcode == OP_CHECKSIG {
            self.stack.push_bool(valid);
        } else if !valid {
            return Err(InterpreterError::new(
                ScriptErrorCode::CheckSigVerify,
                "script failed OP_CHECKSIGVERIFY",
            ));
        }
        Ok(())
    }

    pub(crate) fn op_checkmultisig(&mut self, opcode: u8) -> Result<(), InterpreterError> {
        let ctx = self.require_ctx()?;

        if self.stack.depth() < 2 {
            return Err(InterpreterError::new(
                ScriptErrorCode::StackSize,
                "attempted OP_CHECKMULTISIG(VERIFY) on a stack with size < 2",
            ));
        }

        let key_count = self.stack.pop_num()?.to_i64();
        if key_count < 0 || key_count > MAX_PUBKEYS_PER_MULTISIG {
            return Err(InterpreterError::new(
                ScriptErrorCode::CheckMultiSigVerify,
                "OP_CHECKMULTISIG(VERIFY) with pubkey count out of range",
            ));
        }

        // Each listed key costs an operation, like any other opcode.
        self.op_count += key_count as usize;
        if self.op_count > MAX_OPS_PER_SCRIPT {
            return Err(InterpreterError::new(
                ScriptErrorCode::CheckMultiSigVerify,
                "total op count > 201 during OP_CHECKMULTISIG(VERIFY)",
            ));
        }

        if self.stack.depth() < key_count as usize + 1 {
            return Err(InterpreterError::new(
                ScriptErrorCode::CheckMultiSigVerify,
                "attempted OP_CHECKMULTISIG(VERIFY) without enough pubkeys on the stack",
            ));
        }
        let mut pub_keys = Vec::with_capacity(key_count as usize);
        for _ in 0..key_count {
            pub_keys.push(self.stack.pop_bytes()?);
        }

        let sig_count = self.stack.pop_num()?.to_i64();
        if sig_count < 0 || sig_count > key_count {
            return Err(InterpreterError::new(
                ScriptErrorCode::CheckMultiSigVerify,
                "OP_CHECKMULTISIG(VERIFY) with sig count out of range",
            ));
        }
        if self.stack.depth() < sig_count as usize + 1 {
            return Err(InterpreterError::new(
                ScriptErrorCode::CheckMultiSigVerify,
                "attempted OP_CHECKMULTISIG(VERIFY) without enough signatures on the stack",
            ));
        }
        let mut sigs = Vec::with_capacity(sig_count as usize);
        for _ in 0..sig_count {
            sigs.push(self.stack.pop_bytes()?);
        }

        let mut connected = self.sub_script().to_vec();
        for sig in &sigs {
            connected = remove_pushes_of(&connected, sig);
        }
        let connected = Script::from_bytes(&connected);

        let require_canonical = self.require_canonical_sig();
        let require_low_s = self.has_flag(VerifyFlags::LOW_S);

        // Greedy matching: signatures must appear in key order, and every
        // remaining signature needs a remaining key to pair with.
        let num_keys = key_count as usize;
        let num_sigs = sig_count as usize;
        let mut valid = true;
        let mut sig_idx = 0usize;
        let mut key_idx = 0usize;
        while sig_idx < num_sigs {
            let key = &pub_keys[key_idx];
            key_idx += 1;

            let matched = ctx
                .check_sig(
                    &sigs[sig_idx],
                    key,
                    &connected,
                    self.input_index,
                    require_canonical,
                    require_low_s,
                )
                .unwrap_or(false);
            if matched {
                sig_idx += 1;
            }

            if num_sigs - sig_idx > num_keys - key_idx {
                valid = false;
                break;
            }
        }

        // An extra element is consumed due to a quirk of the original
        // protocol implementation.
        let dummy = self.stack.pop_bytes()?;
        if self.has_flag(VerifyFlags::NULLDUMMY) && !dummy.is_empty() {
            return Err(InterpreterError::new(
                ScriptErrorCode::CheckMultiSigVerify,
                "OP_CHECKMULTISIG(VERIFY) with non-null dummy element",
            ));
        }

        if opcode == OP_CHECKMULTISIG {
            self.stack.push_bool(valid);
        } else if !valid {
            return Err(InterpreterError::new(
                ScriptErrorCode::CheckMultiSigVerify,
                "script failed OP_CHECKMULTISIGVERIFY",
            ));
        }
        Ok(())
    }
}

/// Remove every chunk whose serialized form is exactly a push of `data`.
///
/// Used to strip embedded signatures from the connected script before
/// computing the digest they sign. Falls back to the input untouched when
/// the bytes do not parse as chunks.
pub(crate) fn remove_pushes_of(script_bytes: &[u8], data: &[u8]) -> Vec<u8> {
    let mut pattern = match push_data_prefix(data.len()) {
        Ok(prefix) => prefix,
        Err(_) => return script_bytes.to_vec(),
    };
    pattern.extend_from_slice(data);

    let chunks = match decode_script(script_bytes) {
        Ok(chunks) => chunks,
        Err(_) => return script_bytes.to_vec(),
    };

    let mut out = Vec::with_capacity(script_bytes.len());
    for chunk in chunks {
        let bytes = chunk.to_bytes();
        if bytes != pattern {
            out.extend_from_slice(&bytes);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_pushes_of() {
        // <aa bb> OP_DUP <cc> with the <aa bb> push stripped.
        let script = hex::decode("02aabb7601cc").unwrap();
        let out = remove_pushes_of(&script, &[0xaa, 0xbb]);
        assert_eq!(out, hex::decode("7601cc").unwrap());

        // Data appearing inside a larger push is left alone.
        let script = hex::decode("03aabbcc").unwrap();
        let out = remove_pushes_of(&script, &[0xaa, 0xbb]);
        assert_eq!(out, script);

        // Multiple occurrences all go.
        let script = hex::decode("01aa7601aa").unwrap();
        let out = remove_pushes_of(&script, &[0xaa]);
        assert_eq!(out, hex::decode("76").unwrap());
    }
}
