//! Signature hash computation.
//!
//! Builds the 32-byte message that a transaction signature commits to.
//! Two algorithms exist: the legacy scheme, which serializes a modified
//! copy of the transaction, and the value-committing scheme selected by
//! the FORKID bit, which hashes a fixed-layout preimage that includes the
//! satoshi amount being spent.

use bitscript_primitives::hash::sha256d;
use bitscript_primitives::util::{ByteWriter, VarInt};
use bitscript_script::opcodes::OP_CODESEPARATOR;
use bitscript_script::{chunk, Script};

use crate::transaction::Transaction;
use crate::TransactionError;

// -----------------------------------------------------------------------
// Sighash flag constants
// -----------------------------------------------------------------------

/// Sign all inputs and all outputs (the default).
pub const SIGHASH_ALL: u32 = 0x01;

/// Sign all inputs but no outputs, allowing outputs to be modified.
pub const SIGHASH_NONE: u32 = 0x02;

/// Sign all inputs and only the output with the same index as the signed
/// input.
pub const SIGHASH_SINGLE: u32 = 0x03;

/// Only sign the current input, allowing other inputs to be added later.
pub const SIGHASH_ANYONECANPAY: u32 = 0x80;

/// Replay-protection bit selecting the value-committing digest algorithm.
pub const SIGHASH_FORKID: u32 = 0x40;

/// Mask applied to extract the base sighash mode.
pub const SIGHASH_MASK: u32 = 0x1f;

/// Value used to blank an output in a SIGHASH_SINGLE legacy digest.
/// Serializes as -1 on the wire.
const BLANKED_OUTPUT_SATOSHIS: u64 = u64::MAX;

/// Compute the signature hash for one input of a transaction.
///
/// `sub_script` is the connected script the signature commits to (the
/// locking script, or its suffix after an OP_CODESEPARATOR, with any
/// embedded signature pushes already removed by the caller).
/// `sighash_type` is the raw flag byte from the signature; its FORKID bit
/// selects between the two digest algorithms. `satoshis` is the value of
/// the output being spent, committed to only by the FORKID algorithm.
pub fn signature_hash(
    tx: &Transaction,
    input_index: usize,
    sub_script: &Script,
    sighash_type: u32,
    satoshis: u64,
) -> Result<[u8; 32], TransactionError> {
    if input_index >= tx.inputs.len() {
        return Err(TransactionError::InvalidTransaction(format!(
            "input index {} out of range (tx has {} inputs)",
            input_index,
            tx.inputs.len()
        )));
    }

    if sighash_type & SIGHASH_FORKID != 0 {
        Ok(forkid_hash(tx, input_index, sub_script, sighash_type, satoshis))
    } else {
        Ok(legacy_hash(tx, input_index, sub_script, sighash_type))
    }
}

// -----------------------------------------------------------------------
// Legacy digest
// -----------------------------------------------------------------------

/// The digest returned for a SIGHASH_SINGLE signature whose input index
/// has no matching output. A quirk of the original protocol: the "hash"
/// is the integer one.
fn single_sentinel() -> [u8; 32] {
    let mut one = [0u8; 32];
    one[0] = 0x01;
    one
}

/// Legacy digest: double-SHA256 of a modified transaction copy followed
/// by the 4-byte sighash value.
fn legacy_hash(
    tx: &Transaction,
    input_index: usize,
    sub_script: &Script,
    sighash_type: u32,
) -> [u8; 32] {
    let base_type = sighash_type & SIGHASH_MASK;

    if base_type == SIGHASH_SINGLE && input_index >= tx.outputs.len() {
        return single_sentinel();
    }

    let mut tx = tx.clone();

    // Every input script is cleared; the signed input carries the
    // connected script with code separators stripped.
    for input in &mut tx.inputs {
        input.script = Script::new();
    }
    tx.inputs[input_index].script = remove_code_separators(sub_script);

    if base_type == SIGHASH_NONE {
        tx.outputs.clear();
        zero_other_sequences(&mut tx, input_index);
    } else if base_type == SIGHASH_SINGLE {
        tx.outputs.truncate(input_index + 1);
        for output in tx.outputs.iter_mut().take(input_index) {
            output.satoshis = BLANKED_OUTPUT_SATOSHIS;
            output.script = Script::new();
        }
        zero_other_sequences(&mut tx, input_index);
    }

    if sighash_type & SIGHASH_ANYONECANPAY != 0 {
        let own = tx.inputs[input_index].clone();
        tx.inputs = vec![own];
    }

    let mut writer = ByteWriter::with_capacity(tx.size() + 4);
    writer.write_bytes(&tx.to_bytes());
    writer.write_u32_le(sighash_type & 0xff);
    sha256d(writer.as_bytes())
}

fn zero_other_sequences(tx: &mut Transaction, input_index: usize) {
    for (i, input) in tx.inputs.iter_mut().enumerate() {
        if i != input_index {
            input.sequence = 0;
        }
    }
}

/// Strip OP_CODESEPARATOR chunks from a script. Unparseable scripts pass
/// through untouched.
fn remove_code_separators(script: &Script) -> Script {
    let chunks = match chunk::decode_script(script.to_bytes()) {
        Ok(chunks) => chunks,
        Err(_) => return script.clone(),
    };
    let mut out = Vec::with_capacity(script.len());
    for c in chunks {
        if c.op != OP_CODESEPARATOR {
            out.extend_from_slice(&c.to_bytes());
        }
    }
    Script::from_bytes(&out)
}

// -----------------------------------------------------------------------
// FORKID digest
// -----------------------------------------------------------------------

/// Value-committing digest: double-SHA256 of the fixed-layout preimage
///
/// nVersion || hashPrevouts || hashSequence || outpoint ||
/// scriptCode || value || nSequence || hashOutputs || nLocktime ||
/// sighashType
fn forkid_hash(
    tx: &Transaction,
    input_index: usize,
    sub_script: &Script,
    sighash_type: u32,
    satoshis: u64,
) -> [u8; 32] {
    let input = &tx.inputs[input_index];
    let base_type = sighash_type & SIGHASH_MASK;

    let hash_prevouts = if sighash_type & SIGHASH_ANYONECANPAY == 0 {
        prevouts_hash(tx)
    } else {
        [0u8; 32]
    };

    let hash_sequence = if sighash_type & SIGHASH_ANYONECANPAY == 0
        && base_type != SIGHASH_SINGLE
        && base_type != SIGHASH_NONE
    {
        sequence_hash(tx)
    } else {
        [0u8; 32]
    };

    let hash_outputs = if base_type != SIGHASH_SINGLE && base_type != SIGHASH_NONE {
        outputs_hash(tx, None)
    } else if base_type == SIGHASH_SINGLE && input_index < tx.outputs.len() {
        outputs_hash(tx, Some(input_index))
    } else {
        [0u8; 32]
    };

    let mut writer = ByteWriter::with_capacity(256);
    writer.write_u32_le(tx.version);
    writer.write_bytes(&hash_prevouts);
    writer.write_bytes(&hash_sequence);
    writer.write_bytes(&input.prev_txid);
    writer.write_u32_le(input.prev_index);
    writer.write_varint(VarInt::from(sub_script.len()));
    writer.write_bytes(sub_script.to_bytes());
    writer.write_u64_le(satoshis);
    writer.write_u32_le(input.sequence);
    writer.write_bytes(&hash_outputs);
    writer.write_u32_le(tx.lock_time);
    writer.write_u32_le(sighash_type);

    sha256d(writer.as_bytes())
}

/// Double-SHA256 of all input outpoints concatenated.
fn prevouts_hash(tx: &Transaction) -> [u8; 32] {
    let mut writer = ByteWriter::with_capacity(tx.inputs.len() * 36);
    for input in &tx.inputs {
        writer.write_bytes(&input.prev_txid);
        writer.write_u32_le(input.prev_index);
    }
    sha256d(writer.as_bytes())
}

/// Double-SHA256 of all input sequence numbers concatenated.
fn sequence_hash(tx: &Transaction) -> [u8; 32] {
    let mut writer = ByteWriter::with_capacity(tx.inputs.len() * 4);
    for input in &tx.inputs {
        writer.write_u32_le(input.sequence);
    }
    sha256d(writer.as_bytes())
}

/// Double-SHA256 of all serialized outputs, or of the single output at
/// `index` for SIGHASH_SINGLE.
fn outputs_hash(tx: &Transaction, index: Option<usize>) -> [u8; 32] {
    let mut writer = ByteWriter::new();
    match index {
        None => {
            for output in &tx.outputs {
                writer.write_bytes(&output.to_bytes());
            }
        }
        Some(i) => writer.write_bytes(&tx.outputs[i].to_bytes()),
    }
    sha256d(writer.as_bytes())
}
