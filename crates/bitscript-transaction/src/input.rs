//! Transaction input referencing a previous output.

use bitscript_primitives::util::{ByteReader, ByteWriter, VarInt};
use bitscript_script::Script;

use crate::TransactionError;

/// Default sequence number indicating a finalized input (no lock-time
/// participation).
pub const DEFAULT_SEQUENCE_NUMBER: u32 = 0xFFFF_FFFF;

/// A single transaction input.
///
/// References an output of a previous transaction by txid and output
/// index, and carries the unlocking script that proves authorization.
///
/// # Wire format
///
/// | Field         | Size            |
/// |---------------|-----------------|
/// | prev_txid     | 32 bytes        |
/// | prev_index    | 4 bytes (LE)    |
/// | script length | VarInt          |
/// | script        | variable        |
/// | sequence      | 4 bytes (LE)    |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxInput {
    /// The 32-byte transaction ID of the output being spent, in internal
    /// (little-endian) byte order.
    pub prev_txid: [u8; 32],

    /// Index of the output within the source transaction.
    pub prev_index: u32,

    /// The unlocking script (scriptSig).
    pub script: Script,

    /// Sequence number. Defaults to 0xFFFFFFFF (finalized).
    pub sequence: u32,
}

impl TxInput {
    /// Create an input with a zeroed outpoint, empty script, and final
    /// sequence.
    pub fn new() -> Self {
        TxInput {
            prev_txid: [0u8; 32],
            prev_index: 0,
            script: Script::new(),
            sequence: DEFAULT_SEQUENCE_NUMBER,
        }
    }

    /// Deserialize an input from a reader positioned at its first byte.
    pub fn read_from(reader: &mut ByteReader) -> Result<Self, TransactionError> {
        let txid_bytes = reader.read_bytes(32).map_err(|e| {
            TransactionError::SerializationError(format!("reading prev txid: {}", e))
        })?;
        let mut prev_txid = [0u8; 32];
        prev_txid.copy_from_slice(txid_bytes);

        let prev_index = reader.read_u32_le().map_err(|e| {
            TransactionError::SerializationError(format!("reading output index: {}", e))
        })?;

        let script_len = reader.read_varint().map_err(|e| {
            TransactionError::SerializationError(format!("reading script length: {}", e))
        })?;
        let script_bytes = reader.read_bytes(script_len.value() as usize).map_err(|e| {
            TransactionError::SerializationError(format!("reading unlocking script: {}", e))
        })?;

        let sequence = reader.read_u32_le().map_err(|e| {
            TransactionError::SerializationError(format!("reading sequence number: {}", e))
        })?;

        Ok(TxInput {
            prev_txid,
            prev_index,
            script: Script::from_bytes(script_bytes),
            sequence,
        })
    }

    /// Serialize this input into a writer.
    pub fn write_to(&self, writer: &mut ByteWriter) {
        writer.write_bytes(&self.prev_txid);
        writer.write_u32_le(self.prev_index);
        let script_bytes = self.script.to_bytes();
        writer.write_varint(VarInt::from(script_bytes.len()));
        writer.write_bytes(script_bytes);
        writer.write_u32_le(self.sequence);
    }
}

impl Default for TxInput {
    fn default() -> Self {
        Self::new()
    }
}
