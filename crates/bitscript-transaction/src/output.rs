//! Transaction output with satoshi value and locking script.

use bitscript_primitives::util::{ByteReader, ByteWriter, VarInt};
use bitscript_script::Script;

use crate::TransactionError;

/// A single transaction output.
///
/// Specifies a satoshi value and the locking script (scriptPubKey) that
/// defines the conditions under which the value may be spent.
///
/// # Wire format
///
/// | Field         | Size            |
/// |---------------|-----------------|
/// | satoshis      | 8 bytes (LE)    |
/// | script length | VarInt          |
/// | script        | variable        |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxOutput {
    /// The number of satoshis locked by this output.
    pub satoshis: u64,

    /// The locking script (scriptPubKey).
    pub script: Script,
}

impl TxOutput {
    /// Create an output with zero satoshis and an empty script.
    pub fn new() -> Self {
        TxOutput {
            satoshis: 0,
            script: Script::new(),
        }
    }

    /// Deserialize an output from a reader positioned at its first byte.
    pub fn read_from(reader: &mut ByteReader) -> Result<Self, TransactionError> {
        let satoshis = reader.read_u64_le().map_err(|e| {
            TransactionError::SerializationError(format!("reading satoshis: {}", e))
        })?;

        let script_len = reader.read_varint().map_err(|e| {
            TransactionError::SerializationError(format!("reading script length: {}", e))
        })?;
        let script_bytes = reader.read_bytes(script_len.value() as usize).map_err(|e| {
            TransactionError::SerializationError(format!("reading locking script: {}", e))
        })?;

        Ok(TxOutput {
            satoshis,
            script: Script::from_bytes(script_bytes),
        })
    }

    /// Serialize this output into a writer.
    pub fn write_to(&self, writer: &mut ByteWriter) {
        writer.write_u64_le(self.satoshis);
        let script_bytes = self.script.to_bytes();
        writer.write_varint(VarInt::from(script_bytes.len()));
        writer.write_bytes(script_bytes);
    }

    /// Serialize this output to a byte vector.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::new();
        self.write_to(&mut writer);
        writer.into_bytes()
    }
}

impl Default for TxOutput {
    fn default() -> Self {
        Self::new()
    }
}
