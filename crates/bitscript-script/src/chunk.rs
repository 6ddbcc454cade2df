//! Script chunk parsing and encoding.
//!
//! A script chunk is either an opcode or a data push with its associated
//! bytes. This module handles decoding raw script bytes into structured
//! chunks and encoding push data with the correct OP_PUSHDATA prefix.

use crate::opcodes::*;
use crate::ScriptError;

/// A single parsed element of a Bitcoin script.
///
/// Each chunk is either a standalone opcode (like OP_DUP) or a data push
/// that carries the opcode byte and the pushed data bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptChunk {
    /// The opcode byte. For direct pushes (1-75 bytes), this is the length.
    pub op: u8,
    /// The data payload, if this chunk is a push operation.
    pub data: Option<Vec<u8>>,
}

impl ScriptChunk {
    /// Return true if this chunk is a bare opcode rather than a data push.
    pub fn is_opcode(&self) -> bool {
        self.data.is_none()
    }

    /// Return the serialized size of this chunk in bytes.
    ///
    /// Counts the opcode byte, the length header for OP_PUSHDATA1/2/4,
    /// and the payload.
    pub fn size(&self) -> usize {
        let data_len = self.data.as_ref().map_or(0, |d| d.len());
        match self.op {
            OP_PUSHDATA1 => 2 + data_len,
            OP_PUSHDATA2 => 3 + data_len,
            OP_PUSHDATA4 => 5 + data_len,
            _ => 1 + data_len,
        }
    }

    /// Return true if this push uses the smallest opcode that can emit the
    /// same data payload.
    ///
    /// Non-push chunks are trivially shortest. An empty payload must use
    /// OP_0; single bytes 1..=16 must use OP_1..OP_16; the single byte 0x81
    /// must use OP_1NEGATE; payloads of up to 75, 255, and 65535 bytes must
    /// use a direct push, OP_PUSHDATA1, and OP_PUSHDATA2 respectively.
    pub fn is_shortest_push(&self) -> bool {
        let data = match &self.data {
            Some(d) => d,
            None => return true,
        };
        if data.is_empty() {
            return self.op == OP_0;
        }
        if data.len() == 1 {
            let b = data[0];
            if (1..=16).contains(&b) {
                return self.op == OP_1 + b - 1;
            }
            if b == 0x81 {
                return self.op == OP_1NEGATE;
            }
        }
        if data.len() <= 75 {
            self.op as usize == data.len()
        } else if data.len() <= 0xFF {
            self.op == OP_PUSHDATA1
        } else if data.len() <= 0xFFFF {
            self.op == OP_PUSHDATA2
        } else {
            self.op == OP_PUSHDATA4
        }
    }

    /// Serialize this chunk back to its wire-format bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.size());
        out.push(self.op);
        if let Some(ref data) = self.data {
            match self.op {
                OP_PUSHDATA1 => out.push(data.len() as u8),
                OP_PUSHDATA2 => out.extend_from_slice(&(data.len() as u16).to_le_bytes()),
                OP_PUSHDATA4 => out.extend_from_slice(&(data.len() as u32).to_le_bytes()),
                _ => {}
            }
            out.extend_from_slice(data);
        }
        out
    }

    /// Convert this chunk to its ASM string representation.
    ///
    /// Data push chunks are rendered as hex strings; non-push opcodes use
    /// their canonical OP_xxx name.
    pub fn to_asm_string(&self) -> String {
        if self.op > OP_0 && self.op <= OP_PUSHDATA4 {
            if let Some(ref data) = self.data {
                return hex::encode(data);
            }
        }
        opcode_to_string(self.op).to_string()
    }
}

/// Decode raw script bytes into a vector of `ScriptChunk` values.
///
/// Handles direct pushes (0x01..0x4b, opcode byte doubles as length) and
/// OP_PUSHDATA1/2/4 with 1/2/4-byte little-endian length headers.
/// Truncated pushes are an error.
pub fn decode_script(bytes: &[u8]) -> Result<Vec<ScriptChunk>, ScriptError> {
    let mut chunks = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let op = bytes[pos];

        match op {
            OP_PUSHDATA1 => {
                if bytes.len() < pos + 2 {
                    return Err(ScriptError::DataTooSmall);
                }
                let length = bytes[pos + 1] as usize;
                pos += 2;
                if bytes.len() < pos + length {
                    return Err(ScriptError::DataTooSmall);
                }
                chunks.push(ScriptChunk {
                    op,
                    data: Some(bytes[pos..pos + length].to_vec()),
                });
                pos += length;
            }
            OP_PUSHDATA2 => {
                if bytes.len() < pos + 3 {
                    return Err(ScriptError::DataTooSmall);
                }
                let length = u16::from_le_bytes([bytes[pos + 1], bytes[pos + 2]]) as usize;
                pos += 3;
                if bytes.len() < pos + length {
                    return Err(ScriptError::DataTooSmall);
                }
                chunks.push(ScriptChunk {
                    op,
                    data: Some(bytes[pos..pos + length].to_vec()),
                });
                pos += length;
            }
            OP_PUSHDATA4 => {
                if bytes.len() < pos + 5 {
                    return Err(ScriptError::DataTooSmall);
                }
                let length = u32::from_le_bytes([
                    bytes[pos + 1],
                    bytes[pos + 2],
                    bytes[pos + 3],
                    bytes[pos + 4],
                ]) as usize;
                pos += 5;
                if bytes.len() < pos + length {
                    return Err(ScriptError::DataTooSmall);
                }
                chunks.push(ScriptChunk {
                    op,
                    data: Some(bytes[pos..pos + length].to_vec()),
                });
                pos += length;
            }
            0x01..=0x4b => {
                // Direct push: the opcode byte is the number of bytes to push.
                let length = op as usize;
                if bytes.len() < pos + 1 + length {
                    return Err(ScriptError::DataTooSmall);
                }
                chunks.push(ScriptChunk {
                    op,
                    data: Some(bytes[pos + 1..pos + 1 + length].to_vec()),
                });
                pos += 1 + length;
            }
            _ => {
                chunks.push(ScriptChunk { op, data: None });
                pos += 1;
            }
        }
    }

    Ok(chunks)
}

/// Compute the push prefix bytes for a data payload of the given length.
///
/// Returns the minimal prefix that should precede the data when encoding a
/// push operation into raw script bytes.
pub fn push_data_prefix(data_len: usize) -> Result<Vec<u8>, ScriptError> {
    if data_len <= 75 {
        Ok(vec![data_len as u8])
    } else if data_len <= 0xFF {
        Ok(vec![OP_PUSHDATA1, data_len as u8])
    } else if data_len <= 0xFFFF {
        let mut buf = vec![OP_PUSHDATA2];
        buf.extend_from_slice(&(data_len as u16).to_le_bytes());
        Ok(buf)
    } else if data_len <= 0xFFFFFFFF {
        let mut buf = vec![OP_PUSHDATA4];
        buf.extend_from_slice(&(data_len as u32).to_le_bytes());
        Ok(buf)
    } else {
        Err(ScriptError::DataTooBig)
    }
}
