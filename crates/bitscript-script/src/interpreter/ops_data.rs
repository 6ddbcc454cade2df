//! Byte-string and equality operations.

use crate::opcodes::*;

use super::error::{InterpreterError, ScriptErrorCode};
use super::scriptnum::{minimally_encode, ScriptNum};
use super::stack::MAX_NUM_LENGTH;
use super::thread::Thread;
use super::MAX_SCRIPT_ELEMENT_SIZE;

impl<'a> Thread<'a> {
    pub(crate) fn op_cat(&mut self) -> Result<(), InterpreterError> {
        if self.stack.depth() < 2 {
            return Err(InterpreterError::new(
                ScriptErrorCode::InvalidStackOperation,
                "attempted OP_CAT on a stack with size < 2",
            ));
        }
        let b = self.stack.pop_bytes()?;
        let mut a = self.stack.pop_bytes()?;
        if a.len() + b.len() > MAX_SCRIPT_ELEMENT_SIZE {
            return Err(InterpreterError::new(
                ScriptErrorCode::UnknownError,
                "push value size limit exceeded",
            ));
        }
        a.extend_from_slice(&b);
        self.stack.push_bytes(a);
        Ok(())
    }

    pub(crate) fn op_split(&mut self) -> Result<(), InterpreterError> {
        if self.stack.depth() < 2 {
            return Err(InterpreterError::new(
                ScriptErrorCode::InvalidStackOperation,
                "attempted OP_SPLIT on a stack with size < 2",
            ));
        }
        let pos = self.stack.pop_num()?.to_i64();
        let data = self.stack.pop_bytes()?;

        if pos < 0 || pos > data.len() as i64 {
            return Err(InterpreterError::new(
                ScriptErrorCode::UnknownError,
                "invalid OP_SPLIT range",
            ));
        }

        let pos = pos as usize;
        self.stack.push_bytes(data[..pos].to_vec());
        self.stack.push_bytes(data[pos..].to_vec());
        Ok(())
    }

    pub(crate) fn op_num2bin(&mut self) -> Result<(), InterpreterError> {
        if self.stack.depth() < 2 {
            return Err(InterpreterError::new(
                ScriptErrorCode::InvalidStackOperation,
                "attempted OP_NUM2BIN on a stack with size < 2",
            ));
        }
        let size = self.stack.pop_num()?.to_i64();
        if size > MAX_SCRIPT_ELEMENT_SIZE as i64 {
            return Err(InterpreterError::new(
                ScriptErrorCode::StackSize,
                "push value size limit exceeded",
            ));
        }

        let raw = self.stack.pop_bytes()?;
        let mut minimal = minimally_encode(&raw);

        if minimal.len() as i64 > size {
            return Err(InterpreterError::new(
                ScriptErrorCode::UnknownError,
                "the requested encoding is impossible to satisfy",
            ));
        }

        if minimal.len() as i64 == size {
            self.stack.push_bytes(minimal);
            return Ok(());
        }
        if size == 0 {
            self.stack.push_bytes(vec![]);
            return Ok(());
        }

        // Move the sign bit onto a fresh top byte after zero padding.
        let mut sign_bit = 0x00u8;
        if let Some(last) = minimal.last_mut() {
            sign_bit = *last & 0x80;
            *last &= 0x7f;
        }
        let mut expanded = vec![0u8; size as usize];
        expanded[..minimal.len()].copy_from_slice(&minimal);
        let last = expanded.len() - 1;
        expanded[last] = sign_bit;
        self.stack.push_bytes(expanded);
        Ok(())
    }

    pub(crate) fn op_bin2num(&mut self) -> Result<(), InterpreterError> {
        let data = self.stack.pop_bytes()?;
        let minimal = minimally_encode(&data);

        if minimal.len() > MAX_NUM_LENGTH {
            return Err(InterpreterError::new(
                ScriptErrorCode::InvalidStackOperation,
                "given operand is not a number within the valid range [-2^31...2^31]",
            ));
        }

        self.stack.push_bytes(minimal);
        Ok(())
    }

    pub(crate) fn op_size(&mut self) -> Result<(), InterpreterError> {
        let len = self.stack.peek_bytes(0)?.len() as i64;
        self.stack.push_num(&ScriptNum::new(len));
        Ok(())
    }

    pub(crate) fn op_bitwise(&mut self, opcode: u8) -> Result<(), InterpreterError> {
        if self.stack.depth() < 2 {
            return Err(InterpreterError::new(
                ScriptErrorCode::InvalidStackOperation,
                "attempted a bitwise op on a stack with size < 2",
            ));
        }
        let b = self.stack.pop_bytes()?;
        let mut a = self.stack.pop_bytes()?;

        if a.len() != b.len() {
            return Err(InterpreterError::new(
                ScriptErrorCode::UnknownError,
                "invalid operand size",
            ));
        }

        match opcode {
            OP_AND => {
                for (x, y) in a.iter_mut().zip(b.iter()) {
                    *x &= y;
                }
            }
            OP_OR => {
                for (x, y) in a.iter_mut().zip(b.iter()) {
                    *x |= y;
                }
            }
            _ => {
                for (x, y) in a.iter_mut().zip(b.iter()) {
                    *x ^= y;
                }
            }
        }

        self.stack.push_bytes(a);
        Ok(())
    }

    pub(crate) fn op_equal(&mut self) -> Result<(), InterpreterError> {
        if self.stack.depth() < 2 {
            return Err(InterpreterError::new(
                ScriptErrorCode::InvalidStackOperation,
                "attempted OP_EQUAL on a stack with size < 2",
            ));
        }
        let a = self.stack.pop_bytes()?;
        let b = self.stack.pop_bytes()?;
        self.stack.push_bool(a == b);
        Ok(())
    }

    pub(crate) fn op_equalverify(&mut self) -> Result<(), InterpreterError> {
        if self.stack.depth() < 2 {
            return Err(InterpreterError::new(
                ScriptErrorCode::InvalidStackOperation,
                "attempted OP_EQUALVERIFY on a stack with size < 2",
            ));
        }
        let a = self.stack.pop_bytes()?;
        let b = self.stack.pop_bytes()?;
        if a != b {
            return Err(InterpreterError::new(
                ScriptErrorCode::EqualVerify,
                "OP_EQUALVERIFY: non-equal data",
            ));
        }
        Ok(())
    }
}
