//! Stack manipulation operations.

use crate::opcodes::*;

use super::error::{InterpreterError, ScriptErrorCode};
use super::scriptnum::ScriptNum;
use super::stack::as_bool;
use super::thread::Thread;

impl<'a> Thread<'a> {
    fn require_depth(&self, n: usize, op: &str) -> Result<(), InterpreterError> {
        if self.stack.depth() < n {
            return Err(InterpreterError::new(
                ScriptErrorCode::InvalidStackOperation,
                format!("attempted {} on a stack with size < {}", op, n),
            ));
        }
        Ok(())
    }

    pub(crate) fn op_to_alt_stack(&mut self) -> Result<(), InterpreterError> {
        let data = self.stack.pop_bytes()?;
        self.altstack.push_bytes(data);
        Ok(())
    }

    pub(crate) fn op_from_alt_stack(&mut self) -> Result<(), InterpreterError> {
        if self.altstack.is_empty() {
            return Err(InterpreterError::new(
                ScriptErrorCode::InvalidAltstackOperation,
                "attempted OP_FROMALTSTACK on an empty altstack",
            ));
        }
        let data = self.altstack.pop_bytes()?;
        self.stack.push_bytes(data);
        Ok(())
    }

    pub(crate) fn op_drop(&mut self) -> Result<(), InterpreterError> {
        self.stack.pop_bytes().map(|_| ())
    }

    pub(crate) fn op_2drop(&mut self) -> Result<(), InterpreterError> {
        self.require_depth(2, "OP_2DROP")?;
        self.stack.pop_bytes()?;
        self.stack.pop_bytes()?;
        Ok(())
    }

    /// Duplicate the top `n` elements in place.
    pub(crate) fn op_dup_n(&mut self, n: usize) -> Result<(), InterpreterError> {
        self.require_depth(n, "a dup operation")?;
        for _ in 0..n {
            let item = self.stack.peek_bytes(n - 1)?.to_vec();
            self.stack.push_bytes(item);
        }
        Ok(())
    }

    /// Copy the pair two pairs down: [a b c d] -> [a b c d a b].
    pub(crate) fn op_2over(&mut self) -> Result<(), InterpreterError> {
        self.require_depth(4, "OP_2OVER")?;
        let a = self.stack.peek_bytes(3)?.to_vec();
        let b = self.stack.peek_bytes(2)?.to_vec();
        self.stack.push_bytes(a);
        self.stack.push_bytes(b);
        Ok(())
    }

    /// Rotate the third pair to the top: [1 2 3 4 5 6] -> [3 4 5 6 1 2].
    pub(crate) fn op_2rot(&mut self) -> Result<(), InterpreterError> {
        self.require_depth(6, "OP_2ROT")?;
        let a = self.stack.remove_at_depth(5)?;
        let b = self.stack.remove_at_depth(4)?;
        self.stack.push_bytes(a);
        self.stack.push_bytes(b);
        Ok(())
    }

    /// Swap the top two pairs: [a b c d] -> [c d a b].
    pub(crate) fn op_2swap(&mut self) -> Result<(), InterpreterError> {
        self.require_depth(4, "OP_2SWAP")?;
        let a = self.stack.remove_at_depth(3)?;
        let b = self.stack.remove_at_depth(2)?;
        self.stack.push_bytes(a);
        self.stack.push_bytes(b);
        Ok(())
    }

    pub(crate) fn op_ifdup(&mut self) -> Result<(), InterpreterError> {
        let top = self.stack.peek_bytes(0)?.to_vec();
        if as_bool(&top) {
            self.stack.push_bytes(top);
        }
        Ok(())
    }

    pub(crate) fn op_depth(&mut self) -> Result<(), InterpreterError> {
        let depth = self.stack.depth() as i64;
        self.stack.push_num(&ScriptNum::new(depth));
        Ok(())
    }

    /// Remove the element below the top: [a b] -> [b].
    pub(crate) fn op_nip(&mut self) -> Result<(), InterpreterError> {
        self.require_depth(2, "OP_NIP")?;
        self.stack.remove_at_depth(1)?;
        Ok(())
    }

    /// Copy the element below the top: [a b] -> [a b a].
    pub(crate) fn op_over(&mut self) -> Result<(), InterpreterError> {
        let item = self.stack.peek_bytes(1)?.to_vec();
        self.stack.push_bytes(item);
        Ok(())
    }

    /// Pop a depth operand, then copy (OP_PICK) or move (OP_ROLL) the
    /// element that far down to the top.
    pub(crate) fn op_pick_roll(&mut self, opcode: u8) -> Result<(), InterpreterError> {
        if self.stack.is_empty() {
            return Err(InterpreterError::new(
                ScriptErrorCode::InvalidStackOperation,
                "attempted OP_PICK/OP_ROLL on an empty stack",
            ));
        }
        let n = self.stack.pop_num()?.to_i64();
        if n < 0 || n >= self.stack.depth() as i64 {
            return Err(InterpreterError::new(
                ScriptErrorCode::InvalidStackOperation,
                "OP_PICK/OP_ROLL attempted to get data deeper than stack size",
            ));
        }
        let item = if opcode == OP_ROLL {
            self.stack.remove_at_depth(n as usize)?
        } else {
            self.stack.peek_bytes(n as usize)?.to_vec()
        };
        self.stack.push_bytes(item);
        Ok(())
    }

    /// Rotate the third element to the top: [a b c] -> [b c a].
    pub(crate) fn op_rot(&mut self) -> Result<(), InterpreterError> {
        self.require_depth(3, "OP_ROT")?;
        let item = self.stack.remove_at_depth(2)?;
        self.stack.push_bytes(item);
        Ok(())
    }

    /// OP_SWAP: [a b] -> [b a]. OP_TUCK additionally re-pushes the old
    /// top below: [a b] -> [b a b].
    pub(crate) fn op_swap_tuck(&mut self, opcode: u8) -> Result<(), InterpreterError> {
        self.require_depth(2, "OP_SWAP")?;
        let b = self.stack.pop_bytes()?;
        let a = self.stack.pop_bytes()?;
        self.stack.push_bytes(b.clone());
        self.stack.push_bytes(a);
        if opcode == OP_TUCK {
            self.stack.push_bytes(b);
        }
        Ok(())
    }
}
