//! Flow control and locktime operations.

use super::error::{InterpreterError, ScriptErrorCode};
use super::flags::VerifyFlags;
use super::scriptnum::ScriptNum;
use super::thread::Thread;
use super::LOCKTIME_THRESHOLD;

/// A sequence number of 0xFFFFFFFF marks the input as final, which turns
/// the locktime field off.
const FINAL_SEQUENCE: u32 = 0xFFFF_FFFF;

/// Operand length for the locktime number, relaxed to 5 bytes so time
/// locks survive the year-2038 boundary.
const LOCKTIME_NUM_LENGTH: usize = 5;

impl<'a> Thread<'a> {
    pub(crate) fn op_if(
        &mut self,
        should_execute: bool,
        negate: bool,
    ) -> Result<(), InterpreterError> {
        // A nested conditional inside a dead branch records a dead arm
        // without touching the data stack.
        if !should_execute {
            self.if_stack.push(false);
            return Ok(());
        }
        if self.stack.is_empty() {
            return Err(InterpreterError::new(
                ScriptErrorCode::UnbalancedConditional,
                "attempted a conditional on an empty stack",
            ));
        }
        let condition = self.stack.pop_bool()?;
        self.if_stack.push(condition != negate);
        Ok(())
    }

    pub(crate) fn op_else(&mut self) -> Result<(), InterpreterError> {
        match self.if_stack.pop() {
            Some(top) => {
                self.if_stack.push(!top);
                Ok(())
            }
            None => Err(InterpreterError::new(
                ScriptErrorCode::UnbalancedConditional,
                "attempted OP_ELSE without OP_IF/NOTIF",
            )),
        }
    }

    pub(crate) fn op_endif(&mut self) -> Result<(), InterpreterError> {
        match self.if_stack.pop() {
            Some(_) => Ok(()),
            None => Err(InterpreterError::new(
                ScriptErrorCode::UnbalancedConditional,
                "attempted OP_ENDIF without OP_IF/NOTIF",
            )),
        }
    }

    pub(crate) fn op_verify(&mut self) -> Result<(), InterpreterError> {
        if self.stack.is_empty() {
            return Err(InterpreterError::new(
                ScriptErrorCode::InvalidStackOperation,
                "attempted OP_VERIFY on an empty stack",
            ));
        }
        if !self.stack.pop_bool()? {
            return Err(InterpreterError::new(
                ScriptErrorCode::Verify,
                "OP_VERIFY failed",
            ));
        }
        Ok(())
    }

    pub(crate) fn op_check_locktime_verify(&mut self) -> Result<(), InterpreterError> {
        if !self.has_flag(VerifyFlags::CHECKLOCKTIMEVERIFY) {
            // Not enabled; behaves as OP_NOP2.
            if self.has_flag(VerifyFlags::DISCOURAGE_UPGRADABLE_NOPS) {
                return Err(InterpreterError::new(
                    ScriptErrorCode::DiscourageUpgradableNops,
                    "script used a reserved opcode OP_CHECKLOCKTIMEVERIFY",
                ));
            }
            return Ok(());
        }

        let ctx = self.require_ctx()?;

        if self.stack.is_empty() {
            return Err(InterpreterError::new(
                ScriptErrorCode::InvalidStackOperation,
                "attempted OP_CHECKLOCKTIMEVERIFY on an empty stack",
            ));
        }

        // The operand stays on the stack; scripts drop it explicitly.
        let top = self.stack.peek_bytes(0)?.to_vec();
        let lock_time = ScriptNum::from_bytes(
            &top,
            LOCKTIME_NUM_LENGTH,
            self.has_flag(VerifyFlags::MINIMALDATA),
        )?;

        if lock_time.is_negative() {
            return Err(InterpreterError::new(
                ScriptErrorCode::NegativeLockTime,
                "negative locktime",
            ));
        }

        verify_lock_time(ctx.lock_time() as i64, lock_time.to_i64())?;

        // A finalized input would let the transaction into a block no
        // matter the locktime, making the check meaningless.
        if ctx.input_sequence(self.input_index) == FINAL_SEQUENCE {
            return Err(InterpreterError::new(
                ScriptErrorCode::UnsatisfiedLockTime,
                "transaction input is final",
            ));
        }

        Ok(())
    }
}

/// Compare a stack locktime against the transaction locktime.
///
/// Both must be on the same side of the height/time threshold, and the
/// stack operand must not exceed the transaction value.
fn verify_lock_time(tx_lock_time: i64, lock_time: i64) -> Result<(), InterpreterError> {
    let same_kind = (tx_lock_time < LOCKTIME_THRESHOLD && lock_time < LOCKTIME_THRESHOLD)
        || (tx_lock_time >= LOCKTIME_THRESHOLD && lock_time >= LOCKTIME_THRESHOLD);
    if !same_kind {
        return Err(InterpreterError::new(
            ScriptErrorCode::UnsatisfiedLockTime,
            "locktime requirement type mismatch",
        ));
    }
    if lock_time > tx_lock_time {
        return Err(InterpreterError::new(
            ScriptErrorCode::UnsatisfiedLockTime,
            format!(
                "locktime requirement not satisfied: {} > {}",
                lock_time, tx_lock_time
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_lock_time() {
        // Same kind, satisfied.
        assert!(verify_lock_time(500, 100).is_ok());
        assert!(verify_lock_time(600_000_000, 500_000_001).is_ok());
        // Same kind, unsatisfied.
        assert!(verify_lock_time(100, 500).is_err());
        // Height against timestamp.
        assert!(verify_lock_time(100, 500_000_001).is_err());
        assert!(verify_lock_time(600_000_000, 100).is_err());
        // Threshold boundary: 499_999_999 is a height, 500_000_000 a time.
        assert!(verify_lock_time(499_999_999, 499_999_999).is_ok());
        assert!(verify_lock_time(500_000_000, 499_999_999).is_err());
    }
}
