//! Numeric operations.
//!
//! Operands are decoded as script numbers of at most 4 bytes; results are
//! re-encoded minimally and may exceed 4 bytes without failing until they
//! are next used as numbers.

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::Zero;

use crate::opcodes::*;

use super::error::{InterpreterError, ScriptErrorCode};
use super::scriptnum::ScriptNum;
use super::thread::Thread;

impl<'a> Thread<'a> {
    pub(crate) fn op_unary_numeric(&mut self, opcode: u8) -> Result<(), InterpreterError> {
        if self.stack.is_empty() {
            return Err(InterpreterError::new(
                ScriptErrorCode::InvalidStackOperation,
                "attempted a numeric op on an empty stack",
            ));
        }
        let num = self.stack.pop_num()?.val;

        let result = match opcode {
            OP_1ADD => num + 1,
            OP_1SUB => num - 1,
            OP_NEGATE => -num,
            OP_ABS => {
                if num < BigInt::zero() {
                    -num
                } else {
                    num
                }
            }
            OP_NOT => {
                if num.is_zero() {
                    BigInt::from(1)
                } else {
                    BigInt::zero()
                }
            }
            _ => {
                // OP_0NOTEQUAL
                if num.is_zero() {
                    BigInt::zero()
                } else {
                    BigInt::from(1)
                }
            }
        };

        self.stack.push_num(&ScriptNum::from_bigint(result));
        Ok(())
    }

    pub(crate) fn op_binary_numeric(&mut self, opcode: u8) -> Result<(), InterpreterError> {
        if self.stack.depth() < 2 {
            return Err(InterpreterError::new(
                ScriptErrorCode::InvalidStackOperation,
                "attempted a numeric op on a stack with size < 2",
            ));
        }
        let num2 = self.stack.pop_num()?.val;
        let num1 = self.stack.pop_num()?.val;

        let bool_result = |b: bool| {
            if b {
                BigInt::from(1)
            } else {
                BigInt::zero()
            }
        };

        let result = match opcode {
            OP_ADD => num1 + num2,
            OP_SUB => num1 - num2,
            OP_DIV => {
                if num2.is_zero() {
                    return Err(InterpreterError::new(
                        ScriptErrorCode::UnknownError,
                        "division by zero error",
                    ));
                }
                // Truncated toward zero.
                let (q, _) = num1.div_rem(&num2);
                q
            }
            OP_MOD => {
                if num2.is_zero() {
                    return Err(InterpreterError::new(
                        ScriptErrorCode::UnknownError,
                        "modulo by zero error",
                    ));
                }
                // Truncated remainder: the sign follows the dividend.
                let (_, r) = num1.div_rem(&num2);
                r
            }
            OP_BOOLAND => bool_result(!num1.is_zero() && !num2.is_zero()),
            OP_BOOLOR => bool_result(!num1.is_zero() || !num2.is_zero()),
            OP_NUMEQUAL => bool_result(num1 == num2),
            OP_NUMNOTEQUAL => bool_result(num1 != num2),
            OP_LESSTHAN => bool_result(num1 < num2),
            OP_GREATERTHAN => bool_result(num1 > num2),
            OP_LESSTHANOREQUAL => bool_result(num1 <= num2),
            OP_GREATERTHANOREQUAL => bool_result(num1 >= num2),
            OP_MIN => {
                if num1 < num2 {
                    num1
                } else {
                    num2
                }
            }
            _ => {
                // OP_MAX
                if num1 > num2 {
                    num1
                } else {
                    num2
                }
            }
        };

        self.stack.push_num(&ScriptNum::from_bigint(result));
        Ok(())
    }

    pub(crate) fn op_numequalverify(&mut self) -> Result<(), InterpreterError> {
        if self.stack.depth() < 2 {
            return Err(InterpreterError::new(
                ScriptErrorCode::InvalidStackOperation,
                "attempted OP_NUMEQUALVERIFY on a stack with size < 2",
            ));
        }
        let num2 = self.stack.pop_num()?.val;
        let num1 = self.stack.pop_num()?.val;
        if num1 != num2 {
            return Err(InterpreterError::new(
                ScriptErrorCode::NumEqualVerify,
                "OP_NUMEQUALVERIFY failed",
            ));
        }
        Ok(())
    }

    /// min <= x < max.
    pub(crate) fn op_within(&mut self) -> Result<(), InterpreterError> {
        if self.stack.depth() < 3 {
            return Err(InterpreterError::new(
                ScriptErrorCode::InvalidStackOperation,
                "attempted OP_WITHIN on a stack with size < 3",
            ));
        }
        let max = self.stack.pop_num()?.val;
        let min = self.stack.pop_num()?.val;
        let x = self.stack.pop_num()?.val;
        let within = min <= x && x < max;
        self.stack
            .push_num(&ScriptNum::from_bigint(if within {
                BigInt::from(1)
            } else {
                BigInt::zero()
            }));
        Ok(())
    }
}
