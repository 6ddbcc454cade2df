//! Interpreter error type and consensus script-error codes.

use std::fmt;

/// Script-error codes distinguished by the interpreter.
///
/// Callers use these to classify evaluation failures; conformance vectors
/// assert on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptErrorCode {
    ScriptSize,
    PushSize,
    OpCount,
    StackSize,
    DisabledOpcode,
    MinimalData,
    BadOpcode,
    UnbalancedConditional,
    InvalidStackOperation,
    InvalidAltstackOperation,
    Verify,
    EqualVerify,
    NumEqualVerify,
    CheckSigVerify,
    CheckMultiSigVerify,
    CleanStack,
    EvalFalse,
    OpReturn,
    NegativeLockTime,
    UnsatisfiedLockTime,
    DiscourageUpgradableNops,
    UnknownError,
    /// The caller violated a precondition, e.g. a signature opcode was
    /// reached with no transaction context supplied. Not a consensus
    /// verdict on the script itself.
    InvalidParams,
}

impl fmt::Display for ScriptErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A script evaluation error with an error code and description.
#[derive(Debug, Clone)]
pub struct InterpreterError {
    pub code: ScriptErrorCode,
    pub description: String,
}

impl InterpreterError {
    pub fn new(code: ScriptErrorCode, description: impl Into<String>) -> Self {
        InterpreterError {
            code,
            description: description.into(),
        }
    }
}

impl fmt::Display for InterpreterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description)
    }
}

impl std::error::Error for InterpreterError {}
