//! Bitcoin script type, opcode definitions, chunk parsing, and the
//! consensus script interpreter.
//!
//! The interpreter evaluates an unlocking script together with a locking
//! script under a set of verification flags and decides whether a
//! transaction input correctly authorizes spending. Signature checking is
//! reached through the [`interpreter::TxContext`] trait so that this crate
//! does not depend on the transaction model.

pub mod chunk;
pub mod interpreter;
pub mod opcodes;
pub mod script;

mod error;
pub use chunk::ScriptChunk;
pub use error::ScriptError;
pub use script::Script;
