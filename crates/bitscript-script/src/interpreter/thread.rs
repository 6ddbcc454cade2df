//! Script execution thread - the core interpreter loop.

use crate::chunk::{decode_script, ScriptChunk};
use crate::opcodes::*;
use crate::Script;

use super::error::{InterpreterError, ScriptErrorCode};
use super::flags::VerifyFlags;
use super::scriptnum::ScriptNum;
use super::stack::Stack;
use super::{TxContext, MAX_OPS_PER_SCRIPT, MAX_SCRIPT_ELEMENT_SIZE, MAX_STACK_SIZE};

/// Execute a single script against a caller-owned main stack.
///
/// The main stack persists across calls so the unlocking script primes the
/// stack for the locking script. The alternate stack and the conditional
/// stack are fresh for each script. `ctx` supplies transaction data for the
/// signature and locktime opcodes; passing `None` makes those opcodes fail
/// with a precondition error.
pub fn execute_script(
    ctx: Option<&dyn TxContext>,
    input_index: usize,
    script: &Script,
    stack: &mut Stack,
    flags: VerifyFlags,
) -> Result<(), InterpreterError> {
    let chunks = decode_script(script.to_bytes()).map_err(|e| {
        InterpreterError::new(ScriptErrorCode::UnknownError, format!("malformed script: {}", e))
    })?;

    let mut thread = Thread {
        stack,
        altstack: Stack::new(flags.has_flag(VerifyFlags::MINIMALDATA)),
        if_stack: Vec::new(),
        flags,
        ctx,
        input_index,
        program: script.to_bytes(),
        last_code_sep: 0,
        op_count: 0,
    };
    thread.run(&chunks)
}

/// The execution state for one script.
pub(crate) struct Thread<'a> {
    /// The main data stack, shared across the scripts of one evaluation.
    pub(crate) stack: &'a mut Stack,
    /// The alternate stack used by OP_TOALTSTACK and OP_FROMALTSTACK.
    pub(crate) altstack: Stack,
    /// Nested conditional state; execution is live iff no entry is false.
    pub(crate) if_stack: Vec<bool>,
    /// Active verification flags.
    pub(crate) flags: VerifyFlags,
    /// Transaction context for signature and locktime opcodes.
    pub(crate) ctx: Option<&'a dyn TxContext>,
    /// The input index being verified.
    pub(crate) input_index: usize,
    /// Raw bytes of the executing script, for connected-script slicing.
    pub(crate) program: &'a [u8],
    /// Offset just past the most recent OP_CODESEPARATOR.
    pub(crate) last_code_sep: usize,
    /// Running count of non-push opcodes.
    pub(crate) op_count: usize,
}

/// Return true if the opcode can never execute: either permanently removed
/// from the protocol, or gated behind the restored-opcodes flag.
fn is_opcode_disabled(opcode: u8, flags: VerifyFlags) -> bool {
    match opcode {
        OP_INVERT | OP_LSHIFT | OP_RSHIFT | OP_2MUL | OP_2DIV | OP_MUL => true,
        OP_CAT | OP_SPLIT | OP_AND | OP_OR | OP_XOR | OP_DIV | OP_MOD | OP_NUM2BIN
        | OP_BIN2NUM => !flags.has_flag(VerifyFlags::MONOLITH_OPCODES),
        _ => false,
    }
}

impl<'a> Thread<'a> {
    pub(crate) fn has_flag(&self, flag: VerifyFlags) -> bool {
        self.flags.has_flag(flag)
    }

    /// Require the transaction context, failing with the caller-precondition
    /// code when it is absent.
    pub(crate) fn require_ctx(&self) -> Result<&'a dyn TxContext, InterpreterError> {
        self.ctx.ok_or_else(|| {
            InterpreterError::new(
                ScriptErrorCode::InvalidParams,
                "script attempted signature check but no tx was provided",
            )
        })
    }

    fn run(&mut self, chunks: &[ScriptChunk]) -> Result<(), InterpreterError> {
        let mut next_location = 0usize;

        for chunk in chunks {
            let should_execute = !self.if_stack.contains(&false);
            next_location += chunk.size();

            if let Some(ref data) = chunk.data {
                if data.len() > MAX_SCRIPT_ELEMENT_SIZE {
                    return Err(InterpreterError::new(
                        ScriptErrorCode::PushSize,
                        "attempted to push a data string larger than 520 bytes",
                    ));
                }
            }

            // OP_RESERVED and below do not count towards the opcode limit.
            if chunk.op > OP_16 {
                self.op_count += 1;
                if self.op_count > MAX_OPS_PER_SCRIPT {
                    return Err(InterpreterError::new(
                        ScriptErrorCode::OpCount,
                        "more script operations than is allowed",
                    ));
                }
            }

            // Disabled opcodes fail on sight, executing branch or not.
            if is_opcode_disabled(chunk.op, self.flags) {
                return Err(InterpreterError::new(
                    ScriptErrorCode::DisabledOpcode,
                    format!("script included disabled opcode {}", opcode_to_string(chunk.op)),
                ));
            }

            if should_execute && chunk.op <= OP_PUSHDATA4 {
                if self.has_flag(VerifyFlags::MINIMALDATA) && !chunk.is_shortest_push() {
                    return Err(InterpreterError::new(
                        ScriptErrorCode::MinimalData,
                        "script included a not minimal push operation",
                    ));
                }
                match chunk.data {
                    Some(ref data) => self.stack.push_bytes(data.clone()),
                    None => self.stack.push_bytes(vec![]),
                }
            } else if should_execute || (OP_IF..=OP_ENDIF).contains(&chunk.op) {
                self.execute_opcode(chunk, should_execute, next_location)?;
            }

            if self.stack.depth() + self.altstack.depth() > MAX_STACK_SIZE {
                return Err(InterpreterError::new(
                    ScriptErrorCode::StackSize,
                    "stack size exceeded range",
                ));
            }
        }

        if !self.if_stack.is_empty() {
            return Err(InterpreterError::new(
                ScriptErrorCode::UnbalancedConditional,
                "OP_IF/OP_NOTIF without OP_ENDIF",
            ));
        }

        Ok(())
    }

    fn execute_opcode(
        &mut self,
        chunk: &ScriptChunk,
        should_execute: bool,
        next_location: usize,
    ) -> Result<(), InterpreterError> {
        let opcode = chunk.op;
        match opcode {
            // Conditional flow control runs even in a dead branch to keep
            // the if-stack balanced.
            OP_IF => self.op_if(should_execute, false),
            OP_NOTIF => self.op_if(should_execute, true),
            OP_ELSE => self.op_else(),
            OP_ENDIF => self.op_endif(),

            OP_1NEGATE => {
                self.stack.push_num(&ScriptNum::new(-1));
                Ok(())
            }
            op if (OP_1..=OP_16).contains(&op) => {
                self.stack.push_num(&ScriptNum::new((op - OP_1 + 1) as i64));
                Ok(())
            }

            OP_NOP => Ok(()),
            OP_VERIFY => self.op_verify(),
            OP_RETURN => Err(InterpreterError::new(
                ScriptErrorCode::OpReturn,
                "script called OP_RETURN",
            )),

            // Stack ops
            OP_TOALTSTACK => self.op_to_alt_stack(),
            OP_FROMALTSTACK => self.op_from_alt_stack(),
            OP_2DROP => self.op_2drop(),
            OP_2DUP => self.op_dup_n(2),
            OP_3DUP => self.op_dup_n(3),
            OP_2OVER => self.op_2over(),
            OP_2ROT => self.op_2rot(),
            OP_2SWAP => self.op_2swap(),
            OP_IFDUP => self.op_ifdup(),
            OP_DEPTH => self.op_depth(),
            OP_DROP => self.op_drop(),
            OP_DUP => self.op_dup_n(1),
            OP_NIP => self.op_nip(),
            OP_OVER => self.op_over(),
            OP_PICK | OP_ROLL => self.op_pick_roll(opcode),
            OP_ROT => self.op_rot(),
            OP_SWAP | OP_TUCK => self.op_swap_tuck(opcode),

            // Byte-string ops
            OP_CAT => self.op_cat(),
            OP_SPLIT => self.op_split(),
            OP_NUM2BIN => self.op_num2bin(),
            OP_BIN2NUM => self.op_bin2num(),
            OP_SIZE => self.op_size(),
            OP_AND | OP_OR | OP_XOR => self.op_bitwise(opcode),

            // Equality
            OP_EQUAL => self.op_equal(),
            OP_EQUALVERIFY => self.op_equalverify(),

            // Arithmetic
            OP_1ADD | OP_1SUB | OP_NEGATE | OP_ABS | OP_NOT | OP_0NOTEQUAL => {
                self.op_unary_numeric(opcode)
            }
            OP_ADD | OP_SUB | OP_DIV | OP_MOD | OP_BOOLAND | OP_BOOLOR | OP_NUMEQUAL
            | OP_NUMNOTEQUAL | OP_LESSTHAN | OP_GREATERTHAN | OP_LESSTHANOREQUAL
            | OP_GREATERTHANOREQUAL | OP_MIN | OP_MAX => self.op_binary_numeric(opcode),
            OP_NUMEQUALVERIFY => self.op_numequalverify(),
            OP_WITHIN => self.op_within(),

            // Crypto
            OP_RIPEMD160 | OP_SHA1 | OP_SHA256 | OP_HASH160 | OP_HASH256 => self.op_hash(opcode),
            OP_CODESEPARATOR => {
                self.last_code_sep = next_location;
                Ok(())
            }
            OP_CHECKSIG | OP_CHECKSIGVERIFY => self.op_checksig(opcode),
            OP_CHECKMULTISIG | OP_CHECKMULTISIGVERIFY => self.op_checkmultisig(opcode),

            // Locktime
            OP_CHECKLOCKTIMEVERIFY => self.op_check_locktime_verify(),

            // Unallocated NOPs reserved for soft-fork upgrades.
            OP_NOP1 | OP_NOP3 | OP_NOP4 | OP_NOP5 | OP_NOP6 | OP_NOP7 | OP_NOP8 | OP_NOP9
            | OP_NOP10 => {
                if self.has_flag(VerifyFlags::DISCOURAGE_UPGRADABLE_NOPS) {
                    return Err(InterpreterError::new(
                        ScriptErrorCode::DiscourageUpgradableNops,
                        format!("script used a reserved opcode {}", opcode_to_string(opcode)),
                    ));
                }
                Ok(())
            }

            _ => Err(InterpreterError::new(
                ScriptErrorCode::BadOpcode,
                format!("script used a reserved or invalid opcode {:#04x}", opcode),
            )),
        }
    }

    /// The raw script suffix from the last OP_CODESEPARATOR onward.
    pub(crate) fn sub_script(&self) -> &[u8] {
        &self.program[self.last_code_sep..]
    }
}
