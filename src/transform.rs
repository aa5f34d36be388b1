//! Transform capability
//!
//! The only computational boundary of the pipeline: a pair of pure functions
//! applied to an item's value, selected by its opcode. Implementations are
//! invoked concurrently from many threads with no synchronization around
//! them, so they must be stateless (or internally synchronized) and
//! reentrant.
//!
//! Behavior on an unrecognized opcode is the implementation's contract; the
//! pipeline never validates opcodes.

/// Opcode: add the operand (stage A) / subtract it back (stage B)
pub const OP_ADD: u8 = 0x01;

/// Opcode: subtract the operand (stage A) / add it back (stage B)
pub const OP_SUB: u8 = 0x02;

/// Opcode: XOR with the operand in both stages
pub const OP_XOR: u8 = 0x03;

/// The externally supplied per-item computation applied at each stage
pub trait Transform: Send + Sync {
    /// Stage-A transform, applied by producers
    fn stage_a(&self, opcode: u8, value: u64) -> u64;

    /// Stage-B transform, applied by workers
    fn stage_b(&self, opcode: u8, value: u64) -> u64;
}

/// Passes values through unchanged in both stages
///
/// Useful as a baseline and as a test fixture: with `Identity`, output values
/// must equal input values exactly.
#[derive(Debug, Default, Clone, Copy)]
pub struct Identity;

impl Transform for Identity {
    fn stage_a(&self, _opcode: u8, value: u64) -> u64 {
        value
    }

    fn stage_b(&self, _opcode: u8, value: u64) -> u64 {
        value
    }
}

/// Opcode-selected wrapping integer arithmetic
///
/// Stage A folds the operand into the value; stage B folds it back out. For
/// the opcodes defined in this module a full A→B pass is value-preserving,
/// which makes end-to-end runs easy to check. Unrecognized opcodes pass the
/// value through unchanged.
#[derive(Debug, Clone, Copy)]
pub struct Arithmetic {
    /// Operand folded into every value
    pub operand: u64,
}

impl Arithmetic {
    /// Create an arithmetic transform with the given operand
    pub fn new(operand: u64) -> Self {
        Self { operand }
    }
}

impl Transform for Arithmetic {
    fn stage_a(&self, opcode: u8, value: u64) -> u64 {
        match opcode {
            OP_ADD => value.wrapping_add(self.operand),
            OP_SUB => value.wrapping_sub(self.operand),
            OP_XOR => value ^ self.operand,
            _ => value,
        }
    }

    fn stage_b(&self, opcode: u8, value: u64) -> u64 {
        match opcode {
            OP_ADD => value.wrapping_sub(self.operand),
            OP_SUB => value.wrapping_add(self.operand),
            OP_XOR => value ^ self.operand,
            _ => value,
        }
    }
}
