use crate::parser::Instruction;

pub mod bytecode;

/// A very simple bytecode set of instructions
#[derive(Clone, Debug, PartialEq)]
pub enum ByteCode {
    /// Move the data pointer by the given number of cells
    Shift(isize),

    /// Dereference the data pointer and add to the tape value
    DerefAdd(u8),

    /// Dereference the data pointer and subtract from the tape value
    DerefSub(u8),

    /// Write the cell at the data pointer this many times
    Write(usize),

    /// Read into the cell at the data pointer (always fails)
    Read,

    /// An instruction that has no meaning outside the tree it came from
    Undefined(Instruction),

    /// Jump instructions forwards if zero
    JumpForwardsIfZero(usize),

    /// Jump instructions backwards if non-zero
    JumpBackwardsIfNonZero(usize),
}
