use std::io::Write;

use tracing::debug;

use crate::bytecode::ByteCode;

use super::{Runtime, RuntimeError};

pub struct ByteCodeInterpreter {}

impl ByteCodeInterpreter {
    pub fn new() -> Self {
        Self {}
    }

    pub fn run<W: Write>(
        &mut self,
        runtime: &mut Runtime<W>,
        instructions: &[ByteCode],
    ) -> Result<(), RuntimeError> {
        let mut pc = 0;
        while pc < instructions.len() {
            match &instructions[pc] {
                ByteCode::Shift(i) => runtime.shift_data_pointer(*i)?,
                ByteCode::DerefAdd(i) => runtime.deref_and_add_value(*i),
                ByteCode::DerefSub(i) => runtime.deref_and_sub_value(*i),
                ByteCode::Write(len) => runtime.write(*len)?,
                ByteCode::Read => return Err(RuntimeError::UnsupportedInput),
                ByteCode::Undefined(instruction) => {
                    return Err(RuntimeError::UndefinedInstruction {
                        instruction: *instruction,
                    })
                }
                ByteCode::JumpForwardsIfZero(offset) => {
                    if runtime.value_is_zero() {
                        pc += *offset;
                        // don't do the ++
                        continue;
                    }
                }
                ByteCode::JumpBackwardsIfNonZero(offset) => {
                    if !runtime.value_is_zero() {
                        pc -= *offset;
                        // don't do the ++
                        continue;
                    }
                }
            }
            pc += 1;
        }
        debug!(tape = runtime.tape().len(), "bytecode-interpreter finished");
        Ok(())
    }
}

impl Default for ByteCodeInterpreter {
    fn default() -> Self {
        Self::new()
    }
}
