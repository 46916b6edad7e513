pub mod ast_interpreter;
pub mod bytecode_interpreter;

use std::io::{self, Write};

use thiserror::Error;

use crate::parser::Instruction;

#[derive(Error, Debug)]
pub enum RuntimeError {
    /// `pointer` is where the failing move started and `by` its size, so a
    /// folded bytecode move reports the whole run rather than the single step
    /// the tree walker fails on
    #[error("Data pointer ({pointer:}) can't move {by:} cell(s) left of the start of the tape")]
    PointerUnderflow { pointer: usize, by: usize },

    #[error("Reading input isn't supported")]
    UnsupportedInput,

    #[error("Instruction `{instruction:}` can't be executed on its own")]
    UndefinedInstruction { instruction: Instruction },

    #[error("Failed to write output")]
    Io(
        #[from]
        io::Error,
    ),
}

pub struct Runtime<W: Write> {
    /// Pointer into the tape, always a valid index
    data_pointer: usize,

    /// Grows to the right on demand, starts as a single zeroed cell
    tape: Vec<u8>,

    out_stream: W,
}

impl<W: Write> Runtime<W> {
    pub fn new(out_stream: W) -> Self {
        Self {
            data_pointer: 0,
            tape: vec![0],
            out_stream,
        }
    }

    pub fn reset(&mut self) {
        self.tape = vec![0];
        self.data_pointer = 0;
    }

    /// Write the cell at the data pointer to the output `len` times
    pub fn write(&mut self, len: usize) -> Result<(), RuntimeError> {
        let value = self.tape[self.data_pointer];
        for _ in 0..len {
            self.out_stream.write_all(&[value])?;
        }
        Ok(())
    }

    pub fn deref_and_add_value(&mut self, by: u8) {
        self.tape[self.data_pointer] = self.tape[self.data_pointer].wrapping_add(by);
    }

    pub fn deref_and_sub_value(&mut self, by: u8) {
        self.tape[self.data_pointer] = self.tape[self.data_pointer].wrapping_sub(by);
    }

    pub fn shift_data_pointer(&mut self, by: isize) -> Result<(), RuntimeError> {
        self.data_pointer = self
            .data_pointer
            .checked_add_signed(by)
            .ok_or(RuntimeError::PointerUnderflow {
                pointer: self.data_pointer,
                by: by.unsigned_abs(),
            })?;

        // new cells are zeroed
        if self.data_pointer >= self.tape.len() {
            self.tape.resize(self.data_pointer + 1, 0);
        }
        Ok(())
    }

    /// is the value at the data pointer zero?
    pub fn value_is_zero(&self) -> bool {
        self.tape[self.data_pointer] == 0
    }

    pub fn data_pointer(&self) -> usize {
        self.data_pointer
    }

    pub fn tape(&self) -> &[u8] {
        &self.tape
    }

    pub fn flush(&mut self) -> Result<(), RuntimeError> {
        Ok(self.out_stream.flush()?)
    }

    /// Flushes whatever a run managed to write, a failed run's error wins
    /// over a failed flush
    pub fn finish(&mut self, result: Result<(), RuntimeError>) -> Result<(), RuntimeError> {
        let flushed = self.flush();
        result?;
        flushed
    }

    pub fn into_output(self) -> W {
        self.out_stream
    }
}
