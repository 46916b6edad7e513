use std::fmt;

use thiserror::Error;

use crate::lexer::Marker;

pub mod parser;

/// The eight meaningful marker pairs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instruction {
    // `Ook. Ook?`: move the data pointer one cell right, growing the tape as needed
    IncrementPointer,
    // `Ook? Ook.`: move the data pointer one cell left
    DecrementPointer,

    // `Ook. Ook.`: increment the cell at the data pointer
    IncrementValue,
    // `Ook! Ook!`: decrement the cell at the data pointer
    DecrementValue,

    // `Ook. Ook!`: read a byte into the cell at the data pointer (unsupported)
    Input,
    // `Ook! Ook.`: write the cell at the data pointer as a byte
    Output,

    // `Ook! Ook?`: run the body while the cell at the data pointer is non-zero
    LoopStart,
    // `Ook? Ook!`: close the innermost open loop
    LoopEnd,
}

impl Instruction {
    pub fn markers(self) -> (Marker, Marker) {
        use Marker::*;
        match self {
            Instruction::IncrementPointer => (Dot, Question),
            Instruction::DecrementPointer => (Question, Dot),
            Instruction::IncrementValue => (Dot, Dot),
            Instruction::DecrementValue => (Bang, Bang),
            Instruction::Input => (Dot, Bang),
            Instruction::Output => (Bang, Dot),
            Instruction::LoopStart => (Bang, Question),
            Instruction::LoopEnd => (Question, Bang),
        }
    }
}

/// `Ook? Ook?` is the one pair with no meaning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidPair;

impl TryFrom<(Marker, Marker)> for Instruction {
    type Error = InvalidPair;

    fn try_from(pair: (Marker, Marker)) -> Result<Self, Self::Error> {
        use Marker::*;
        match pair {
            (Dot, Question) => Ok(Instruction::IncrementPointer),
            (Question, Dot) => Ok(Instruction::DecrementPointer),
            (Dot, Dot) => Ok(Instruction::IncrementValue),
            (Bang, Bang) => Ok(Instruction::DecrementValue),
            (Dot, Bang) => Ok(Instruction::Input),
            (Bang, Dot) => Ok(Instruction::Output),
            (Bang, Question) => Ok(Instruction::LoopStart),
            (Question, Bang) => Ok(Instruction::LoopEnd),
            (Question, Question) => Err(InvalidPair),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (first, second) = self.markers();
        write!(f, "{} {}", first, second)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AstKind {
    Simple(Instruction),
    Loop(BasicBlock),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasicBlock {
    pub instructions: Vec<AstKind>,
}

pub type Program = BasicBlock;

/// Every stage walks the tree recursively, one frame per loop level
pub const DEFAULT_MAX_LOOP_DEPTH: usize = 1024;

/// Instruction numbers are 1-based and count marker pairs
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParserError {
    #[error("Odd number of tokens ({count:}), instructions are made of token pairs")]
    OddTokenCount { count: usize },

    #[error("Instruction {instruction:} is `Ook? Ook?` which has no meaning")]
    InvalidInstructionPair { instruction: usize },

    #[error("Instruction {instruction:} reads input which isn't supported")]
    UnsupportedInput { instruction: usize },

    #[error("Instruction {instruction:} closes a loop that was never opened")]
    UnmatchedLoopEnd { instruction: usize },

    #[error("Loop opened at instruction {instruction:} is never closed")]
    UnmatchedLoopStart { instruction: usize },

    #[error("Loop opened at instruction {instruction:} nests deeper than {limit:} levels")]
    NestingTooDeep { instruction: usize, limit: usize },
}
