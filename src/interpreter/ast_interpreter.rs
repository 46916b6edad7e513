use std::io::Write;

use tracing::debug;

use crate::parser::{self, Instruction};

use super::{Runtime, RuntimeError};

pub struct AstInterpreter {}

impl AstInterpreter {
    pub fn new() -> Self {
        Self {}
    }

    pub fn interpret<W: Write>(
        &mut self,
        runtime: &mut Runtime<W>,
        program: &parser::Program,
    ) -> Result<(), RuntimeError> {
        self.interpret_block(runtime, program)?;
        debug!(tape = runtime.tape().len(), "ast-interpreter finished");
        Ok(())
    }

    fn interpret_block<W: Write>(
        &mut self,
        runtime: &mut Runtime<W>,
        block: &parser::BasicBlock,
    ) -> Result<(), RuntimeError> {
        // written tihs way since the upper-most block (program) doesn't repeat
        for instruction in block.instructions.iter() {
            match instruction {
                parser::AstKind::Simple(simple) => self.interpret_simple(runtime, *simple)?,
                parser::AstKind::Loop(sub_block) => {
                    // re-tested at wherever the body left the pointer
                    while !runtime.value_is_zero() {
                        self.interpret_block(runtime, sub_block)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn interpret_simple<W: Write>(
        &mut self,
        runtime: &mut Runtime<W>,
        instruction: Instruction,
    ) -> Result<(), RuntimeError> {
        match instruction {
            Instruction::IncrementPointer => runtime.shift_data_pointer(1)?,
            Instruction::DecrementPointer => runtime.shift_data_pointer(-1)?,
            Instruction::IncrementValue => runtime.deref_and_add_value(1),
            Instruction::DecrementValue => runtime.deref_and_sub_value(1),
            Instruction::Output => runtime.write(1)?,
            Instruction::Input => return Err(RuntimeError::UnsupportedInput),
            // loops are always lowered into `AstKind::Loop` by the parser
            Instruction::LoopStart | Instruction::LoopEnd => {
                return Err(RuntimeError::UndefinedInstruction { instruction })
            }
        }
        Ok(())
    }
}

impl Default for AstInterpreter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{AstKind, BasicBlock, Program};

    fn program(instructions: Vec<AstKind>) -> Program {
        BasicBlock { instructions }
    }

    fn simple(instruction: Instruction) -> AstKind {
        AstKind::Simple(instruction)
    }

    fn run(program: &Program) -> (Result<(), RuntimeError>, Runtime<Vec<u8>>) {
        let mut runtime = Runtime::new(vec![]);
        let result = AstInterpreter::new().interpret(&mut runtime, program);
        (result, runtime)
    }

    #[test]
    fn increment_then_output_writes_one() {
        let (result, runtime) = run(&program(vec![
            simple(Instruction::IncrementValue),
            simple(Instruction::Output),
        ]));
        result.unwrap();
        assert_eq!(runtime.into_output(), vec![1]);
    }

    #[test]
    fn sixty_five_increments_is_an_a() {
        let mut instructions = vec![simple(Instruction::IncrementValue); 65];
        instructions.push(simple(Instruction::Output));
        let (result, runtime) = run(&program(instructions));
        result.unwrap();
        assert_eq!(runtime.into_output(), b"A");
    }

    #[test]
    fn loop_counts_a_cell_down_to_zero() {
        // +++[>+<-]> leaves the iteration count in the second cell
        let (result, runtime) = run(&program(vec![
            simple(Instruction::IncrementValue),
            simple(Instruction::IncrementValue),
            simple(Instruction::IncrementValue),
            AstKind::Loop(BasicBlock {
                instructions: vec![
                    simple(Instruction::IncrementPointer),
                    simple(Instruction::IncrementValue),
                    simple(Instruction::DecrementPointer),
                    simple(Instruction::DecrementValue),
                ],
            }),
        ]));
        result.unwrap();
        assert_eq!(runtime.tape(), &[0, 3]);
        assert_eq!(runtime.data_pointer(), 0);
    }

    #[test]
    fn loop_condition_follows_the_pointer() {
        // +>+<[>] stops on the first zero cell to the right
        let (result, runtime) = run(&program(vec![
            simple(Instruction::IncrementValue),
            simple(Instruction::IncrementPointer),
            simple(Instruction::IncrementValue),
            simple(Instruction::DecrementPointer),
            AstKind::Loop(BasicBlock {
                instructions: vec![simple(Instruction::IncrementPointer)],
            }),
        ]));
        result.unwrap();
        assert_eq!(runtime.data_pointer(), 2);
        assert_eq!(runtime.tape(), &[1, 1, 0]);
    }

    #[test]
    fn skipped_loop_never_runs() {
        let (result, runtime) = run(&program(vec![AstKind::Loop(BasicBlock {
            instructions: vec![simple(Instruction::Output)],
        })]));
        result.unwrap();
        assert!(runtime.into_output().is_empty());
    }

    #[test]
    fn new_cells_output_zero() {
        let (result, runtime) = run(&program(vec![
            simple(Instruction::IncrementPointer),
            simple(Instruction::Output),
        ]));
        result.unwrap();
        assert_eq!(runtime.into_output(), vec![0]);
    }

    #[test]
    fn decrement_wraps_to_255() {
        let (result, runtime) = run(&program(vec![
            simple(Instruction::DecrementValue),
            simple(Instruction::Output),
        ]));
        result.unwrap();
        assert_eq!(runtime.into_output(), vec![255]);
    }

    #[test]
    fn underflow_keeps_earlier_output() {
        let (result, runtime) = run(&program(vec![
            simple(Instruction::Output),
            simple(Instruction::DecrementPointer),
            simple(Instruction::Output),
        ]));
        assert!(matches!(
            result,
            Err(RuntimeError::PointerUnderflow { pointer: 0, by: 1 })
        ));
        assert_eq!(runtime.into_output(), vec![0]);
    }

    #[test]
    fn input_is_rejected() {
        let (result, _) = run(&program(vec![simple(Instruction::Input)]));
        assert!(matches!(result, Err(RuntimeError::UnsupportedInput)));
    }

    #[test]
    fn bare_loop_markers_are_undefined() {
        let (result, _) = run(&program(vec![simple(Instruction::LoopEnd)]));
        assert!(matches!(
            result,
            Err(RuntimeError::UndefinedInstruction {
                instruction: Instruction::LoopEnd
            })
        ));
    }
}
