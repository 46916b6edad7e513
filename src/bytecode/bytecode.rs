use tracing::debug;

use crate::parser::{AstKind, BasicBlock, Instruction, Program};

use super::ByteCode;

/// Flattens the tree into bytecode, with `fold` runs of the same
/// pointer move / value change / output collapse into one instruction
pub fn to_bytecode(program: &Program, fold: bool) -> Vec<ByteCode> {
    let mut instructions = vec![];
    bytecode_write_block(&mut instructions, program, fold);
    debug!(len = instructions.len(), fold, "lowered to bytecode");
    instructions
}

fn lower(instruction: Instruction) -> ByteCode {
    match instruction {
        Instruction::IncrementPointer => ByteCode::Shift(1),
        Instruction::DecrementPointer => ByteCode::Shift(-1),
        Instruction::IncrementValue => ByteCode::DerefAdd(1),
        Instruction::DecrementValue => ByteCode::DerefSub(1),
        Instruction::Output => ByteCode::Write(1),
        Instruction::Input => ByteCode::Read,
        Instruction::LoopStart | Instruction::LoopEnd => ByteCode::Undefined(instruction),
    }
}

/// Merge `next` into `last` if they are the same kind of operation
fn fold_into(last: &mut ByteCode, next: &ByteCode) -> bool {
    match (last, next) {
        // never merge opposite directions, `<>` at cell 0 still has to underflow
        (ByteCode::Shift(acc), ByteCode::Shift(by)) if acc.signum() == by.signum() => {
            *acc += by;
        }
        (ByteCode::DerefAdd(acc), ByteCode::DerefAdd(by)) => *acc = acc.wrapping_add(*by),
        (ByteCode::DerefSub(acc), ByteCode::DerefSub(by)) => *acc = acc.wrapping_add(*by),
        (ByteCode::Write(acc), ByteCode::Write(len)) => *acc += len,
        _ => return false,
    }
    true
}

fn bytecode_write_block(instructions: &mut Vec<ByteCode>, block: &BasicBlock, fold: bool) {
    for instruction in block.instructions.iter() {
        match instruction {
            AstKind::Simple(simple) => {
                let op = lower(*simple);
                let folded = fold
                    && instructions
                        .last_mut()
                        .is_some_and(|last| fold_into(last, &op));
                if !folded {
                    instructions.push(op);
                }
            }
            AstKind::Loop(inner_block) => {
                // placeholder so the body can't fold into whatever came before the loop
                let start = instructions.len();
                instructions.push(ByteCode::JumpForwardsIfZero(0));
                bytecode_write_block(instructions, inner_block, fold);
                let offset = instructions.len() - start - 1;

                // i.e. if we have just [+] then it'll be JumpForwardsIfZero(3) & JumpBackwardsIfNonZero(1)
                // we want to jump past the last instruction (that we've not added yet)
                instructions[start] = ByteCode::JumpForwardsIfZero(offset + 2);
                // we want to jump to the first instruction of the body
                instructions.push(ByteCode::JumpBackwardsIfNonZero(offset));
            }
        }
    }
}
