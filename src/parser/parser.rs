use tracing::debug;

use crate::lexer::Marker;

use super::{AstKind, BasicBlock, Instruction, ParserError, Program, DEFAULT_MAX_LOOP_DEPTH};

pub struct Parser<'a> {
    markers: &'a [Marker],
    /// Index of the next unread marker
    cursor: usize,
    /// Instruction numbers of the loops we are currently inside, innermost last
    open_loops: Vec<usize>,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(markers: &'a [Marker]) -> Parser<'a> {
        Self::with_max_depth(markers, DEFAULT_MAX_LOOP_DEPTH)
    }

    pub fn with_max_depth(markers: &'a [Marker], max_depth: usize) -> Parser<'a> {
        Parser {
            markers,
            cursor: 0,
            open_loops: vec![],
            max_depth,
        }
    }

    /// Reads the next pair, returning it with its 1-based instruction number
    fn next_pair(&mut self) -> Option<(usize, (Marker, Marker))> {
        let pair = match self.markers.get(self.cursor..self.cursor + 2)? {
            [first, second] => (*first, *second),
            _ => return None,
        };
        self.cursor += 2;
        Some((self.cursor / 2, pair))
    }

    pub fn parse_block(&mut self) -> Result<BasicBlock, ParserError> {
        let mut instructions = vec![];

        while let Some((instruction, pair)) = self.next_pair() {
            let kind = Instruction::try_from(pair)
                .map_err(|_| ParserError::InvalidInstructionPair { instruction })?;

            instructions.push(match kind {
                Instruction::Input => return Err(ParserError::UnsupportedInput { instruction }),
                Instruction::LoopEnd => {
                    // the pair only terminates the body, it isn't part of it
                    if self.open_loops.pop().is_some() {
                        return Ok(BasicBlock { instructions });
                    }
                    return Err(ParserError::UnmatchedLoopEnd { instruction });
                }
                Instruction::LoopStart => {
                    if self.open_loops.len() >= self.max_depth {
                        return Err(ParserError::NestingTooDeep {
                            instruction,
                            limit: self.max_depth,
                        });
                    }
                    self.open_loops.push(instruction);
                    AstKind::Loop(self.parse_block()?)
                }
                simple => AstKind::Simple(simple),
            })
        }

        // ran out of pairs, innermost first
        match self.open_loops.last() {
            Some(&instruction) => Err(ParserError::UnmatchedLoopStart { instruction }),
            None => Ok(BasicBlock { instructions }),
        }
    }

    pub fn parse_program(&mut self) -> Result<Program, ParserError> {
        if self.markers.len() % 2 != 0 {
            return Err(ParserError::OddTokenCount {
                count: self.markers.len(),
            });
        }

        let program = self.parse_block()?;
        debug!(
            instructions = self.markers.len() / 2,
            top_level = program.instructions.len(),
            "parsed program"
        );
        Ok(program)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lexer::Lexer;
    use rstest::rstest;

    fn parse(source: &str) -> Result<Program, ParserError> {
        let markers = Lexer::new(source).collect_results().unwrap();
        Parser::new(&markers).parse_program()
    }

    fn simple(instruction: Instruction) -> AstKind {
        AstKind::Simple(instruction)
    }

    #[test]
    fn empty_program() {
        assert_eq!(parse("/* nothing */"), Ok(Program::default()));
    }

    #[test]
    fn flat_instructions_keep_their_order() {
        let program = parse("Ook. Ook? Ook? Ook. Ook. Ook. Ook! Ook! Ook! Ook.").unwrap();
        assert_eq!(
            program.instructions,
            vec![
                simple(Instruction::IncrementPointer),
                simple(Instruction::DecrementPointer),
                simple(Instruction::IncrementValue),
                simple(Instruction::DecrementValue),
                simple(Instruction::Output),
            ]
        );
    }

    #[test]
    fn nested_loops_own_their_bodies() {
        // +[-[>]<].
        let program = parse(
            "Ook. Ook. Ook! Ook? Ook! Ook! Ook! Ook? Ook. Ook? Ook? Ook! \
             Ook? Ook. Ook? Ook! Ook! Ook.",
        )
        .unwrap();
        assert_eq!(
            program.instructions,
            vec![
                simple(Instruction::IncrementValue),
                AstKind::Loop(BasicBlock {
                    instructions: vec![
                        simple(Instruction::DecrementValue),
                        AstKind::Loop(BasicBlock {
                            instructions: vec![simple(Instruction::IncrementPointer)],
                        }),
                        simple(Instruction::DecrementPointer),
                    ],
                }),
                simple(Instruction::Output),
            ]
        );
    }

    #[test]
    fn empty_loop() {
        let program = parse("Ook! Ook? Ook? Ook!").unwrap();
        assert_eq!(
            program.instructions,
            vec![AstKind::Loop(BasicBlock::default())]
        );
    }

    #[rstest]
    #[case("Ook.", ParserError::OddTokenCount { count: 1 })]
    #[case("Ook? Ook! Ook.", ParserError::OddTokenCount { count: 3 })]
    #[case("Ook. Ook. Ook? Ook?", ParserError::InvalidInstructionPair { instruction: 2 })]
    #[case("Ook. Ook!", ParserError::UnsupportedInput { instruction: 1 })]
    #[case("Ook. Ook. Ook? Ook!", ParserError::UnmatchedLoopEnd { instruction: 2 })]
    #[case("Ook! Ook? Ook? Ook! Ook? Ook!", ParserError::UnmatchedLoopEnd { instruction: 3 })]
    #[case("Ook! Ook? Ook. Ook.", ParserError::UnmatchedLoopStart { instruction: 1 })]
    #[case(
        "Ook! Ook? Ook! Ook? Ook? Ook! Ook! Ook?",
        ParserError::UnmatchedLoopStart { instruction: 4 }
    )]
    fn rejects_malformed_programs(#[case] source: &str, #[case] expected: ParserError) {
        assert_eq!(parse(source), Err(expected));
    }

    #[test]
    fn instruction_round_trips_through_markers() {
        for instruction in [
            Instruction::IncrementPointer,
            Instruction::DecrementPointer,
            Instruction::IncrementValue,
            Instruction::DecrementValue,
            Instruction::Input,
            Instruction::Output,
            Instruction::LoopStart,
            Instruction::LoopEnd,
        ] {
            assert_eq!(Instruction::try_from(instruction.markers()), Ok(instruction));
        }
    }

    fn nested(depth: usize) -> String {
        // +, `depth` opened loops, -, then every loop closed
        let mut source = String::from("Ook. Ook. ");
        source.push_str(&"Ook! Ook? ".repeat(depth));
        source.push_str("Ook! Ook! ");
        source.push_str(&"Ook? Ook! ".repeat(depth));
        source
    }

    #[test]
    fn nesting_up_to_the_limit_parses() {
        let mut program = parse(&nested(DEFAULT_MAX_LOOP_DEPTH)).unwrap();
        let mut depth = 0;
        while let Some(AstKind::Loop(body)) = program.instructions.pop() {
            depth += 1;
            program = body;
        }
        assert_eq!(depth, DEFAULT_MAX_LOOP_DEPTH);
    }

    #[test]
    fn nesting_past_the_limit_is_an_error() {
        assert_eq!(
            parse(&nested(DEFAULT_MAX_LOOP_DEPTH + 1)),
            Err(ParserError::NestingTooDeep {
                instruction: DEFAULT_MAX_LOOP_DEPTH + 2,
                limit: DEFAULT_MAX_LOOP_DEPTH,
            })
        );
    }

    #[test]
    fn deep_nesting_is_rejected_without_overflowing() {
        assert!(matches!(
            parse(&nested(20_000)),
            Err(ParserError::NestingTooDeep { .. })
        ));
    }

    #[test]
    fn custom_depth_limit() {
        let markers = Lexer::new(&nested(3)).collect_results().unwrap();
        assert_eq!(
            Parser::with_max_depth(&markers, 2).parse_program(),
            Err(ParserError::NestingTooDeep {
                instruction: 4,
                limit: 2
            })
        );
        assert!(Parser::with_max_depth(&markers, 3).parse_program().is_ok());
    }
}
