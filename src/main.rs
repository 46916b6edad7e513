use std::{
    collections::HashSet,
    io::{self, BufWriter},
    process::ExitCode,
    time::Instant,
};

use clap::{Parser, ValueEnum};
use colored::Colorize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ook::{
    bytecode::bytecode::to_bytecode,
    interpreter::{
        ast_interpreter::AstInterpreter, bytecode_interpreter::ByteCodeInterpreter, Runtime,
    },
    lexer::lexer::Lexer,
    parser::parser::Parser as OokParser,
    Error,
};

/// Ook! interpreter
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The file to operate on
    #[arg()]
    file: String,

    #[arg(value_enum)]
    commands: Vec<Commands>,

    #[arg(short, long, value_enum)]
    optimizations: Vec<Optimizations>,

    #[arg(short, long)]
    all_optimizations: bool,

    /// Log every stage (RUST_LOG takes priority)
    #[arg(short, long)]
    verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Hash, PartialEq, Eq)]
pub enum Optimizations {
    /// Fold runs of the same operation into one bytecode instruction
    ConstantFolding,
}

#[derive(ValueEnum, Debug, Clone, Hash, PartialEq, Eq)]
enum Commands {
    /// Output the lexer
    Tokens,
    /// Output the ast
    Ast,
    /// Output Bytecode
    Bytecode,

    /// Run the AST as is
    AstInterpreter,
    /// Run the bytecode interpreter
    BytecodeInterpreter,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "ook=debug" } else { "ook=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(io::stderr)
        .init();
}

fn run(args: Args, text: &str) -> Result<(), Error> {
    let mut commands: HashSet<Commands> = HashSet::from_iter(args.commands);
    let mut optimizations: HashSet<Optimizations> = HashSet::from_iter(args.optimizations);
    if args.all_optimizations {
        optimizations.insert(Optimizations::ConstantFolding);
    }
    if !commands.contains(&Commands::AstInterpreter)
        && !commands.contains(&Commands::BytecodeInterpreter)
    {
        commands.insert(Commands::AstInterpreter);
    }

    info!("Running {}", args.file);

    let now = Instant::now();
    let markers = Lexer::new(text).collect_results()?;
    info!("Finished lexing in {:.2?}", now.elapsed());

    if commands.contains(&Commands::Tokens) {
        let tokens: Vec<String> = markers.iter().map(|m| m.to_string()).collect();
        eprintln!("{}", tokens.join(" "));
    }

    let now = Instant::now();
    let program = OokParser::new(&markers).parse_program()?;
    info!("Finished parsing in {:.2?}", now.elapsed());

    if commands.contains(&Commands::Ast) {
        eprintln!("{:#?}", program);
    }

    let stdout = io::stdout();
    let mut runtime = Runtime::new(BufWriter::new(stdout.lock()));

    if commands.contains(&Commands::AstInterpreter) {
        let now = Instant::now();
        let result = AstInterpreter::new().interpret(&mut runtime, &program);
        // whatever was written before a failure still goes out
        runtime.finish(result)?;
        runtime.reset();
        info!("Finished ast-interpreter in {:.2?}", now.elapsed());
    }

    let needs_bytecode = commands.contains(&Commands::Bytecode)
        || commands.contains(&Commands::BytecodeInterpreter);
    if needs_bytecode {
        let now = Instant::now();
        let fold = optimizations.contains(&Optimizations::ConstantFolding);
        let bytecode = to_bytecode(&program, fold);
        info!(
            "Finished bytecode conversion with length {} in {:.2?}",
            bytecode.len(),
            now.elapsed()
        );

        if commands.contains(&Commands::Bytecode) {
            eprintln!("{:?}", bytecode);
        }

        if commands.contains(&Commands::BytecodeInterpreter) {
            let now = Instant::now();
            let result = ByteCodeInterpreter::new().run(&mut runtime, &bytecode);
            runtime.finish(result)?;
            info!("Finished bytecode-interpreter in {:.2?}", now.elapsed());
        }
    }

    Ok(runtime.flush()?)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let text = match std::fs::read_to_string(&args.file) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("{}: can't read {}: {}", "Error".red(), args.file, e);
            return ExitCode::FAILURE;
        }
    };

    match run(args, &text) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {}", "Error".red(), e);
            ExitCode::FAILURE
        }
    }
}
