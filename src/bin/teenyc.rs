//! CLI driver: reads a source file, runs the pipeline, writes the emitted
//! IR, and optionally optimizes and/or JIT-executes it.
//!
//! Out of the core's scope, not out of the crate's: argument parsing and
//! verbosity flags installed through `simple_logger` at startup.

use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context as _};
use clap::Parser as ClapParser;
use inkwell::context::Context;
use inkwell::OptimizationLevel;
use log::LevelFilter;

use teeny_lang::codegen::Compiler;
use teeny_lang::error::CompileError;
use teeny_lang::lexer::Lexer;
use teeny_lang::parser::Parser;

#[derive(ClapParser, Debug)]
#[command(author, version, about = "Compiler for the teeny toy language")]
struct Cli {
    /// Path to the source file to compile.
    path: PathBuf,

    /// Where to write the emitted LLVM IR.
    #[arg(short, long, default_value = "code.ll")]
    output: PathBuf,

    /// Additionally run the textual optimizer pass and write
    /// `optimized_code.ll` alongside the output.
    #[arg(long)]
    optimize: bool,

    /// JIT-execute the compiled module's zero-arg `main` (must return
    /// `i32`) and print its return value.
    #[arg(long)]
    run: bool,

    /// Dump the parsed AST as JSON next to the output file.
    #[arg(long)]
    dump_ast: bool,

    /// Increase log verbosity. Repeatable.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    simple_logger::SimpleLogger::new()
        .with_level(level)
        .init()
        .context("failed to initialize logger")?;

    let source = fs::read_to_string(&cli.path)
        .with_context(|| format!("failed to read {}", cli.path.display()))?;

    log::info!("lexing {}", cli.path.display());
    let lexer = Lexer::new(&source);

    log::info!("parsing");
    let mut parser = Parser::new(lexer);
    let program = parser.parse_program();
    if !parser.errors.is_empty() {
        return Err(anyhow!(CompileError::Syntax(parser.errors)));
    }

    if cli.dump_ast {
        let ast_path = cli.output.with_file_name("AST.json");
        let json = serde_json::to_string_pretty(&program)?;
        fs::write(&ast_path, json)
            .with_context(|| format!("failed to write {}", ast_path.display()))?;
    }

    log::info!("emitting IR");
    let context = Context::create();
    let compiler = Compiler::new(&context, "main");
    compiler
        .compile_program(&program)
        .map_err(CompileError::Semantic)?;

    let ir_text = compiler.module.print_to_string().to_string();
    fs::write(&cli.output, &ir_text)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;
    log::info!("wrote {}", cli.output.display());

    if cli.optimize {
        let optimized = teeny_lang::optimizer::optimize(&ir_text);
        let optimized_path = cli.output.with_file_name("optimized_code.ll");
        fs::write(&optimized_path, optimized)
            .with_context(|| format!("failed to write {}", optimized_path.display()))?;
        log::info!("wrote {}", optimized_path.display());
    }

    if cli.run {
        compiler
            .module
            .verify()
            .map_err(|e| anyhow!(CompileError::Verification(e.to_string())))?;

        let engine = compiler
            .module
            .create_jit_execution_engine(OptimizationLevel::None)
            .map_err(|e| anyhow!(CompileError::Jit(e.to_string())))?;

        let main_fn = unsafe {
            engine
                .get_function::<unsafe extern "C" fn() -> i32>("main")
                .map_err(|e| anyhow!(CompileError::Jit(e.to_string())))?
        };

        let result = unsafe { main_fn.call() };
        println!("{result}");
    }

    Ok(())
}
