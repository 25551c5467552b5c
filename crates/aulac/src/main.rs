//! Aula front-end driver
//!
//! Usage: aulac <input> [--dump-tokens] [--dump-ast] [--symbols]

use std::fs;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;

use aula_frontend::common::{DiagnosticReporter, LineIndex};
use aula_frontend::driver::{Pipeline, PipelineConfig};

#[derive(ClapParser, Debug)]
#[command(name = "aulac")]
#[command(author = "Aula Language Team")]
#[command(version)]
#[command(about = "Lexer, parser and semantic analyzer for the Aula teaching language", long_about = None)]
struct Args {
    /// Input source file
    #[arg(required = true)]
    input: PathBuf,

    /// Print the symbol table after analysis
    #[arg(short, long)]
    symbols: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Dump tokens (for debugging)
    #[arg(long)]
    dump_tokens: bool,

    /// Dump AST (for debugging)
    #[arg(long)]
    dump_ast: bool,
}

fn main() {
    let args = Args::parse();

    match run(&args) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("error: {e:#}");
            process::exit(1);
        }
    }
}

fn run(args: &Args) -> Result<bool> {
    let source = fs::read_to_string(&args.input)
        .with_context(|| format!("cannot read {}", args.input.display()))?;
    let filename = args.input.display().to_string();

    if args.verbose {
        eprintln!("Analyzing {filename}");
    }

    // Set up diagnostic reporter
    let mut reporter = DiagnosticReporter::new();
    let file_id = reporter.add_file(&filename, &source);

    let config = PipelineConfig {
        dump_tokens: args.dump_tokens,
        dump_ast: args.dump_ast,
        verbose: args.verbose,
    };

    let mut pipeline = Pipeline::new();
    let analysis = pipeline.run(&source, &config);

    reporter.report_all(file_id, pipeline.errors());

    if args.symbols {
        if let Some(analysis) = &analysis {
            let index = LineIndex::new(&source);
            println!("{:<16} {:<8} {:<16} {:<6} {:<6}", "name", "type", "value", "line", "col");
            for symbol in analysis.table.globals() {
                let location = index.location(symbol.decl_span.start);
                let ty = symbol.ty.to_string();
                let value = symbol
                    .value
                    .as_ref()
                    .map_or("-".to_string(), |v| v.to_string());
                println!(
                    "{:<16} {:<8} {:<16} {:<6} {:<6}",
                    symbol.name, ty, value, location.line, location.column
                );
            }
        }
    }

    Ok(!pipeline.errors().has_errors())
}
