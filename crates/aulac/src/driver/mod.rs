//! Analysis pipeline orchestration

use crate::ast::Program;
use crate::common::ErrorCollection;
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::sema::{SemanticAnalyzer, SymbolTable};

/// Options passed to the pipeline, mostly debugging hooks
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub dump_tokens: bool,
    pub dump_ast: bool,
    pub verbose: bool,
}

/// Result of a completed analysis run
pub struct Analysis {
    /// The AST with inferred types and folded values filled in
    pub program: Program,
    /// Resolved bindings at end of run
    pub table: SymbolTable,
    /// True iff the semantic pass recorded no diagnostic
    pub success: bool,
}

/// Coordinates the front-end phases over one source text.
///
/// Owns the error collection so diagnostics from every phase end up in
/// one place; the collection is cleared wholesale at the start of each
/// run. One pipeline serves one run at a time.
pub struct Pipeline {
    errors: ErrorCollection,
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            errors: ErrorCollection::new(),
        }
    }

    /// Diagnostics accumulated by the last run
    pub fn errors(&self) -> &ErrorCollection {
        &self.errors
    }

    /// Lex, parse and analyze a source text.
    ///
    /// Returns `None` when lexing or parsing failed before an AST
    /// existed; the diagnostic is recorded either way.
    pub fn run(&mut self, source: &str, config: &PipelineConfig) -> Option<Analysis> {
        self.errors.clear();

        if config.dump_tokens {
            // Lexing errors surface below through the parser
            if let Ok(tokens) = Lexer::new(source).tokenize_all() {
                eprintln!("=== Tokens ===");
                for token in &tokens {
                    eprintln!("{} @ {}..{}", token.kind, token.span.start, token.span.end);
                }
                eprintln!("=== End Tokens ===\n");
            }
        }

        let mut parser = match Parser::new(source) {
            Ok(parser) => parser,
            Err(error) => {
                self.errors.add((&error).into());
                return None;
            }
        };
        let mut program = match parser.parse() {
            Ok(program) => program,
            Err(error) => {
                self.errors.add((&error).into());
                return None;
            }
        };

        if config.dump_ast {
            eprintln!("=== AST ===");
            eprint!("{}", program.dump());
            eprintln!("=== End AST ===\n");
        }

        let mut analyzer = SemanticAnalyzer::new(&mut self.errors);
        let success = analyzer.analyze(&mut program);
        let table = analyzer.into_symbol_table();

        if config.verbose {
            eprintln!(
                "analysis {}: {} symbol(s) in the global scope",
                if success { "succeeded" } else { "failed" },
                table.globals().count()
            );
        }

        Some(Analysis {
            program,
            table,
            success,
        })
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
