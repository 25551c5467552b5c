//! Semantic analysis
//!
//! Scope-aware symbol resolution, static type checking and constant
//! folding over the parsed AST.

mod analyzer;
mod scope;

pub use analyzer::SemanticAnalyzer;
pub use scope::{Symbol, SymbolTable};
