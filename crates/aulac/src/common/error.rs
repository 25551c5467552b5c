//! Error types, diagnostic collection and reporting

use codespan_reporting::diagnostic::{Diagnostic as CodespanDiagnostic, Label};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use thiserror::Error;

use super::Span;

/// Hard pipeline error with source location.
///
/// Lexing and parsing bail out on the first violation; the driver turns
/// the error into a [`Diagnostic`] and records it in the collection.
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("lexical error at {span:?}: {message}")]
    Lexer { message: String, span: Span },

    #[error("syntax error at {span:?}: {message}")]
    Parser { message: String, span: Span },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CompileError {
    pub fn lexer(message: impl Into<String>, span: Span) -> Self {
        Self::Lexer {
            message: message.into(),
            span,
        }
    }

    pub fn parser(message: impl Into<String>, span: Span) -> Self {
        Self::Parser {
            message: message.into(),
            span,
        }
    }
}

pub type CompileResult<T> = Result<T, CompileError>;

/// Category of a diagnostic.
///
/// The first two mirror the lexing and parsing phases; the rest are the
/// semantic violations the analyzer detects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    Lexical,
    Syntax,
    /// Name used before declaration
    Undeclared,
    /// Name declared twice in one scope
    Redeclaration,
    /// Operator, assignment, condition or repeat-count type mismatch
    Type { expected: String, found: String },
}

impl DiagnosticKind {
    /// Whether this diagnostic was produced by the semantic analyzer
    pub fn is_semantic(&self) -> bool {
        matches!(
            self,
            DiagnosticKind::Undeclared | DiagnosticKind::Redeclaration | DiagnosticKind::Type { .. }
        )
    }
}

/// A single diagnostic produced during one analysis run
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub span: Option<Span>,
}

impl Diagnostic {
    pub fn lexical(message: impl Into<String>, span: Span) -> Self {
        Self {
            kind: DiagnosticKind::Lexical,
            message: message.into(),
            span: Some(span),
        }
    }

    pub fn syntax(message: impl Into<String>, span: Span) -> Self {
        Self {
            kind: DiagnosticKind::Syntax,
            message: message.into(),
            span: Some(span),
        }
    }

    pub fn undeclared(name: &str, span: Span) -> Self {
        Self {
            kind: DiagnosticKind::Undeclared,
            message: format!("variable '{name}' is not declared"),
            span: Some(span),
        }
    }

    pub fn redeclaration(name: &str, span: Span) -> Self {
        Self {
            kind: DiagnosticKind::Redeclaration,
            message: format!("variable '{name}' is already declared in this scope"),
            span: Some(span),
        }
    }

    pub fn type_mismatch(
        expected: impl ToString,
        found: impl ToString,
        message: impl Into<String>,
        span: Span,
    ) -> Self {
        Self {
            kind: DiagnosticKind::Type {
                expected: expected.to_string(),
                found: found.to_string(),
            },
            message: message.into(),
            span: Some(span),
        }
    }
}

impl From<&CompileError> for Diagnostic {
    fn from(error: &CompileError) -> Self {
        match error {
            CompileError::Lexer { message, span } => Diagnostic::lexical(message.clone(), *span),
            CompileError::Parser { message, span } => Diagnostic::syntax(message.clone(), *span),
            CompileError::Io(err) => Diagnostic {
                kind: DiagnosticKind::Lexical,
                message: err.to_string(),
                span: None,
            },
        }
    }
}

/// Accumulates diagnostics across the three analysis phases.
///
/// Append-only during a run; cleared wholesale when a new run starts.
#[derive(Debug, Default)]
pub struct ErrorCollection {
    lexical: Vec<Diagnostic>,
    syntax: Vec<Diagnostic>,
    semantic: Vec<Diagnostic>,
}

impl ErrorCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a diagnostic to the sequence matching its kind
    pub fn add(&mut self, diagnostic: Diagnostic) {
        match diagnostic.kind {
            DiagnosticKind::Lexical => self.lexical.push(diagnostic),
            DiagnosticKind::Syntax => self.syntax.push(diagnostic),
            DiagnosticKind::Undeclared
            | DiagnosticKind::Redeclaration
            | DiagnosticKind::Type { .. } => self.semantic.push(diagnostic),
        }
    }

    pub fn lexical(&self) -> &[Diagnostic] {
        &self.lexical
    }

    pub fn syntax(&self) -> &[Diagnostic] {
        &self.syntax
    }

    pub fn semantic(&self) -> &[Diagnostic] {
        &self.semantic
    }

    /// All diagnostics in phase order: lexical, syntax, semantic
    pub fn all(&self) -> impl Iterator<Item = &Diagnostic> {
        self.lexical
            .iter()
            .chain(self.syntax.iter())
            .chain(self.semantic.iter())
    }

    pub fn has_errors(&self) -> bool {
        !self.lexical.is_empty() || !self.syntax.is_empty() || !self.semantic.is_empty()
    }

    pub fn has_semantic_errors(&self) -> bool {
        !self.semantic.is_empty()
    }

    pub fn clear(&mut self) {
        self.lexical.clear();
        self.syntax.clear();
        self.semantic.clear();
    }

    /// Drop only the semantic sequence, keeping earlier-phase diagnostics
    pub fn clear_semantic(&mut self) {
        self.semantic.clear();
    }
}

/// Diagnostic reporter for pretty error output
pub struct DiagnosticReporter {
    files: SimpleFiles<String, String>,
    writer: StandardStream,
    config: term::Config,
}

impl DiagnosticReporter {
    pub fn new() -> Self {
        Self {
            files: SimpleFiles::new(),
            writer: StandardStream::stderr(ColorChoice::Auto),
            config: term::Config::default(),
        }
    }

    pub fn add_file(&mut self, name: impl Into<String>, source: impl Into<String>) -> usize {
        self.files.add(name.into(), source.into())
    }

    /// Emit one diagnostic with a source label when a span is known
    pub fn report(&self, file_id: usize, diagnostic: &Diagnostic) {
        let header = match &diagnostic.kind {
            DiagnosticKind::Lexical => "Lexical error".to_string(),
            DiagnosticKind::Syntax => "Syntax error".to_string(),
            DiagnosticKind::Undeclared => "Undeclared variable".to_string(),
            DiagnosticKind::Redeclaration => "Redeclared variable".to_string(),
            DiagnosticKind::Type { expected, found } => {
                format!("Type error: expected '{expected}', found '{found}'")
            }
        };

        let rendered = match diagnostic.span {
            Some(span) => CodespanDiagnostic::error()
                .with_message(header)
                .with_labels(vec![
                    Label::primary(file_id, span.start..span.end).with_message(&diagnostic.message),
                ]),
            None => CodespanDiagnostic::error()
                .with_message(format!("{header}: {}", diagnostic.message)),
        };

        let _ = term::emit(&mut self.writer.lock(), &self.config, &self.files, &rendered);
    }

    /// Emit every diagnostic in the collection, phase order
    pub fn report_all(&self, file_id: usize, errors: &ErrorCollection) {
        for diagnostic in errors.all() {
            self.report(file_id, diagnostic);
        }
    }
}

impl Default for DiagnosticReporter {
    fn default() -> Self {
        Self::new()
    }
}
