//! Token definitions for the Aula lexer

use logos::Logos;

use crate::common::Span;

/// Token with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// All token kinds of the language
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r\f]+")] // Skip whitespace
#[logos(skip r"//[^\n]*")] // Skip line comments
pub enum TokenKind {
    // === Keywords ===
    /// Integer type
    #[token("ent")]
    Ent,
    /// Float type
    #[token("dec")]
    Dec,
    /// String type
    #[token("cadena")]
    Cadena,
    /// Conditional
    #[token("si")]
    Si,
    /// Else branch
    #[token("oNo")]
    ONo,
    /// While loop
    #[token("mientras")]
    Mientras,
    /// Counted loop
    #[token("repetir")]
    Repetir,
    /// Output
    #[token("sout")]
    Sout,
    /// Input
    #[token("scan")]
    Scan,

    // === Identifiers ===
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    // === Literals ===
    // The fractional part decides float vs integer
    #[regex(r"[0-9]+\.[0-9]+", |lex| lex.slice().to_string())]
    FloatLiteral(String),

    #[regex(r"[0-9]+", |lex| lex.slice().to_string())]
    IntLiteral(String),

    #[regex(r#""([^"\\]|\\.)*""#, |lex| lex.slice().to_string())]
    StringLiteral(String),

    // === Operators ===
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,

    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,

    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("!")]
    Bang,

    #[token("=")]
    Eq,

    // === Punctuation ===
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(";")]
    Semi,
    #[token(",")]
    Comma,

    // Special
    Eof,
}

impl TokenKind {
    /// Whether this token starts a declaration
    pub fn is_type_keyword(&self) -> bool {
        matches!(self, TokenKind::Ent | TokenKind::Dec | TokenKind::Cadena)
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Ent => write!(f, "'ent'"),
            TokenKind::Dec => write!(f, "'dec'"),
            TokenKind::Cadena => write!(f, "'cadena'"),
            TokenKind::Si => write!(f, "'si'"),
            TokenKind::ONo => write!(f, "'oNo'"),
            TokenKind::Mientras => write!(f, "'mientras'"),
            TokenKind::Repetir => write!(f, "'repetir'"),
            TokenKind::Sout => write!(f, "'sout'"),
            TokenKind::Scan => write!(f, "'scan'"),
            TokenKind::Identifier(s) => write!(f, "identifier '{s}'"),
            TokenKind::FloatLiteral(s) => write!(f, "float '{s}'"),
            TokenKind::IntLiteral(s) => write!(f, "integer '{s}'"),
            TokenKind::StringLiteral(s) => write!(f, "string {s}"),
            TokenKind::Plus => write!(f, "'+'"),
            TokenKind::Minus => write!(f, "'-'"),
            TokenKind::Star => write!(f, "'*'"),
            TokenKind::Slash => write!(f, "'/'"),
            TokenKind::EqEq => write!(f, "'=='"),
            TokenKind::NotEq => write!(f, "'!='"),
            TokenKind::Lt => write!(f, "'<'"),
            TokenKind::Gt => write!(f, "'>'"),
            TokenKind::LtEq => write!(f, "'<='"),
            TokenKind::GtEq => write!(f, "'>='"),
            TokenKind::AmpAmp => write!(f, "'&&'"),
            TokenKind::PipePipe => write!(f, "'||'"),
            TokenKind::Bang => write!(f, "'!'"),
            TokenKind::Eq => write!(f, "'='"),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
            TokenKind::LBrace => write!(f, "'{{'"),
            TokenKind::RBrace => write!(f, "'}}'"),
            TokenKind::Semi => write!(f, "';'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::Eof => write!(f, "end of input"),
        }
    }
}
