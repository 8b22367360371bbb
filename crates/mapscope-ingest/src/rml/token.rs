//! Tokens produced by the triple-map lexer.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

impl Token {
    pub fn new(kind: TokenKind, start: usize, end: usize) -> Self {
        Self { kind, start, end }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// `<...>`, stored without the angle brackets.
    Iri(String),
    /// `prefix:local`, stored as written.
    PrefixedName(String),
    /// `_:label`, stored without the `_:`.
    BlankNodeLabel(String),
    /// String literal content, unescaped.
    String(String),
    /// `@en`, stored without the `@`.
    LangTag(String),
    /// Numbers, booleans and other bare words.
    Word(String),

    /// `a` (rdf:type shorthand)
    KwA,
    /// `@prefix` / `PREFIX`
    KwPrefix,
    /// `@base` / `BASE`
    KwBase,

    Dot,
    Comma,
    Semicolon,
    DoubleCaret,
    LBracket,
    RBracket,
    LParen,
    RParen,

    /// Any character the lexer could not place; kept so the scan never stops.
    Other(char),
}
