//! Tolerant tokenizer for Turtle-serialized triple maps.
//!
//! The lexer never fails: a character it cannot place becomes
//! [`TokenKind::Other`] and scanning resumes after it, so a damaged document
//! still yields every triple map that can be recognized.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_until, take_while, take_while1},
    character::complete::char as pchar,
    combinator::{map, value},
    error::{Error, ErrorKind},
    sequence::{delimited, preceded},
    IResult,
};

use super::token::{Token, TokenKind};

pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut rest = skip_ws_and_comments(text);

    while let Some(c) = rest.chars().next() {
        let start = text.len() - rest.len();
        let kind = match next_token(rest) {
            Ok((remaining, TokenKind::Word(word))) if at_statement_start(&tokens) => {
                rest = remaining;
                directive_keyword(&word).unwrap_or(TokenKind::Word(word))
            }
            Ok((remaining, kind)) => {
                rest = remaining;
                kind
            }
            Err(_) => {
                rest = &rest[c.len_utf8()..];
                TokenKind::Other(c)
            }
        };
        tokens.push(Token::new(kind, start, text.len() - rest.len()));
        rest = skip_ws_and_comments(rest);
    }

    tokens
}

/// Whether the next token opens a statement: start of input, after `.`, or
/// after a complete SPARQL-style `PREFIX p: <ns>` / `BASE <iri>` line.
fn at_statement_start(tokens: &[Token]) -> bool {
    let recent: Vec<&TokenKind> = tokens.iter().rev().take(3).map(|t| &t.kind).collect();
    matches!(
        recent.as_slice(),
        [] | [TokenKind::Dot, ..]
            | [TokenKind::Iri(_), TokenKind::PrefixedName(_), TokenKind::KwPrefix]
            | [TokenKind::Iri(_), TokenKind::KwBase, ..]
    )
}

/// Bare `PREFIX` / `BASE` (any case) in directive position.
fn directive_keyword(word: &str) -> Option<TokenKind> {
    if word.eq_ignore_ascii_case("prefix") {
        Some(TokenKind::KwPrefix)
    } else if word.eq_ignore_ascii_case("base") {
        Some(TokenKind::KwBase)
    } else {
        None
    }
}

fn skip_ws_and_comments(mut input: &str) -> &str {
    loop {
        input = input.trim_start();
        if input.starts_with('#') {
            input = match input.find('\n') {
                Some(idx) => &input[idx + 1..],
                None => "",
            };
        } else {
            return input;
        }
    }
}

fn next_token(input: &str) -> IResult<&str, TokenKind> {
    alt((
        long_string,
        short_string,
        iri,
        value(TokenKind::DoubleCaret, tag("^^")),
        value(TokenKind::KwPrefix, tag("@prefix")),
        value(TokenKind::KwBase, tag("@base")),
        lang_tag,
        blank_node_label,
        punctuation,
        prefixed_name,
        word,
    ))(input)
}

fn iri(input: &str) -> IResult<&str, TokenKind> {
    map(
        delimited(
            pchar('<'),
            take_while(|c: char| c != '>' && c != '<' && c != '\n' && c != '"'),
            pchar('>'),
        ),
        |s: &str| TokenKind::Iri(s.to_string()),
    )(input)
}

fn long_string(input: &str) -> IResult<&str, TokenKind> {
    map(
        alt((
            delimited(tag("\"\"\""), take_until("\"\"\""), tag("\"\"\"")),
            delimited(tag("'''"), take_until("'''"), tag("'''")),
        )),
        |s: &str| TokenKind::String(unescape(s)),
    )(input)
}

fn short_string(input: &str) -> IResult<&str, TokenKind> {
    let mut chars = input.char_indices();
    let quote = match chars.next() {
        Some((_, c @ ('"' | '\''))) => c,
        _ => return Err(nom::Err::Error(Error::new(input, ErrorKind::Char))),
    };

    let mut escaped = false;
    for (idx, c) in chars {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '\n' => break,
            c if c == quote => {
                let body = &input[1..idx];
                return Ok((&input[idx + 1..], TokenKind::String(unescape(body))));
            }
            _ => {}
        }
    }

    // Unterminated literal.
    Err(nom::Err::Error(Error::new(input, ErrorKind::Char)))
}

fn lang_tag(input: &str) -> IResult<&str, TokenKind> {
    map(
        preceded(
            pchar('@'),
            take_while1(|c: char| c.is_ascii_alphanumeric() || c == '-'),
        ),
        |s: &str| TokenKind::LangTag(s.to_string()),
    )(input)
}

fn blank_node_label(input: &str) -> IResult<&str, TokenKind> {
    let (_, label) = preceded(tag("_:"), take_while1(is_local_char))(input)?;
    let label = label.trim_end_matches('.');
    if label.is_empty() {
        return Err(nom::Err::Error(Error::new(input, ErrorKind::TakeWhile1)));
    }
    Ok((
        &input[2 + label.len()..],
        TokenKind::BlankNodeLabel(label.to_string()),
    ))
}

fn punctuation(input: &str) -> IResult<&str, TokenKind> {
    alt((
        value(TokenKind::Dot, pchar('.')),
        value(TokenKind::Comma, pchar(',')),
        value(TokenKind::Semicolon, pchar(';')),
        value(TokenKind::LBracket, pchar('[')),
        value(TokenKind::RBracket, pchar(']')),
        value(TokenKind::LParen, pchar('(')),
        value(TokenKind::RParen, pchar(')')),
    ))(input)
}

/// `prefix:local` (the prefix may be empty). A trailing `.` is left for the
/// statement terminator.
fn prefixed_name(input: &str) -> IResult<&str, TokenKind> {
    let (rest, prefix) = take_while(is_prefix_char)(input)?;
    if prefix.starts_with(|c: char| !c.is_alphabetic()) {
        return Err(nom::Err::Error(Error::new(input, ErrorKind::Alpha)));
    }
    let (rest, _) = pchar(':')(rest)?;
    let (_, local) = take_while(is_local_char)(rest)?;
    let local = local.trim_end_matches('.');

    let consumed = prefix.len() + 1 + local.len();
    Ok((
        &input[consumed..],
        TokenKind::PrefixedName(input[..consumed].to_string()),
    ))
}

fn word(input: &str) -> IResult<&str, TokenKind> {
    let (_, raw) = take_while1(|c: char| {
        c.is_alphanumeric() || matches!(c, '_' | '-' | '+' | '.')
    })(input)?;
    let raw = raw.trim_end_matches('.');
    if raw.is_empty() {
        return Err(nom::Err::Error(Error::new(input, ErrorKind::TakeWhile1)));
    }

    let kind = match raw {
        "a" => TokenKind::KwA,
        w => TokenKind::Word(w.to_string()),
    };
    Ok((&input[raw.len()..], kind))
}

fn is_prefix_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.')
}

fn is_local_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':' | '%')
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
