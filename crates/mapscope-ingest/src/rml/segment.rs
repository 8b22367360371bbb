//! Locating triple-map blocks in the token stream.
//!
//! A block starts at a top-level identifier followed by `a rr:TriplesMap`
//! (or `rdf:type` spelled out) and runs until the next block start.

use super::prefixes::PrefixMap;
use super::token::{Token, TokenKind};
use crate::options::IdentifierStrategy;
use crate::vocab::{R2RML, RDF_TYPE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierSyntax {
    /// `<LoanMap>`
    Bracketed,
    /// `ex:LoanMap`
    Prefixed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockSpan {
    /// Identifier as written, without angle brackets.
    pub id: String,
    /// Token index range `[start, end)`.
    pub start: usize,
    pub end: usize,
}

pub fn segment(tokens: &[Token], prefixes: &PrefixMap, strategy: IdentifierStrategy) -> Vec<BlockSpan> {
    let starts = block_starts(tokens, prefixes);

    let chosen: Vec<(usize, String, IdentifierSyntax)> = match strategy {
        IdentifierStrategy::Merged => starts,
        IdentifierStrategy::FirstMatch => {
            let bracketed: Vec<_> = starts
                .iter()
                .filter(|(_, _, syntax)| *syntax == IdentifierSyntax::Bracketed)
                .cloned()
                .collect();
            if bracketed.is_empty() {
                starts
            } else {
                bracketed
            }
        }
    };

    let mut spans = Vec::with_capacity(chosen.len());
    for (i, (start, id, _)) in chosen.iter().enumerate() {
        let end = chosen.get(i + 1).map(|(next, _, _)| *next).unwrap_or(tokens.len());
        spans.push(BlockSpan {
            id: id.clone(),
            start: *start,
            end,
        });
    }
    spans
}

fn block_starts(tokens: &[Token], prefixes: &PrefixMap) -> Vec<(usize, String, IdentifierSyntax)> {
    let mut starts = Vec::new();
    let mut depth = 0usize;

    for (idx, token) in tokens.iter().enumerate() {
        match &token.kind {
            TokenKind::LBracket => depth += 1,
            TokenKind::RBracket => depth = depth.saturating_sub(1),
            TokenKind::Iri(id) if depth == 0 && declares_triples_map(tokens, idx, prefixes) => {
                starts.push((idx, id.clone(), IdentifierSyntax::Bracketed));
            }
            TokenKind::PrefixedName(id) if depth == 0 && declares_triples_map(tokens, idx, prefixes) => {
                starts.push((idx, id.clone(), IdentifierSyntax::Prefixed));
            }
            _ => {}
        }
    }
    starts
}

fn declares_triples_map(tokens: &[Token], idx: usize, prefixes: &PrefixMap) -> bool {
    let (Some(verb), Some(class)) = (tokens.get(idx + 1), tokens.get(idx + 2)) else {
        return false;
    };
    prefixes.token_is(&verb.kind, RDF_TYPE) && prefixes.token_is(&class.kind, R2RML::TRIPLES_MAP)
}
