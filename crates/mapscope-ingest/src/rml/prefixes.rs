//! Prefix bindings for resolving vocabulary terms.

use std::collections::HashMap;

use super::token::{Token, TokenKind};
use super::tree::Term;
use crate::vocab::{DEFAULT_PREFIXES, RDF_TYPE};

#[derive(Debug, Clone)]
pub struct PrefixMap {
    bindings: HashMap<String, String>,
}

impl Default for PrefixMap {
    fn default() -> Self {
        let bindings = DEFAULT_PREFIXES
            .iter()
            .map(|(p, ns)| (p.to_string(), ns.to_string()))
            .collect();
        Self { bindings }
    }
}

impl PrefixMap {
    /// Collect every `@prefix p: <ns>` / `PREFIX p: <ns>` in the token stream on
    /// top of the default bindings. Later declarations win.
    pub fn from_tokens(tokens: &[Token]) -> Self {
        let mut map = Self::default();
        for window in tokens.windows(3) {
            if let (TokenKind::KwPrefix, TokenKind::PrefixedName(name), TokenKind::Iri(ns)) =
                (&window[0].kind, &window[1].kind, &window[2].kind)
            {
                if let Some(prefix) = name.strip_suffix(':') {
                    map.bindings.insert(prefix.to_string(), ns.clone());
                }
            }
        }
        map
    }

    pub fn namespace(&self, prefix: &str) -> Option<&str> {
        self.bindings.get(prefix).map(String::as_str)
    }

    /// Expand a prefixed name. Unknown prefixes yield `None`.
    pub fn expand_pname(&self, pname: &str) -> Option<String> {
        let (prefix, local) = pname.split_once(':')?;
        self.namespace(prefix).map(|ns| format!("{ns}{local}"))
    }

    /// Full IRI a term denotes, where that is knowable.
    pub fn resolve(&self, term: &Term) -> Option<String> {
        match term {
            Term::Iri(iri) => Some(iri.clone()),
            Term::PrefixedName(pname) => self.expand_pname(pname),
            Term::TypeKeyword => Some(RDF_TYPE.to_string()),
            _ => None,
        }
    }

    /// Whether `term` denotes `iri`.
    pub fn is(&self, term: &Term, iri: &str) -> bool {
        match term {
            Term::Iri(value) => value == iri,
            Term::PrefixedName(pname) => pname
                .split_once(':')
                .and_then(|(prefix, local)| {
                    self.namespace(prefix)
                        .map(|ns| iri.strip_prefix(ns) == Some(local))
                })
                .unwrap_or(false),
            Term::TypeKeyword => iri == RDF_TYPE,
            _ => false,
        }
    }

    /// Token-level variant of [`PrefixMap::is`], used before any tree exists.
    pub fn token_is(&self, token: &TokenKind, iri: &str) -> bool {
        match token {
            TokenKind::Iri(value) => value == iri,
            TokenKind::PrefixedName(pname) => self.is(&Term::PrefixedName(pname.clone()), iri),
            TokenKind::KwA => iri == RDF_TYPE,
            _ => false,
        }
    }
}
