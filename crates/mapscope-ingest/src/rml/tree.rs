//! Predicate/object tree built from tokens by an explicit stack machine.
//!
//! Each `[` pushes a frame and each `]` pops it, attaching the finished blank
//! node to its parent's current predicate. The machine is forgiving:
//!
//! - a `]` with no open frame is ignored,
//! - frames still open at a `.` or at end of input are closed in place,
//! - a term where a separator was expected starts a new predicate.

use std::collections::VecDeque;

use super::prefixes::PrefixMap;
use super::token::{Token, TokenKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    /// `<...>` without angle brackets.
    Iri(String),
    PrefixedName(String),
    BlankNodeLabel(String),
    Literal {
        value: String,
        datatype: Option<String>,
        language: Option<String>,
    },
    Word(String),
    /// The `a` keyword.
    TypeKeyword,
    /// `[ ... ]`
    Node(PoList),
}

impl Term {
    /// Lexical value as written in the document.
    pub fn text(&self) -> Option<&str> {
        match self {
            Term::Iri(s) | Term::PrefixedName(s) | Term::BlankNodeLabel(s) | Term::Word(s) => {
                Some(s)
            }
            Term::Literal { value, .. } => Some(value),
            Term::TypeKeyword => Some("a"),
            Term::Node(_) => None,
        }
    }

    pub fn as_node(&self) -> Option<&PoList> {
        match self {
            Term::Node(list) => Some(list),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoEntry {
    pub predicate: Term,
    pub objects: Vec<Term>,
}

/// A predicate-object list: the body of a subject or of a `[ ... ]` node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoList {
    pub entries: Vec<PoEntry>,
}

impl PoList {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Objects of every entry whose predicate denotes `predicate`.
    pub fn objects<'a>(
        &'a self,
        prefixes: &'a PrefixMap,
        predicate: &'a str,
    ) -> impl Iterator<Item = &'a Term> + 'a {
        self.entries
            .iter()
            .filter(move |e| prefixes.is(&e.predicate, predicate))
            .flat_map(|e| e.objects.iter())
    }

    pub fn first(&self, prefixes: &PrefixMap, predicate: &str) -> Option<&Term> {
        self.entries
            .iter()
            .filter(|e| prefixes.is(&e.predicate, predicate))
            .find_map(|e| e.objects.first())
    }

    /// Blank-node objects of `predicate`.
    pub fn nodes<'a>(
        &'a self,
        prefixes: &'a PrefixMap,
        predicate: &'a str,
    ) -> impl Iterator<Item = &'a PoList> + 'a {
        self.objects(prefixes, predicate).filter_map(Term::as_node)
    }

    /// Breadth-first lookup through nested nodes; shallower matches win.
    pub fn find_nested(&self, prefixes: &PrefixMap, predicate: &str) -> Option<&Term> {
        let mut queue = VecDeque::from([self]);
        while let Some(list) = queue.pop_front() {
            if let Some(term) = list.first(prefixes, predicate) {
                return Some(term);
            }
            for entry in &list.entries {
                queue.extend(entry.objects.iter().filter_map(Term::as_node));
            }
        }
        None
    }

    /// Copy of this list without the entries for `predicate`.
    pub fn without(&self, prefixes: &PrefixMap, predicate: &str) -> PoList {
        PoList {
            entries: self
                .entries
                .iter()
                .filter(|e| !prefixes.is(&e.predicate, predicate))
                .cloned()
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub subject: Option<Term>,
    pub body: PoList,
}

pub fn build_statements(tokens: &[Token]) -> Vec<Statement> {
    let mut builder = TreeBuilder::new();
    let mut idx = 0;
    while idx < tokens.len() {
        idx = builder.step(tokens, idx);
    }
    builder.finish()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    Subject,
    Predicate,
    Object,
    Separator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Root,
    Subject,
    Object,
}

#[derive(Debug)]
struct Frame {
    role: Role,
    expect: Expect,
    list: PoList,
}

impl Frame {
    fn new(role: Role, expect: Expect) -> Self {
        Self {
            role,
            expect,
            list: PoList::default(),
        }
    }

    fn accept(&mut self, term: Term) {
        match self.expect {
            Expect::Object => {
                if let Some(entry) = self.list.entries.last_mut() {
                    entry.objects.push(term);
                }
                self.expect = Expect::Separator;
            }
            // A missing `;` reads as the start of the next predicate.
            Expect::Predicate | Expect::Separator | Expect::Subject => {
                self.list.entries.push(PoEntry {
                    predicate: term,
                    objects: Vec::new(),
                });
                self.expect = Expect::Object;
            }
        }
    }
}

struct TreeBuilder {
    /// `stack[0]` is the root frame of the current statement.
    stack: Vec<Frame>,
    subject: Option<Term>,
    in_directive: bool,
    statements: Vec<Statement>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            stack: vec![Frame::new(Role::Root, Expect::Subject)],
            subject: None,
            in_directive: false,
            statements: Vec::new(),
        }
    }

    fn top(&mut self) -> &mut Frame {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    fn at_statement_start(&self) -> bool {
        self.stack.len() == 1 && self.stack[0].expect == Expect::Subject
    }

    /// Consume the token at `idx`; returns the index of the next unread token.
    fn step(&mut self, tokens: &[Token], idx: usize) -> usize {
        let kind = &tokens[idx].kind;

        if self.in_directive {
            match kind {
                TokenKind::Dot => self.in_directive = false,
                TokenKind::Iri(_) => {
                    self.in_directive = false;
                    if matches!(tokens.get(idx + 1).map(|t| &t.kind), Some(TokenKind::Dot)) {
                        return idx + 2;
                    }
                }
                _ => {}
            }
            return idx + 1;
        }

        match kind {
            TokenKind::KwPrefix | TokenKind::KwBase if self.at_statement_start() => {
                self.in_directive = true;
            }
            TokenKind::LBracket => {
                let role = if self.at_statement_start() {
                    Role::Subject
                } else {
                    Role::Object
                };
                self.stack.push(Frame::new(role, Expect::Predicate));
            }
            TokenKind::RBracket => {
                if self.stack.len() > 1 {
                    self.close_frame();
                }
            }
            TokenKind::Semicolon => {
                let top = self.top();
                if top.expect != Expect::Subject {
                    top.expect = Expect::Predicate;
                }
            }
            TokenKind::Comma => {
                let top = self.top();
                if top.expect == Expect::Separator {
                    top.expect = Expect::Object;
                }
            }
            TokenKind::Dot => {
                self.close_all();
                self.finish_statement();
            }
            _ => {
                if let Some((term, next)) = term_at(tokens, idx) {
                    self.accept(term);
                    return next;
                }
            }
        }
        idx + 1
    }

    fn accept(&mut self, term: Term) {
        if self.at_statement_start() {
            self.subject = Some(term);
            self.stack[0].expect = Expect::Predicate;
        } else {
            self.top().accept(term);
        }
    }

    fn close_frame(&mut self) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        match frame.role {
            Role::Object => {
                let parent = self.top();
                if let Some(entry) = parent.list.entries.last_mut() {
                    entry.objects.push(Term::Node(frame.list));
                }
                parent.expect = Expect::Separator;
            }
            Role::Subject => {
                self.subject = Some(Term::Node(frame.list));
                self.stack[0].expect = Expect::Predicate;
            }
            Role::Root => self.stack.push(frame),
        }
    }

    fn close_all(&mut self) {
        while self.stack.len() > 1 {
            self.close_frame();
        }
    }

    fn finish_statement(&mut self) {
        let root = &mut self.stack[0];
        let body = std::mem::take(&mut root.list);
        root.expect = Expect::Subject;
        let subject = self.subject.take();
        if subject.is_some() || !body.is_empty() {
            self.statements.push(Statement { subject, body });
        }
    }

    fn finish(mut self) -> Vec<Statement> {
        self.close_all();
        self.finish_statement();
        self.statements
    }
}

/// Read one term starting at `idx`, folding `^^datatype` / `@lang` suffixes
/// into literals.
fn term_at(tokens: &[Token], idx: usize) -> Option<(Term, usize)> {
    let term = match &tokens[idx].kind {
        TokenKind::Iri(s) => Term::Iri(s.clone()),
        TokenKind::PrefixedName(s) => Term::PrefixedName(s.clone()),
        TokenKind::BlankNodeLabel(s) => Term::BlankNodeLabel(s.clone()),
        TokenKind::Word(s) => Term::Word(s.clone()),
        TokenKind::KwA => Term::TypeKeyword,
        TokenKind::String(value) => {
            let mut next = idx + 1;
            let mut datatype = None;
            let mut language = None;
            match tokens.get(next).map(|t| &t.kind) {
                Some(TokenKind::DoubleCaret) => {
                    next += 1;
                    if let Some(TokenKind::Iri(dt) | TokenKind::PrefixedName(dt)) =
                        tokens.get(next).map(|t| &t.kind)
                    {
                        datatype = Some(dt.clone());
                        next += 1;
                    }
                }
                Some(TokenKind::LangTag(lang)) => {
                    language = Some(lang.clone());
                    next += 1;
                }
                _ => {}
            }
            return Some((
                Term::Literal {
                    value: value.clone(),
                    datatype,
                    language,
                },
                next,
            ));
        }
        _ => return None,
    };
    Some((term, idx + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rml::lexer::tokenize;
    use crate::vocab::R2RML;

    fn statements(text: &str) -> Vec<Statement> {
        build_statements(&tokenize(text))
    }

    #[test]
    fn nested_groups_become_nested_nodes() {
        let stmts = statements(
            r#"<LoanMap> a rr:TriplesMap ;
                rr:subjectMap [ rr:template "ex:loan/{LoanID}" ; rr:class ex:Loan ] ;
                rr:predicateObjectMap [
                    rr:predicate ex:hasBorrower ;
                    rr:objectMap [ rr:parentTriplesMap <BorrowerMap> ;
                                   rr:joinCondition [ rr:child "BorrowerID" ; rr:parent "ID" ] ]
                ] ."#,
        );
        assert_eq!(stmts.len(), 1);
        assert_eq!(stmts[0].subject, Some(Term::Iri("LoanMap".to_string())));

        let prefixes = PrefixMap::default();
        let body = &stmts[0].body;
        let subject_map = body.nodes(&prefixes, R2RML::SUBJECT_MAP).next().expect("subject map");
        assert_eq!(
            subject_map.first(&prefixes, R2RML::CLASS).and_then(Term::text),
            Some("ex:Loan")
        );

        let pom = body
            .nodes(&prefixes, R2RML::PREDICATE_OBJECT_MAP)
            .next()
            .expect("pom");
        assert_eq!(
            pom.find_nested(&prefixes, R2RML::CHILD).and_then(Term::text),
            Some("BorrowerID")
        );
        assert_eq!(
            pom.find_nested(&prefixes, R2RML::PARENT_TRIPLES_MAP),
            Some(&Term::Iri("BorrowerMap".to_string()))
        );
    }

    #[test]
    fn first_object_outlives_the_prefix_table() {
        fn class_of(list: &PoList) -> Option<&Term> {
            let prefixes = PrefixMap::default();
            list.first(&prefixes, R2RML::CLASS)
        }

        let stmts = statements("<M> rr:class ex:A, ex:B ; rr:class ex:C .");
        assert_eq!(class_of(&stmts[0].body).and_then(Term::text), Some("ex:A"));
        assert_eq!(class_of(&PoList::default()), None);
    }

    #[test]
    fn comma_lists_share_a_predicate() {
        let stmts = statements("<M> rr:predicateObjectMap [ rr:predicate ex:a ], [ rr:predicate ex:b ] .");
        let prefixes = PrefixMap::default();
        assert_eq!(
            stmts[0]
                .body
                .nodes(&prefixes, R2RML::PREDICATE_OBJECT_MAP)
                .count(),
            2
        );
    }

    #[test]
    fn typed_literals_keep_their_datatype() {
        let stmts = statements(r#"<M> ex:p "5"^^xsd:int ; ex:q "x"@en ."#);
        assert_eq!(
            stmts[0].body.entries[0].objects[0],
            Term::Literal {
                value: "5".to_string(),
                datatype: Some("xsd:int".to_string()),
                language: None,
            }
        );
        assert_eq!(
            stmts[0].body.entries[1].objects[0],
            Term::Literal {
                value: "x".to_string(),
                datatype: None,
                language: Some("en".to_string()),
            }
        );
    }

    #[test]
    fn unbalanced_brackets_are_tolerated() {
        let stmts = statements("<A> ex:p [ ex:q [ ex:r \"1\" ] ; ex:s \"2\" ] ] ; ex:t \"3\" . <B> ex:p [ ex:q \"x\"");
        assert_eq!(stmts.len(), 2);
        assert_eq!(stmts[0].body.entries.len(), 2);
        let open = stmts[1].body.entries[0].objects[0].as_node().expect("closed at end");
        assert_eq!(open.entries[0].objects[0].text(), Some("x"));
    }

    #[test]
    fn directives_are_skipped() {
        let stmts = statements("@prefix ex: <http://ex.org/> .\nPREFIX rr: <http://www.w3.org/ns/r2rml#>\n<A> a rr:TriplesMap .");
        assert_eq!(stmts.len(), 1);
        assert_eq!(stmts[0].subject, Some(Term::Iri("A".to_string())));
        assert_eq!(stmts[0].body.entries[0].predicate, Term::TypeKeyword);
    }

    #[test]
    fn missing_semicolon_starts_a_new_predicate() {
        let stmts = statements("<A> ex:p \"1\" ex:q \"2\" .");
        assert_eq!(stmts[0].body.entries.len(), 2);
        assert_eq!(stmts[0].body.entries[1].predicate, Term::PrefixedName("ex:q".to_string()));
    }
}
