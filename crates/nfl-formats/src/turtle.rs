// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Small Turtle reader plus term-formatting helpers for the RDF adapters.
//!
//! Covers what the adapters emit and what people usually hand-write:
//! `@prefix`/`PREFIX`, `@base`/`BASE` (ignored; relative IRIs are kept as
//! written), `<iri>`, prefixed names, `a`, `;` and `,` lists, quoted
//! literals with escapes, language tags, datatypes and bare numbers/booleans.
//! Blank nodes and collections are rejected.

use std::iter::Peekable;
use std::str::Chars;

use indexmap::IndexMap;

use crate::FormatError;

/// Namespace for NFL resources and predicates.
pub const NFL_NS: &str = "http://example.org/nfl#";
/// RDF namespace.
pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
/// schema.org namespace.
pub const SCHEMA_NS: &str = "http://schema.org/";
/// OWL namespace.
pub const OWL_NS: &str = "http://www.w3.org/2002/07/owl#";
const RDFS_NS: &str = "http://www.w3.org/2000/01/rdf-schema#";
const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema#";

/// Prefixes known without a declaration.
const WELL_KNOWN: [(&str, &str); 6] = [
    ("nfl", NFL_NS),
    ("owl", OWL_NS),
    ("rdf", RDF_NS),
    ("rdfs", RDFS_NS),
    ("schema", SCHEMA_NS),
    ("xsd", XSD_NS),
];

/// Object position of a triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    /// Resource reference (absolute or as-written relative IRI).
    Iri(String),
    /// Literal lexical form.
    Literal(String),
}

/// One statement with subject and predicate as IRIs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Triple {
    /// Subject IRI.
    pub subject: String,
    /// Predicate IRI.
    pub predicate: String,
    /// Object term.
    pub object: Term,
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Iri(String),
    PName(String, String),
    A,
    Literal(String),
    Prefix { sparql: bool },
    Base { sparql: bool },
    LangTag,
    Datatype,
    Dot,
    Semicolon,
    Comma,
}

struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
    pending: Option<Token>,
}

fn syntax(line: usize, message: impl Into<String>) -> FormatError {
    FormatError::Turtle {
        line,
        message: message.into(),
    }
}

impl<'a> Lexer<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars().peekable(),
            line: 1,
            pending: None,
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next();
        if c == Some('\n') {
            self.line += 1;
        }
        c
    }

    fn skip_trivia(&mut self) {
        while let Some(&c) = self.chars.peek() {
            if c == '#' {
                while let Some(c) = self.bump() {
                    if c == '\n' {
                        break;
                    }
                }
            } else if c.is_whitespace() {
                self.bump();
            } else {
                break;
            }
        }
    }

    fn next_token(&mut self) -> Result<Option<(usize, Token)>, FormatError> {
        if let Some(token) = self.pending.take() {
            return Ok(Some((self.line, token)));
        }
        self.skip_trivia();
        let line = self.line;
        let Some(&c) = self.chars.peek() else {
            return Ok(None);
        };
        let token = match c {
            '<' => {
                self.bump();
                let mut iri = String::new();
                loop {
                    match self.bump() {
                        Some('>') => break,
                        Some('\n') | None => return Err(syntax(line, "unterminated IRI")),
                        Some(c) => iri.push(c),
                    }
                }
                Token::Iri(iri)
            }
            '"' => {
                self.bump();
                Token::Literal(self.string_body(line)?)
            }
            '.' => {
                self.bump();
                Token::Dot
            }
            ';' => {
                self.bump();
                Token::Semicolon
            }
            ',' => {
                self.bump();
                Token::Comma
            }
            '^' => {
                self.bump();
                if self.bump() != Some('^') {
                    return Err(syntax(line, "expected '^^'"));
                }
                Token::Datatype
            }
            '@' => {
                self.bump();
                let word = self.word();
                match word.as_str() {
                    "prefix" => Token::Prefix { sparql: false },
                    "base" => Token::Base { sparql: false },
                    "" => return Err(syntax(line, "dangling '@'")),
                    _ => Token::LangTag,
                }
            }
            _ => {
                let mut word = self.word();
                if word.len() > 1 && word.ends_with('.') {
                    word.pop();
                    self.pending = Some(Token::Dot);
                }
                classify(line, word)?
            }
        };
        Ok(Some((line, token)))
    }

    fn word(&mut self) -> String {
        let mut word = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_whitespace() || matches!(c, ';' | ',' | '<' | '>' | '"' | '#' | '^' | '@') {
                break;
            }
            word.push(c);
            self.bump();
        }
        word
    }

    fn string_body(&mut self, line: usize) -> Result<String, FormatError> {
        let mut out = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(out),
                Some('\\') => {
                    let escaped = match self.bump() {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('r') => '\r',
                        Some('"') => '"',
                        Some('\'') => '\'',
                        Some('\\') => '\\',
                        Some('u') => {
                            let hex: String = (0..4).filter_map(|_| self.bump()).collect();
                            u32::from_str_radix(&hex, 16)
                                .ok()
                                .and_then(char::from_u32)
                                .ok_or_else(|| syntax(line, "bad \\u escape"))?
                        }
                        _ => return Err(syntax(line, "bad escape")),
                    };
                    out.push(escaped);
                }
                Some('\n') | None => return Err(syntax(line, "unterminated string")),
                Some(c) => out.push(c),
            }
        }
    }
}

fn classify(line: usize, word: String) -> Result<Token, FormatError> {
    if word == "a" {
        return Ok(Token::A);
    }
    if word.eq_ignore_ascii_case("prefix") {
        return Ok(Token::Prefix { sparql: true });
    }
    if word.eq_ignore_ascii_case("base") {
        return Ok(Token::Base { sparql: true });
    }
    let numeric = word
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || c == '+' || c == '-');
    if numeric || word == "true" || word == "false" {
        return Ok(Token::Literal(word));
    }
    match word.split_once(':') {
        Some((prefix, local)) => Ok(Token::PName(prefix.to_owned(), local.to_owned())),
        None => Err(syntax(line, format!("unexpected token '{word}'"))),
    }
}

struct Reader<'a> {
    lexer: Lexer<'a>,
    peeked: Option<(usize, Token)>,
    prefixes: IndexMap<String, String>,
}

impl Reader<'_> {
    fn next(&mut self) -> Result<Option<(usize, Token)>, FormatError> {
        match self.peeked.take() {
            Some(t) => Ok(Some(t)),
            None => self.lexer.next_token(),
        }
    }

    fn peek(&mut self) -> Result<Option<&Token>, FormatError> {
        if self.peeked.is_none() {
            self.peeked = self.lexer.next_token()?;
        }
        Ok(self.peeked.as_ref().map(|(_, t)| t))
    }

    fn expect(&mut self, what: &str) -> Result<(usize, Token), FormatError> {
        let line = self.lexer.line;
        self.next()?
            .ok_or_else(|| syntax(line, format!("unexpected end of input, expected {what}")))
    }

    fn resolve(&self, line: usize, token: Token) -> Result<String, FormatError> {
        match token {
            Token::Iri(iri) => Ok(iri),
            Token::PName(prefix, local) => self
                .prefixes
                .get(&prefix)
                .map(|ns| format!("{ns}{local}"))
                .ok_or_else(|| syntax(line, format!("unknown prefix '{prefix}:'"))),
            other => Err(syntax(line, format!("expected IRI, found {other:?}"))),
        }
    }

    fn directive(&mut self, prefix: bool, sparql: bool) -> Result<(), FormatError> {
        if prefix {
            let (line, name) = self.expect("prefix name")?;
            let Token::PName(name, local) = name else {
                return Err(syntax(line, "expected 'prefix:'"));
            };
            if !local.is_empty() {
                return Err(syntax(line, "expected 'prefix:'"));
            }
            let (line, iri) = self.expect("namespace IRI")?;
            let Token::Iri(ns) = iri else {
                return Err(syntax(line, "expected namespace IRI"));
            };
            self.prefixes.insert(name, ns);
        } else {
            let (line, iri) = self.expect("base IRI")?;
            if !matches!(iri, Token::Iri(_)) {
                return Err(syntax(line, "expected base IRI"));
            }
        }
        if !sparql {
            let (line, dot) = self.expect("'.'")?;
            if dot != Token::Dot {
                return Err(syntax(line, "expected '.' after directive"));
            }
        }
        Ok(())
    }

    fn object(&mut self) -> Result<Term, FormatError> {
        let (line, token) = self.expect("object")?;
        match token {
            Token::Literal(value) => {
                let annotation = self.peek()?.cloned();
                match annotation {
                    Some(Token::LangTag) => {
                        self.next()?;
                    }
                    Some(Token::Datatype) => {
                        self.next()?;
                        let (line, dt) = self.expect("datatype IRI")?;
                        self.resolve(line, dt)?;
                    }
                    _ => {}
                }
                Ok(Term::Literal(value))
            }
            other => Ok(Term::Iri(self.resolve(line, other)?)),
        }
    }

    fn statement(&mut self, line: usize, first: Token, out: &mut Vec<Triple>) -> Result<(), FormatError> {
        let subject = self.resolve(line, first)?;
        loop {
            let (line, token) = self.expect("predicate")?;
            let predicate = match token {
                Token::A => format!("{RDF_NS}type"),
                other => self.resolve(line, other)?,
            };
            loop {
                let object = self.object()?;
                out.push(Triple {
                    subject: subject.clone(),
                    predicate: predicate.clone(),
                    object,
                });
                let (line, sep) = self.expect("';', ',' or '.'")?;
                match sep {
                    Token::Comma => continue,
                    Token::Semicolon => {
                        if self.peek()? == Some(&Token::Dot) {
                            self.next()?;
                            return Ok(());
                        }
                        break;
                    }
                    Token::Dot => return Ok(()),
                    other => return Err(syntax(line, format!("unexpected {other:?}"))),
                }
            }
        }
    }
}

/// Read every triple in `text`.
pub fn read(text: &str) -> Result<Vec<Triple>, FormatError> {
    let mut reader = Reader {
        lexer: Lexer::new(text),
        peeked: None,
        prefixes: WELL_KNOWN
            .iter()
            .map(|(p, ns)| ((*p).to_owned(), (*ns).to_owned()))
            .collect(),
    };
    let mut triples = Vec::new();
    while let Some((line, token)) = reader.next()? {
        match token {
            Token::Prefix { sparql } => reader.directive(true, sparql)?,
            Token::Base { sparql } => reader.directive(false, sparql)?,
            first => reader.statement(line, first, &mut triples)?,
        }
    }
    Ok(triples)
}

/// Quoted literal with Turtle escapes.
pub fn literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn is_safe_local(local: &str) -> bool {
    !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}

/// `nfl:<local>` when the name is a plain local part, else a full IRI.
pub fn nfl_term(local: &str) -> String {
    if is_safe_local(local) {
        format!("nfl:{local}")
    } else {
        format!("<{NFL_NS}{local}>")
    }
}

/// NFL IRIs become bare local names, well-known namespaces become
/// `prefix:local`, anything else is returned unchanged.
pub fn compact(iri: &str) -> String {
    if let Some(local) = iri.strip_prefix(NFL_NS) {
        return local.to_owned();
    }
    for (prefix, ns) in WELL_KNOWN {
        if let Some(local) = iri.strip_prefix(ns) {
            return format!("{prefix}:{local}");
        }
    }
    iri.to_owned()
}

/// `@prefix` lines for the namespaces the adapters emit.
pub fn prefix_header() -> String {
    ["nfl", "rdf", "rdfs", "schema"]
        .iter()
        .filter_map(|p| WELL_KNOWN.iter().find(|(name, _)| name == p))
        .map(|(p, ns)| format!("@prefix {p}: <{ns}> .\n"))
        .collect()
}
