//! faxc-par - recursive-descent parser.
//!
//! Turns a token stream from `faxc-lex` into the untyped tree in
//! [`ast`]. One [`Parser`] per subunit; [`parse_unit`] stitches several
//! subunits' trees into one [`ast::Unit`].

pub mod ast;
mod expr;
mod items;
mod types;

use faxc_lex::{tokenize, LexError, Token, TokenWithSpan};
use faxc_util::{FileId, Span};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("expected {expected}, found {found:?}")]
    Expected { expected: String, found: Token, span: Span },

    #[error("unexpected token {found:?}")]
    Unexpected { found: Token, span: Span },
}

impl ParseError {
    pub fn span(&self) -> Span {
        match self {
            ParseError::Lex(e) => e.span(),
            ParseError::Expected { span, .. } | ParseError::Unexpected { span, .. } => *span,
        }
    }
}

pub(crate) struct Parser {
    tokens: Vec<TokenWithSpan>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<TokenWithSpan>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos].token
    }

    fn peek_span(&self) -> Span {
        self.tokens[self.pos].span
    }

    fn peek_at(&self, offset: usize) -> &Token {
        let idx = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[idx].token
    }

    fn advance(&mut self) -> TokenWithSpan {
        let tok = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn at(&self, token: &Token) -> bool {
        self.peek() == token
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.at(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: Token) -> Result<TokenWithSpan, ParseError> {
        if self.at(&token) {
            Ok(self.advance())
        } else {
            Err(ParseError::Expected {
                expected: format!("{token:?}"),
                found: self.peek().clone(),
                span: self.peek_span(),
            })
        }
    }

    fn expect_ident(&mut self) -> Result<faxc_util::Symbol, ParseError> {
        match self.peek().clone() {
            Token::Ident(sym) => {
                self.advance();
                Ok(sym)
            }
            found => Err(ParseError::Expected {
                expected: "identifier".to_string(),
                found,
                span: self.peek_span(),
            }),
        }
    }

    fn span_from(&self, start: Span) -> Span {
        let end = self.tokens[self.pos.saturating_sub(1)].span;
        Span::with_file(start.start, end.end, start.file_id, start.line, start.column)
    }
}

/// Parse one source file into a [`ast::SubUnit`].
pub fn parse_subunit(source: &str, file_id: FileId) -> Result<ast::SubUnit, ParseError> {
    let tokens = tokenize(source, file_id)?;
    let mut parser = Parser::new(tokens);

    let mut imports = Vec::new();
    while parser.at(&Token::Use) {
        imports.push(items::parse_use(&mut parser)?);
    }

    let mut decls = Vec::new();
    while !parser.at(&Token::Eof) {
        decls.push(items::parse_decl(&mut parser)?);
    }

    Ok(ast::SubUnit { imports, decls })
}

/// Parse several subunits (one per source file) into a single [`ast::Unit`].
pub fn parse_unit(sources: &[(&str, FileId)]) -> Result<ast::Unit, ParseError> {
    let subunits = sources
        .iter()
        .map(|(source, file_id)| parse_subunit(source, *file_id))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ast::Unit { subunits })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_empty_unit() {
        let unit = parse_subunit("", FileId::DUMMY).unwrap();
        assert!(unit.decls.is_empty());
    }

    #[test]
    fn parses_const_and_type_decls() {
        let unit = parse_subunit("const PI: f64 = 3.14; type celsius = f64;", FileId::DUMMY).unwrap();
        assert_eq!(unit.decls.len(), 2);
    }

    #[test]
    fn parses_exported_function() {
        let unit = parse_subunit(
            "export fn add(a: int, b: int) int = { return a + b; };",
            FileId::DUMMY,
        )
        .unwrap();
        assert_eq!(unit.decls.len(), 1);
        assert!(unit.decls[0].exported);
    }

    #[test]
    fn parses_import_without_following_it() {
        let unit = parse_subunit("use fmt; export fn main() void = {};", FileId::DUMMY).unwrap();
        assert_eq!(unit.imports.len(), 1);
        assert_eq!(unit.decls.len(), 1);
    }
}
